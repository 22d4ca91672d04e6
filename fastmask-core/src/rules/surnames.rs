//! surnames.rs - Dictionary-backed surname detection.
//!
//! The surname rule is low certainty and disabled unless beta features are on.
//! It needs an explicit [`SurnameTable`], built from `surname,count` CSV
//! files; nothing is loaded implicitly. Every base surname is expanded into a
//! set of heuristic Polish inflected forms so that `Kowalskiego` or
//! `Nowakiem` are found as well.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use regex::{Match, Regex};

use crate::detector::{build_regex, rewrite_matches, Detector};
use crate::errors::MaskerError;

/// Rows whose count is below this are ignored by default.
pub const DEFAULT_MIN_COUNT: u64 = 150;

/// Lower-cased surnames together with their generated inflected forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurnameTable {
    forms: HashSet<String>,
}

impl SurnameTable {
    /// Builds a table from bare surnames, generating inflected forms.
    pub fn from_surnames<I, S>(surnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for surname in surnames {
            table.insert(surname.as_ref());
        }
        table
    }

    /// Reads `surname,count` rows. The first line is a header. Rows with a
    /// count below `min_count` are skipped; a count that is not a number is
    /// an error.
    pub fn from_csv_reader<R: BufRead>(reader: R, min_count: u64) -> Result<Self, MaskerError> {
        let mut table = Self::default();
        let mut kept = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if idx == 0 || line.trim().is_empty() {
                continue;
            }

            let mut columns = line.split(',');
            let surname = columns.next().unwrap_or_default().trim();
            let Some(raw_count) = columns.next().map(str::trim) else {
                return Err(MaskerError::SurnameTable(format!(
                    "line {}: missing count column",
                    idx + 1
                )));
            };
            let count: u64 = raw_count.parse().map_err(|e| {
                MaskerError::SurnameTable(format!(
                    "line {}: invalid count '{}': {}",
                    idx + 1,
                    raw_count,
                    e
                ))
            })?;

            if count < min_count || surname.is_empty() {
                continue;
            }
            table.insert(surname);
            kept += 1;
        }

        debug!("Read {} surname(s) at or above count {}.", kept, min_count);
        Ok(table)
    }

    /// Reads and merges several CSV files.
    pub fn from_csv_files<P: AsRef<Path>>(
        paths: &[P],
        min_count: u64,
    ) -> Result<Self, MaskerError> {
        let mut table = Self::default();
        for path in paths {
            let path = path.as_ref();
            let file = File::open(path).map_err(|e| {
                MaskerError::SurnameTable(format!("cannot open '{}': {}", path.display(), e))
            })?;
            let part = Self::from_csv_reader(BufReader::new(file), min_count)?;
            table.forms.extend(part.forms);
        }
        info!("Loaded surname table with {} forms from {} file(s).", table.len(), paths.len());
        Ok(table)
    }

    /// Case-insensitive lookup.
    pub fn contains(&self, word: &str) -> bool {
        self.forms.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    fn insert(&mut self, surname: &str) {
        let base = surname.trim().to_lowercase();
        if base.is_empty() {
            return;
        }
        self.forms.extend(inflected_forms(&base));
        self.forms.insert(base);
    }
}

/// Drops the last `n` characters, saturating at the empty string.
fn drop_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return s;
    }
    let end = s.char_indices().rev().nth(n - 1).map_or(0, |(i, _)| i);
    &s[..end]
}

fn with_suffixes(stem: &str, suffixes: &[&str]) -> Vec<String> {
    suffixes.iter().map(|suffix| [stem, *suffix].concat()).collect()
}

const MASCULINE_ADJECTIVAL: [&str; 5] = ["ski", "cki", "dzki", "owski", "ewski"];
const ADJECTIVAL_CASES: [&str; 6] = ["ego", "emu", "em", "em", "", "owie"];
const FEMININE_CASES: [&str; 2] = ["iej", "ą"];
const PATRONYMIC_CASES: [&str; 6] = ["", "a", "owi", "em", "u", "owie"];
const K_ENDING_CASES: [&str; 7] = ["", "a", "owi", "a", "iem", "u", "owie"];
const A_ENDING_CASES: [&str; 6] = ["", "ą", "u", "ą", "e", "owie"];
const KO_CASES: [&str; 3] = ["ki", "ce", "ką"];
const EC_CASES: [&str; 6] = ["ca", "cowi", "cem", "ńcem", "cu", "cowie"];
const GENERIC_CASES: [&str; 14] = [
    "a", "u", "owi", "em", "emu", "om", "ów", "ami", "ach", "y", "ie", "ą", "ę", "owie",
];

/// Heuristic declension of a lower-cased base surname. The forms are not a
/// linguistic model; they cover the frequent patterns of everyday text.
/// Only purely alphabetic forms are kept.
pub fn inflected_forms(base: &str) -> HashSet<String> {
    let mut forms: Vec<String> = Vec::new();

    if MASCULINE_ADJECTIVAL.iter().any(|suffix| base.ends_with(suffix)) {
        // Feminine forms drop the final `i`: kowalska, kowalskiej, kowalską.
        let stem = drop_chars(base, 1);
        forms.push(base.to_string());
        forms.push([stem, "a"].concat());
        forms.extend(with_suffixes(base, &ADJECTIVAL_CASES));
        forms.extend(with_suffixes(stem, &FEMININE_CASES));
    } else if base.ends_with("owicz") || base.ends_with("ewicz") {
        forms.extend(with_suffixes(base, &PATRONYMIC_CASES));
    } else if ["ak", "ek", "ik", "yk"].iter().any(|suffix| base.ends_with(suffix)) {
        forms.extend(with_suffixes(base, &K_ENDING_CASES));
    } else if base.ends_with('a') {
        forms.extend(with_suffixes(drop_chars(base, 1), &A_ENDING_CASES));
    }

    // Second, independent pass: -ko and -ec endings, otherwise generic cases.
    if base.ends_with("ko") {
        forms.push(base.to_string());
        forms.extend(with_suffixes(drop_chars(base, 2), &KO_CASES));
    } else if base.ends_with("ec") {
        let dropped = if base.ends_with("iec") { 4 } else { 3 };
        let stem = [drop_chars(base, dropped), "ń"].concat();
        forms.push(base.to_string());
        forms.extend(with_suffixes(&stem, &EC_CASES));
    } else {
        forms.extend(with_suffixes(base, &GENERIC_CASES));
    }

    forms
        .into_iter()
        .filter(|form| !form.is_empty() && form.chars().all(char::is_alphabetic))
        .collect()
}

pub const SURNAME_PLACEHOLDER: &str = "{{MASKED}}";

/// Replaces capitalised word tokens found in the surname table.
///
/// Tokens of two characters or fewer, lower-case tokens and tokens that are
/// the body of an existing `{{PLACEHOLDER}}` are never replaced.
#[derive(Debug)]
pub struct SurnameRule {
    regex: Regex,
    placeholder: String,
    table: Arc<SurnameTable>,
}

impl SurnameRule {
    pub const NAME: &'static str = "surname";

    pub fn new(table: Arc<SurnameTable>) -> Result<Self, MaskerError> {
        Self::with_placeholder(table, SURNAME_PLACEHOLDER)
    }

    pub fn with_placeholder(
        table: Arc<SurnameTable>,
        placeholder: &str,
    ) -> Result<Self, MaskerError> {
        if placeholder.is_empty() {
            return Err(MaskerError::InvalidPlaceholder(Self::NAME.to_string()));
        }
        Ok(Self {
            regex: build_regex(Self::NAME, r"\b\w+\b", false)?,
            placeholder: placeholder.to_string(),
            table,
        })
    }

    fn is_surname(&self, text: &str, token: Match<'_>) -> bool {
        let word = token.as_str();
        let inside_placeholder =
            text[..token.start()].ends_with("{{") && text[token.end()..].starts_with("}}");
        !inside_placeholder
            && word.chars().next().is_some_and(char::is_uppercase)
            && word.chars().count() > 2
            && self.table.contains(word)
    }
}

impl Detector for SurnameRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn placeholders(&self) -> Vec<&str> {
        vec![self.placeholder.as_str()]
    }

    fn apply<'t>(&self, text: &'t str) -> Result<Cow<'t, str>, MaskerError> {
        Ok(rewrite_matches(&self.regex, text, false, |_, token| {
            self.is_surname(text, token).then(|| self.placeholder.clone())
        }))
    }
}
