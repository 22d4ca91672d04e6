// fastmask-core/src/detector.rs
//! detector.rs - The `Detector` capability and the generic pattern rule.
//!
//! A detector takes text and returns text in which every accepted occurrence
//! of one class of sensitive data has been replaced by that class's
//! placeholder. Most built-in detectors, and every user-defined one, are a
//! [`PatternRule`]: a compiled regex, an optional validator and a placeholder.
//!
//! The regex crate does not support look-around. Rules that need a
//! "not preceded / not followed by" constraint of one character declare a
//! [`Boundary`]; the pattern body is then wrapped in consuming context groups
//! and the replaced region is the inner `span` group. The scanner restarts so
//! that a trailing context character can act as the leading context of the
//! next match, which gives the same result as real look-around.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use regex::{Captures, Match, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::MaskerError;
use crate::validators::ValidatorKind;

/// Name of the capture group that delimits the replaced region of a match
/// when the pattern carries context characters.
pub const SPAN_GROUP: &str = "span";

/// Size limit passed to the regex compiler for every rule.
pub const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A single masking rule.
///
/// Implementations must be pure with respect to their input: the same text
/// always produces the same output and no state is kept between calls. A
/// detector returns `Cow::Borrowed` when it changed nothing.
pub trait Detector: Send + Sync {
    /// Unique rule name, used in configuration and logs.
    fn name(&self) -> &str;

    /// Every placeholder this detector can emit.
    fn placeholders(&self) -> Vec<&str>;

    /// Applies the rule to `text`.
    ///
    /// An `Err` is treated by the engine as "rule failed", logged, and the
    /// text is passed on unchanged.
    fn apply<'t>(&self, text: &'t str) -> Result<Cow<'t, str>, MaskerError>;
}

/// Single-character context a match must not be glued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// The pattern handles its own boundaries (usually with `\b`).
    #[default]
    None,
    /// Not preceded or followed by a word character.
    NonWord,
    /// Not preceded or followed by a digit.
    NonDigit,
}

impl Boundary {
    /// Wraps `body` with the context groups for this boundary.
    pub fn wrap(self, body: &str) -> String {
        let (lead, trail) = match self {
            Boundary::None => return body.to_string(),
            Boundary::NonWord => (r"(?:^|\W)", r"(?:\W|$)"),
            Boundary::NonDigit => (r"(?:^|\D)", r"(?:\D|$)"),
        };
        [lead, "(?P<", SPAN_GROUP, ">", body, ")", trail].concat()
    }
}

/// Declarative description of a [`PatternRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    pub name: String,
    pub pattern: String,
    pub placeholder: String,
    /// Gate applied to every match before it is replaced.
    pub validator: Option<ValidatorKind>,
    /// Named group handed to the validator instead of the whole span.
    pub validate_group: Option<String>,
    /// Replace only `validate_group`, keeping the rest of the span.
    pub replace_group_only: bool,
    pub case_insensitive: bool,
    pub boundary: Boundary,
}

impl PatternSpec {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            placeholder: placeholder.into(),
            validator: None,
            validate_group: None,
            replace_group_only: false,
            case_insensitive: false,
            boundary: Boundary::None,
        }
    }

    pub fn validator(mut self, validator: ValidatorKind) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn validate_group(mut self, group: impl Into<String>) -> Self {
        self.validate_group = Some(group.into());
        self
    }

    pub fn replace_group_only(mut self) -> Self {
        self.replace_group_only = true;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Compiles this description into a detector.
    pub fn compile(self) -> Result<PatternRule, MaskerError> {
        PatternRule::new(self)
    }
}

/// Compiles a rule pattern with the crate-wide builder settings.
pub(crate) fn build_regex(
    name: &str,
    pattern: &str,
    case_insensitive: bool,
) -> Result<Regex, MaskerError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| MaskerError::RuleCompilationError(name.to_string(), e))
}

fn has_group(regex: &Regex, group: &str) -> bool {
    regex.capture_names().flatten().any(|name| name == group)
}

/// Generic detector: regex, optional validator, placeholder.
#[derive(Debug)]
pub struct PatternRule {
    name: String,
    regex: Regex,
    placeholder: String,
    validator: Option<ValidatorKind>,
    validate_group: Option<String>,
    replace_group_only: bool,
    lead_context: bool,
}

impl PatternRule {
    pub fn new(spec: PatternSpec) -> Result<Self, MaskerError> {
        if spec.placeholder.is_empty() {
            return Err(MaskerError::InvalidPlaceholder(spec.name));
        }

        let pattern = spec.boundary.wrap(&spec.pattern);
        let regex = build_regex(&spec.name, &pattern, spec.case_insensitive)?;

        if let Some(group) = &spec.validate_group {
            if !has_group(&regex, group) {
                return Err(MaskerError::UnknownCaptureGroup {
                    rule: spec.name,
                    group: group.clone(),
                });
            }
        }

        let lead_context = has_group(&regex, SPAN_GROUP);
        Ok(Self {
            name: spec.name,
            regex,
            placeholder: spec.placeholder,
            validator: spec.validator,
            validate_group: spec.validate_group,
            replace_group_only: spec.replace_group_only,
            lead_context,
        })
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn replacement(&self, text: &str, caps: &Captures<'_>, span: Match<'_>) -> Option<String> {
        let target = self
            .validate_group
            .as_deref()
            .and_then(|group| caps.name(group))
            .unwrap_or(span);

        if let Some(validator) = self.validator {
            if !validator.check(target.as_str()) {
                return None;
            }
        }

        // A group outside the span cannot be spliced in; the whole span goes.
        let nested = span.start() <= target.start() && target.end() <= span.end();
        if self.replace_group_only && nested && target.range() != span.range() {
            return Some(
                [
                    &text[span.start()..target.start()],
                    self.placeholder.as_str(),
                    &text[target.end()..span.end()],
                ]
                .concat(),
            );
        }
        Some(self.placeholder.clone())
    }
}

impl Detector for PatternRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn placeholders(&self) -> Vec<&str> {
        vec![self.placeholder.as_str()]
    }

    fn apply<'t>(&self, text: &'t str) -> Result<Cow<'t, str>, MaskerError> {
        Ok(rewrite_matches(&self.regex, text, self.lead_context, |caps, span| {
            self.replacement(text, caps, span)
        }))
    }
}

fn next_char_boundary(text: &str, i: usize) -> usize {
    text[i..].chars().next().map_or(text.len() + 1, |c| i + c.len_utf8())
}

fn prev_char_boundary(text: &str, i: usize) -> usize {
    text[..i].chars().next_back().map_or(0, |c| i - c.len_utf8())
}

fn glued_to_placeholder(text: &str, span: Match<'_>) -> bool {
    text[..span.start()].ends_with("}}") || text[span.end()..].starts_with("{{")
}

/// Scans `text` left to right and rewrites non-overlapping matches.
///
/// `replace` receives the captures and the replaced region (the `span` group
/// when present, the whole match otherwise) and returns the replacement, or
/// `None` to keep the region verbatim. Empty regions are never replaced.
///
/// With `lead_context` set the search restarts one character before the end
/// of the previous region, so that character can be consumed as leading
/// context; a region starting inside the previous one is discarded.
///
/// A region glued to a placeholder (starting right after `}}` or ending right
/// before `{{`) is not a candidate, so masked output masks to itself.
pub(crate) fn rewrite_matches<'t, F>(
    regex: &Regex,
    text: &'t str,
    lead_context: bool,
    mut replace: F,
) -> Cow<'t, str>
where
    F: FnMut(&Captures<'t>, Match<'t>) -> Option<String>,
{
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut prev_end = 0;
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let span = caps.name(SPAN_GROUP).unwrap_or(whole);

        if span.start() == span.end()
            || span.start() < prev_end
            || glued_to_placeholder(text, span)
        {
            pos = next_char_boundary(text, whole.start());
            continue;
        }

        if let Some(replacement) = replace(&caps, span) {
            let buf = out.get_or_insert_with(|| String::with_capacity(text.len()));
            buf.push_str(&text[copied..span.start()]);
            buf.push_str(&replacement);
            copied = span.end();
        }

        prev_end = span.end();
        pos = if lead_context {
            prev_char_boundary(text, span.end())
        } else {
            span.end()
        };
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}
