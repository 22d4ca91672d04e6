//! engine.rs - The masking engine.
//!
//! A [`Masker`] is an ordered list of detectors applied one after another:
//! every detector sees the text produced by the previous one. The engine owns
//! the guarantees that individual detectors cannot give on their own:
//!
//! * every placeholder in the set is unique and survives every detector
//!   unchanged, checked once at construction;
//! * a detector that errors or panics is logged and skipped, so masking a
//!   string never fails.
//!
//! [`MaskerBuilder`] assembles a masker from a [`MaskerConfig`], an explicit
//! rule list, a surname table and extra hand-written detectors.
//!
//! License: MIT OR APACHE 2.0

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, info};

use crate::compiler::compile_rules;
use crate::config::{MaskerConfig, RuleConfig};
use crate::detector::Detector;
use crate::errors::MaskerError;
use crate::payload::PayloadMasker;
use crate::redaction_log::{log_detector_error, log_detector_panic, log_rule_rewrite_debug};
use crate::rules::surnames::{SurnameRule, SurnameTable};

/// Result of running one detector on one string.
enum Outcome {
    Unchanged,
    Rewritten(String),
    Failed(String),
    Panicked(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn run_detector(detector: &dyn Detector, text: &str) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        detector.apply(text).map(|masked| match masked {
            Cow::Borrowed(_) => None,
            Cow::Owned(masked) => Some(masked),
        })
    }));

    match result {
        Ok(Ok(Some(masked))) if masked != text => Outcome::Rewritten(masked),
        Ok(Ok(_)) => Outcome::Unchanged,
        Ok(Err(e)) => Outcome::Failed(e.to_string()),
        Err(payload) => Outcome::Panicked(panic_message(payload.as_ref())),
    }
}

/// Checks names and placeholders of a detector list, in order.
fn check_detectors(detectors: &[Box<dyn Detector>]) -> Result<(), MaskerError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut owners: Vec<(&str, &str)> = Vec::new();

    for detector in detectors {
        let name = detector.name();
        if !names.insert(name) {
            return Err(MaskerError::DuplicateRuleName(name.to_string()));
        }
        for placeholder in detector.placeholders() {
            if placeholder.is_empty() {
                return Err(MaskerError::InvalidPlaceholder(name.to_string()));
            }
            if let Some((_, first)) = owners.iter().find(|(p, _)| *p == placeholder) {
                return Err(MaskerError::DuplicatePlaceholder {
                    placeholder: placeholder.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            owners.push((placeholder, name));
        }
    }

    for detector in detectors {
        for (placeholder, owner) in &owners {
            match run_detector(detector.as_ref(), placeholder) {
                Outcome::Unchanged => {}
                Outcome::Rewritten(_) => {
                    return Err(MaskerError::PlaceholderConflict {
                        placeholder: placeholder.to_string(),
                        owner: owner.to_string(),
                        matched_by: detector.name().to_string(),
                    });
                }
                Outcome::Failed(reason) | Outcome::Panicked(reason) => {
                    return Err(MaskerError::DetectorFailed {
                        rule: detector.name().to_string(),
                        reason,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Ordered, immutable set of detectors.
///
/// `Masker` is `Send + Sync` and keeps no state between calls, so a single
/// instance can be shared across threads.
pub struct Masker {
    detectors: Vec<Box<dyn Detector>>,
    log_pii: bool,
}

impl Masker {
    /// The default rule set.
    pub fn new() -> Result<Self, MaskerError> {
        MaskerBuilder::new().build()
    }

    pub fn builder() -> MaskerBuilder {
        MaskerBuilder::new()
    }

    pub fn from_config(config: MaskerConfig) -> Result<Self, MaskerError> {
        MaskerBuilder::new().with_config(config).build()
    }

    /// Builds a masker from ready detectors, checking the set first.
    pub fn from_detectors(
        detectors: Vec<Box<dyn Detector>>,
        log_pii: bool,
    ) -> Result<Self, MaskerError> {
        check_detectors(&detectors)?;
        info!("Masker built with {} detector(s).", detectors.len());
        Ok(Self { detectors, log_pii })
    }

    /// Masks `text` with every detector in order.
    ///
    /// Never fails. A detector that returns an error or panics is logged and
    /// the text it was given is handed to the next detector.
    pub fn mask_text(&self, text: &str) -> String {
        let mut current: Cow<'_, str> = Cow::Borrowed(text);

        for detector in &self.detectors {
            match run_detector(detector.as_ref(), &current) {
                Outcome::Unchanged => {}
                Outcome::Rewritten(masked) => {
                    log_rule_rewrite_debug(detector.name(), &current, &masked, self.log_pii);
                    current = Cow::Owned(masked);
                }
                Outcome::Failed(reason) => log_detector_error(detector.name(), &reason),
                Outcome::Panicked(reason) => log_detector_panic(detector.name(), &reason),
            }
        }

        current.into_owned()
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl fmt::Debug for Masker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Masker")
            .field("detectors", &self.detector_names())
            .field("log_pii", &self.log_pii)
            .finish()
    }
}

impl PayloadMasker for Masker {
    fn mask_text(&self, text: &str) -> String {
        Masker::mask_text(self, text)
    }
}

/// Step-by-step construction of a [`Masker`].
///
/// Without [`rules`](MaskerBuilder::rules) the configuration's rules are used,
/// which default to the built-in ordered set.
#[derive(Default)]
pub struct MaskerBuilder {
    config: MaskerConfig,
    rules: Option<Vec<RuleConfig>>,
    surnames: Option<Arc<SurnameTable>>,
    extra: Vec<Box<dyn Detector>>,
}

impl MaskerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MaskerConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses exactly these rules, in this order, instead of the configured
    /// ones. Enable/disable lists still apply. An empty list means the
    /// configured rules, as if this was never called.
    pub fn rules(mut self, rules: Vec<RuleConfig>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn beta_features(mut self, enabled: bool) -> Self {
        self.config.beta_features = enabled;
        self
    }

    pub fn enable_rules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.config.set_active_rules(&names, &[]);
        self
    }

    pub fn disable_rules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.config.set_active_rules(&[], &names);
        self
    }

    /// Surname dictionary for the surname rule. Takes precedence over
    /// `surnames` files in the configuration.
    pub fn surnames(mut self, table: Arc<SurnameTable>) -> Self {
        self.surnames = Some(table);
        self
    }

    pub fn log_pii(mut self, enabled: bool) -> Self {
        self.config.log_pii = enabled;
        self
    }

    /// Appends a hand-written detector after the compiled rules.
    pub fn push_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.extra.push(detector);
        self
    }

    fn surname_table(
        &self,
        rules: &[RuleConfig],
    ) -> Result<Option<Arc<SurnameTable>>, MaskerError> {
        if self.surnames.is_some() {
            return Ok(self.surnames.clone());
        }
        let wants_surnames = rules
            .iter()
            .any(|r| r.pattern.is_none() && r.name == SurnameRule::NAME);
        match (&self.config.surnames, wants_surnames) {
            (Some(source), true) => {
                let table = SurnameTable::from_csv_files(&source.files, source.min_count)?;
                Ok(Some(Arc::new(table)))
            }
            _ => Ok(None),
        }
    }

    pub fn build(self) -> Result<Masker, MaskerError> {
        let rules = match &self.rules {
            Some(rules) if !rules.is_empty() => self.config.filter_active(rules.clone()),
            _ => self.config.active_rules(),
        };
        debug!("Building masker from {} active rule(s).", rules.len());

        let surnames = self.surname_table(&rules)?;
        let mut detectors = compile_rules(&rules, surnames)?;
        detectors.extend(self.extra);

        Masker::from_detectors(detectors, self.config.log_pii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::BuiltinRule;

    struct Failing;

    impl Detector for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn placeholders(&self) -> Vec<&str> {
            vec!["{{FAIL}}"]
        }
        fn apply<'t>(&self, text: &'t str) -> Result<Cow<'t, str>, MaskerError> {
            if text.contains("boom") {
                return Err(MaskerError::Fatal("boom".to_string()));
            }
            Ok(Cow::Borrowed(text))
        }
    }

    #[test]
    fn test_default_masker_has_default_order() {
        let masker = Masker::new().unwrap();
        assert_eq!(masker.len(), 32);
        assert_eq!(masker.detector_names().first(), Some(&"credit_card"));
        assert_eq!(masker.detector_names().last(), Some(&"social_id"));
    }

    #[test]
    fn test_rules_are_applied_in_sequence() {
        let masker = Masker::builder()
            .rules(vec![
                RuleConfig::builtin(BuiltinRule::Email),
                RuleConfig::builtin(BuiltinRule::Url),
            ])
            .build()
            .unwrap();
        assert_eq!(masker.mask_text("mail jan@www.example.com"), "mail {{EMAIL}}");
    }

    #[test]
    fn test_failing_detector_is_skipped() {
        let masker = Masker::builder()
            .rules(vec![RuleConfig::builtin(BuiltinRule::Email)])
            .push_detector(Box::new(Failing))
            .build()
            .unwrap();
        assert_eq!(masker.mask_text("boom a@b.com"), "boom {{EMAIL}}");
    }

    #[test]
    fn test_duplicate_placeholder_is_rejected() {
        let rules = vec![
            RuleConfig::builtin(BuiltinRule::Email),
            RuleConfig::custom("mail2", r"\bmail\d\b", "{{EMAIL}}"),
        ];
        let err = Masker::builder().rules(rules).build().unwrap_err();
        assert!(matches!(err, MaskerError::DuplicatePlaceholder { .. }));
    }

    #[test]
    fn test_placeholder_conflict_is_rejected() {
        let rules = vec![
            RuleConfig::builtin(BuiltinRule::Email),
            RuleConfig::custom("shouting", r"[A-Z]{4,}", "<CAPS>"),
        ];
        match Masker::builder().rules(rules).build() {
            Err(MaskerError::PlaceholderConflict { placeholder, owner, matched_by }) => {
                assert_eq!(placeholder, "{{EMAIL}}");
                assert_eq!(owner, "email");
                assert_eq!(matched_by, "shouting");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_disable_and_enable() {
        let masker = Masker::builder()
            .disable_rules(["email"])
            .enable_rules(["eu_vat"])
            .build()
            .unwrap();
        let names = masker.detector_names();
        assert!(!names.contains(&"email"));
        assert!(names.contains(&"eu_vat"));
    }

    #[test]
    fn test_empty_rule_list_falls_back_to_defaults() {
        let masker = Masker::builder().rules(vec![]).build().unwrap();
        assert_eq!(masker.len(), 32);
        assert_eq!(masker.mask_text("a@b.com"), "{{EMAIL}}");

        let masker = Masker::builder().rules(vec![]).disable_rules(["email"]).build().unwrap();
        assert_eq!(masker.len(), 31);
    }
}
