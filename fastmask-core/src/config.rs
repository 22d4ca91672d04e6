//! Configuration management for `fastmask-core`.
//!
//! This module defines the serializable description of a rule set: which
//! built-in rules run, which user-defined patterns are added, which opt-in
//! rules are switched on, and where the surname dictionary lives. It handles
//! YAML loading, merging with the built-in catalogue and structural
//! validation. Turning a configuration into detectors is the job of
//! [`crate::compiler`].
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::detector::{Boundary, PatternSpec};
use crate::errors::MaskerError;
use crate::rules::surnames::{SurnameRule, DEFAULT_MIN_COUNT};
use crate::rules::BuiltinRule;
use crate::validators::ValidatorKind;

/// Maximum allowed length for a user-supplied regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single rule entry.
///
/// An entry without a `pattern` references a built-in rule by `name`; its
/// `placeholder`, when given, overrides the stock one. An entry with a
/// `pattern` is a user-defined rule and must carry a `placeholder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Unique identifier for the rule (e.g., "email").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string. `None` for built-in references.
    pub pattern: Option<String>,
    /// The literal token that replaces accepted matches.
    pub placeholder: Option<String>,
    /// Optional validator every match must pass.
    pub validator: Option<ValidatorKind>,
    /// Named capture group handed to the validator.
    pub validate_group: Option<String>,
    /// Replace only `validate_group`, keeping the rest of the match.
    pub replace_group_only: bool,
    pub case_insensitive: bool,
    pub boundary: Boundary,
    /// If true, the rule is disabled unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl RuleConfig {
    /// Reference to a built-in rule with its stock settings.
    pub fn builtin(rule: BuiltinRule) -> Self {
        Self {
            name: rule.name().to_string(),
            opt_in: rule.is_opt_in(),
            ..Self::default()
        }
    }

    /// A user-defined pattern rule.
    pub fn custom(
        name: impl Into<String>,
        pattern: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: Some(pattern.into()),
            placeholder: Some(placeholder.into()),
            ..Self::default()
        }
    }

    /// The built-in rule this entry references, if it is a reference.
    pub fn builtin_rule(&self) -> Option<BuiltinRule> {
        match self.pattern {
            None => BuiltinRule::from_name(&self.name),
            Some(_) => None,
        }
    }

    /// Pattern description of a user-defined rule. Built-in references have
    /// none.
    pub fn to_pattern_spec(&self) -> Result<Option<PatternSpec>, MaskerError> {
        let Some(pattern) = &self.pattern else {
            return Ok(None);
        };
        let placeholder = self
            .placeholder
            .clone()
            .ok_or_else(|| MaskerError::MissingPlaceholder(self.name.clone()))?;

        Ok(Some(PatternSpec {
            name: self.name.clone(),
            pattern: pattern.clone(),
            placeholder,
            validator: self.validator,
            validate_group: self.validate_group.clone(),
            replace_group_only: self.replace_group_only,
            case_insensitive: self.case_insensitive,
            boundary: self.boundary,
        }))
    }

    fn is_surname(&self) -> bool {
        self.pattern.is_none() && self.name == SurnameRule::NAME
    }
}

/// Where the surname dictionary is read from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurnameSource {
    /// `surname,count` CSV files, each with a header line.
    pub files: Vec<PathBuf>,
    /// Rows with a lower count are ignored.
    pub min_count: u64,
}

impl Default for SurnameSource {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            min_count: DEFAULT_MIN_COUNT,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Represents the top-level configuration structure of a masker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MaskerConfig {
    /// Rule entries. Merged over the built-in catalogue unless
    /// `include_defaults` is false, in which case they are the whole set.
    pub rules: Vec<RuleConfig>,
    #[serde(default = "default_true")]
    pub include_defaults: bool,
    /// Opt-in rules to switch on.
    pub enable_rules: Vec<String>,
    /// Rules to switch off. Wins over everything else.
    pub disable_rules: Vec<String>,
    /// Enables the surname rule.
    pub beta_features: bool,
    pub surnames: Option<SurnameSource>,
    /// Allows matched content to appear in debug logs.
    pub log_pii: bool,
}

impl Default for MaskerConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            include_defaults: true,
            enable_rules: Vec::new(),
            disable_rules: Vec::new(),
            beta_features: false,
            surnames: None,
            log_pii: false,
        }
    }
}

impl MaskerConfig {
    /// Loads a configuration from a YAML file and validates its rules.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading masker configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MaskerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules)
            .with_context(|| format!("Invalid rules in {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Configuration holding every built-in rule in default order, opt-in
    /// rules included but marked as such.
    pub fn load_default_rules() -> Self {
        let rules: Vec<RuleConfig> =
            BuiltinRule::ALL.into_iter().map(RuleConfig::builtin).collect();
        debug!("Loaded {} default rules.", rules.len());
        Self {
            rules,
            include_defaults: false,
            ..Self::default()
        }
    }

    /// Adds CLI-style enable/disable overrides on top of the configured
    /// lists.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        for name in enable_rules {
            if !self.enable_rules.contains(name) {
                self.enable_rules.push(name.clone());
            }
        }
        for name in disable_rules {
            if !self.disable_rules.contains(name) {
                self.disable_rules.push(name.clone());
            }
        }
        debug!(
            "Active rule overrides: {} enabled, {} disabled.",
            self.enable_rules.len(),
            self.disable_rules.len()
        );
    }

    /// Every rule entry after merging with the built-in catalogue, before
    /// activity filtering. An empty rule list always means the defaults.
    pub fn resolved_rules(&self) -> Vec<RuleConfig> {
        if self.include_defaults || self.rules.is_empty() {
            merge_rules(Self::load_default_rules().rules, self.rules.clone())
        } else {
            self.rules.clone()
        }
    }

    /// The rules that will actually run, in order.
    pub fn active_rules(&self) -> Vec<RuleConfig> {
        self.filter_active(self.resolved_rules())
    }

    /// Keeps the entries of `rules` that are active under this
    /// configuration's enable/disable lists and beta flag.
    pub fn filter_active(&self, rules: Vec<RuleConfig>) -> Vec<RuleConfig> {
        let enable_set: HashSet<&str> = self.enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = self.disable_rules.iter().map(String::as_str).collect();
        let all_rule_names: HashSet<&str> = rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }
        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        let before = rules.len();
        let active: Vec<RuleConfig> = rules
            .into_iter()
            .filter(|rule| {
                let name = rule.name.as_str();
                if disable_set.contains(name) {
                    return false;
                }
                if let Some(enabled) = rule.enabled {
                    return enabled;
                }
                !rule.opt_in
                    || enable_set.contains(name)
                    || (rule.is_surname() && self.beta_features)
            })
            .collect();

        debug!("Active rules after filtering: {} of {}.", active.len(), before);
        active
    }
}

/// Merges user rule entries over a base list.
///
/// A user entry with the name of a base entry replaces it in place; new
/// entries are appended in their own order.
pub fn merge_rules(base: Vec<RuleConfig>, user: Vec<RuleConfig>) -> Vec<RuleConfig> {
    debug!("merge_rules called with {} base and {} user rules.", base.len(), user.len());
    let mut merged = base;

    for user_rule in user {
        match merged.iter_mut().find(|rule| rule.name == user_rule.name) {
            Some(slot) => *slot = user_rule,
            None => merged.push(user_rule),
        }
    }

    debug!("Final total rules after merge: {}", merged.len());
    merged
}

/// Turns collected errors into one result: a single error is returned as
/// is, several are joined into [`MaskerError::Fatal`].
pub(crate) fn aggregate_errors(
    mut errors: Vec<MaskerError>,
    what: &str,
) -> Result<(), MaskerError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        n => {
            let message = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n");
            Err(MaskerError::Fatal(format!("{} failed for {} rule(s):\n{}", what, n, message)))
        }
    }
}

/// Validates rule entries without compiling them: names, placeholders,
/// pattern presence and length, built-in references.
///
/// A single problem is returned as its own error; several are aggregated
/// into [`MaskerError::Fatal`].
pub fn validate_rules(rules: &[RuleConfig]) -> Result<(), MaskerError> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push(MaskerError::Fatal("A rule has an empty `name` field.".to_string()));
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(MaskerError::DuplicateRuleName(rule.name.clone()));
        }

        if rule.placeholder.as_deref() == Some("") {
            errors.push(MaskerError::InvalidPlaceholder(rule.name.clone()));
        }

        match &rule.pattern {
            None => {
                if BuiltinRule::from_name(&rule.name).is_none() {
                    errors.push(MaskerError::UnknownBuiltin(rule.name.clone()));
                }
            }
            Some(pattern) if pattern.is_empty() => {
                errors.push(MaskerError::MissingPattern(rule.name.clone()));
            }
            Some(pattern) => {
                let length = pattern.chars().count();
                if length > MAX_PATTERN_LENGTH {
                    errors.push(MaskerError::PatternLengthExceeded(
                        rule.name.clone(),
                        length,
                        MAX_PATTERN_LENGTH,
                    ));
                }
                if rule.placeholder.is_none() {
                    errors.push(MaskerError::MissingPlaceholder(rule.name.clone()));
                }
            }
        }
    }

    aggregate_errors(errors, "Rule validation")
}
