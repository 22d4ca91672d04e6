//! errors.rs - Custom error types for the fastmask-core library.
//!
//! Every failure the masking core can report happens while a rule set is being
//! built. Applying a built rule set never returns an error to the caller; a
//! detector that fails at call time is logged and skipped by the engine.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types produced by `fastmask-core`.
///
/// `#[non_exhaustive]` keeps room for new variants without breaking callers
/// that match on this enum.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MaskerError {
    #[error("Failed to compile masking rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Rule '{0}' has no pattern and is not a built-in rule")]
    UnknownBuiltin(String),

    #[error("Rule '{0}' is missing the `pattern` field")]
    MissingPattern(String),

    #[error("Rule '{0}' defines a pattern but no `placeholder`")]
    MissingPlaceholder(String),

    #[error("Rule '{rule}' validates capture group '{group}', which its pattern does not define")]
    UnknownCaptureGroup { rule: String, group: String },

    #[error("Duplicate rule name found: '{0}'")]
    DuplicateRuleName(String),

    #[error("Rule '{0}' has an empty placeholder")]
    InvalidPlaceholder(String),

    #[error("Placeholder '{placeholder}' is emitted by both '{first}' and '{second}'")]
    DuplicatePlaceholder {
        placeholder: String,
        first: String,
        second: String,
    },

    #[error("Placeholder '{placeholder}' of rule '{owner}' is rewritten by rule '{matched_by}'")]
    PlaceholderConflict {
        placeholder: String,
        owner: String,
        matched_by: String,
    },

    #[error("The surname rule is enabled but no surname table was provided")]
    MissingSurnameTable,

    #[error("Invalid surname table: {0}")]
    SurnameTable(String),

    #[error("Detector '{rule}' failed: {reason}")]
    DetectorFailed { rule: String, reason: String },

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}
