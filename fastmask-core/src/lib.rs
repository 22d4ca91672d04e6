// fastmask-core/src/lib.rs
//! # FastMask Core Library
//!
//! `fastmask-core` replaces personal and sensitive data in free text and in
//! JSON payloads with typed placeholders such as `{{EMAIL}}` or `{{PESEL}}`,
//! before the text is handed to a language model or a log.
//!
//! Masking is a fixed, ordered chain of detectors. Each detector is a regex,
//! optionally gated by a checksum or format validator, and every detector
//! sees the output of the previous one. Masking never fails: problems are
//! reported when the rule set is built, and a detector that breaks at call
//! time is logged and skipped.
//!
//! ## Modules
//!
//! * `validators`: Checksum and format validators (Luhn, PESEL, NIP, REGON, VIN, ...).
//! * `detector`: The `Detector` trait and the generic `PatternRule`.
//! * `rules`: The built-in detector catalogue, including the surname dictionary.
//! * `config`: `RuleConfig` and `MaskerConfig`, YAML loading, merging and validation.
//! * `compiler`: Turns rule entries into detectors.
//! * `engine`: The `Masker` and its builder.
//! * `payload`: Recursive masking of `serde_json::Value`.
//! * `headless`: One-shot helpers backed by a shared default masker.
//! * `redaction_log`: PII-safe logging helpers.
//! * `errors`: The `MaskerError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use fastmask_core::{Masker, PayloadMasker};
//! use serde_json::json;
//!
//! fn main() -> Result<(), fastmask_core::MaskerError> {
//!     let masker = Masker::new()?;
//!
//!     let masked = masker.mask_text("Kontakt: jan.kowalski@example.com");
//!     assert_eq!(masked, "Kontakt: {{EMAIL}}");
//!
//!     let payload = json!({"user": {"email": "a@b.com"}, "count": 3});
//!     let masked = masker.mask_payload(&payload);
//!     assert_eq!(masked, json!({"user": {"email": "{{EMAIL}}"}, "count": 3}));
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod compiler;
pub mod config;
pub mod detector;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod payload;
pub mod redaction_log;
pub mod rules;
pub mod validators;

/// Re-exports the configuration types and functions for managing rule sets.
pub use config::{
    merge_rules, validate_rules, MaskerConfig, RuleConfig, SurnameSource, MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::MaskerError;

pub use detector::{Boundary, Detector, PatternRule, PatternSpec};
pub use engine::{Masker, MaskerBuilder};
pub use payload::PayloadMasker;
pub use rules::surnames::SurnameTable;
pub use rules::{default_rules, BuiltinRule};
pub use validators::ValidatorKind;

/// Re-exports the compiler entry points for advanced usage.
pub use compiler::{compile_rule, compile_rules};

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{headless_mask_string, mask_payload, mask_text};

pub use redaction_log::redact_sensitive;
