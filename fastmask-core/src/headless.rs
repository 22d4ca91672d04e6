//! headless.rs - One-shot helpers for callers that do not manage a masker.
//!
//! The default masker is built on first use and shared for the lifetime of
//! the process. Building it is the only thing that can fail.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::MaskerConfig;
use crate::engine::Masker;
use crate::errors::MaskerError;
use crate::payload::PayloadMasker;

static DEFAULT_MASKER: OnceCell<Masker> = OnceCell::new();

/// The shared masker with the default rule set.
pub fn default_masker() -> Result<&'static Masker, MaskerError> {
    DEFAULT_MASKER.get_or_try_init(Masker::new)
}

/// Masks `text` with the default rule set.
pub fn mask_text(text: &str) -> Result<String, MaskerError> {
    Ok(default_masker()?.mask_text(text))
}

/// Masks every string in `payload` with the default rule set.
pub fn mask_payload(payload: &Value) -> Result<Value, MaskerError> {
    Ok(default_masker()?.mask_payload(payload))
}

/// Builds a masker from `config` and masks `content` with it.
pub fn headless_mask_string(config: MaskerConfig, content: &str) -> Result<String> {
    let masker = Masker::from_config(config).context("Failed to build masker from configuration")?;
    Ok(masker.mask_text(content))
}
