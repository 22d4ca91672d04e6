//! redaction_log.rs - PII-safe logging helpers for the masking engine.
//!
//! Matched content must never reach a log unless the masker was built with
//! `log_pii`. Otherwise only a length-tagged marker and a short SHA-256
//! fingerprint are written, which is enough to correlate repeated values
//! across log lines without revealing them.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, error, warn};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
const FINGERPRINT_LEN: usize = 12;

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let chars = s.chars().count();
    if chars <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", chars)
    }
}

/// Short stable hash of `content`.
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// The form of `content` that may appear in logs.
pub fn loggable_content(content: &str, allow_pii: bool) -> String {
    if allow_pii {
        content.to_string()
    } else {
        format!("{} #{}", redact_sensitive(content), fingerprint(content))
    }
}

pub fn log_rule_rewrite_debug(rule_name: &str, before: &str, after: &str, allow_pii: bool) {
    debug!(
        "Rule '{}' rewrote text: Original='{}', Masked='{}'",
        rule_name,
        loggable_content(before, allow_pii),
        loggable_content(after, allow_pii)
    );
}

pub fn log_detector_error(rule_name: &str, reason: &str) {
    warn!("Detector '{}' failed, text passed on unchanged: {}", rule_name, reason);
}

pub fn log_detector_panic(rule_name: &str, reason: &str) {
    error!("Detector '{}' panicked, text passed on unchanged: {}", rule_name, reason);
}
