//! Contact and network addresses: international phone numbers, e-mail,
//! URLs and bare domains, IP addresses with optional ports.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use regex::Regex;

use crate::detector::{build_regex, rewrite_matches, Detector, PatternSpec};
use crate::errors::MaskerError;

/// Leading `+` and country code, then 2-5 digit groups. The `+` must not be
/// glued to a preceding word character.
pub fn phone_international() -> PatternSpec {
    PatternSpec::new(
        "phone_international",
        r"(?:^|\W)(?P<span>\+\d{1,3}(?:[ \-]?\d{1,4}){2,5})\b",
        "{{PHONE_INTERNATIONAL}}",
    )
}

/// Optional `_` emphasis markers are swallowed with the address.
pub fn email() -> PatternSpec {
    PatternSpec::new(
        "email",
        r"_?[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}_?",
        "{{EMAIL}}",
    )
    .case_insensitive()
}

const COMMON_TLDS: &str = concat!(
    "com|org|net|edu|gov|pl|dev|io|co|uk|de|fr|it|es|ru|cn|jp|",
    "br|au|in|nl|se|no|fi|dk|cz|sk|eu|info|biz",
);

/// Full `http(s)://` URLs, plus bare domains such as `www.wp.pl` or
/// `api.radlab.dev` that end in a common TLD and are not part of an identifier
/// or a call like `config.load(`.
pub fn url() -> PatternSpec {
    let pattern = [
        r"\bhttps?://(?:[A-Za-z0-9-]+\.)*[A-Za-z0-9-]+\.[A-Za-z]{2,}(?:[/:][^\s)]*)?",
        "|",
        r"(?:^|[^A-Za-z0-9_])(?P<span>(?:www\.|[A-Za-z0-9-]+\.)[A-Za-z0-9-]+\.(?:",
        COMMON_TLDS,
        r")\b)(?:[^A-Za-z0-9_(]|$)",
    ]
    .concat();
    PatternSpec::new("url", pattern, "{{URL}}").case_insensitive()
}

pub const IP_PLACEHOLDER: &str = "{{IP}}";
pub const PORT_PLACEHOLDER: &str = "{{PORT}}";

const ADDRESS_PATTERN: &str = concat!(
    r"\b(?P<addr>localhost|(?:\d{1,3}\.){3}\d{1,3}|(?:[A-Fa-f0-9]{1,4}:){7}[A-Fa-f0-9]{1,4})",
    r"(?::(?P<port>\d{1,5}))?\b",
);

/// IPv4, full-form IPv6 and `localhost`. A port is masked separately, so
/// `10.0.0.1:8080` becomes `{{IP}}:{{PORT}}`.
#[derive(Debug)]
pub struct AddressRule {
    regex: Regex,
    placeholder: String,
}

impl AddressRule {
    pub const NAME: &'static str = "ip";

    pub fn new() -> Result<Self, MaskerError> {
        Self::with_placeholder(IP_PLACEHOLDER)
    }

    pub fn with_placeholder(placeholder: &str) -> Result<Self, MaskerError> {
        if placeholder.is_empty() {
            return Err(MaskerError::InvalidPlaceholder(Self::NAME.to_string()));
        }
        Ok(Self {
            regex: build_regex(Self::NAME, ADDRESS_PATTERN, false)?,
            placeholder: placeholder.to_string(),
        })
    }
}

impl Detector for AddressRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn placeholders(&self) -> Vec<&str> {
        vec![self.placeholder.as_str(), PORT_PLACEHOLDER]
    }

    fn apply<'t>(&self, text: &'t str) -> Result<Cow<'t, str>, MaskerError> {
        Ok(rewrite_matches(&self.regex, text, false, |caps, _| {
            if caps.name("port").is_some() {
                Some([self.placeholder.as_str(), ":", PORT_PLACEHOLDER].concat())
            } else {
                Some(self.placeholder.clone())
            }
        }))
    }
}
