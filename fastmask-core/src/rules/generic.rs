//! Low-certainty detectors that run last: street names, local phone numbers
//! and social network ids.
//!
//! License: MIT OR APACHE 2.0

use crate::detector::PatternSpec;

const STREET_TYPE: &str = concat!(
    r"(?:ul\.?|ulica|al\.?|aleja|pl\.?|plac|skwer|",
    r"os\.?|osiedle|rondo|droga|dr\.?|trakt|t\.?|ścieżka|ś\.?)",
);
const STREET_NAME: &str =
    r"(?:\s+[A-Za-zĄąĆćĘęŁłŃńÓóŚśŹźŻż][A-Za-z0-9ĄąĆćĘęŁłŃńÓóŚśŹźŻż-]*){1,5}";
const HOUSE_NUMBER: &str = r"(?:\s+\d+[A-Za-z]?(?:/\d+)?)?";

/// Street type keyword, one to five name words and an optional house
/// number: `ul. Mickiewicza 12`, `aleja Jana Pawła II 5`, `plac Grunwaldzki 1/3`.
pub fn street() -> PatternSpec {
    let pattern = [r"\b", STREET_TYPE, STREET_NAME, HOUSE_NUMBER, r"\b"].concat();
    PatternSpec::new("street", pattern, "{{STREET}}").case_insensitive()
}

/// Nine-digit local numbers, `123 456 789` or `12 345 67 89`.
pub fn phone() -> PatternSpec {
    PatternSpec::new(
        "phone",
        r"\b(?:\d{3}[\s-]?\d{3}[\s-]?\d{3}|\d{2}[\s-]?\d{3}[\s-]?\d{2}[\s-]?\d{2})\b",
        "{{PHONE}}",
    )
}

pub fn social_id() -> PatternSpec {
    PatternSpec::new("social_id", r"\bfbid\d{8,}\b", "{{SOCIAL_ID}}").case_insensitive()
}
