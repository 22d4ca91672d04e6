//! Checksum-validated and strictly formatted identifiers: payment cards,
//! VINs, Polish registry numbers and international document numbers.
//!
//! License: MIT OR APACHE 2.0

use crate::detector::{Boundary, PatternSpec};
use crate::validators::ValidatorKind;

/// Optional markdown emphasis markers around a bare number.
const MARKERS: &str = "(?:[_*]+)?";

pub fn credit_card() -> PatternSpec {
    PatternSpec::new("credit_card", r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{1,7}\b", "{{CREDIT_CARD}}")
        .validator(ValidatorKind::CreditCard)
}

pub fn vin() -> PatternSpec {
    PatternSpec::new("vin", r"\b[A-HJ-NPR-Z0-9]{17}\b", "{{VIN}}")
        .validator(ValidatorKind::Vin)
        .case_insensitive()
}

/// `PESEL: 44051401359` keeps its label; only the number is replaced.
pub fn pesel_tagged() -> PatternSpec {
    PatternSpec::new("pesel_tagged", r"\bPESEL[:\s]+(?P<pesel>\d{11})\b", "{{PESEL_TAGGED}}")
        .validator(ValidatorKind::Pesel)
        .validate_group("pesel")
        .replace_group_only()
        .case_insensitive()
}

pub fn pesel() -> PatternSpec {
    let pattern = [MARKERS, r"(?P<pesel>\d{11})", MARKERS].concat();
    PatternSpec::new("pesel", pattern, "{{PESEL}}")
        .validator(ValidatorKind::Pesel)
        .validate_group("pesel")
        .boundary(Boundary::NonWord)
}

/// NIP may be glued to letters (`b1234567890b`) but never to other digits.
pub fn nip() -> PatternSpec {
    let pattern = [MARKERS, r"(?P<digits>\d{3}-?\d{3}-?\d{2}-?\d{2}|\d{10})", MARKERS].concat();
    PatternSpec::new("nip", pattern, "{{NIP}}")
        .validator(ValidatorKind::Nip)
        .validate_group("digits")
        .case_insensitive()
        .boundary(Boundary::NonDigit)
}

pub fn krs() -> PatternSpec {
    PatternSpec::new("krs", r"\b(?P<krs>\d{3}-?\d{3}-?\d{2}-?\d{2}|\d{10})\b", "{{KRS}}")
        .validator(ValidatorKind::Krs)
        .validate_group("krs")
}

pub fn regon() -> PatternSpec {
    PatternSpec::new("regon", r"\b(?P<reg>\d{2}\s?\d{3}\s?\d{4}(?:\s?\d{5})?)\b", "{{REGON}}")
        .validator(ValidatorKind::Regon)
        .validate_group("reg")
}

// The leading `\b` binds to the spaced alternative only, so a compact number
// glued to a country prefix (`PL611090...`) is still caught.
pub fn nrb() -> PatternSpec {
    PatternSpec::new(
        "nrb",
        r"\b(?:\d{2}\s?\d{4}\s?\d{4}\s?\d{4}\s?\d{4}\s?\d{4}\s?\d{4})|\d{26}\b",
        "{{NRB}}",
    )
    .validator(ValidatorKind::Nrb)
}

pub fn mac_address() -> PatternSpec {
    PatternSpec::new(
        "mac_address",
        r"\b(?:[0-9A-Fa-f]{2}[:\-]?){5}[0-9A-Fa-f]{2}\b",
        "{{MAC_ADDRESS}}",
    )
    .validator(ValidatorKind::Mac)
}

pub fn passport() -> PatternSpec {
    PatternSpec::new("passport", r"\b[A-Z]{2}\d{7}\b", "{{PASSPORT}}").case_insensitive()
}

pub fn id_card() -> PatternSpec {
    PatternSpec::new("id_card", r"\b[A-Z]{3}\d{6}\b", "{{ID_CARD}}").case_insensitive()
}

pub fn ssn() -> PatternSpec {
    PatternSpec::new("ssn", r"\b\d{3}-\d{2}-\d{4}\b", "{{SSN}}").validator(ValidatorKind::Ssn)
}

/// Opt-in: the shape also fits long ordinary words, the validator's digit
/// requirement is what keeps it usable.
pub fn eu_vat() -> PatternSpec {
    PatternSpec::new("eu_vat", r"\b[A-Z]{2}[A-Z0-9]{8,12}\b", "{{EU_VAT}}")
        .validator(ValidatorKind::EuVat)
        .case_insensitive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{Detector, PatternRule};

    fn mask(spec: PatternSpec, text: &str) -> String {
        let rule: PatternRule = spec.compile().unwrap();
        rule.apply(text).unwrap().into_owned()
    }

    #[test]
    fn test_pesel_with_markdown_markers() {
        assert_eq!(mask(pesel(), "**44051401359**"), "{{PESEL}}");
        assert_eq!(mask(pesel(), "_44051401358_"), "_44051401358_");
        assert_eq!(mask(pesel(), "a44051401359"), "a44051401359");
    }

    #[test]
    fn test_nip_forms() {
        assert_eq!(mask(nip(), "NIP 123-456-32-18"), "NIP {{NIP}}");
        assert_eq!(mask(nip(), "_b1234563218b*_"), "_b{{NIP}}b*_");
    }

    #[test]
    fn test_regon_spaced() {
        assert_eq!(mask(regon(), "REGON 12 345 6785 ok"), "REGON {{REGON}} ok");
    }

    #[test]
    fn test_nrb_spaced_and_prefixed() {
        assert_eq!(mask(nrb(), "61 1090 1014 0000 0712 1981 2874"), "{{NRB}}");
        assert_eq!(mask(nrb(), "PL61109010140000071219812874"), "PL{{NRB}}");
    }

    #[test]
    fn test_vin_is_case_insensitive() {
        assert_eq!(mask(vin(), "vin 1m8gdm9axkp042788"), "vin {{VIN}}");
    }

    #[test]
    fn test_eu_vat_skips_words() {
        assert_eq!(mask(eu_vat(), "Configuration PL1234567890"), "Configuration {{EU_VAT}}");
    }
}
