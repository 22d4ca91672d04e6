//! Pattern-based detectors that rely on surrounding context: dates, money
//! amounts with a currency, postal and health codes, car plates, SIM and
//! certificate serials.
//!
//! License: MIT OR APACHE 2.0

use crate::detector::{Boundary, PatternSpec};
use crate::validators::ValidatorKind;

const PL_MONTHS: &str = concat!(
    "styczeń|stycznia|sty|luty|lutego|lut|marzec|marca|mar|kwiecień|kwietnia|kwi|",
    "maj|maja|czerwiec|czerwca|cze|lipiec|lipca|lip|sierpień|sierpnia|sie|",
    "wrzesień|września|wrz|październik|października|paź|listopad|listopada|lis|",
    "grudzień|grudnia|gru",
);

const EN_MONTHS: &str = concat!(
    "January|Jan|February|Feb|March|Mar|April|Apr|May|June|Jun|July|Jul|",
    "August|Aug|September|Sep|October|Oct|November|Nov|December|Dec",
);

const ORDINAL: &str = "(?:st|nd|rd|th)?";

/// `5 maja 2023`, `2023 maja 5`, `January 5th, 2024`, `5 Jan 2024`.
pub fn date_word() -> PatternSpec {
    let pattern = [
        r"(?:\d{1,2}\s+(?:", PL_MONTHS, r")\s+\d{4}",
        r"|\d{4}\s+(?:", PL_MONTHS, r")\s+\d{1,2}",
        r"|(?:", EN_MONTHS, r")\s+\d{1,2}", ORDINAL, r"(?:,\s*|\s+)\d{4}",
        r"|\d{1,2}", ORDINAL, r"\s+(?:", EN_MONTHS, r")\s+\d{4})",
    ]
    .concat();
    PatternSpec::new("date_word", pattern, "{{DATE_STR}}")
        .case_insensitive()
        .boundary(Boundary::NonWord)
}

const DAY: &str = "(?:0[1-9]|[12]\\d|3[01])";
const MONTH: &str = "(?:0[1-9]|1[0-2])";
const DATE_SEP: &str = r"\s*[-./]\s*";

/// `YYYY-MM-DD` or `DD-MM-YYYY` with `-`, `.` or `/`, whitespace tolerated
/// around the separators.
pub fn date_number() -> PatternSpec {
    let pattern = [
        r"(?:\d{4}", DATE_SEP, MONTH, DATE_SEP, DAY,
        "|", DAY, DATE_SEP, MONTH, DATE_SEP, r"\d{4})",
    ]
    .concat();
    PatternSpec::new("date_number", pattern, "{{DATE_NUM}}").boundary(Boundary::NonDigit)
}

const CURRENCY_SYMBOLS: &str = "[$€£¥₽₹]";
const CURRENCY_CODES: &str = "(?:USD|EUR|GBP|PLN|CHF|CAD|AUD|JPY|NOK|SEK|DKK|CZK|HUF|RUB|CNY|INR)";
const CURRENCY_WORDS: &str = concat!(
    "(?:zł|zł\\.|złoty|złote|złotych|złotymi|",
    "dolar|dolara|dolarów|dolary|dolarami|",
    "euro|eur\\.|eura|eurów|eurem|",
    "funt|funty|funtów|funtami|",
    "rubel|rubla|rubli|rublami)",
);
const MAGNITUDE: &str = r"(?:tys\.|mln|mld)";
const AMOUNT: &str = r"\d{1,3}(?:[ ,.\x{A0}]\d{3})*(?:[.,]\d{1,2})?";

/// An amount is only money when a currency symbol, ISO code or Polish
/// currency word is attached before or after it. `100` alone is left alone.
pub fn money() -> PatternSpec {
    let prefix = ["(?:", CURRENCY_SYMBOLS, "|", CURRENCY_CODES, ")"].concat();
    let suffix = ["(?:", CURRENCY_SYMBOLS, "|", CURRENCY_CODES, "|", CURRENCY_WORDS, ")"].concat();
    let magnitude = [r"(?:\s*", MAGNITUDE, ")?"].concat();
    let pattern = [
        "(?:[_*]+)?(?:",
        &prefix, r"\s*?", AMOUNT, &magnitude, r"(?:\s*", &suffix, ")?",
        "|",
        AMOUNT, &magnitude, r"\s*", &suffix,
        ")(?:[_*]+)?",
    ]
    .concat();
    PatternSpec::new("money", pattern, "{{MONEY}}")
        .case_insensitive()
        .boundary(Boundary::NonWord)
}

/// Polish postal code `00-950`, also without the hyphen.
pub fn postal_code() -> PatternSpec {
    PatternSpec::new("postal_code", r"(?:[_*]+)?\d{2}-?\d{3}(?:[_*]+)?", "{{POSTAL_CODE}}")
        .boundary(Boundary::NonDigit)
}

pub fn health_id() -> PatternSpec {
    PatternSpec::new("health_id", r"\b\d{8}/\d{3}\b", "{{HEALTH_CODE}}")
}

pub fn car_plate() -> PatternSpec {
    PatternSpec::new("car_plate", r"\b[A-Z]{2,3}\s?\d{2,5}[A-Z]{0,2}\b", "{{CAR_PLATE}}")
        .validator(ValidatorKind::CarPlate)
        .case_insensitive()
}

pub fn sim_card() -> PatternSpec {
    PatternSpec::new("sim_card", r"\b(?:\d{4}\s?){4}\d{3}\b", "{{SIM_CARD}}")
        .validator(ValidatorKind::SimIccid)
}

pub fn ssl_cert() -> PatternSpec {
    PatternSpec::new("ssl_cert", r"\b[0-9A-Fa-f]{16,40}\b", "{{SSL_CERT}}")
        .validator(ValidatorKind::SslSerial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Detector;

    fn mask(spec: PatternSpec, text: &str) -> String {
        spec.compile().unwrap().apply(text).unwrap().into_owned()
    }

    #[test]
    fn test_word_dates() {
        let rule = date_word().compile().unwrap();
        let masked = rule.apply("Umowa z 5 maja 2023, aneks 2024 grudnia 1.").unwrap();
        assert_eq!(masked, "Umowa z {{DATE_STR}}, aneks {{DATE_STR}}.");
        assert_eq!(rule.apply("Due January 5th, 2024").unwrap(), "Due {{DATE_STR}}");
        assert_eq!(rule.apply("on 12 Dec 2022").unwrap(), "on {{DATE_STR}}");
        assert_eq!(rule.apply("maj 2023").unwrap(), "maj 2023");
    }

    #[test]
    fn test_numeric_dates() {
        let rule = date_number().compile().unwrap();
        assert_eq!(
            rule.apply("2023-04-05 and 05.04.2023").unwrap(),
            "{{DATE_NUM}} and {{DATE_NUM}}"
        );
        assert_eq!(rule.apply("2023 . 04 . 05").unwrap(), "{{DATE_NUM}}");
        assert_eq!(rule.apply("2023-13-05").unwrap(), "2023-13-05");
    }

    #[test]
    fn test_money_needs_currency() {
        let rule = money().compile().unwrap();
        assert_eq!(rule.apply("$100").unwrap(), "{{MONEY}}");
        assert_eq!(rule.apply("100 PLN").unwrap(), "{{MONEY}}");
        assert_eq!(rule.apply("koszt 1 200,50 zł.").unwrap(), "koszt {{MONEY}}.");
        assert_eq!(rule.apply("EUR 5 mln").unwrap(), "{{MONEY}}");
        assert_eq!(rule.apply("**20 €**").unwrap(), "{{MONEY}}");
        assert_eq!(rule.apply("100").unwrap(), "100");
        assert_eq!(rule.apply("page 100 of 200").unwrap(), "page 100 of 200");
    }

    #[test]
    fn test_codes_and_serials() {
        assert_eq!(mask(postal_code(), "00-950 Warszawa"), "{{POSTAL_CODE}} Warszawa");
        assert_eq!(mask(health_id(), "NFZ 12345678/901"), "NFZ {{HEALTH_CODE}}");
        assert_eq!(mask(car_plate(), "auto WX 1234A stoi"), "auto {{CAR_PLATE}} stoi");
        assert_eq!(mask(sim_card(), "8948 0000 1234 5678 901"), "{{SIM_CARD}}");
        assert_eq!(mask(ssl_cert(), "serial 00a1b2c3d4e5f6a7b8"), "serial {{SSL_CERT}}");
    }
}
