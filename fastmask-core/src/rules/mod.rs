//! rules/mod.rs - Catalogue of the built-in detectors.
//!
//! Every built-in rule is addressed by a [`BuiltinRule`] variant. The default
//! rule set is [`BuiltinRule::ALL`] minus the opt-in rules, in the order
//! below: checksum-validated identifiers first, generic low-certainty
//! patterns last. Order matters. A rule only ever sees text that earlier
//! rules have already rewritten, so an e-mail is masked before its domain can
//! be taken for a URL.
//!
//! License: MIT OR APACHE 2.0

pub mod business;
pub mod contextual;
pub mod generic;
pub mod identifiers;
pub mod network;
pub mod surnames;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::detector::{Detector, PatternSpec};
use crate::errors::MaskerError;
use network::AddressRule;
use surnames::{SurnameRule, SurnameTable, SURNAME_PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRule {
    // Checksum-validated identifiers.
    CreditCard,
    Vin,
    PeselTagged,
    Pesel,
    Nip,
    Krs,
    Regon,
    // Strict formats.
    Nrb,
    MacAddress,
    Passport,
    IdCard,
    Ssn,
    EuVat,
    PhoneInternational,
    // Well-structured text formats.
    Email,
    Url,
    Ip,
    BankAccount,
    // Business identifiers.
    Jwt,
    ApiToken,
    InvoiceNumber,
    OrderNumber,
    TransactionRef,
    // Context and format based.
    DateWord,
    DateNumber,
    Money,
    PostalCode,
    HealthId,
    CarPlate,
    SimCard,
    SslCert,
    // Generic, noisy.
    Street,
    Phone,
    SocialId,
    Surname,
}

impl BuiltinRule {
    /// Every built-in rule in application order.
    pub const ALL: [BuiltinRule; 35] = [
        BuiltinRule::CreditCard,
        BuiltinRule::Vin,
        BuiltinRule::PeselTagged,
        BuiltinRule::Pesel,
        BuiltinRule::Nip,
        BuiltinRule::Krs,
        BuiltinRule::Regon,
        BuiltinRule::Nrb,
        BuiltinRule::MacAddress,
        BuiltinRule::Passport,
        BuiltinRule::IdCard,
        BuiltinRule::Ssn,
        BuiltinRule::EuVat,
        BuiltinRule::PhoneInternational,
        BuiltinRule::Email,
        BuiltinRule::Url,
        BuiltinRule::Ip,
        BuiltinRule::BankAccount,
        BuiltinRule::Jwt,
        BuiltinRule::ApiToken,
        BuiltinRule::InvoiceNumber,
        BuiltinRule::OrderNumber,
        BuiltinRule::TransactionRef,
        BuiltinRule::DateWord,
        BuiltinRule::DateNumber,
        BuiltinRule::Money,
        BuiltinRule::PostalCode,
        BuiltinRule::HealthId,
        BuiltinRule::CarPlate,
        BuiltinRule::SimCard,
        BuiltinRule::SslCert,
        BuiltinRule::Street,
        BuiltinRule::Phone,
        BuiltinRule::SocialId,
        BuiltinRule::Surname,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinRule::CreditCard => "credit_card",
            BuiltinRule::Vin => "vin",
            BuiltinRule::PeselTagged => "pesel_tagged",
            BuiltinRule::Pesel => "pesel",
            BuiltinRule::Nip => "nip",
            BuiltinRule::Krs => "krs",
            BuiltinRule::Regon => "regon",
            BuiltinRule::Nrb => "nrb",
            BuiltinRule::MacAddress => "mac_address",
            BuiltinRule::Passport => "passport",
            BuiltinRule::IdCard => "id_card",
            BuiltinRule::Ssn => "ssn",
            BuiltinRule::EuVat => "eu_vat",
            BuiltinRule::PhoneInternational => "phone_international",
            BuiltinRule::Email => "email",
            BuiltinRule::Url => "url",
            BuiltinRule::Ip => AddressRule::NAME,
            BuiltinRule::BankAccount => "bank_account",
            BuiltinRule::Jwt => "jwt",
            BuiltinRule::ApiToken => "api_token",
            BuiltinRule::InvoiceNumber => "invoice_number",
            BuiltinRule::OrderNumber => "order_number",
            BuiltinRule::TransactionRef => "transaction_ref",
            BuiltinRule::DateWord => "date_word",
            BuiltinRule::DateNumber => "date_number",
            BuiltinRule::Money => "money",
            BuiltinRule::PostalCode => "postal_code",
            BuiltinRule::HealthId => "health_id",
            BuiltinRule::CarPlate => "car_plate",
            BuiltinRule::SimCard => "sim_card",
            BuiltinRule::SslCert => "ssl_cert",
            BuiltinRule::Street => "street",
            BuiltinRule::Phone => "phone",
            BuiltinRule::SocialId => "social_id",
            BuiltinRule::Surname => SurnameRule::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }

    /// Opt-in rules are left out of the default set: EU VAT and API tokens
    /// are noisy, the surname rule needs a dictionary and the beta flag.
    pub fn is_opt_in(self) -> bool {
        matches!(self, BuiltinRule::EuVat | BuiltinRule::ApiToken | BuiltinRule::Surname)
    }

    /// The pattern description, for every rule implemented as a plain
    /// [`PatternSpec`]. `Ip` and `Surname` have their own detector types.
    pub fn spec(self) -> Option<PatternSpec> {
        let spec = match self {
            BuiltinRule::CreditCard => identifiers::credit_card(),
            BuiltinRule::Vin => identifiers::vin(),
            BuiltinRule::PeselTagged => identifiers::pesel_tagged(),
            BuiltinRule::Pesel => identifiers::pesel(),
            BuiltinRule::Nip => identifiers::nip(),
            BuiltinRule::Krs => identifiers::krs(),
            BuiltinRule::Regon => identifiers::regon(),
            BuiltinRule::Nrb => identifiers::nrb(),
            BuiltinRule::MacAddress => identifiers::mac_address(),
            BuiltinRule::Passport => identifiers::passport(),
            BuiltinRule::IdCard => identifiers::id_card(),
            BuiltinRule::Ssn => identifiers::ssn(),
            BuiltinRule::EuVat => identifiers::eu_vat(),
            BuiltinRule::PhoneInternational => network::phone_international(),
            BuiltinRule::Email => network::email(),
            BuiltinRule::Url => network::url(),
            BuiltinRule::BankAccount => business::bank_account(),
            BuiltinRule::Jwt => business::jwt(),
            BuiltinRule::ApiToken => business::api_token(),
            BuiltinRule::InvoiceNumber => business::invoice_number(),
            BuiltinRule::OrderNumber => business::order_number(),
            BuiltinRule::TransactionRef => business::transaction_ref(),
            BuiltinRule::DateWord => contextual::date_word(),
            BuiltinRule::DateNumber => contextual::date_number(),
            BuiltinRule::Money => contextual::money(),
            BuiltinRule::PostalCode => contextual::postal_code(),
            BuiltinRule::HealthId => contextual::health_id(),
            BuiltinRule::CarPlate => contextual::car_plate(),
            BuiltinRule::SimCard => contextual::sim_card(),
            BuiltinRule::SslCert => contextual::ssl_cert(),
            BuiltinRule::Street => generic::street(),
            BuiltinRule::Phone => generic::phone(),
            BuiltinRule::SocialId => generic::social_id(),
            BuiltinRule::Ip | BuiltinRule::Surname => return None,
        };
        Some(spec)
    }

    /// Builds the detector with its stock placeholder.
    pub fn detector(
        self,
        surnames: Option<Arc<SurnameTable>>,
    ) -> Result<Box<dyn Detector>, MaskerError> {
        self.detector_with(None, surnames)
    }

    /// Builds the detector, optionally overriding its main placeholder.
    ///
    /// The surname rule fails with [`MaskerError::MissingSurnameTable`] when
    /// no table is supplied.
    pub fn detector_with(
        self,
        placeholder: Option<&str>,
        surnames: Option<Arc<SurnameTable>>,
    ) -> Result<Box<dyn Detector>, MaskerError> {
        match self {
            BuiltinRule::Ip => {
                let placeholder = placeholder.unwrap_or(network::IP_PLACEHOLDER);
                Ok(Box::new(AddressRule::with_placeholder(placeholder)?))
            }
            BuiltinRule::Surname => {
                let table = surnames.ok_or(MaskerError::MissingSurnameTable)?;
                let placeholder = placeholder.unwrap_or(SURNAME_PLACEHOLDER);
                Ok(Box::new(SurnameRule::with_placeholder(table, placeholder)?))
            }
            rule => {
                let mut spec = rule
                    .spec()
                    .ok_or_else(|| MaskerError::UnknownBuiltin(rule.name().to_string()))?;
                if let Some(placeholder) = placeholder {
                    spec.placeholder = placeholder.to_string();
                }
                Ok(Box::new(spec.compile()?))
            }
        }
    }
}

/// The rules active when nothing else is configured, in order.
pub fn default_rules() -> Vec<BuiltinRule> {
    BuiltinRule::ALL.into_iter().filter(|rule| !rule.is_opt_in()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for rule in BuiltinRule::ALL {
            assert_eq!(BuiltinRule::from_name(rule.name()), Some(rule));
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.name()));
        }
        assert_eq!(BuiltinRule::from_name("nope"), None);
    }

    #[test]
    fn test_default_order_excludes_opt_in() {
        let defaults = default_rules();
        assert_eq!(defaults.len(), 32);
        assert_eq!(defaults.first(), Some(&BuiltinRule::CreditCard));
        assert_eq!(defaults.last(), Some(&BuiltinRule::SocialId));
        let pos = |r| defaults.iter().position(|x| *x == r).unwrap();
        assert!(pos(BuiltinRule::Email) < pos(BuiltinRule::Url));
        assert!(pos(BuiltinRule::Url) < pos(BuiltinRule::Ip));
        assert!(pos(BuiltinRule::PhoneInternational) < pos(BuiltinRule::Phone));
    }

    #[test]
    fn test_every_builtin_compiles() {
        let table = Arc::new(SurnameTable::from_surnames(["Kowalski"]));
        for rule in BuiltinRule::ALL {
            let detector = rule.detector(Some(table.clone())).unwrap();
            assert_eq!(detector.name(), rule.name());
            assert!(!detector.placeholders().is_empty());
        }
    }

    #[test]
    fn test_surname_requires_table() {
        assert!(matches!(
            BuiltinRule::Surname.detector(None),
            Err(MaskerError::MissingSurnameTable)
        ));
    }

    #[test]
    fn test_placeholder_override() {
        let detector = BuiltinRule::Email.detector_with(Some("[EMAIL]"), None).unwrap();
        assert_eq!(detector.apply("a@b.com").unwrap(), "[EMAIL]");
    }
}
