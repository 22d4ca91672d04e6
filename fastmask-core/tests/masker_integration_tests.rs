// fastmask-core/tests/masker_integration_tests.rs
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use test_log::test;

use fastmask_core::{BuiltinRule, Masker, RuleConfig};

fn masker() -> Masker {
    Masker::new().expect("default rule set must build")
}

#[test]
fn test_checksum_gating_for_cards() {
    let masker = masker();
    assert_eq!(
        masker.mask_text("Card 4111 1111 1111 1111 expires"),
        "Card {{CREDIT_CARD}} expires"
    );
    assert_eq!(
        masker.mask_text("Card 4111 1111 1111 1112 expires"),
        "Card 4111 1111 1111 1112 expires"
    );
}

#[test]
fn test_pesel_tagged_and_bare() {
    let masker = masker();
    assert_eq!(masker.mask_text("PESEL 44051401359"), "PESEL {{PESEL_TAGGED}}");
    assert_eq!(masker.mask_text("nr 44051401359 ok"), "nr {{PESEL}} ok");
    assert_eq!(masker.mask_text("nr 44051401358"), "nr 44051401358");
}

#[test]
fn test_email_wins_over_url() {
    let masker = masker();
    assert_eq!(masker.mask_text("user@example.com"), "{{EMAIL}}");
    assert_eq!(
        masker.mask_text("Write to user@example.com or visit https://example.com/docs today"),
        "Write to {{EMAIL}} or visit {{URL}} today"
    );
}

#[test]
fn test_ip_and_port_are_separate_placeholders() {
    assert_eq!(masker().mask_text("server 192.168.0.1:8080 up"), "server {{IP}}:{{PORT}} up");
}

#[test]
fn test_money_requires_currency() {
    let masker = masker();
    assert_eq!(masker.mask_text("100"), "100");
    assert_eq!(masker.mask_text("$100"), "{{MONEY}}");
    assert_eq!(masker.mask_text("100 PLN"), "{{MONEY}}");
    assert_eq!(masker.mask_text("Cena: $100, rabat 100."), "Cena: {{MONEY}}, rabat 100.");
}

#[test]
fn test_polish_registry_numbers() {
    let masker = masker();
    assert_eq!(masker.mask_text("NIP: 123-456-32-18"), "NIP: {{NIP}}");
    assert_eq!(masker.mask_text("tel. 123 456 789"), "tel. {{PHONE}}");
    assert_eq!(masker.mask_text("Termin: 2023-04-05."), "Termin: {{DATE_NUM}}.");
}

#[test]
fn test_text_without_pii_is_unchanged() {
    let text = "Nothing to see here, just a plain sentence.";
    assert_eq!(masker().mask_text(text), text);
}

#[test]
fn test_placeholders_survive_the_default_set() {
    let masker = masker();
    let placeholders = [
        "{{EMAIL}}", "{{URL}}", "{{IP}}", "{{PORT}}", "{{PHONE}}", "{{PHONE_INTERNATIONAL}}",
        "{{CREDIT_CARD}}", "{{PESEL}}", "{{PESEL_TAGGED}}", "{{NIP}}", "{{KRS}}", "{{REGON}}",
        "{{VIN}}", "{{NRB}}", "{{BANK_ACCOUNT}}", "{{MAC_ADDRESS}}", "{{PASSPORT}}", "{{ID_CARD}}",
        "{{SSN}}", "{{JWT}}", "{{INVOICE_NUMBER}}", "{{ORDER_NUMBER}}", "{{TRANSACTION_REF}}",
        "{{DATE_STR}}", "{{DATE_NUM}}", "{{MONEY}}", "{{POSTAL_CODE}}", "{{HEALTH_CODE}}",
        "{{CAR_PLATE}}", "{{SIM_CARD}}", "{{SSL_CERT}}", "{{STREET}}", "{{SOCIAL_ID}}",
    ];
    for placeholder in placeholders {
        assert_eq!(masker.mask_text(placeholder), placeholder);
    }
    let joined = placeholders.join(" ");
    assert_eq!(masker.mask_text(&joined), joined);
}

#[test]
fn test_masking_is_idempotent() {
    let masker = masker();
    let text = "Card 4111 1111 1111 1111, mail user@example.com, host 10.0.0.1:22, cost $100.";
    let once = masker.mask_text(text);
    assert_eq!(once, "Card {{CREDIT_CARD}}, mail {{EMAIL}}, host {{IP}}:{{PORT}}, cost {{MONEY}}.");
    assert_eq!(masker.mask_text(&once), once);
}

#[test]
fn test_text_glued_to_a_placeholder_is_not_masked_later() {
    let masker = masker();
    let once = masker.mask_text("2023-04-05AB1234567");
    assert_eq!(once, "{{DATE_NUM}}AB1234567");
    assert_eq!(masker.mask_text(&once), once);
}

#[test]
fn test_shared_masker_is_deterministic_across_threads() -> Result<()> {
    let masker = Arc::new(masker());
    let text = "mail user@example.com from 192.168.0.1";
    let expected = masker.mask_text(text);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let masker = Arc::clone(&masker);
            thread::spawn(move || (0..50).map(|_| masker.mask_text(text)).collect::<Vec<_>>())
        })
        .collect();

    for handle in handles {
        let results = handle.join().map_err(|_| anyhow::anyhow!("worker panicked"))?;
        assert!(results.iter().all(|r| *r == expected));
    }
    Ok(())
}

#[test]
fn test_explicit_rule_list_runs_only_those_rules() -> Result<()> {
    let masker = Masker::builder()
        .rules(vec![
            RuleConfig::builtin(BuiltinRule::Ip),
            RuleConfig::builtin(BuiltinRule::Email),
        ])
        .build()?;
    assert_eq!(masker.detector_names(), vec!["ip", "email"]);
    assert_eq!(
        masker.mask_text("a@b.com 10.0.0.1 https://example.com"),
        "{{EMAIL}} {{IP}} https://example.com"
    );
    Ok(())
}

#[test]
fn test_opt_in_rules_need_enabling() -> Result<()> {
    let text = "VAT PL1234567890";
    assert_eq!(masker().mask_text(text), text);

    let masker = Masker::builder().enable_rules(["eu_vat"]).build()?;
    assert_eq!(masker.mask_text(text), "VAT {{EU_VAT}}");
    Ok(())
}
