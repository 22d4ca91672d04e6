//! compiler.rs - Turns rule entries into ready-to-run detectors.
//!
//! Built-in references are resolved through [`BuiltinRule`]; user-defined
//! entries become a [`PatternRule`](crate::detector::PatternRule). All
//! problems in a rule list are collected and reported together.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::debug;

use crate::config::{aggregate_errors, validate_rules, RuleConfig};
use crate::detector::Detector;
use crate::errors::MaskerError;
use crate::rules::surnames::SurnameTable;
use crate::rules::BuiltinRule;

/// Compiles a single rule entry.
pub fn compile_rule(
    rule: &RuleConfig,
    surnames: Option<&Arc<SurnameTable>>,
) -> Result<Box<dyn Detector>, MaskerError> {
    if let Some(spec) = rule.to_pattern_spec()? {
        debug!("Compiling user rule '{}'.", rule.name);
        return Ok(Box::new(spec.compile()?));
    }

    let builtin = BuiltinRule::from_name(&rule.name)
        .ok_or_else(|| MaskerError::UnknownBuiltin(rule.name.clone()))?;
    debug!("Compiling built-in rule '{}'.", rule.name);
    builtin.detector_with(rule.placeholder.as_deref(), surnames.cloned())
}

/// Compiles rule entries in order.
///
/// Entries are validated first; then every entry is compiled and all
/// compilation failures are reported in one error.
pub fn compile_rules(
    rules: &[RuleConfig],
    surnames: Option<Arc<SurnameTable>>,
) -> Result<Vec<Box<dyn Detector>>, MaskerError> {
    debug!("Starting compilation of {} rules.", rules.len());
    validate_rules(rules)?;

    let mut detectors = Vec::with_capacity(rules.len());
    let mut compilation_errors = Vec::new();

    for rule in rules {
        match compile_rule(rule, surnames.as_ref()) {
            Ok(detector) => detectors.push(detector),
            Err(e) => compilation_errors.push(e),
        }
    }

    aggregate_errors(compilation_errors, "Compilation")?;

    debug!("Finished compiling rules. Total compiled: {}.", detectors.len());
    Ok(detectors)
}
