pub mod builtin;
pub mod schema;

use std::path::Path;

use crate::error::DruglikenzError;
use schema::{AggregationPolicy, Comparison, RuleDefinition};

/// Load and validate a rule definition from a JSON file.
pub fn load_ruleset(path: &Path) -> Result<RuleDefinition, DruglikenzError> {
    let json = std::fs::read_to_string(path)?;
    parse_ruleset(&json, &path.display().to_string())
}

/// Parse a rule definition from a JSON string and validate it.
///
/// `source_name` only appears in error messages.
pub fn parse_ruleset(json: &str, source_name: &str) -> Result<RuleDefinition, DruglikenzError> {
    let rule: RuleDefinition =
        serde_json::from_str(json).map_err(|e| DruglikenzError::RulesetLoad {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
    validate_ruleset(&rule)?;
    Ok(rule)
}

/// Validate that a rule definition is well-formed.
pub fn validate_ruleset(rule: &RuleDefinition) -> Result<(), DruglikenzError> {
    if rule.key.trim().is_empty() {
        return Err(DruglikenzError::RulesetInvalid(
            "key must not be empty".into(),
        ));
    }

    if rule.predicates.is_empty() {
        return Err(DruglikenzError::RulesetInvalid(format!(
            "rule '{}' has no predicates",
            rule.key
        )));
    }

    let total = rule.policy.total();
    if total != rule.predicates.len() {
        return Err(DruglikenzError::RulesetInvalid(format!(
            "rule '{}' policy counts {} predicates but defines {}",
            rule.key,
            total,
            rule.predicates.len()
        )));
    }

    if let AggregationPolicy::ThresholdCount { min_pass, total } = rule.policy {
        if min_pass > total {
            return Err(DruglikenzError::RulesetInvalid(format!(
                "rule '{}' requires {} passing predicates out of only {}",
                rule.key, min_pass, total
            )));
        }
    }

    for predicate in &rule.predicates {
        if let Comparison::Between { min, max } = predicate.comparison {
            if min > max {
                return Err(DruglikenzError::RulesetInvalid(format!(
                    "rule '{}': range for {} has min {} above max {}",
                    rule.key, predicate.parameter, min, max
                )));
            }
        }

        if predicate.parameter.is_integer()
            && predicate
                .comparison
                .thresholds()
                .iter()
                .any(|t| !t.fract().is_zero())
        {
            return Err(DruglikenzError::RulesetInvalid(format!(
                "rule '{}': integer descriptor {} compared against a fractional threshold",
                rule.key, predicate.parameter
            )));
        }
    }

    Ok(())
}
