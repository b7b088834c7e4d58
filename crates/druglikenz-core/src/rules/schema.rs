use crate::model::Descriptor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named drug-likeness rule set: ordered predicates plus an aggregation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Lookup key, e.g. "lipinski".
    pub key: String,
    /// Display name, e.g. "Lipinski's Rule of Five".
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Literature reference for the thresholds.
    #[serde(default)]
    pub reference: Option<String>,
    /// Predicates in evaluation (and column) order.
    pub predicates: Vec<Predicate>,
    pub policy: AggregationPolicy,
}

impl RuleDefinition {
    /// Column labels for the visualization matrix, one per predicate.
    pub fn column_labels(&self) -> Vec<String> {
        self.predicates.iter().map(|p| p.to_string()).collect()
    }
}

/// One threshold test over a single descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub parameter: Descriptor,
    #[serde(flatten)]
    pub comparison: Comparison,
}

impl Predicate {
    /// Whether `value` satisfies this predicate.
    pub fn test(&self, value: Decimal) -> bool {
        match self.comparison {
            Comparison::Le { threshold } => value <= threshold,
            Comparison::Lt { threshold } => value < threshold,
            Comparison::Ge { threshold } => value >= threshold,
            Comparison::Gt { threshold } => value > threshold,
            Comparison::Between { min, max } => value >= min && value <= max,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.parameter.short_name();
        match self.comparison {
            Comparison::Le { threshold } => write!(f, "{name} <= {threshold}"),
            Comparison::Lt { threshold } => write!(f, "{name} < {threshold}"),
            Comparison::Ge { threshold } => write!(f, "{name} >= {threshold}"),
            Comparison::Gt { threshold } => write!(f, "{name} > {threshold}"),
            Comparison::Between { min, max } => write!(f, "{name} in [{min}, {max}]"),
        }
    }
}

/// Comparator and threshold(s). Bounds are inclusive except for `lt`/`gt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "comparator", rename_all = "snake_case")]
pub enum Comparison {
    Le { threshold: Decimal },
    Lt { threshold: Decimal },
    Ge { threshold: Decimal },
    Gt { threshold: Decimal },
    Between { min: Decimal, max: Decimal },
}

impl Comparison {
    /// All threshold values this comparison mentions.
    pub fn thresholds(&self) -> Vec<Decimal> {
        match *self {
            Comparison::Le { threshold }
            | Comparison::Lt { threshold }
            | Comparison::Ge { threshold }
            | Comparison::Gt { threshold } => vec![threshold],
            Comparison::Between { min, max } => vec![min, max],
        }
    }
}

/// How per-predicate outcomes combine into acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Accept if at least `min_pass` of `total` predicates pass.
    ThresholdCount { min_pass: usize, total: usize },
    /// Accept iff all `total` predicates pass.
    AllMustPass { total: usize },
}

impl AggregationPolicy {
    pub fn total(&self) -> usize {
        match *self {
            AggregationPolicy::ThresholdCount { total, .. } => total,
            AggregationPolicy::AllMustPass { total } => total,
        }
    }

    pub fn accepts(&self, pass_count: usize) -> bool {
        match *self {
            AggregationPolicy::ThresholdCount { min_pass, .. } => pass_count >= min_pass,
            AggregationPolicy::AllMustPass { total } => pass_count == total,
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AggregationPolicy::ThresholdCount { min_pass, total } => {
                write!(f, "accepted if at least {min_pass} of {total} criteria pass")
            }
            AggregationPolicy::AllMustPass { total } => {
                write!(f, "accepted only if all {total} criteria pass")
            }
        }
    }
}
