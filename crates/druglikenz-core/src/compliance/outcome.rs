use crate::error::ResolutionError;
use crate::model::{CompoundId, DescriptorSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of evaluating one compound against one rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Pass/fail per predicate, in the rule's predicate order.
    pub outcomes: Vec<bool>,
    pub pass_count: usize,
    /// Derived from the rule's aggregation policy.
    pub accepted: bool,
}

/// A compound whose descriptors resolved completely.
///
/// The descriptor set is shared with the run cache, so re-evaluating
/// under another rule never copies or recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCompound {
    pub id: CompoundId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub descriptors: Arc<DescriptorSet>,
}

/// One row of the compliance matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub id: CompoundId,
    /// Display name from the remote database, if one was looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub descriptors: Arc<DescriptorSet>,
    pub verdict: Verdict,
}

/// Compounds x predicates for one selected rule, in first-seen input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMatrix {
    pub rule_key: String,
    pub rule_name: String,
    /// Predicate labels, one per verdict outcome.
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl ComplianceMatrix {
    pub fn accepted(&self) -> impl Iterator<Item = &MatrixRow> {
        self.rows.iter().filter(|r| r.verdict.accepted)
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A compound that could not be evaluated at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub identifier: CompoundId,
    pub error: ResolutionError,
}

/// Counts gathered while reading and deduplicating the input column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Data rows read, blank ones included.
    pub input_rows: usize,
    /// Rows whose identifier cell was empty or NaN.
    pub blank_rows: usize,
    pub duplicates_removed: usize,
    /// Distinct normalized identifiers sent to resolution.
    pub unique: usize,
}

/// Everything a screening run produces for one selected rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub matrix: ComplianceMatrix,
    pub failures: Vec<Failure>,
    pub stats: IngestStats,
}
