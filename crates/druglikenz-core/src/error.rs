use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::Descriptor;

/// Fatal errors: anything that aborts a whole screening request.
///
/// Per-compound problems never show up here, see [`ResolutionError`].
#[derive(Debug, thiserror::Error)]
pub enum DruglikenzError {
    #[error("unknown rule '{name}'. Available: {available}")]
    InvalidRuleSelection { name: String, available: String },

    #[error("column '{column}' not found in {path}. Columns present: {present}")]
    MissingColumn {
        column: String,
        path: PathBuf,
        present: String,
    },

    #[error("unsupported input file {path}: expected .csv, .tsv, .txt or .xlsx")]
    UnsupportedInput { path: PathBuf },

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("failed to load rule set from {source_name}: {reason}")]
    RulesetLoad { source_name: String, reason: String },

    #[error("invalid rule set: {0}")]
    RulesetInvalid(String),

    #[error("failed to parse config {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("failed to start resolution workers: {0}")]
    WorkerPool(String),

    #[error("no batch has been run yet")]
    NoBatch,

    #[error("screening cancelled after {resolved} of {total} compounds were resolved")]
    Cancelled { resolved: usize, total: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a single compound could not be evaluated.
///
/// Compounds failing with one of these are left out of the compliance
/// matrix and listed in the run's failures instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionError {
    #[error("could not parse structure: {reason}")]
    Parse { reason: String },

    #[error("missing descriptors: {}", format_missing(.missing))]
    IncompleteDescriptors {
        missing: Vec<Descriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        remote_error: Option<String>,
    },
}

fn format_missing(missing: &[Descriptor]) -> String {
    missing
        .iter()
        .map(|d| d.label())
        .collect::<Vec<_>>()
        .join(", ")
}
