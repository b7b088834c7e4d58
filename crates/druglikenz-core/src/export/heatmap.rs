//! Pass/fail matrix handed to an external heatmap renderer.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compliance::ComplianceMatrix;
use crate::error::DruglikenzError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationRow {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One cell per rule predicate, in column order.
    pub cells: Vec<bool>,
    pub accepted: bool,
}

/// Rows are compounds in matrix order, columns are the rule's predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationMatrix {
    pub rule: String,
    pub columns: Vec<String>,
    pub rows: Vec<VisualizationRow>,
}

impl From<&ComplianceMatrix> for VisualizationMatrix {
    fn from(matrix: &ComplianceMatrix) -> Self {
        VisualizationMatrix {
            rule: matrix.rule_name.clone(),
            columns: matrix.columns.clone(),
            rows: matrix
                .rows
                .iter()
                .map(|row| VisualizationRow {
                    identifier: row.id.to_string(),
                    name: row.name.clone(),
                    cells: row.verdict.outcomes.clone(),
                    accepted: row.verdict.accepted,
                })
                .collect(),
        }
    }
}

/// A fixed-size slice of the matrix. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixPage {
    pub page: usize,
    pub page_count: usize,
    pub rule: String,
    pub columns: Vec<String>,
    pub rows: Vec<VisualizationRow>,
}

/// Split into pages of at most `page_size` rows. An empty matrix still
/// yields one (empty) page so renderers always get the column labels.
pub fn paginate(matrix: &VisualizationMatrix, page_size: usize) -> Vec<MatrixPage> {
    let page_size = page_size.max(1);
    let chunks: Vec<&[VisualizationRow]> = if matrix.rows.is_empty() {
        vec![&matrix.rows[..]]
    } else {
        matrix.rows.chunks(page_size).collect()
    };
    let page_count = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, rows)| MatrixPage {
            page: i + 1,
            page_count,
            rule: matrix.rule.clone(),
            columns: matrix.columns.clone(),
            rows: rows.to_vec(),
        })
        .collect()
}

/// Write the paged matrix as a JSON array of pages.
pub fn write_matrix_json(
    matrix: &ComplianceMatrix,
    path: &Path,
    page_size: usize,
) -> Result<usize, DruglikenzError> {
    let pages = paginate(&VisualizationMatrix::from(matrix), page_size);
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &pages)?;
    info!(path = %path.display(), pages = pages.len(), "wrote visualization matrix");
    Ok(pages.len())
}
