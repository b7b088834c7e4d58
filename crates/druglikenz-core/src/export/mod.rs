//! Writing screening results for downstream tools.

pub mod accepted;
pub mod heatmap;

use std::path::Path;

use crate::config::delimiter_byte;
use crate::error::DruglikenzError;

pub use accepted::{write_accepted, write_accepted_file, write_failures, write_failures_file};
pub use heatmap::{paginate, write_matrix_json, MatrixPage, VisualizationMatrix, VisualizationRow};

/// Tab for `.tsv`/`.txt` targets, comma otherwise; `explicit` wins.
pub fn delimiter_for(path: &Path, explicit: Option<char>) -> Result<u8, DruglikenzError> {
    if let Some(c) = explicit {
        return delimiter_byte(c);
    }
    let sep = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    };
    Ok(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for(Path::new("out.csv"), None).unwrap(), b',');
        assert_eq!(delimiter_for(Path::new("out.TSV"), None).unwrap(), b'\t');
        assert_eq!(delimiter_for(Path::new("out"), None).unwrap(), b',');
        assert_eq!(delimiter_for(Path::new("out.tsv"), Some(';')).unwrap(), b';');
    }

    #[test]
    fn test_non_ascii_delimiter_is_an_error() {
        assert!(matches!(
            delimiter_for(Path::new("out.csv"), Some('é')),
            Err(DruglikenzError::ConfigInvalid { .. })
        ));
    }
}
