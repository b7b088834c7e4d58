//! Reading the identifier column out of tabular input files.

mod delimited;
mod xlsx;

use std::path::Path;

use tracing::debug;

use crate::config::delimiter_byte;
use crate::error::DruglikenzError;

/// Column read when the caller does not name one.
pub const DEFAULT_COLUMN: &str = "SMILES";

/// Input file kinds, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited(u8),
    Xlsx,
}

impl InputFormat {
    /// `.csv` is comma separated, `.tsv` and `.txt` tab separated.
    pub fn from_path(path: &Path) -> Result<InputFormat, DruglikenzError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(InputFormat::Delimited(b',')),
            Some("tsv") | Some("txt") => Ok(InputFormat::Delimited(b'\t')),
            Some("xlsx") => Ok(InputFormat::Xlsx),
            _ => Err(DruglikenzError::UnsupportedInput {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Every cell of `column`, one per data row, in file order.
///
/// Blank cells are kept so the caller can count them; see [`is_blank_cell`].
/// `delimiter` overrides the separator implied by a delimited file's extension.
pub fn read_identifiers(
    path: &Path,
    column: &str,
    delimiter: Option<char>,
) -> Result<Vec<String>, DruglikenzError> {
    let cells = match InputFormat::from_path(path)? {
        InputFormat::Delimited(default) => {
            let sep = delimiter.map(delimiter_byte).transpose()?.unwrap_or(default);
            delimited::read_column(path, column, sep)?
        }
        InputFormat::Xlsx => xlsx::read_column(path, column)?,
    };
    debug!(path = %path.display(), column, rows = cells.len(), "read input column");
    Ok(cells)
}

/// Empty after trimming, or a spreadsheet NaN marker.
pub fn is_blank_cell(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || t.eq_ignore_ascii_case("nan")
}

pub(crate) fn missing_column(path: &Path, column: &str, headers: &[String]) -> DruglikenzError {
    DruglikenzError::MissingColumn {
        column: column.to_string(),
        path: path.to_path_buf(),
        present: headers.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("a.CSV")).unwrap(),
            InputFormat::Delimited(b',')
        );
        assert_eq!(
            InputFormat::from_path(Path::new("a.txt")).unwrap(),
            InputFormat::Delimited(b'\t')
        );
        assert_eq!(
            InputFormat::from_path(Path::new("a.xlsx")).unwrap(),
            InputFormat::Xlsx
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("a.sdf")),
            Err(DruglikenzError::UnsupportedInput { .. })
        ));
    }

    #[test]
    fn test_blank_cells() {
        assert!(is_blank_cell(""));
        assert!(is_blank_cell("   "));
        assert!(is_blank_cell("NaN"));
        assert!(is_blank_cell("nan"));
        assert!(!is_blank_cell("CCO"));
    }

    #[test]
    fn test_delimiter_override() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Name;SMILES").unwrap();
        writeln!(file, "ethanol;CCO").unwrap();
        file.flush().unwrap();

        let cells = read_identifiers(file.path(), "SMILES", Some(';')).unwrap();
        assert_eq!(cells, vec!["CCO"]);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "NameéSMILES").unwrap();
        file.flush().unwrap();

        let err = read_identifiers(file.path(), "SMILES", Some('é')).unwrap_err();
        assert!(matches!(err, DruglikenzError::ConfigInvalid { .. }));
    }
}
