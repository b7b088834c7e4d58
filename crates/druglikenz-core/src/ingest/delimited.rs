use std::path::Path;

use csv::ReaderBuilder;

use crate::error::DruglikenzError;
use crate::ingest::missing_column;

/// Read one named column from a delimited file with a header row.
///
/// Short rows yield an empty cell rather than an error.
pub(super) fn read_column(
    path: &Path,
    column: &str,
    delimiter: u8,
) -> Result<Vec<String>, DruglikenzError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let idx = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| missing_column(path, column, &headers))?;

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        cells.push(record.get(idx).unwrap_or("").to_string());
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_column_keeps_blanks_in_order() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Name,SMILES").unwrap();
        writeln!(file, "ethanol,CCO").unwrap();
        writeln!(file, "unknown,").unwrap();
        writeln!(file, "aspirin,CC(=O)Oc1ccccc1C(=O)O").unwrap();
        writeln!(file, "short").unwrap();
        file.flush().unwrap();

        let cells = read_column(file.path(), "SMILES", b',').unwrap();
        assert_eq!(cells, vec!["CCO", "", "CC(=O)Oc1ccccc1C(=O)O", ""]);
    }

    #[test]
    fn test_tab_separated() {
        let mut file = NamedTempFile::with_suffix(".tsv").unwrap();
        writeln!(file, "ID\tSMILES").unwrap();
        writeln!(file, "1\tc1ccccc1").unwrap();
        file.flush().unwrap();

        let cells = read_column(file.path(), "SMILES", b'\t').unwrap();
        assert_eq!(cells, vec!["c1ccccc1"]);
    }

    #[test]
    fn test_missing_column_lists_headers() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "Name,Structure").unwrap();
        writeln!(file, "ethanol,CCO").unwrap();
        file.flush().unwrap();

        let err = read_column(file.path(), "SMILES", b',').unwrap_err();
        match err {
            DruglikenzError::MissingColumn { column, present, .. } => {
                assert_eq!(column, "SMILES");
                assert_eq!(present, "Name, Structure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_match_is_case_sensitive() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "smiles").unwrap();
        writeln!(file, "CCO").unwrap();
        file.flush().unwrap();

        assert!(read_column(file.path(), "SMILES", b',').is_err());
    }
}
