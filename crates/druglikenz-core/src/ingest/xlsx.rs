use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use crate::error::DruglikenzError;
use crate::ingest::missing_column;

/// Read one named column from the first worksheet; row 1 is the header.
pub(super) fn read_column(path: &Path, column: &str) -> Result<Vec<String>, DruglikenzError> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| DruglikenzError::Spreadsheet(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DruglikenzError::Spreadsheet("workbook has no sheets".into()))?
        .map_err(|e| DruglikenzError::Spreadsheet(e.to_string()))?;

    let mut rows = sheet.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(cell_as_string).collect())
        .unwrap_or_default();
    let idx = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| missing_column(path, column, &headers))?;

    Ok(rows
        .map(|row| row.get(idx).map(cell_as_string).unwrap_or_default())
        .collect())
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        Data::Float(f) if f.is_nan() => String::new(),
        Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_string() {
        assert_eq!(cell_as_string(&Data::String("  CCO ".into())), "CCO");
        assert_eq!(cell_as_string(&Data::Empty), "");
        assert_eq!(cell_as_string(&Data::Float(f64::NAN)), "");
        assert_eq!(cell_as_string(&Data::Int(42)), "42");
    }

    #[test]
    fn test_not_a_workbook() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(matches!(
            read_column(file.path(), "SMILES"),
            Err(DruglikenzError::Spreadsheet(_))
        ));
    }
}
