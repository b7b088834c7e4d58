use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::compliance::{ComplianceMatrix, Failure};
use crate::error::DruglikenzError;
use crate::export::delimiter_for;
use crate::model::Descriptor;

/// Write accepted compounds in matrix order: identifier, name, the nine
/// descriptors, then the pass count.
pub fn write_accepted<W: Write>(
    matrix: &ComplianceMatrix,
    writer: W,
    delimiter: u8,
) -> Result<usize, DruglikenzError> {
    let mut out = WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    let mut header = vec!["Identifier", "Name"];
    header.extend(Descriptor::ALL.iter().map(|d| d.label()));
    header.push("PassCount");
    out.write_record(&header)?;

    let mut written = 0;
    for row in matrix.accepted() {
        let mut record = vec![
            row.id.to_string(),
            row.name.clone().unwrap_or_default(),
        ];
        record.extend(
            Descriptor::ALL
                .iter()
                .map(|&d| row.descriptors.value(d).to_string()),
        );
        record.push(row.verdict.pass_count.to_string());
        out.write_record(&record)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

pub fn write_accepted_file(
    matrix: &ComplianceMatrix,
    path: &Path,
    delimiter: Option<char>,
) -> Result<usize, DruglikenzError> {
    let sep = delimiter_for(path, delimiter)?;
    let file = File::create(path)?;
    let written = write_accepted(matrix, file, sep)?;
    info!(path = %path.display(), compounds = written, "wrote accepted compounds");
    Ok(written)
}

/// Write `Identifier,Reason` for every compound that could not be evaluated.
pub fn write_failures<W: Write>(
    failures: &[Failure],
    writer: W,
    delimiter: u8,
) -> Result<(), DruglikenzError> {
    let mut out = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    out.write_record(["Identifier", "Reason"])?;
    for failure in failures {
        out.write_record([failure.identifier.to_string(), failure.error.to_string()])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_failures_file(
    failures: &[Failure],
    path: &Path,
    delimiter: Option<char>,
) -> Result<(), DruglikenzError> {
    let sep = delimiter_for(path, delimiter)?;
    let file = File::create(path)?;
    write_failures(failures, file, sep)?;
    info!(path = %path.display(), failures = failures.len(), "wrote failures");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{build_matrix, ResolvedCompound};
    use crate::error::ResolutionError;
    use crate::model::{CompoundId, DescriptorSet};
    use crate::rules::builtin::load_preset;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn compound(id: &str, mw: rust_decimal::Decimal, name: Option<&str>) -> ResolvedCompound {
        ResolvedCompound {
            id: CompoundId::normalize(id).unwrap(),
            name: name.map(str::to_string),
            descriptors: Arc::new(DescriptorSet {
                molecular_weight: mw,
                hbond_acceptors: 4,
                hbond_donors: 1,
                logp: dec!(1.31),
                rotatable_bonds: 3,
                polar_surface_area: dec!(63.6),
                ring_count: 1,
                carbon_count: 9,
                heteroatom_count: 4,
            }),
        }
    }

    #[test]
    fn test_only_accepted_rows_written() {
        let rule = load_preset("ro3").unwrap();
        let mut light = compound("CCO", dec!(46.07), Some("ethanol"));
        Arc::make_mut(&mut light.descriptors).hbond_acceptors = 1;
        Arc::make_mut(&mut light.descriptors).polar_surface_area = dec!(20.23);
        let heavy = compound("heavy", dec!(180.159), None);
        let matrix = build_matrix(&[light, heavy], &rule);

        let mut buf = Vec::new();
        let written = write_accepted(&matrix, &mut buf, b',').unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Identifier,Name,MW,HBA,HBD,LogP,ROTB,PSA,NumRings,NumCarbons,NumHeteroatoms,PassCount"
        );
        assert_eq!(lines[1], "CCO,ethanol,46.07,1,1,1.31,3,20.23,1,9,4,6");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_tsv_file_uses_tabs() {
        let rule = load_preset("lipinski").unwrap();
        let matrix = build_matrix(&[compound("c1ccccc1", dec!(78.11), None)], &rule);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accepted.tsv");

        write_accepted_file(&matrix, &path, None).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Identifier\tName\tMW"));
        assert!(text.contains("c1ccccc1\t\t78.11"));
    }

    #[test]
    fn test_failures_written_with_reason() {
        let failures = vec![Failure {
            identifier: CompoundId::normalize("not-a-structure").unwrap(),
            error: ResolutionError::Parse {
                reason: "unexpected character '-' at position 3".into(),
            },
        }];
        let mut buf = Vec::new();
        write_failures(&failures, &mut buf, b',').unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Identifier,Reason\nnot-a-structure,could not parse structure: unexpected character '-' at position 3\n"
        );
    }
}
