use druglikenz_core::compliance::{ComplianceMatrix, ScreeningReport};
use druglikenz_core::error::ResolutionError;
use druglikenz_core::model::{CompoundId, Descriptor};
use druglikenz_core::resolve::Resolved;

const MAX_ID_WIDTH: usize = 40;

pub fn print_matrix(matrix: &ComplianceMatrix) {
    println!("=== {} ===\n", matrix.rule_name);

    if matrix.is_empty() {
        println!("  No valid compounds found.\n");
        return;
    }

    let id_width = id_width(matrix.rows.iter().map(|r| r.id.as_str()));
    let col_widths: Vec<usize> = matrix.columns.iter().map(|c| c.len().max(4)).collect();

    print!("  {:<id_width$}", "Compound");
    for (label, &width) in matrix.columns.iter().zip(&col_widths) {
        print!("  {label:<width$}");
    }
    println!("  Accepted");
    println!(
        "  {}",
        "-".repeat(id_width + col_widths.iter().map(|w| w + 2).sum::<usize>() + 10)
    );

    for row in &matrix.rows {
        let label = match &row.name {
            Some(name) => name.as_str(),
            None => row.id.as_str(),
        };
        print!("  {:<id_width$}", truncate(label, id_width));
        for (&passed, &width) in row.verdict.outcomes.iter().zip(&col_widths) {
            let cell = if passed { "pass" } else { "FAIL" };
            print!("  {cell:<width$}");
        }
        println!(
            "  {} ({}/{})",
            if row.verdict.accepted { "yes" } else { "no" },
            row.verdict.pass_count,
            row.verdict.outcomes.len()
        );
    }
    println!();
}

pub fn print_summary(report: &ScreeningReport) {
    let stats = &report.stats;
    println!(
        "  Accepted: {} of {} evaluated compounds",
        report.matrix.accepted_count(),
        report.matrix.rows.len()
    );
    println!(
        "  Input rows: {}, blank: {}, duplicates removed: {}",
        stats.input_rows, stats.blank_rows, stats.duplicates_removed
    );

    if !report.failures.is_empty() {
        println!("\n  Could not evaluate {} compound(s):", report.failures.len());
        for failure in &report.failures {
            println!(
                "    {}  -> {}",
                truncate(failure.identifier.as_str(), MAX_ID_WIDTH),
                failure.error
            );
        }
    }
}

pub fn print_descriptors(results: &[(CompoundId, Result<Resolved, ResolutionError>)]) {
    let id_width = id_width(results.iter().map(|(id, _)| id.as_str()));

    print!("  {:<id_width$}", "Compound");
    for d in Descriptor::ALL {
        print!("  {:>8}", d.short_name());
    }
    println!();

    for (id, outcome) in results {
        print!("  {:<id_width$}", truncate(id.as_str(), id_width));
        match outcome {
            Ok(resolved) => {
                for d in Descriptor::ALL {
                    print!("  {:>8}", resolved.descriptors.value(d).round_dp(2).to_string());
                }
                if let Some(name) = &resolved.name {
                    print!("  {name}");
                }
                println!();
            }
            Err(e) => println!("  error: {e}"),
        }
    }
}

fn id_width<'a>(ids: impl Iterator<Item = &'a str>) -> usize {
    ids.map(|s| s.chars().count())
        .max()
        .unwrap_or(8)
        .clamp(8, MAX_ID_WIDTH)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("CCO", 10), "CCO");
        assert_eq!(truncate("CC(=O)Oc1ccccc1C(=O)O", 10), "CC(=O)O...");
    }

    #[test]
    fn test_id_width_is_clamped() {
        assert_eq!(id_width(["C"].into_iter()), 8);
        let long = "C".repeat(100);
        assert_eq!(id_width([long.as_str()].into_iter()), MAX_ID_WIDTH);
    }
}
