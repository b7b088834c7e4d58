use std::path::{Path, PathBuf};

use druglikenz_core::compliance::ScreeningReport;
use druglikenz_core::config::{CliOverrides, ScreenConfig};
use druglikenz_core::error::DruglikenzError;
use druglikenz_core::export;
use druglikenz_core::ingest;
use druglikenz_core::pipeline::BatchRun;
use druglikenz_core::resolve::Resolver;
use tracing::{info, warn};

use crate::output::{self, OutputFormat};

pub struct ScreenArgs {
    pub input_file: PathBuf,
    pub column: String,
    pub rules: Vec<String>,
    pub output: OutputFormat,
    pub accepted_out: Option<PathBuf>,
    pub matrix_out: Option<PathBuf>,
    pub failures_out: Option<PathBuf>,
    pub overrides: CliOverrides,
    pub config: Option<PathBuf>,
}

pub fn run(args: ScreenArgs) -> Result<(), DruglikenzError> {
    let config = ScreenConfig::load(args.config.as_deref(), &args.overrides)?;
    let resolver = Resolver::from_config(&config)?;
    info!(sources = ?resolver.source_names(), "descriptor sources");
    let mut batch = BatchRun::new(resolver, &config)?;

    // Every rule name is checked before the input is even read
    let mut keys = Vec::new();
    for name in &args.rules {
        let key = batch.catalog().get(name)?.key.clone();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    let Some((first, rest)) = keys.split_first() else {
        return Ok(());
    };

    let cells = ingest::read_identifiers(&args.input_file, &args.column, config.export.delimiter)?;

    let mut reports = vec![batch.run(&cells, first)?];
    for key in rest {
        reports.push(batch.reselect(key)?);
    }

    for report in &reports {
        if report.matrix.is_empty() {
            warn!(rule = %report.matrix.rule_key, "no valid compounds found");
        }
    }

    let multi = reports.len() > 1;
    for report in &reports {
        if let Some(path) = &args.accepted_out {
            let path = per_rule_path(path, &report.matrix.rule_key, multi);
            export::write_accepted_file(&report.matrix, &path, config.export.delimiter)?;
        }
        if let Some(path) = &args.matrix_out {
            let path = per_rule_path(path, &report.matrix.rule_key, multi);
            export::write_matrix_json(&report.matrix, &path, config.export.page_size)?;
        }
    }
    if let (Some(path), Some(report)) = (&args.failures_out, reports.first()) {
        export::write_failures_file(&report.failures, path, config.export.delimiter)?;
    }

    match args.output {
        OutputFormat::Json => output::json::print(&reports)?,
        OutputFormat::Table => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_report(report);
            }
        }
    }
    Ok(())
}

fn print_report(report: &ScreeningReport) {
    output::table::print_matrix(&report.matrix);
    output::table::print_summary(report);
}

/// `out.csv` becomes `out.ro3.csv` when several rules are written.
fn per_rule_path(path: &Path, rule_key: &str, multi: bool) -> PathBuf {
    if !multi {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.{rule_key}.{}", ext.to_string_lossy()),
        None => format!("{stem}.{rule_key}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_rule_path() {
        let p = Path::new("out/accepted.csv");
        assert_eq!(per_rule_path(p, "ro3", false), PathBuf::from("out/accepted.csv"));
        assert_eq!(per_rule_path(p, "ro3", true), PathBuf::from("out/accepted.ro3.csv"));
        assert_eq!(
            per_rule_path(Path::new("matrix"), "veber", true),
            PathBuf::from("matrix.veber")
        );
    }
}
