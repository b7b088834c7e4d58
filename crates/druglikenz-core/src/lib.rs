pub mod chem;
pub mod compliance;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod rules;

use std::path::Path;

use compliance::ScreeningReport;
use config::ScreenConfig;
use error::DruglikenzError;
use pipeline::BatchRun;
use resolve::Resolver;

/// Options for [`screen_file`].
#[derive(Default)]
pub struct ScreenOptions {
    pub config: ScreenConfig,
    /// Use this resolver instead of the one built from `config`.
    pub resolver: Option<Resolver>,
}

/// Main API entry point: screen one column of an input file against a rule.
///
/// The configuration, the rule name and the input column are all checked
/// before any descriptor is resolved.
pub fn screen_file(
    path: &Path,
    column: &str,
    rule: &str,
    options: ScreenOptions,
) -> Result<ScreeningReport, DruglikenzError> {
    let ScreenOptions { config, resolver } = options;
    config.validate()?;
    let resolver = match resolver {
        Some(r) => r,
        None => Resolver::from_config(&config)?,
    };
    let mut run = BatchRun::new(resolver, &config)?;
    run.catalog().get(rule)?;

    let cells = ingest::read_identifiers(path, column, config.export.delimiter)?;
    run.run(&cells, rule)
}
