use std::path::Path;

use druglikenz_core::config::{CliOverrides, ScreenConfig};
use druglikenz_core::error::DruglikenzError;
use druglikenz_core::model::CompoundId;
use druglikenz_core::resolve::Resolver;
use serde_json::json;

use crate::output::{self, OutputFormat};

pub fn run(
    smiles: &[String],
    format: OutputFormat,
    config: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<(), DruglikenzError> {
    let config = ScreenConfig::load(config, overrides)?;
    let resolver = Resolver::from_config(&config)?;

    let results: Vec<_> = smiles
        .iter()
        .filter_map(|s| CompoundId::normalize(s))
        .map(|id| {
            let outcome = resolver.resolve(&id);
            (id, outcome)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let docs: Vec<_> = results
                .iter()
                .map(|(id, outcome)| match outcome {
                    Ok(resolved) => json!({
                        "identifier": id,
                        "name": resolved.name,
                        "descriptors": resolved.descriptors,
                    }),
                    Err(e) => json!({ "identifier": id, "error": e }),
                })
                .collect();
            output::json::print(&docs)?;
        }
        OutputFormat::Table => output::table::print_descriptors(&results),
    }
    Ok(())
}
