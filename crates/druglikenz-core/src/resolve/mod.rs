//! Descriptor resolution: local computation first, remote sources as
//! ordered fallbacks for whatever the local pass could not produce.

pub mod cache;
pub mod local;
pub mod pubchem;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ScreenConfig;
use crate::error::{DruglikenzError, ResolutionError};
use crate::model::{CompoundId, Descriptor, DescriptorSet, PartialDescriptors};

pub use cache::RunCache;
pub use local::SmilesCalculator;
pub use pubchem::PubChemSource;

/// Why a source produced nothing for an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The identifier is not a readable structure.
    #[error("{0}")]
    Unparseable(String),
    /// Network or service failure, after any retries.
    #[error("{0}")]
    Unavailable(String),
}

/// Something that can supply descriptors for a structure identifier.
pub trait DescriptorSource: Send + Sync {
    fn name(&self) -> &str;

    /// Look up the `wanted` descriptors. Fields the source cannot supply
    /// are simply absent from the result.
    fn lookup(
        &self,
        id: &CompoundId,
        wanted: &[Descriptor],
    ) -> Result<PartialDescriptors, SourceError>;

    /// A human-readable name for the compound, if the source knows one.
    fn display_name(&self, _id: &CompoundId) -> Option<String> {
        None
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub descriptors: Arc<DescriptorSet>,
    pub name: Option<String>,
}

/// Resolves identifiers through a primary source and ordered fallbacks.
pub struct Resolver {
    primary: Box<dyn DescriptorSource>,
    fallbacks: Vec<Box<dyn DescriptorSource>>,
    lookup_names: bool,
}

impl Resolver {
    pub fn new(primary: Box<dyn DescriptorSource>) -> Self {
        Resolver {
            primary,
            fallbacks: Vec::new(),
            lookup_names: false,
        }
    }

    /// Add a fallback to the end of the chain.
    pub fn with_fallback(mut self, source: Box<dyn DescriptorSource>) -> Self {
        self.fallbacks.push(source);
        self
    }

    pub fn with_name_lookup(mut self, enabled: bool) -> Self {
        self.lookup_names = enabled;
        self
    }

    /// Local SMILES calculator, plus PubChem when remote lookup is enabled.
    pub fn from_config(config: &ScreenConfig) -> Result<Self, DruglikenzError> {
        let mut resolver = Resolver::new(Box::new(SmilesCalculator));
        if config.remote.enabled {
            resolver = resolver
                .with_fallback(Box::new(PubChemSource::new(&config.remote)?))
                .with_name_lookup(config.remote.lookup_names);
        }
        Ok(resolver)
    }

    /// Names of the sources, in the order they are consulted.
    pub fn source_names(&self) -> Vec<&str> {
        std::iter::once(self.primary.name())
            .chain(self.fallbacks.iter().map(|s| s.name()))
            .collect()
    }

    /// Resolve the full descriptor set for one identifier.
    ///
    /// A structure the primary source cannot parse fails immediately;
    /// fallbacks are only asked for the fields still missing.
    pub fn resolve(&self, id: &CompoundId) -> Result<Resolved, ResolutionError> {
        let mut partial = match self.primary.lookup(id, &Descriptor::ALL) {
            Ok(partial) => partial,
            Err(SourceError::Unparseable(reason)) => {
                debug!(identifier = %id, %reason, "structure could not be parsed");
                return Err(ResolutionError::Parse { reason });
            }
            Err(SourceError::Unavailable(e)) => {
                warn!(source = self.primary.name(), error = %e, "primary source failed");
                PartialDescriptors::new()
            }
        };

        let mut remote_error = None;
        for fallback in &self.fallbacks {
            let missing = partial.missing_from(&Descriptor::ALL);
            if missing.is_empty() {
                break;
            }
            debug!(
                identifier = %id,
                source = fallback.name(),
                missing = ?missing,
                "backfilling descriptors"
            );
            match fallback.lookup(id, &missing) {
                Ok(found) => partial.merge(&found),
                Err(e) => {
                    warn!(
                        identifier = %id,
                        source = fallback.name(),
                        error = %e,
                        "fallback failed, trying next in chain"
                    );
                    remote_error = Some(format!("{}: {e}", fallback.name()));
                }
            }
        }

        let descriptors = DescriptorSet::from_partial(&partial).map_err(|missing| {
            ResolutionError::IncompleteDescriptors {
                missing,
                remote_error,
            }
        })?;

        let name = if self.lookup_names {
            std::iter::once(&self.primary)
                .chain(&self.fallbacks)
                .find_map(|s| s.display_name(id))
        } else {
            None
        };

        Ok(Resolved {
            descriptors: Arc::new(descriptors),
            name,
        })
    }
}
