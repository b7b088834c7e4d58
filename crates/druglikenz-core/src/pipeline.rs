//! Batch screening: dedup, resolve once, evaluate under any selected rule.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};

use crate::compliance::{build_matrix, Failure, IngestStats, ResolvedCompound, ScreeningReport};
use crate::config::ScreenConfig;
use crate::error::DruglikenzError;
use crate::ingest::is_blank_cell;
use crate::model::CompoundId;
use crate::resolve::cache::CachedResolution;
use crate::resolve::{Resolver, RunCache};
use crate::rules::builtin::RuleCatalog;
use crate::rules::schema::RuleDefinition;

/// Shared flag that aborts a running batch between identifiers.
///
/// Stays set until [`CancelToken::clear`] is called.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Normalize and deduplicate raw cells, keeping first-seen order.
pub fn dedup_identifiers<S: AsRef<str>>(raw: &[S]) -> (Vec<CompoundId>, IngestStats) {
    let mut stats = IngestStats {
        input_rows: raw.len(),
        ..IngestStats::default()
    };
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for cell in raw {
        let cell = cell.as_ref();
        if is_blank_cell(cell) {
            stats.blank_rows += 1;
            continue;
        }
        let Some(id) = CompoundId::normalize(cell) else {
            stats.blank_rows += 1;
            continue;
        };
        if seen.insert(id.clone()) {
            ids.push(id);
        } else {
            stats.duplicates_removed += 1;
        }
    }
    stats.unique = ids.len();
    (ids, stats)
}

/// Resolution outcomes of the last completed run, in row order.
struct LoadedBatch {
    resolutions: Vec<(CompoundId, CachedResolution)>,
    stats: IngestStats,
}

/// One screening session over an input list.
///
/// Descriptor sets are cached per identifier list, so [`BatchRun::reselect`]
/// and a retry of the same list never resolve an identifier twice. Running a
/// different list starts from an empty cache.
pub struct BatchRun {
    resolver: Resolver,
    catalog: RuleCatalog,
    cache: RunCache,
    pool: ThreadPool,
    cancel: CancelToken,
    /// Deduplicated identifiers the cache was filled for.
    list: Vec<CompoundId>,
    loaded: Option<LoadedBatch>,
}

impl BatchRun {
    pub fn new(resolver: Resolver, config: &ScreenConfig) -> Result<Self, DruglikenzError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.resolver.workers)
            .thread_name(|i| format!("druglikenz-resolve-{i}"))
            .build()
            .map_err(|e| DruglikenzError::WorkerPool(e.to_string()))?;
        Ok(BatchRun {
            resolver,
            catalog: RuleCatalog::builtin()?,
            cache: RunCache::new(),
            pool,
            cancel: CancelToken::default(),
            list: Vec::new(),
            loaded: None,
        })
    }

    /// Share an existing token instead of the run's own.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Handle for aborting [`BatchRun::run`] from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &RunCache {
        &self.cache
    }

    /// Screen `raw` identifiers against the rule named `rule_name`.
    ///
    /// The rule name is checked before any resolution starts.
    pub fn run<S: AsRef<str>>(
        &mut self,
        raw: &[S],
        rule_name: &str,
    ) -> Result<ScreeningReport, DruglikenzError> {
        let rule = self.catalog.get(rule_name)?.clone();
        let (ids, stats) = dedup_identifiers(raw);
        info!(
            rows = stats.input_rows,
            blank = stats.blank_rows,
            duplicates = stats.duplicates_removed,
            unique = stats.unique,
            rule = %rule.key,
            "starting screening run"
        );
        if ids != self.list {
            if !self.list.is_empty() {
                debug!(previous = self.list.len(), "identifier list changed, clearing cache");
            }
            self.cache.clear();
            self.loaded = None;
            self.list = ids.clone();
        }

        let resolver = &self.resolver;
        let cache = &self.cache;
        let cancel = &self.cancel;
        let outcomes: Vec<Option<CachedResolution>> = self.pool.install(|| {
            ids.par_iter()
                .map(|id| {
                    if cancel.is_cancelled() {
                        None
                    } else {
                        Some(cache.get_or_resolve(id, resolver))
                    }
                })
                .collect()
        });

        if outcomes.iter().any(Option::is_none) {
            let resolved = outcomes.iter().filter(|o| o.is_some()).count();
            warn!(resolved, total = ids.len(), "screening run cancelled");
            return Err(DruglikenzError::Cancelled {
                resolved,
                total: ids.len(),
            });
        }

        let resolutions = ids.into_iter().zip(outcomes.into_iter().flatten()).collect();
        let batch = LoadedBatch { resolutions, stats };
        let report = assemble(&batch, &rule);
        self.loaded = Some(batch);
        Ok(report)
    }

    /// Re-evaluate the last run under another rule without resolving anything.
    pub fn reselect(&self, rule_name: &str) -> Result<ScreeningReport, DruglikenzError> {
        let rule = self.catalog.get(rule_name)?;
        let batch = self.loaded.as_ref().ok_or(DruglikenzError::NoBatch)?;
        Ok(assemble(batch, rule))
    }

    /// Forget the loaded batch and every cached resolution.
    pub fn reset(&mut self) {
        self.loaded = None;
        self.list.clear();
        self.cache.clear();
        self.cancel.clear();
    }
}

fn assemble(batch: &LoadedBatch, rule: &RuleDefinition) -> ScreeningReport {
    let mut compounds = Vec::new();
    let mut failures = Vec::new();

    for (id, outcome) in &batch.resolutions {
        match outcome {
            Ok(resolved) => compounds.push(ResolvedCompound {
                id: id.clone(),
                name: resolved.name.clone(),
                descriptors: Arc::clone(&resolved.descriptors),
            }),
            Err(e) => {
                warn!(identifier = %id, reason = %e, "compound excluded from matrix");
                failures.push(Failure {
                    identifier: id.clone(),
                    error: e.clone(),
                });
            }
        }
    }

    let matrix = build_matrix(&compounds, rule);
    info!(
        rule = %rule.key,
        evaluated = matrix.rows.len(),
        accepted = matrix.accepted_count(),
        failed = failures.len(),
        "screening complete"
    );
    ScreeningReport {
        matrix,
        failures,
        stats: batch.stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let raw = ["CCO", " c1ccccc1", "CCO ", "", "NaN", "CCN", "c1ccccc1"];
        let (ids, stats) = dedup_identifiers(&raw);
        let ids: Vec<&str> = ids.iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["CCO", "c1ccccc1", "CCN"]);
        assert_eq!(
            stats,
            IngestStats {
                input_rows: 7,
                blank_rows: 2,
                duplicates_removed: 2,
                unique: 3,
            }
        );
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::default();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
        token.clear();
        assert!(!other.is_cancelled());
    }

    #[test]
    fn test_unknown_rule_fails_before_resolution() {
        let config = ScreenConfig::default();
        let resolver = Resolver::new(Box::new(crate::resolve::SmilesCalculator));
        let mut run = BatchRun::new(resolver, &config).unwrap();
        let err = run.run(&["CCO"], "ghose").unwrap_err();
        assert!(matches!(err, DruglikenzError::InvalidRuleSelection { .. }));
        assert!(!run.cache().contains(&CompoundId::normalize("CCO").unwrap()));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = ScreenConfig::default();
        config.resolver.workers = 0;
        let resolver = Resolver::new(Box::new(crate::resolve::SmilesCalculator));
        match BatchRun::new(resolver, &config) {
            Err(DruglikenzError::ConfigInvalid { field, .. }) => {
                assert_eq!(field, "resolver.workers")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("zero workers accepted"),
        }
    }

    #[test]
    fn test_reselect_without_run() {
        let config = ScreenConfig::default();
        let resolver = Resolver::new(Box::new(crate::resolve::SmilesCalculator));
        let run = BatchRun::new(resolver, &config).unwrap();
        assert!(matches!(run.reselect("veber"), Err(DruglikenzError::NoBatch)));
    }
}
