//! Per-run resolution cache.
//!
//! Keyed by normalized identifier. Concurrent lookups of the same key
//! are coalesced into one resolution; failures are cached too, so a
//! compound is resolved once per identifier list. The batch clears the
//! cache when the list changes, which gives transient failures a retry.

use moka::sync::Cache;
use tracing::debug;

use crate::error::ResolutionError;
use crate::model::CompoundId;
use crate::resolve::{Resolved, Resolver};

pub type CachedResolution = Result<Resolved, ResolutionError>;

pub struct RunCache {
    entries: Cache<CompoundId, CachedResolution>,
}

impl Default for RunCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RunCache {
    /// An unbounded cache; it lives as long as one identifier list.
    pub fn new() -> Self {
        RunCache {
            entries: Cache::builder().build(),
        }
    }

    /// Return the cached resolution for `id`, resolving it first if needed.
    pub fn get_or_resolve(&self, id: &CompoundId, resolver: &Resolver) -> CachedResolution {
        let entry = self
            .entries
            .entry_by_ref(id)
            .or_insert_with(|| resolver.resolve(id));
        if !entry.is_fresh() {
            debug!(identifier = %id, "resolution cache hit");
        }
        entry.into_value()
    }

    pub fn get(&self, id: &CompoundId) -> Option<CachedResolution> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &CompoundId) -> bool {
        self.entries.contains_key(id)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}
