//! Query cache for select results
//!
//! - Keyed by table name, a snapshot of the table data and the predicate
//! - Entries are immutable and shared (`Arc`), so a hit returns the same result object
//! - Any write clears the whole cache, not individual keys
//! - Disableable via config; a disabled cache never stores anything

use std::collections::HashMap;
use std::sync::Arc;

use crate::schema::Record;

use super::matcher::Predicate;

/// Configuration for the query cache
#[derive(Debug, Clone)]
pub struct QueryCacheConfig {
    /// Whether select results are memoized.
    pub enabled: bool,
    /// Maximum number of cached results.
    pub max_entries: usize,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
        }
    }
}

impl QueryCacheConfig {
    /// Config with caching turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_entries: 0,
        }
    }
}

/// Full input key of a select
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    table: String,
    data: Vec<Record>,
    predicate: Predicate,
}

impl CacheKey {
    pub fn new(table: impl Into<String>, data: &[Record], predicate: &Predicate) -> Self {
        Self {
            table: table.into(),
            data: data.to_vec(),
            predicate: predicate.clone(),
        }
    }
}

/// Cache statistics. Passive only: they never influence caching.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Results not stored because the cache was full.
    pub evictions: u64,
    pub invalidations: u64,
}

/// Memoized select results, owned by one `TableEngine`
#[derive(Debug)]
pub struct QueryCache {
    config: QueryCacheConfig,
    entries: HashMap<CacheKey, Arc<Vec<Record>>>,
    stats: CacheStats,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(QueryCacheConfig::default())
    }
}

impl QueryCache {
    pub fn new(config: QueryCacheConfig) -> Self {
        Self {
            entries: HashMap::with_capacity(config.max_entries.min(64)),
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns the cached result for `key`, or computes, stores and returns it.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> Arc<Vec<Record>>
    where
        F: FnOnce() -> Vec<Record>,
    {
        if !self.config.enabled {
            return Arc::new(compute());
        }

        if let Some(hit) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Arc::clone(hit);
        }

        self.stats.misses += 1;
        let result = Arc::new(compute());

        if self.entries.len() >= self.config.max_entries {
            // Full: serve the result without storing it
            self.stats.evictions += 1;
        } else {
            self.entries.insert(key, Arc::clone(&result));
        }

        result
    }

    /// Drops every cached result
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
