//! Route resolution caching.
//!
//! [`ResolutionCache`] memoizes the outcome of scoring every registered
//! pattern against a path, so repeated visits to the same URL skip the scan.
//! It is gated behind the `cache` feature flag and uses the [`lru`] crate.
//!
//! Entries store the winning route's registration index (or "no match") and
//! the decoded parameters. The route table is immutable once navigation
//! starts, so entries never go stale; the cache is still cleared whenever
//! routes are registered.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::cache::{CachedResolution, ResolutionCache};
//! use spa_navigator::RouteParams;
//!
//! let mut cache = ResolutionCache::with_capacity(16).unwrap();
//! cache.insert("/about".to_string(), CachedResolution::new(Some(1), RouteParams::new()));
//!
//! assert_eq!(cache.get("/about").unwrap().index, Some(1));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{debug_log, trace_log, RouteParams};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cached outcome of resolving one normalized path.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResolution {
    /// Registration index of the winning route, `None` for no match.
    pub index: Option<usize>,
    /// Decoded parameters for the winning route.
    pub params: RouteParams,
}

impl CachedResolution {
    /// Create an entry.
    pub fn new(index: Option<usize>, params: RouteParams) -> Self {
        Self { index, params }
    }
}

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: usize,
    /// Number of cache misses.
    pub misses: usize,
    /// Number of full cache invalidations (via [`ResolutionCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of path resolutions.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: LruCache<String, CachedResolution>,
    stats: CacheStats,
}

impl ResolutionCache {
    /// Create a cache holding up to `capacity` paths.
    ///
    /// Returns `None` for a zero capacity.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        let cap = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        })
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolution cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up a normalized path. Updates hit/miss stats.
    pub fn get(&mut self, path: &str) -> Option<CachedResolution> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Resolution cache hit for path: '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Resolution cache miss for path: '{}'", path);
            None
        }
    }

    /// Store a resolution.
    pub fn insert(&mut self, path: String, resolution: CachedResolution) {
        self.entries.push(path, resolution);
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
