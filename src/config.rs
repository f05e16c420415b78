//! Router configuration.
//!
//! Compile-time switches live in Cargo features (`log` / `tracing` for the
//! logging backend, `cache` for the resolution LRU). Everything that varies
//! per application is set on [`RouterConfig`] with builder methods:
//!
//! | Setting | Default | Meaning |
//! |---------|---------|---------|
//! | [`base`](RouterConfig::base) | `"/"` | Prefix the app is served under |
//! | [`trailing_slash`](RouterConfig::trailing_slash) | `Never` | Shape of URLs written to history |
//! | [`max_redirects`](RouterConfig::max_redirects) | `5` | Longest allowed redirect chain |
//! | [`cache_capacity`](RouterConfig::cache_capacity) | `256` | Resolution LRU size (`cache` feature) |
//!
//! ```
//! use spa_navigator::{RouterConfig, TrailingSlash};
//!
//! let config = RouterConfig::new()
//!     .base("/docs/")
//!     .trailing_slash(TrailingSlash::Always)
//!     .max_redirects(3);
//!
//! assert_eq!(config.base_path(), "/docs");
//! assert_eq!(config.redirect_limit(), 3);
//! ```

use crate::location::normalize_path;

/// Default maximum redirect depth, guarding against redirect loops that do
/// not revisit an exact path.
pub const MAX_REDIRECT_DEPTH: usize = 5;

/// Whether URLs written to history end in `/`.
///
/// Matching always compares trailing-slash-stripped paths; this only affects
/// the history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingSlash {
    /// `/about`
    #[default]
    Never,
    /// `/about/`
    Always,
}

/// Per-application router settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    base: String,
    trailing_slash: TrailingSlash,
    max_redirects: usize,
    cache_capacity: usize,
}

impl RouterConfig {
    const DEFAULT_CACHE_CAPACITY: usize = 256;

    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            base: "/".to_string(),
            trailing_slash: TrailingSlash::Never,
            max_redirects: MAX_REDIRECT_DEPTH,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Serve the application under `base` (e.g. `"/app"`).
    pub fn base(mut self, base: impl AsRef<str>) -> Self {
        self.base = normalize_path(base.as_ref()).into_owned();
        self
    }

    /// Choose the trailing-slash policy for history entries.
    pub fn trailing_slash(mut self, policy: TrailingSlash) -> Self {
        self.trailing_slash = policy;
        self
    }

    /// Longest redirect chain allowed before the attempt is rejected.
    pub fn max_redirects(mut self, limit: usize) -> Self {
        self.max_redirects = limit;
        self
    }

    /// Capacity of the resolution cache. Zero disables it.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Normalized base path.
    pub fn base_path(&self) -> &str {
        &self.base
    }

    /// Trailing-slash policy.
    pub fn trailing_slash_policy(&self) -> TrailingSlash {
        self.trailing_slash
    }

    /// Redirect limit.
    pub fn redirect_limit(&self) -> usize {
        self.max_redirects
    }

    /// Resolution cache capacity.
    pub fn resolution_cache_capacity(&self) -> usize {
        self.cache_capacity
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.base_path(), "/");
        assert_eq!(config.trailing_slash_policy(), TrailingSlash::Never);
        assert_eq!(config.redirect_limit(), MAX_REDIRECT_DEPTH);
    }

    #[test]
    fn test_base_is_normalized() {
        assert_eq!(RouterConfig::new().base("app/").base_path(), "/app");
        assert_eq!(RouterConfig::new().base("").base_path(), "/");
    }
}
