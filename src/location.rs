//! Location parsing and path normalization.
//!
//! Every URL entering the router goes through [`Location::parse`], which:
//!
//! 1. drops the `#fragment`,
//! 2. splits off and parses the `?query`,
//! 3. strips the configured [`base`](crate::RouterConfig::base) prefix,
//! 4. normalizes the remaining path with [`normalize_path`].
//!
//! The reverse direction, [`Location::href`], produces the string written to
//! the history collaborator, honouring the base and the trailing-slash policy.
//!
//! # Normalization rules
//!
//! 1. **Empty paths** are normalized to `"/"` (root)
//! 2. **Leading slashes** are ensured (`"blog"` → `"/blog"`)
//! 3. **Trailing slashes** are removed, except for root
//! 4. **Repeated slashes** collapse (`"//blog//post"` → `"/blog/post"`)

use crate::config::{RouterConfig, TrailingSlash};
use crate::QueryParams;
use std::borrow::Cow;

/// Normalize a path for consistent comparison
///
/// Returns `Cow<str>` to avoid allocation when the path is already normalized.
///
/// # Examples
///
/// ```
/// use spa_navigator::normalize_path;
///
/// assert_eq!(normalize_path("/blog"), "/blog");
/// assert_eq!(normalize_path("blog"), "/blog");
/// assert_eq!(normalize_path("/blog/"), "/blog");
/// assert_eq!(normalize_path("//blog//post"), "/blog/post");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &'_ str) -> Cow<'_, str> {
    if path == "/" {
        return Cow::Borrowed(path);
    }

    let already = path.starts_with('/') && !path.ends_with('/') && !path.contains("//");
    if already {
        return Cow::Borrowed(path);
    }

    let joined = split_segments(path).collect::<Vec<_>>().join("/");
    Cow::Owned(format!("/{joined}"))
}

/// Iterate over the non-empty `/`-delimited segments of a path.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A parsed navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Normalized path with the base removed.
    pub path: String,
    /// Raw query string without the leading `?` (empty if absent).
    pub raw_query: String,
    /// Parsed query parameters.
    pub query: QueryParams,
}

impl Location {
    /// Parse a raw URL (path, optional query, optional fragment).
    ///
    /// ```
    /// use spa_navigator::{Location, RouterConfig};
    ///
    /// let config = RouterConfig::new().base("/app");
    /// let loc = Location::parse("/app/blog/?page=2#top", &config);
    /// assert_eq!(loc.path, "/blog");
    /// assert_eq!(loc.query.get_as::<u32>("page"), Some(2));
    /// ```
    pub fn parse(raw: &str, config: &RouterConfig) -> Self {
        let without_fragment = raw.split_once('#').map_or(raw, |(before, _)| before);
        let (path, raw_query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        let stripped = strip_base(path, config.base_path());

        Self {
            path: normalize_path(stripped).into_owned(),
            raw_query: raw_query.to_string(),
            query: QueryParams::from_query_string(raw_query),
        }
    }

    /// The string to hand to the history collaborator.
    ///
    /// ```
    /// use spa_navigator::{Location, RouterConfig, TrailingSlash};
    ///
    /// let config = RouterConfig::new().base("/app").trailing_slash(TrailingSlash::Always);
    /// let loc = Location::parse("/app/about?x=1", &config);
    /// assert_eq!(loc.href(&config), "/app/about/?x=1");
    /// ```
    pub fn href(&self, config: &RouterConfig) -> String {
        let mut href = String::new();
        let base = config.base_path();
        if base != "/" {
            href.push_str(base);
        }
        if self.path != "/" || href.is_empty() {
            href.push_str(&self.path);
        }
        if config.trailing_slash_policy() == TrailingSlash::Always && !href.ends_with('/') {
            href.push('/');
        }
        if !self.raw_query.is_empty() {
            href.push('?');
            href.push_str(&self.raw_query);
        }
        href
    }

    /// Path plus query, without the base. Used in logs and results.
    pub fn display_path(&self) -> String {
        if self.raw_query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.raw_query)
        }
    }
}

/// Remove `base` from the front of `path` when `path` lives under it.
fn strip_base<'a>(path: &'a str, base: &str) -> &'a str {
    if base == "/" {
        return path;
    }
    match path.strip_prefix(base) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_borrows_when_clean() {
        assert!(matches!(normalize_path("/blog/post"), Cow::Borrowed(_)));
        assert!(matches!(normalize_path("/"), Cow::Borrowed(_)));
        assert!(matches!(normalize_path("blog"), Cow::Owned(_)));
    }

    #[test]
    fn test_normalize_root_variants() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_parse_drops_fragment_and_splits_query() {
        let config = RouterConfig::default();
        let loc = Location::parse("/blog?tag=a&tag=b#comments", &config);
        assert_eq!(loc.path, "/blog");
        assert_eq!(loc.raw_query, "tag=a&tag=b");
        assert_eq!(loc.query.get_all("tag").unwrap().len(), 2);
    }

    #[test]
    fn test_base_only_strips_whole_segments() {
        let config = RouterConfig::new().base("/app");
        assert_eq!(Location::parse("/app", &config).path, "/");
        assert_eq!(Location::parse("/app/", &config).path, "/");
        assert_eq!(Location::parse("/application", &config).path, "/application");
    }

    #[test]
    fn test_href_round_trip_default_config() {
        let config = RouterConfig::default();
        let loc = Location::parse("/contact/?ref=nav", &config);
        assert_eq!(loc.href(&config), "/contact?ref=nav");
        assert_eq!(Location::parse("/", &config).href(&config), "/");
    }

    #[test]
    fn test_href_with_base_root() {
        let config = RouterConfig::new().base("/app/");
        let loc = Location::parse("/app", &config);
        assert_eq!(loc.href(&config), "/app");
    }
}
