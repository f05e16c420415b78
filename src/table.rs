//! The route table: ordered compiled routes plus the not-found pseudo-route.
//!
//! # Resolution
//!
//! [`RouteTable::resolve`] scores **every** matching candidate by the number
//! of literal segments it has and picks the highest. On equal counts a pattern
//! without a wildcard beats one with a wildcard, since a wildcard may capture
//! nothing. Registration order breaks the remaining ties. Pure first-match would let `/:page` shadow `/about`, or
//! `/blog/:slug` shadow a later `/blog/archive`:
//!
//! ```
//! use spa_navigator::{Route, RouteContext, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table
//!     .register(vec![
//!         Route::eager("/blog/:slug", |_: &RouteContext| "post"),
//!         Route::eager("/blog/archive", |_: &RouteContext| "archive"),
//!     ])
//!     .unwrap();
//!
//! let m = table.resolve("/blog/archive");
//! assert_eq!(m.route.unwrap().pattern().as_str(), "/blog/archive");
//! ```
//!
//! A miss returns a [`RouteMatch`] with `route: None`; the controller then
//! falls back to the handler installed with
//! [`set_not_found`](RouteTable::set_not_found).

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, CachedResolution, ResolutionCache};
use crate::context::RouteContext;
use crate::error::NavigationError;
use crate::location::{normalize_path, Location};
use crate::route::{Route, RouteDefinition, ViewFn};
use crate::{debug_log, info_log, trace_log, QueryParams, RouteParams};
#[cfg(feature = "cache")]
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Result of resolving one path against the table.
pub struct RouteMatch<V> {
    /// The winning route, `None` for not-found.
    pub route: Option<Rc<RouteDefinition<V>>>,
    /// Decoded path parameters.
    pub params: RouteParams,
    /// Parsed query parameters.
    pub query: QueryParams,
    /// Normalized path that was matched.
    pub path: String,
}

impl<V> RouteMatch<V> {
    /// Whether nothing matched.
    pub fn is_not_found(&self) -> bool {
        self.route.is_none()
    }

    /// Build the public read-only context for this match.
    pub fn to_context(&self) -> RouteContext {
        RouteContext::new(
            self.path.clone(),
            self.params.clone(),
            self.query.clone(),
            self.route
                .as_ref()
                .and_then(|route| route.name().map(str::to_string)),
        )
    }
}

impl<V> fmt::Debug for RouteMatch<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("route", &self.route.as_ref().map(|r| r.pattern().as_str()))
            .field("params", &self.params)
            .field("query", &self.query)
            .field("path", &self.path)
            .finish()
    }
}

/// Ordered set of compiled routes.
pub struct RouteTable<V> {
    routes: Vec<Rc<RouteDefinition<V>>>,
    names: HashMap<String, usize>,
    not_found: Option<ViewFn<V>>,
    #[cfg(feature = "cache")]
    cache: Option<RefCell<ResolutionCache>>,
}

impl<V> RouteTable<V> {
    /// Create an empty table without a resolution cache.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            names: HashMap::new(),
            not_found: None,
            #[cfg(feature = "cache")]
            cache: None,
        }
    }

    /// Create an empty table with a resolution cache of `capacity` paths.
    ///
    /// Without the `cache` feature this is the same as [`new`](Self::new).
    pub fn with_cache_capacity(capacity: usize) -> Self {
        #[cfg(not(feature = "cache"))]
        let _ = capacity;
        Self {
            #[cfg(feature = "cache")]
            cache: ResolutionCache::with_capacity(capacity).map(RefCell::new),
            ..Self::new()
        }
    }

    /// Compile and append routes in order.
    ///
    /// Fails fast on a malformed pattern or a duplicate name; on failure the
    /// table is left as it was.
    pub fn register<I>(&mut self, routes: I) -> Result<(), NavigationError>
    where
        I: IntoIterator<Item = Route<V>>,
    {
        let mut compiled = Vec::new();
        let mut names = self.names.clone();

        for route in routes {
            let index = self.routes.len() + compiled.len();
            let definition = route.compile(index)?;

            if let Some(name) = definition.name() {
                if names.insert(name.to_string(), index).is_some() {
                    return Err(NavigationError::DuplicateRouteName {
                        name: name.to_string(),
                    });
                }
            }

            if let Some(name) = definition.name() {
                info_log!(
                    "Registered route '{}' (name: '{}', {})",
                    definition.pattern(),
                    name,
                    if definition.is_lazy() { "lazy" } else { "eager" }
                );
            } else {
                info_log!("Registered route '{}'", definition.pattern());
            }
            compiled.push(Rc::new(definition));
        }

        self.routes.extend(compiled);
        self.names = names;

        #[cfg(feature = "cache")]
        if let Some(cache) = &self.cache {
            cache.borrow_mut().clear();
        }

        Ok(())
    }

    /// Install the not-found pseudo-route. It is always eager and only used
    /// when nothing else matches.
    pub fn set_not_found<F>(&mut self, handler: F)
    where
        F: Fn(&RouteContext) -> V + 'static,
    {
        self.not_found = Some(Rc::new(handler));
    }

    /// The not-found handler, if installed.
    pub fn not_found(&self) -> Option<&ViewFn<V>> {
        self.not_found.as_ref()
    }

    /// Resolve a path (query and fragment are ignored).
    pub fn resolve(&self, path: &str) -> RouteMatch<V> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = normalize_path(path);
        let (route, params) = self.lookup(&path);
        RouteMatch {
            route,
            params,
            query: QueryParams::new(),
            path: path.into_owned(),
        }
    }

    /// Resolve a parsed location, carrying its query into the match.
    pub fn resolve_location(&self, location: &Location) -> RouteMatch<V> {
        let (route, params) = self.lookup(&location.path);
        RouteMatch {
            route,
            params,
            query: location.query.clone(),
            path: location.path.clone(),
        }
    }

    fn lookup(&self, path: &str) -> (Option<Rc<RouteDefinition<V>>>, RouteParams) {
        #[cfg(feature = "cache")]
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.borrow_mut().get(path) {
                let route = hit.index.and_then(|i| self.routes.get(i).cloned());
                return (route, hit.params);
            }
        }

        let found = self.score(path);

        #[cfg(feature = "cache")]
        if let Some(cache) = &self.cache {
            let entry = match &found {
                Some((route, params)) => CachedResolution::new(Some(route.index()), params.clone()),
                None => CachedResolution::new(None, RouteParams::new()),
            };
            cache.borrow_mut().insert(path.to_string(), entry);
        }

        match found {
            Some((route, params)) => (Some(route), params),
            None => (None, RouteParams::new()),
        }
    }

    /// Pick the candidate with the most literal segments, then one without a
    /// wildcard; earlier registration wins the remaining ties.
    fn score(&self, path: &str) -> Option<(Rc<RouteDefinition<V>>, RouteParams)> {
        let mut best: Option<((usize, bool), &Rc<RouteDefinition<V>>, RouteParams)> = None;

        for route in &self.routes {
            let Some(params) = route.pattern().matches(path) else {
                continue;
            };
            let literals = route.pattern().literal_count();
            trace_log!(
                "Candidate '{}' matches '{}' ({} literal segments)",
                route.pattern(),
                path,
                literals
            );
            let rank = (literals, !route.pattern().has_wildcard());
            if best.as_ref().map_or(true, |(score, _, _)| rank > *score) {
                best = Some((rank, route, params));
            }
        }

        match best {
            Some((_, route, params)) => {
                debug_log!("Resolved '{}' to '{}'", path, route.pattern());
                Some((Rc::clone(route), params))
            }
            None => {
                debug_log!("No route matches '{}'", path);
                None
            }
        }
    }

    /// Look up a route by name.
    pub fn route_by_name(&self, name: &str) -> Option<&Rc<RouteDefinition<V>>> {
        self.names.get(name).and_then(|&i| self.routes.get(i))
    }

    /// Build the path for a named route.
    ///
    /// ```
    /// use spa_navigator::{Route, RouteContext, RouteParams, RouteTable};
    ///
    /// let mut table = RouteTable::new();
    /// table
    ///     .register(vec![Route::eager("/blog/:slug", |_: &RouteContext| ()).name("blog-post")])
    ///     .unwrap();
    ///
    /// let params: RouteParams = [("slug", "hello")].into_iter().collect();
    /// assert_eq!(table.url_for("blog-post", &params).unwrap(), "/blog/hello");
    /// assert!(table.url_for("nope", &params).is_err());
    /// ```
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Result<String, NavigationError> {
        let route = self
            .route_by_name(name)
            .ok_or_else(|| NavigationError::UnknownRouteName {
                name: name.to_string(),
            })?;
        route.pattern().build(params)
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[Rc<RouteDefinition<V>>] {
        &self.routes
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolution cache statistics, when the cache is enabled.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.borrow().stats().clone())
    }
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .field("has_not_found", &self.not_found.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(paths: &[&str]) -> RouteTable<&'static str> {
        let mut table = RouteTable::new();
        table
            .register(
                paths
                    .iter()
                    .map(|p| Route::eager(*p, |_: &RouteContext| "view")),
            )
            .unwrap();
        table
    }

    fn winner(table: &RouteTable<&'static str>, path: &str) -> Option<String> {
        table
            .resolve(path)
            .route
            .map(|r| r.pattern().as_str().to_string())
    }

    #[test]
    fn test_static_routes_match_with_empty_params() {
        let table = table(&["/", "/about", "/contact", "/blog"]);
        for path in ["/", "/about", "/contact", "/blog"] {
            let m = table.resolve(path);
            assert_eq!(m.route.unwrap().pattern().as_str(), path);
            assert!(m.params.is_empty());
        }
    }

    #[test]
    fn test_literal_outranks_param_regardless_of_order() {
        let forward = table(&["/about", "/:page"]);
        assert_eq!(winner(&forward, "/about").as_deref(), Some("/about"));

        let reversed = table(&["/:page", "/about"]);
        assert_eq!(winner(&reversed, "/about").as_deref(), Some("/about"));
        assert_eq!(winner(&reversed, "/pricing").as_deref(), Some("/:page"));
    }

    #[test]
    fn test_ties_go_to_registration_order() {
        let table = table(&["/files/:id", "/files/:name"]);
        assert_eq!(winner(&table, "/files/1").as_deref(), Some("/files/:id"));
    }

    #[test]
    fn test_param_outranks_wildcard_with_equal_literals() {
        let table = table(&["/files/*", "/files/:id"]);
        assert_eq!(winner(&table, "/files/1").as_deref(), Some("/files/:id"));
        assert_eq!(winner(&table, "/files/a/b").as_deref(), Some("/files/*"));
    }

    #[test]
    fn test_static_route_beats_empty_wildcard_registered_first() {
        let docs = table(&["/docs/*", "/docs"]);
        let m = docs.resolve("/docs");
        assert_eq!(m.route.unwrap().pattern().as_str(), "/docs");
        assert!(m.params.is_empty());

        let root = table(&["/*", "/"]);
        let m = root.resolve("/");
        assert_eq!(m.route.unwrap().pattern().as_str(), "/");
        assert!(m.params.is_empty());
        assert_eq!(winner(&root, "/anything").as_deref(), Some("/*"));
    }

    #[test]
    fn test_segment_count_mismatch_is_not_found() {
        let table = table(&["/blog/:slug"]);
        let m = table.resolve("/blog");
        assert!(m.is_not_found());
        assert_eq!(m.path, "/blog");
    }

    #[test]
    fn test_malformed_encoding_falls_through() {
        let table = table(&["/blog/:slug", "/blog/*"]);
        assert_eq!(winner(&table, "/blog/50%").as_deref(), None);
        assert_eq!(winner(&table, "/blog/ok%20go").as_deref(), Some("/blog/:slug"));
    }

    #[test]
    fn test_duplicate_name_fails_and_leaves_table_untouched() {
        let mut table: RouteTable<()> = RouteTable::new();
        table
            .register(vec![Route::eager("/", |_: &RouteContext| ()).name("home")])
            .unwrap();

        let err = table
            .register(vec![
                Route::eager("/a", |_: &RouteContext| ()),
                Route::eager("/b", |_: &RouteContext| ()).name("home"),
            ])
            .unwrap_err();

        assert_eq!(
            err,
            NavigationError::DuplicateRouteName {
                name: "home".into()
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_trailing_slash_and_query_are_ignored() {
        let table = table(&["/about"]);
        assert_eq!(winner(&table, "/about/").as_deref(), Some("/about"));
        assert_eq!(winner(&table, "/about?x=1#top").as_deref(), Some("/about"));
    }

    #[test]
    fn test_context_carries_name() {
        let mut table: RouteTable<()> = RouteTable::new();
        table
            .register(vec![Route::eager("/blog/:slug", |_: &RouteContext| ()).name("blog-post")])
            .unwrap();
        let ctx = table.resolve("/blog/hello").to_context();
        assert_eq!(ctx.name(), Some("blog-post"));
        assert_eq!(ctx.param("slug"), Some("hello"));
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_cache_serves_repeat_lookups() {
        let mut table = RouteTable::with_cache_capacity(8);
        table
            .register(vec![Route::eager("/users/:id", |_: &RouteContext| ())])
            .unwrap();

        let first = table.resolve("/users/7");
        let second = table.resolve("/users/7");
        assert_eq!(first.params, second.params);

        let stats = table.cache_stats().unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }
}
