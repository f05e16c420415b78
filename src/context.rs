//! Read-only navigation context handed to middleware and views.
//!
//! - [`RouteContext`]: `{ path, params, query, name }` for one candidate or
//!   committed navigation. Cheap to clone; never mutated after creation.
//! - [`NavigationRequest`]: what an interceptor sees: the candidate context,
//!   where the navigation came from, how it was triggered, and a scratch map
//!   of values earlier interceptors left for later ones.
//! - [`NavigationKind`]: push, replace, back, or a browser pop-state.

use crate::{QueryParams, RouteParams};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// How a navigation was initiated. Decides the history side effect on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Add a history entry.
    Push,
    /// Overwrite the current history entry.
    Replace,
    /// Step back one entry.
    Back,
    /// The browser already moved (back/forward button); history is left alone.
    Pop,
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NavigationKind::Push => "push",
            NavigationKind::Replace => "replace",
            NavigationKind::Back => "back",
            NavigationKind::Pop => "pop",
        };
        f.write_str(label)
    }
}

#[derive(Debug, PartialEq)]
struct ContextInner {
    path: String,
    params: RouteParams,
    query: QueryParams,
    name: Option<String>,
}

/// Public, read-only view of a navigation.
///
/// # Example
///
/// ```
/// use spa_navigator::{QueryParams, RouteContext, RouteParams};
///
/// let params: RouteParams = [("slug", "hello")].into_iter().collect();
/// let ctx = RouteContext::new(
///     "/blog/hello",
///     params,
///     QueryParams::from_query_string("ref=home"),
///     Some("blog-post".to_string()),
/// );
///
/// assert_eq!(ctx.param("slug"), Some("hello"));
/// assert_eq!(ctx.query_value("ref"), Some("home"));
/// assert_eq!(ctx.name(), Some("blog-post"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteContext {
    inner: Rc<ContextInner>,
}

impl RouteContext {
    /// Build a context. The router does this once per matched candidate.
    pub fn new(
        path: impl Into<String>,
        params: RouteParams,
        query: QueryParams,
        name: Option<String>,
    ) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                path: path.into(),
                params,
                query,
                name,
            }),
        }
    }

    /// Normalized path that was matched.
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Decoded path parameters.
    pub fn params(&self) -> &RouteParams {
        &self.inner.params
    }

    /// Parsed query parameters.
    pub fn query(&self) -> &QueryParams {
        &self.inner.query
    }

    /// Name of the matched route, `None` for unnamed routes and not-found.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Shorthand for `params().get(key)`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.inner.params.get(key).map(String::as_str)
    }

    /// Shorthand for `query().get(key)`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.inner.query.get(key).map(String::as_str)
    }
}

/// A navigation candidate as seen by middleware.
pub struct NavigationRequest {
    context: RouteContext,
    from: Option<String>,
    kind: NavigationKind,
    matched: bool,
    values: HashMap<String, String>,
}

impl NavigationRequest {
    /// Create a request for a candidate context.
    pub fn new(context: RouteContext, kind: NavigationKind) -> Self {
        Self {
            context,
            from: None,
            kind,
            matched: true,
            values: HashMap::new(),
        }
    }

    /// Record the path we're navigating from.
    pub fn with_from(mut self, from: Option<String>) -> Self {
        self.from = from;
        self
    }

    pub(crate) fn with_matched(mut self, matched: bool) -> Self {
        self.matched = matched;
        self
    }

    /// The candidate context.
    pub fn context(&self) -> &RouteContext {
        &self.context
    }

    /// The path being navigated to.
    pub fn to(&self) -> &str {
        self.context.path()
    }

    /// The currently committed path, if any.
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// How the navigation was triggered.
    pub fn kind(&self) -> NavigationKind {
        self.kind
    }

    /// `false` when the candidate is the not-found pseudo-route.
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Leave a value for later interceptors in this attempt.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Read a value set by an earlier interceptor.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl fmt::Debug for NavigationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationRequest")
            .field("from", &self.from)
            .field("to", &self.context.path())
            .field("kind", &self.kind)
            .field("matched", &self.matched)
            .finish_non_exhaustive()
    }
}
