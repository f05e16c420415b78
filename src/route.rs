//! Route descriptors and compiled definitions.
//!
//! Applications describe their routes with [`Route`]:
//!
//! ```
//! use futures::future::FutureExt;
//! use spa_navigator::{Route, RouteContext, ViewFn};
//! use std::rc::Rc;
//!
//! let routes: Vec<Route<String>> = vec![
//!     Route::eager("/", |_ctx: &RouteContext| "home".to_string()).name("home"),
//!     Route::lazy("/blog/:slug", || {
//!         async {
//!             let view: ViewFn<String> =
//!                 Rc::new(|ctx: &RouteContext| format!("post {}", ctx.param("slug").unwrap()));
//!             Ok(view)
//!         }
//!         .boxed_local()
//!     })
//!     .name("blog-post"),
//! ];
//! assert_eq!(routes.len(), 2);
//! ```
//!
//! Registration compiles each descriptor into a [`RouteDefinition`], which
//! is immutable for the life of the router.

use crate::context::RouteContext;
use crate::error::{LoadError, NavigationError};
use crate::pattern::RoutePattern;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;

/// A resolved view: turns the committed context into a render node.
pub type ViewFn<V> = Rc<dyn Fn(&RouteContext) -> V>;

/// Future produced by a lazy loader.
pub type LoadFuture<V> = LocalBoxFuture<'static, Result<ViewFn<V>, LoadError>>;

/// Zero-argument async operation producing a view.
pub type LazyLoader<V> = Rc<dyn Fn() -> LoadFuture<V>>;

/// How a route obtains its view.
pub enum Resolver<V> {
    /// The view is available at startup.
    Eager(ViewFn<V>),
    /// The view's code is loaded on first navigation.
    Lazy(LazyLoader<V>),
}

impl<V> Clone for Resolver<V> {
    fn clone(&self) -> Self {
        match self {
            Resolver::Eager(view) => Resolver::Eager(Rc::clone(view)),
            Resolver::Lazy(loader) => Resolver::Lazy(Rc::clone(loader)),
        }
    }
}

impl<V> fmt::Debug for Resolver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolver::Eager(_) => f.write_str("Eager"),
            Resolver::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

/// Route descriptor, as written by the application.
pub struct Route<V> {
    path: String,
    name: Option<String>,
    resolver: Resolver<V>,
}

impl<V> Route<V> {
    /// A route whose view is available immediately.
    pub fn eager<F>(path: impl Into<String>, view: F) -> Self
    where
        F: Fn(&RouteContext) -> V + 'static,
    {
        Self {
            path: path.into(),
            name: None,
            resolver: Resolver::Eager(Rc::new(view)),
        }
    }

    /// A route whose view is produced by an async loader on first use.
    pub fn lazy<F>(path: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> LoadFuture<V> + 'static,
    {
        Self {
            path: path.into(),
            name: None,
            resolver: Resolver::Lazy(Rc::new(loader)),
        }
    }

    /// Give the route a unique name for reverse lookup and active links.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Pattern as written.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn compile(self, index: usize) -> Result<RouteDefinition<V>, NavigationError> {
        let pattern = RoutePattern::parse(&self.path)?;
        Ok(RouteDefinition {
            pattern,
            name: self.name,
            resolver: self.resolver,
            index,
        })
    }
}

impl<V> fmt::Debug for Route<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("resolver", &self.resolver)
            .finish()
    }
}

/// Identity of a route: its name when it has one, its pattern otherwise.
///
/// Keys the lazy module cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteId(String);

impl RouteId {
    /// Build an id from a name or pattern string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A compiled, immutable route.
pub struct RouteDefinition<V> {
    pattern: RoutePattern,
    name: Option<String>,
    resolver: Resolver<V>,
    index: usize,
}

impl<V> RouteDefinition<V> {
    /// Compiled pattern.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Optional unique name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Eager or lazy resolver.
    pub fn resolver(&self) -> &Resolver<V> {
        &self.resolver
    }

    /// Position in registration order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the view has to be loaded asynchronously.
    pub fn is_lazy(&self) -> bool {
        matches!(self.resolver, Resolver::Lazy(_))
    }

    /// Identity used by the lazy module cache.
    pub fn id(&self) -> RouteId {
        RouteId::new(
            self.name
                .clone()
                .unwrap_or_else(|| self.pattern.as_str().to_string()),
        )
    }
}

impl<V> fmt::Debug for RouteDefinition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("pattern", &self.pattern.as_str())
            .field("name", &self.name)
            .field("resolver", &self.resolver)
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::FutureExt;

    #[test]
    fn test_route_id_prefers_name() {
        let named = Route::eager("/blog/:slug", |_: &RouteContext| ())
            .name("blog-post")
            .compile(0)
            .unwrap();
        assert_eq!(named.id(), RouteId::new("blog-post"));

        let anonymous = Route::eager("/about", |_: &RouteContext| ())
            .compile(1)
            .unwrap();
        assert_eq!(anonymous.id().as_str(), "/about");
        assert_eq!(anonymous.index(), 1);
    }

    #[test]
    fn test_lazy_route_is_lazy() {
        let route: Route<()> = Route::lazy("/features", || {
            async { Err(LoadError::new("unused")) }.boxed_local()
        });
        let def = route.compile(0).unwrap();
        assert!(def.is_lazy());
        assert_eq!(format!("{:?}", def.resolver()), "Lazy");
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        let err = Route::eager("/users/:", |_: &RouteContext| ())
            .compile(0)
            .unwrap_err();
        assert!(matches!(err, NavigationError::InvalidPattern { .. }));
    }
}
