//! Declarative navigation targets.
//!
//! A [`RouterLink`] names where it goes, either by path or by route name, and
//! knows whether it points at the current route so hosts can style it.
//!
//! ```
//! use spa_navigator::{QueryParams, RouteContext, RouteParams, RouterLink};
//!
//! let ctx = RouteContext::new("/blog/hello", RouteParams::new(), QueryParams::new(), None);
//!
//! assert!(RouterLink::new("/blog").partial().is_active(&ctx));
//! assert!(!RouterLink::new("/blog").is_active(&ctx));
//! assert!(!RouterLink::new("/bloggers").partial().is_active(&ctx));
//! ```

use crate::context::RouteContext;
use crate::error::NavigationResult;
use crate::location::normalize_path;
use crate::router::Router;
use crate::RouteParams;
use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, PartialEq)]
enum LinkTarget {
    Path(String),
    Named { name: String, params: RouteParams },
}

/// A link to a path or a named route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterLink {
    target: LinkTarget,
    partial: bool,
}

impl RouterLink {
    /// Link to a path.
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            target: LinkTarget::Path(to.into()),
            partial: false,
        }
    }

    /// Link to a named route.
    pub fn named(name: impl Into<String>, params: RouteParams) -> Self {
        Self {
            target: LinkTarget::Named {
                name: name.into(),
                params,
            },
            partial: false,
        }
    }

    /// Also count descendants of the path as active.
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Route name, for named links.
    pub fn route_name(&self) -> Option<&str> {
        match &self.target {
            LinkTarget::Named { name, .. } => Some(name),
            LinkTarget::Path(_) => None,
        }
    }

    /// Target href, resolved against `router` for named links.
    pub fn href<V: 'static>(&self, router: &Router<V>) -> Option<String> {
        match &self.target {
            LinkTarget::Path(path) => Some(path.clone()),
            LinkTarget::Named { name, params } => router.url_for(name, params).ok(),
        }
    }

    /// Whether the link points at `current`.
    pub fn is_active(&self, current: &RouteContext) -> bool {
        match &self.target {
            LinkTarget::Named { name, .. } => current.name() == Some(name.as_str()),
            LinkTarget::Path(path) => {
                let target = path.split(['?', '#']).next().unwrap_or_default();
                let target = normalize_path(target);
                let current = current.path();
                if current == target {
                    return true;
                }
                if !self.partial {
                    return false;
                }
                target == "/"
                    || current
                        .strip_prefix(target.as_ref())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }

    /// Navigate (push) to the link target.
    pub fn activate<V: 'static>(&self, router: &Router<V>) -> LocalBoxFuture<'static, NavigationResult> {
        match &self.target {
            LinkTarget::Path(path) => router.navigate(path.clone()),
            LinkTarget::Named { name, params } => router.navigate_named(name, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QueryParams, Route};

    fn ctx(path: &str, name: Option<&str>) -> RouteContext {
        RouteContext::new(
            path,
            RouteParams::new(),
            QueryParams::new(),
            name.map(str::to_string),
        )
    }

    #[test]
    fn test_exact_path_match() {
        let link = RouterLink::new("/about/");
        assert!(link.is_active(&ctx("/about", None)));
        assert!(!link.is_active(&ctx("/about/team", None)));
    }

    #[test]
    fn test_partial_root_matches_everything() {
        let link = RouterLink::new("/").partial();
        assert!(link.is_active(&ctx("/features", None)));
    }

    #[test]
    fn test_named_link_compares_names() {
        let params: RouteParams = [("slug", "a")].into_iter().collect();
        let link = RouterLink::named("blog-post", params);
        assert!(link.is_active(&ctx("/blog/b", Some("blog-post"))));
        assert!(!link.is_active(&ctx("/blog/a", None)));
    }

    #[test]
    fn test_activate_named() {
        let router: Router<String> = Router::builder()
            .route(Route::eager("/", |_: &RouteContext| "home".to_string()))
            .route(
                Route::eager("/blog/:slug", |ctx: &RouteContext| {
                    ctx.param("slug").unwrap_or_default().to_string()
                })
                .name("blog-post"),
            )
            .build()
            .unwrap();

        let params: RouteParams = [("slug", "hello world")].into_iter().collect();
        let link = RouterLink::named("blog-post", params);
        assert_eq!(link.href(&router).as_deref(), Some("/blog/hello%20world"));

        let result = pollster::block_on(link.activate(&router));
        assert!(result.is_committed());
        assert_eq!(router.current().unwrap().param("slug"), Some("hello world"));
        assert!(link.is_active(&router.current().unwrap()));
    }
}
