//! # spa-navigator
//!
//! Client-side navigation engine for single-page applications.
//!
//! Maps URL paths to views, runs an async middleware chain before every
//! commit, loads view code lazily with single-flight memoization, keeps a
//! history collaborator in sync, and guarantees that when navigations
//! overlap only the most recently requested one ever reaches the screen.
//!
//! The render node type `V` is opaque: a view is any `Fn(&RouteContext) -> V`.
//!
//! # Quick start
//!
//! ```
//! use futures::FutureExt;
//! use spa_navigator::{
//!     guard_fn, LoadError, NavigationAction, Route, RouteContext, Router, RouterOutlet, ViewFn,
//! };
//! use std::rc::Rc;
//!
//! let router = Router::builder()
//!     .route(Route::eager("/", |_: &RouteContext| "home".to_string()))
//!     .route(Route::eager("/blog/:slug", |ctx: &RouteContext| {
//!         format!("post {}", ctx.param("slug").unwrap_or_default())
//!     }).name("blog-post"))
//!     .route(Route::lazy("/features", || {
//!         async {
//!             let view: ViewFn<String> = Rc::new(|_: &RouteContext| "features".to_string());
//!             Ok::<_, LoadError>(view)
//!         }
//!         .boxed_local()
//!     }))
//!     .middleware(guard_fn(|request| {
//!         if request.to() == "/admin" {
//!             NavigationAction::redirect("/")
//!         } else {
//!             NavigationAction::Continue
//!         }
//!     }))
//!     .not_found(|ctx: &RouteContext| format!("404 {}", ctx.path()))
//!     .build()
//!     .unwrap();
//!
//! let outlet = RouterOutlet::mount(&router);
//! pollster::block_on(router.start());
//! assert_eq!(outlet.current().as_deref(), Some("home"));
//!
//! pollster::block_on(router.navigate("/features"));
//! assert_eq!(outlet.current().as_deref(), Some("features"));
//!
//! pollster::block_on(router.navigate("/nope"));
//! assert_eq!(outlet.current().as_deref(), Some("404 /nope"));
//! ```
//!
//! # Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`pattern`] | Path patterns: literals, `:params`, trailing wildcards |
//! | [`table`] | Ordered route table with literal-over-parameter scoring |
//! | [`middleware`] | Async interceptor pipeline |
//! | [`lazy`] | Single-flight lazy view cache |
//! | [`router`] | Navigation controller, events, subscriptions |
//! | [`outlet`] | Mount point that renders commits |
//! | [`link`] | Declarative navigation targets |
//! | [`history`] | History collaborator trait and in-memory stack |
//!
//! # Feature flags
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `log` | yes | log through the `log` crate |
//! | `tracing` | no | log through `tracing` instead |
//! | `cache` | yes | LRU cache of path resolutions |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod lazy;
pub mod link;
pub mod location;
pub mod middleware;
pub mod outlet;
pub mod params;
pub mod pattern;
pub mod route;
pub mod router;
pub mod table;

pub use config::{RouterConfig, TrailingSlash, MAX_REDIRECT_DEPTH};
pub use context::{NavigationKind, NavigationRequest, RouteContext};
pub use error::{LoadError, NavigationError, NavigationResult};
pub use history::{History, MemoryHistory, PopStateListener};
pub use lazy::{LazyCache, LoadState};
pub use link::RouterLink;
pub use location::{normalize_path, Location};
pub use middleware::{
    guard_fn, middleware_fn, FnGuard, FnMiddleware, NavigationAction, Pipeline, PipelineOutcome,
    PipelineState, RouteMiddleware,
};
pub use outlet::RouterOutlet;
pub use params::{QueryParams, RouteParams};
pub use pattern::{RoutePattern, Segment};
pub use route::{LazyLoader, LoadFuture, Resolver, Route, RouteDefinition, RouteId, ViewFn};
pub use router::{Committed, ErrorViewFn, Router, RouterBuilder, RouterEvent, Subscription};
pub use table::{RouteMatch, RouteTable};
