//! Navigation controller.
//!
//! [`Router`] owns the route table, the middleware pipeline, the lazy module
//! cache and the history collaborator, and drives every navigation attempt:
//!
//! ```text
//! Requested → Matching → Piping → Resolving → Committed
//!                ▲          │         │
//!                └─redirect─┘         ├─→ Rejected   (error, published)
//!                                     └─→ Superseded (newer attempt won)
//! ```
//!
//! Every trigger takes the next sequence number the moment it is called.
//! Only the attempt holding the latest number may commit or publish a
//! rejection; anything older finishes quietly as
//! [`NavigationResult::Superseded`]. This is "last navigation wins" without
//! cancelling in-flight work.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{History, MemoryHistory, Route, RouteContext, Router};
//! use std::rc::Rc;
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let router = Router::builder()
//!     .route(Route::eager("/", |_: &RouteContext| "home".to_string()))
//!     .route(Route::eager("/blog/:slug", |ctx: &RouteContext| {
//!         format!("post {}", ctx.param("slug").unwrap_or_default())
//!     }))
//!     .history(history.clone())
//!     .build()
//!     .unwrap();
//!
//! pollster::block_on(router.start());
//! let result = pollster::block_on(router.navigate("/blog/hello"));
//!
//! assert!(result.is_committed());
//! assert_eq!(router.current().unwrap().param("slug"), Some("hello"));
//! assert_eq!(history.current_path(), "/blog/hello");
//! ```

use crate::config::RouterConfig;
use crate::context::{NavigationKind, NavigationRequest, RouteContext};
use crate::error::{NavigationError, NavigationResult};
use crate::history::{History, MemoryHistory, PopStateListener};
use crate::lazy::LazyCache;
use crate::location::Location;
use crate::middleware::{Pipeline, PipelineOutcome, PipelineState, RouteMiddleware};
use crate::route::{Resolver, Route, ViewFn};
use crate::table::{RouteMatch, RouteTable};
use crate::{debug_log, error_log, info_log, trace_log, warn_log, RouteParams};
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Renders a rejection into a view.
pub type ErrorViewFn<V> = Rc<dyn Fn(&NavigationError) -> V>;

type Listener<V> = Rc<dyn Fn(&RouterEvent<V>)>;

// ============================================================================
// Events
// ============================================================================

/// A committed navigation: the context plus the view that renders it.
pub struct Committed<V> {
    context: RouteContext,
    href: String,
    view: ViewFn<V>,
    kind: NavigationKind,
    not_found: bool,
}

impl<V> Committed<V> {
    /// The committed context.
    pub fn context(&self) -> &RouteContext {
        &self.context
    }

    /// The history entry written for this commit, base included.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// How the navigation was committed (after redirect mapping).
    pub fn kind(&self) -> NavigationKind {
        self.kind
    }

    /// Whether the not-found handler was committed.
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    /// Call the view with the committed context.
    pub fn render(&self) -> V {
        (self.view)(&self.context)
    }
}

impl<V> fmt::Debug for Committed<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committed")
            .field("path", &self.context.path())
            .field("kind", &self.kind)
            .field("not_found", &self.not_found)
            .finish_non_exhaustive()
    }
}

/// Published to subscribers by the latest attempt only.
pub enum RouterEvent<V> {
    /// A new route is current.
    Committed(Rc<Committed<V>>),
    /// The latest attempt failed.
    Rejected {
        /// Why it failed.
        error: NavigationError,
        /// The location the attempt had matched when it failed.
        context: RouteContext,
    },
}

impl<V> Clone for RouterEvent<V> {
    fn clone(&self) -> Self {
        match self {
            RouterEvent::Committed(commit) => RouterEvent::Committed(Rc::clone(commit)),
            RouterEvent::Rejected { error, context } => RouterEvent::Rejected {
                error: error.clone(),
                context: context.clone(),
            },
        }
    }
}

impl<V> fmt::Debug for RouterEvent<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterEvent::Committed(commit) => f.debug_tuple("Committed").field(commit).finish(),
            RouterEvent::Rejected { error, context } => f
                .debug_struct("Rejected")
                .field("error", error)
                .field("path", &context.path())
                .finish(),
        }
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Configures and builds a [`Router`].
pub struct RouterBuilder<V> {
    routes: Vec<Route<V>>,
    pipeline: Pipeline,
    not_found: Option<ViewFn<V>>,
    on_error: Option<ErrorViewFn<V>>,
    config: RouterConfig,
    history: Option<Rc<dyn History>>,
}

impl<V: 'static> RouterBuilder<V> {
    fn new() -> Self {
        Self {
            routes: Vec::new(),
            pipeline: Pipeline::new(),
            not_found: None,
            on_error: None,
            config: RouterConfig::default(),
            history: None,
        }
    }

    /// Add one route.
    pub fn route(mut self, route: Route<V>) -> Self {
        self.routes.push(route);
        self
    }

    /// Add routes in order.
    pub fn routes(mut self, routes: impl IntoIterator<Item = Route<V>>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Append an interceptor to the pipeline.
    pub fn middleware(mut self, middleware: impl RouteMiddleware) -> Self {
        self.pipeline.use_middleware(middleware);
        self
    }

    /// View committed when nothing matches.
    pub fn not_found<F>(mut self, view: F) -> Self
    where
        F: Fn(&RouteContext) -> V + 'static,
    {
        self.not_found = Some(Rc::new(view));
        self
    }

    /// View rendered by outlets when the latest attempt is rejected.
    pub fn on_error<F>(mut self, view: F) -> Self
    where
        F: Fn(&NavigationError) -> V + 'static,
    {
        self.on_error = Some(Rc::new(view));
        self
    }

    /// Router configuration.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// History collaborator. Defaults to a fresh [`MemoryHistory`] at `/`.
    pub fn history<H: History + 'static>(mut self, history: Rc<H>) -> Self {
        let history: Rc<dyn History> = history;
        self.history = Some(history);
        self
    }

    /// Compile the routes. Fails on a malformed pattern or duplicate name.
    pub fn build(self) -> Result<Router<V>, NavigationError> {
        let mut table = RouteTable::with_cache_capacity(self.config.resolution_cache_capacity());
        table.register(self.routes)?;
        if let Some(view) = self.not_found {
            table.set_not_found(move |ctx: &RouteContext| view(ctx));
        }

        let history = self
            .history
            .unwrap_or_else(|| Rc::new(MemoryHistory::default()));

        info_log!(
            "Router built: {} routes, {} middleware, base '{}'",
            table.len(),
            self.pipeline.len(),
            self.config.base_path()
        );

        Ok(Router {
            inner: Rc::new(RouterInner {
                table,
                pipeline: self.pipeline,
                lazy: LazyCache::new(),
                config: self.config,
                history,
                on_error: self.on_error,
                seq: Cell::new(0),
                current: RefCell::new(None),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber: Cell::new(0),
            }),
        })
    }
}

// ============================================================================
// Router
// ============================================================================

struct RouterInner<V> {
    table: RouteTable<V>,
    pipeline: Pipeline,
    lazy: LazyCache<V>,
    config: RouterConfig,
    history: Rc<dyn History>,
    on_error: Option<ErrorViewFn<V>>,
    seq: Cell<u64>,
    current: RefCell<Option<Rc<Committed<V>>>>,
    subscribers: RefCell<Vec<(u64, Listener<V>)>>,
    next_subscriber: Cell<u64>,
}

/// Handle to the navigation controller. Cloning shares the same router.
pub struct Router<V> {
    inner: Rc<RouterInner<V>>,
}

impl<V> Clone for Router<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: 'static> Router<V> {
    /// Start configuring a router.
    pub fn builder() -> RouterBuilder<V> {
        RouterBuilder::new()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Navigate to the history's current location, replacing its entry.
    pub fn start(&self) -> LocalBoxFuture<'static, NavigationResult> {
        let initial = self.inner.history.current_path();
        info_log!("Router starting at '{}'", initial);
        self.attempt(initial, NavigationKind::Replace)
    }

    /// Route browser back/forward notifications into [`pop_state`](Self::pop_state).
    ///
    /// `spawn` receives each pop-state attempt; hand it to the host's local
    /// executor.
    pub fn attach_history_listener<S>(&self, spawn: S)
    where
        S: Fn(LocalBoxFuture<'static, ()>) + 'static,
    {
        let weak: Weak<RouterInner<V>> = Rc::downgrade(&self.inner);
        let listener: PopStateListener = Rc::new(move |path: String| {
            if let Some(inner) = weak.upgrade() {
                let router = Router { inner };
                spawn(router.pop_state(path).map(|_| ()).boxed_local());
            }
        });
        self.inner.history.on_pop_state(Some(listener));
        debug_log!("Pop-state listener attached");
    }

    /// Drop every subscriber, detach from history and supersede any attempt
    /// still in flight.
    pub fn teardown(&self) {
        self.inner.seq.set(self.inner.seq.get() + 1);
        self.inner.subscribers.borrow_mut().clear();
        self.inner.history.on_pop_state(None);
        info_log!("Router torn down");
    }

    // ------------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------------

    /// Navigate to `path`, adding a history entry on commit.
    pub fn navigate(&self, path: impl Into<String>) -> LocalBoxFuture<'static, NavigationResult> {
        self.attempt(path.into(), NavigationKind::Push)
    }

    /// Navigate to `path`, overwriting the current history entry on commit.
    pub fn replace(&self, path: impl Into<String>) -> LocalBoxFuture<'static, NavigationResult> {
        self.attempt(path.into(), NavigationKind::Replace)
    }

    /// Push the URL built from a named route.
    ///
    /// An unknown name or missing parameter fails without starting an
    /// attempt.
    pub fn navigate_named(
        &self,
        name: &str,
        params: &RouteParams,
    ) -> LocalBoxFuture<'static, NavigationResult> {
        match self.inner.table.url_for(name, params) {
            Ok(path) => self.navigate(path),
            Err(err) => {
                error_log!("Named navigation to '{}' failed: {}", name, err);
                futures::future::ready(NavigationResult::Error(err)).boxed_local()
            }
        }
    }

    /// Go back one history entry.
    ///
    /// When the history can tell us the previous entry, it goes through the
    /// pipeline like any other navigation and history only moves on commit.
    /// Otherwise the history is asked to [`traverse_back`](History::traverse_back)
    /// and the pop-state notification drives the navigation; this call then
    /// reports `Aborted`. A history that can do neither is left untouched.
    pub fn back(&self) -> LocalBoxFuture<'static, NavigationResult> {
        if let Some(previous) = self.inner.history.peek_back() {
            return self.attempt(previous, NavigationKind::Back);
        }
        let reason = if self.inner.history.traverse_back() {
            debug_log!("No known previous entry; back() deferred to pop-state");
            "back deferred to pop-state"
        } else {
            debug_log!("History cannot go back from '{}'", self.inner.history.current_path());
            "no previous history entry"
        };
        futures::future::ready(NavigationResult::Aborted {
            reason: reason.to_string(),
        })
        .boxed_local()
    }

    /// The browser already moved to `path`; render it without writing history.
    ///
    /// If the pipeline denies the move, the entry the browser landed on is
    /// replaced with the committed href so the URL matches the view. A
    /// rejection (an error) leaves the entry alone and is published as usual.
    pub fn pop_state(&self, path: impl Into<String>) -> LocalBoxFuture<'static, NavigationResult> {
        self.attempt(path.into(), NavigationKind::Pop)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Context of the last commit.
    pub fn current(&self) -> Option<RouteContext> {
        self.inner
            .current
            .borrow()
            .as_ref()
            .map(|commit| commit.context().clone())
    }

    /// The last commit, with its view.
    pub fn current_commit(&self) -> Option<Rc<Committed<V>>> {
        self.inner.current.borrow().clone()
    }

    /// Whether the committed route has this name.
    pub fn is_active(&self, name: &str) -> bool {
        self.inner
            .current
            .borrow()
            .as_ref()
            .and_then(|commit| commit.context().name().map(|n| n == name))
            .unwrap_or(false)
    }

    /// Build the path of a named route.
    pub fn url_for(&self, name: &str, params: &RouteParams) -> Result<String, NavigationError> {
        self.inner.table.url_for(name, params)
    }

    /// Resolve a URL without navigating.
    pub fn resolve(&self, raw: &str) -> RouteMatch<V> {
        let location = Location::parse(raw, &self.inner.config);
        self.inner.table.resolve_location(&location)
    }

    /// The compiled route table.
    pub fn table(&self) -> &RouteTable<V> {
        &self.inner.table
    }

    /// The lazy module cache.
    pub fn lazy_cache(&self) -> &LazyCache<V> {
        &self.inner.lazy
    }

    /// Router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// The history collaborator.
    pub fn history(&self) -> &Rc<dyn History> {
        &self.inner.history
    }

    /// Render a rejection with the configured error view.
    pub fn render_error(&self, err: &NavigationError) -> Option<V> {
        self.inner.on_error.as_ref().map(|view| view(err))
    }

    /// Whether an error view is configured.
    pub fn has_error_view(&self) -> bool {
        self.inner.on_error.is_some()
    }

    pub(crate) fn error_view(&self) -> Option<ErrorViewFn<V>> {
        self.inner.on_error.clone()
    }

    pub(crate) fn not_found_view(&self) -> Option<ViewFn<V>> {
        self.inner.table.not_found().cloned()
    }

    /// Register a listener for commits and rejections.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&RouterEvent<V>) + 'static,
    {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(listener)));
        trace_log!("Subscriber #{} registered", id);

        let weak = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
                    trace_log!("Subscriber #{} released", id);
                }
            })),
        }
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    // ------------------------------------------------------------------------
    // Attempt lifecycle
    // ------------------------------------------------------------------------

    fn attempt(&self, raw: String, kind: NavigationKind) -> LocalBoxFuture<'static, NavigationResult> {
        let seq = self.inner.seq.get() + 1;
        self.inner.seq.set(seq);
        info_log!("Navigation #{} {}: '{}'", seq, kind, raw);

        let router = self.clone();
        async move { router.run_attempt(seq, raw, kind).await }.boxed_local()
    }

    fn is_current(&self, seq: u64) -> bool {
        self.inner.seq.get() == seq
    }

    async fn run_attempt(&self, seq: u64, raw: String, kind: NavigationKind) -> NavigationResult {
        let inner = &self.inner;
        let from = self.current().map(|ctx| ctx.path().to_string());
        let mut location = Location::parse(&raw, &inner.config);
        let popped = kind == NavigationKind::Pop;
        let mut kind = kind;
        let mut chain: Vec<String> = Vec::new();

        let matched = loop {
            if !self.is_current(seq) {
                return self.superseded(seq);
            }
            chain.push(location.path.clone());

            let matched = inner.table.resolve_location(&location);
            trace_log!(
                "Navigation #{} matched '{}' to {:?}",
                seq,
                location.path,
                matched.route.as_ref().map(|r| r.pattern().as_str())
            );

            let request = NavigationRequest::new(matched.to_context(), kind)
                .with_from(from.clone())
                .with_matched(!matched.is_not_found());
            let mut state = PipelineState::new(seq, request);
            let outcome = inner
                .pipeline
                .run(&mut state, &|s| self.is_current(s))
                .await;

            match outcome {
                PipelineOutcome::Completed => break matched,
                PipelineOutcome::Superseded => return self.superseded(seq),
                PipelineOutcome::Aborted { reason } => {
                    info_log!("Navigation #{} to '{}' aborted: {}", seq, location.path, reason);
                    if popped {
                        self.restore_entry();
                    }
                    return NavigationResult::Aborted { reason };
                }
                PipelineOutcome::Redirect { to } => {
                    let next = Location::parse(&to, &inner.config);
                    if chain.contains(&next.path) {
                        chain.push(next.path);
                        return self.reject(seq, NavigationError::RedirectLoop { chain }, &matched);
                    }
                    if chain.len() > inner.config.redirect_limit() {
                        chain.push(next.path);
                        return self.reject(
                            seq,
                            NavigationError::RedirectLimitExceeded {
                                limit: inner.config.redirect_limit(),
                                chain,
                            },
                            &matched,
                        );
                    }
                    kind = redirect_kind(kind);
                    debug_log!(
                        "Navigation #{} redirected '{}' -> '{}' ({})",
                        seq,
                        location.path,
                        next.path,
                        kind
                    );
                    location = next;
                }
            }
        };

        let (view, not_found) = match &matched.route {
            Some(route) => match route.resolver() {
                Resolver::Eager(view) => (Rc::clone(view), false),
                Resolver::Lazy(loader) => match inner.lazy.load(&route.id(), loader).await {
                    Ok(view) => (view, false),
                    Err(err) => {
                        if !self.is_current(seq) {
                            return self.superseded(seq);
                        }
                        return self.reject(
                            seq,
                            NavigationError::Load {
                                route: route.id().to_string(),
                                message: err.message().to_string(),
                            },
                            &matched,
                        );
                    }
                },
            },
            None => match inner.table.not_found() {
                Some(view) => (Rc::clone(view), true),
                None => {
                    return self.reject(
                        seq,
                        NavigationError::NoMatch {
                            path: location.path.clone(),
                        },
                        &matched,
                    )
                }
            },
        };

        if !self.is_current(seq) {
            return self.superseded(seq);
        }

        self.commit(&location, &matched, view, kind, not_found)
    }

    fn commit(
        &self,
        location: &Location,
        matched: &RouteMatch<V>,
        view: ViewFn<V>,
        kind: NavigationKind,
        not_found: bool,
    ) -> NavigationResult {
        let inner = &self.inner;
        let href = location.href(&inner.config);
        match kind {
            NavigationKind::Push => inner.history.push(&href),
            NavigationKind::Replace => inner.history.replace(&href),
            NavigationKind::Back => inner.history.back(),
            NavigationKind::Pop => {}
        }

        let commit = Rc::new(Committed {
            context: matched.to_context(),
            href,
            view,
            kind,
            not_found,
        });
        *inner.current.borrow_mut() = Some(Rc::clone(&commit));

        let path = location.display_path();
        if not_found {
            warn_log!("Route not found: '{}', showing not-found view", path);
        } else {
            info_log!("Navigation committed: '{}' ({})", path, kind);
        }

        self.publish(&RouterEvent::Committed(commit));

        if not_found {
            NavigationResult::NotFound { path }
        } else {
            NavigationResult::Committed { path }
        }
    }

    /// The browser moved before the pipeline denied the move; point the
    /// entry back at what is on screen.
    fn restore_entry(&self) {
        let href = self
            .inner
            .current
            .borrow()
            .as_ref()
            .map(|commit| commit.href.clone());
        if let Some(href) = href {
            debug_log!("Restoring history entry to '{}' after denied pop-state", href);
            self.inner.history.replace(&href);
        }
    }

    fn reject(&self, seq: u64, err: NavigationError, matched: &RouteMatch<V>) -> NavigationResult {
        if !self.is_current(seq) {
            return self.superseded(seq);
        }
        error_log!("Navigation #{} rejected: {}", seq, err);
        self.publish(&RouterEvent::Rejected {
            error: err.clone(),
            context: matched.to_context(),
        });
        NavigationResult::Error(err)
    }

    fn superseded(&self, seq: u64) -> NavigationResult {
        debug_log!("Navigation #{} superseded by #{}", seq, self.inner.seq.get());
        NavigationResult::Superseded
    }

    fn publish(&self, event: &RouterEvent<V>) {
        // Listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<Listener<V>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

/// History behaviour of the attempt a redirect starts.
fn redirect_kind(kind: NavigationKind) -> NavigationKind {
    match kind {
        NavigationKind::Push | NavigationKind::Back => NavigationKind::Push,
        NavigationKind::Replace | NavigationKind::Pop => NavigationKind::Replace,
    }
}

impl<V> fmt::Debug for Router<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.table.len())
            .field("pipeline", &self.inner.pipeline)
            .field("seq", &self.inner.seq.get())
            .field(
                "current",
                &self
                    .inner
                    .current
                    .borrow()
                    .as_ref()
                    .map(|c| c.context().path().to_string()),
            )
            .finish_non_exhaustive()
    }
}
