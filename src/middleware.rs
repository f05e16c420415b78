//! Middleware pipeline: ordered async interceptors run before every commit.
//!
//! Each interceptor receives the candidate [`NavigationRequest`] and answers
//! with a [`NavigationAction`]:
//!
//! | Action | Effect |
//! |--------|--------|
//! | `Continue` | advance to the next interceptor |
//! | `Deny` | silently abort; history and outlet stay as they are |
//! | `Redirect` | abort and start over at another path, from the first interceptor |
//!
//! Interceptors run strictly one after another, in registration order, for
//! every attempt (not-found candidates included). An interceptor may await
//! anything before answering; the controller checks after each step whether
//! a newer navigation has started, and if so the attempt stops there.
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`RouteMiddleware`] | Full control, named, can set request values |
//! | [`middleware_fn`] | Async closure over the candidate context |
//! | [`guard_fn`] | Synchronous decision, e.g. an auth check |
//!
//! # Example
//!
//! ```
//! use spa_navigator::{guard_fn, middleware_fn, NavigationAction, Pipeline};
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.use_middleware(middleware_fn(|ctx| async move {
//!     println!("[Router] Navigating to: {}", ctx.path());
//!     NavigationAction::Continue
//! }));
//! pipeline.use_middleware(guard_fn(|request| {
//!     if request.to().starts_with("/admin") {
//!         NavigationAction::redirect("/login")
//!     } else {
//!         NavigationAction::Continue
//!     }
//! }));
//! assert_eq!(pipeline.len(), 2);
//! ```

use crate::context::{NavigationRequest, RouteContext};
use crate::{debug_log, trace_log};
use futures::future::{FutureExt, LocalBoxFuture};
use std::fmt;
use std::future::Future;

// ============================================================================
// NavigationAction
// ============================================================================

/// An interceptor's answer.
///
/// # Example
///
/// ```
/// use spa_navigator::NavigationAction;
///
/// let action = NavigationAction::deny("Not authorized");
/// assert!(action.is_deny());
///
/// let action = NavigationAction::redirect("/login");
/// assert_eq!(action.redirect_path(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    /// Allow navigation to proceed.
    Continue,

    /// Stop without committing.
    Deny {
        /// Human-readable reason, for logs.
        reason: String,
    },

    /// Abandon this attempt and navigate elsewhere.
    Redirect {
        /// Path to redirect to.
        to: String,
        /// Optional human-readable reason for redirecting.
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Create a result that allows navigation to proceed (alias for [`Continue`](Self::Continue)).
    pub fn allow() -> Self {
        Self::Continue
    }

    /// Create a result that blocks navigation with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Create a result that redirects navigation to a different path.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    /// Create a redirect result with a human-readable reason.
    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    /// Check if this action allows navigation to continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this action denies navigation.
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Check if this action redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect path, if this is a redirect action.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// RouteMiddleware trait
// ============================================================================

/// An interceptor in the navigation pipeline.
///
/// ```
/// use futures::future::{FutureExt, LocalBoxFuture};
/// use spa_navigator::{NavigationAction, NavigationRequest, RouteMiddleware};
///
/// struct RequireSession {
///     logged_in: bool,
/// }
///
/// impl RouteMiddleware for RequireSession {
///     fn handle<'a>(
///         &'a self,
///         request: &'a mut NavigationRequest,
///     ) -> LocalBoxFuture<'a, NavigationAction> {
///         async move {
///             if self.logged_in {
///                 request.set_value("session", "ok");
///                 NavigationAction::Continue
///             } else {
///                 NavigationAction::redirect("/login")
///             }
///         }
///         .boxed_local()
///     }
///
///     fn name(&self) -> &'static str {
///         "RequireSession"
///     }
/// }
/// ```
pub trait RouteMiddleware: 'static {
    /// Inspect the candidate and decide. May suspend before answering.
    fn handle<'a>(&'a self, request: &'a mut NavigationRequest)
        -> LocalBoxFuture<'a, NavigationAction>;

    /// Middleware name for debugging.
    fn name(&self) -> &'static str {
        "RouteMiddleware"
    }
}

/// Create middleware from an async closure over the candidate context.
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(RouteContext) -> Fut + 'static,
    Fut: Future<Output = NavigationAction> + 'static,
{
    FnMiddleware { f }
}

/// Middleware created via [`middleware_fn`].
pub struct FnMiddleware<F> {
    f: F,
}

impl<F, Fut> RouteMiddleware for FnMiddleware<F>
where
    F: Fn(RouteContext) -> Fut + 'static,
    Fut: Future<Output = NavigationAction> + 'static,
{
    fn handle<'a>(
        &'a self,
        request: &'a mut NavigationRequest,
    ) -> LocalBoxFuture<'a, NavigationAction> {
        (self.f)(request.context().clone()).boxed_local()
    }

    fn name(&self) -> &'static str {
        "FnMiddleware"
    }
}

/// Create a synchronous guard from a closure.
pub fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: Fn(&mut NavigationRequest) -> NavigationAction + 'static,
{
    FnGuard { f }
}

/// Guard created via [`guard_fn`].
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteMiddleware for FnGuard<F>
where
    F: Fn(&mut NavigationRequest) -> NavigationAction + 'static,
{
    fn handle<'a>(
        &'a self,
        request: &'a mut NavigationRequest,
    ) -> LocalBoxFuture<'a, NavigationAction> {
        let action = (self.f)(request);
        futures::future::ready(action).boxed_local()
    }

    fn name(&self) -> &'static str {
        "FnGuard"
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Per-attempt pipeline bookkeeping. Owned by the controller for one attempt.
#[derive(Debug)]
pub struct PipelineState {
    seq: u64,
    continued: usize,
    superseded: bool,
    request: NavigationRequest,
}

impl PipelineState {
    /// Start tracking attempt `seq`.
    pub fn new(seq: u64, request: NavigationRequest) -> Self {
        Self {
            seq,
            continued: 0,
            superseded: false,
            request,
        }
    }

    /// Attempt sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// How many interceptors answered `Continue`.
    pub fn continued(&self) -> usize {
        self.continued
    }

    /// Whether a newer attempt overtook this one mid-pipeline.
    pub fn is_superseded(&self) -> bool {
        self.superseded
    }

    /// The request, including values set by interceptors.
    pub fn request(&self) -> &NavigationRequest {
        &self.request
    }
}

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every interceptor continued.
    Completed,
    /// An interceptor denied.
    Aborted { reason: String },
    /// An interceptor redirected.
    Redirect { to: String },
    /// A newer attempt started while an interceptor was running.
    Superseded,
}

/// Ordered interceptor chain.
#[derive(Default)]
pub struct Pipeline {
    interceptors: Vec<Box<dyn RouteMiddleware>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor.
    pub fn use_middleware(&mut self, middleware: impl RouteMiddleware) {
        debug_log!("Registered middleware '{}'", middleware.name());
        self.interceptors.push(Box::new(middleware));
    }

    /// Number of interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the pipeline has no interceptors.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run every interceptor in order.
    ///
    /// `is_current` is asked after each step whether `state.seq()` is still
    /// the latest attempt.
    pub async fn run(
        &self,
        state: &mut PipelineState,
        is_current: &dyn Fn(u64) -> bool,
    ) -> PipelineOutcome {
        for interceptor in &self.interceptors {
            if !is_current(state.seq) {
                state.superseded = true;
                return PipelineOutcome::Superseded;
            }

            trace_log!(
                "Attempt #{}: middleware '{}' handling '{}'",
                state.seq,
                interceptor.name(),
                state.request.to()
            );
            let action = interceptor.handle(&mut state.request).await;

            if !is_current(state.seq) {
                debug_log!(
                    "Attempt #{} superseded while '{}' was running",
                    state.seq,
                    interceptor.name()
                );
                state.superseded = true;
                return PipelineOutcome::Superseded;
            }

            match action {
                NavigationAction::Continue => state.continued += 1,
                NavigationAction::Deny { reason } => {
                    debug_log!(
                        "Middleware '{}' denied '{}': {}",
                        interceptor.name(),
                        state.request.to(),
                        reason
                    );
                    return PipelineOutcome::Aborted { reason };
                }
                NavigationAction::Redirect { to, reason } => {
                    debug_log!(
                        "Middleware '{}' redirecting '{}' to '{}': {:?}",
                        interceptor.name(),
                        state.request.to(),
                        to,
                        reason
                    );
                    return PipelineOutcome::Redirect { to };
                }
            }
        }

        PipelineOutcome::Completed
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.interceptors.iter().map(|i| i.name()))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
