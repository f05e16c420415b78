//! Router outlet: the mount point that shows whatever the router commits.
//!
//! An outlet subscribes when mounted and renders the current commit straight
//! away. Each later commit replaces its content. When the latest attempt is
//! rejected it shows the router's error view if one is configured. A failed
//! lazy load with no error view falls back to the not-found view when there
//! is one. Otherwise the outlet goes blank. Unless the error view handled it,
//! the error is handed to the host, either through a reporter
//! registered with [`RouterOutlet::on_error_report`] or by keeping it for
//! [`RouterOutlet::take_error`].
//!
//! Aborted and superseded attempts never reach the outlet.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{Route, RouteContext, Router, RouterOutlet};
//!
//! let router = Router::builder()
//!     .route(Route::eager("/", |_: &RouteContext| "home".to_string()))
//!     .route(Route::eager("/about", |_: &RouteContext| "about".to_string()))
//!     .build()
//!     .unwrap();
//!
//! let outlet = RouterOutlet::mount(&router);
//! assert_eq!(outlet.current(), None);
//!
//! pollster::block_on(router.navigate("/about"));
//! assert_eq!(outlet.current().as_deref(), Some("about"));
//! ```

use crate::error::NavigationError;
use crate::route::ViewFn;
use crate::router::{ErrorViewFn, Router, RouterEvent, Subscription};
use crate::{debug_log, error_log, warn_log};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type ErrorReporter = Rc<dyn Fn(&NavigationError)>;

struct OutletState<V> {
    rendered: Option<V>,
    error: Option<NavigationError>,
    renders: usize,
    reporter: Option<ErrorReporter>,
}

/// Renders committed views.
pub struct RouterOutlet<V> {
    state: Rc<RefCell<OutletState<V>>>,
    subscription: Option<Subscription>,
}

impl<V: 'static> RouterOutlet<V> {
    /// Subscribe to `router` and render its current commit, if any.
    pub fn mount(router: &Router<V>) -> Self {
        let state = Rc::new(RefCell::new(OutletState {
            rendered: None,
            error: None,
            renders: 0,
            reporter: None,
        }));

        if let Some(commit) = router.current_commit() {
            let mut s = state.borrow_mut();
            s.rendered = Some(commit.render());
            s.renders += 1;
        }

        let weak = Rc::downgrade(&state);
        let fallbacks = Fallbacks {
            error: router.error_view(),
            not_found: router.not_found_view(),
        };
        let subscription = router.subscribe(move |event| handle_event(&weak, &fallbacks, event));
        debug_log!("Outlet mounted");

        Self {
            state,
            subscription: Some(subscription),
        }
    }

    /// Send rejections here instead of keeping them for [`take_error`](Self::take_error).
    ///
    /// Not used when the router has an error view.
    pub fn on_error_report<F>(&self, reporter: F)
    where
        F: Fn(&NavigationError) + 'static,
    {
        self.state.borrow_mut().reporter = Some(Rc::new(reporter));
    }

    /// Clone of the rendered content.
    pub fn current(&self) -> Option<V>
    where
        V: Clone,
    {
        self.state.borrow().rendered.clone()
    }

    /// Borrow the rendered content.
    pub fn with_rendered<R>(&self, f: impl FnOnce(Option<&V>) -> R) -> R {
        f(self.state.borrow().rendered.as_ref())
    }

    /// Whether anything is rendered.
    pub fn has_content(&self) -> bool {
        self.state.borrow().rendered.is_some()
    }

    /// How many times the outlet rendered (commits and error views).
    pub fn render_count(&self) -> usize {
        self.state.borrow().renders
    }

    /// The last unreported rejection.
    pub fn take_error(&self) -> Option<NavigationError> {
        self.state.borrow_mut().error.take()
    }

    /// Whether the outlet still listens to its router.
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop listening. Content stays as last rendered.
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            debug_log!("Outlet unmounted");
        }
    }
}

/// Views the outlet may show instead of a commit.
struct Fallbacks<V> {
    error: Option<ErrorViewFn<V>>,
    not_found: Option<ViewFn<V>>,
}

fn handle_event<V>(
    state: &Weak<RefCell<OutletState<V>>>,
    fallbacks: &Fallbacks<V>,
    event: &RouterEvent<V>,
) {
    let Some(state) = state.upgrade() else {
        return;
    };

    match event {
        RouterEvent::Committed(commit) => {
            let view = commit.render();
            let mut s = state.borrow_mut();
            s.rendered = Some(view);
            s.error = None;
            s.renders += 1;
        }
        RouterEvent::Rejected { error, context } => {
            if let Some(error_view) = &fallbacks.error {
                let view = error_view(error);
                let mut s = state.borrow_mut();
                s.rendered = Some(view);
                s.renders += 1;
                return;
            }

            let fallback = match &fallbacks.not_found {
                Some(not_found) if error.is_load() => {
                    warn_log!("Showing not-found view for '{}': {}", context.path(), error);
                    Some(not_found(context))
                }
                _ => None,
            };
            let reporter = {
                let mut s = state.borrow_mut();
                if fallback.is_some() {
                    s.renders += 1;
                }
                s.rendered = fallback;
                s.reporter.clone()
            };
            if let Some(reporter) = reporter {
                reporter(error);
            } else {
                error_log!("Outlet has no error view: {}", error);
                state.borrow_mut().error = Some(error.clone());
            }
        }
    }
}

impl<V> fmt::Debug for RouterOutlet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("RouterOutlet")
            .field("mounted", &self.subscription.is_some())
            .field("has_content", &s.rendered.is_some())
            .field("renders", &s.renders)
            .field("error", &s.error)
            .finish()
    }
}
