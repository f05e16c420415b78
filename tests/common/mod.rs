//! Shared fixtures for integration tests.
//!
//! Views render to `String` so assertions can compare outlet content
//! directly. [`GatedLoader`] and [`Gate`] let a test decide exactly when a
//! lazy load or an interceptor finishes, which is how overlapping
//! navigations are driven deterministically on a [`LocalPool`].

#![allow(dead_code)]

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use spa_navigator::*;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

/// Route logs to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Eager view rendering a fixed label.
pub fn label(text: &'static str) -> impl Fn(&RouteContext) -> String + 'static {
    move |_: &RouteContext| text.to_string()
}

/// Boxed view rendering a fixed label.
pub fn view(text: &'static str) -> ViewFn<String> {
    Rc::new(label(text))
}

/// The demo site: home, about, blog index, blog posts, contact, and a
/// not-found page.
pub fn site_routes() -> Vec<Route<String>> {
    vec![
        Route::eager("/", label("home")).name("home"),
        Route::eager("/about", label("about")).name("about"),
        Route::eager("/blog", label("blog")).name("blog"),
        Route::eager("/blog/:slug", |ctx: &RouteContext| {
            format!("post:{}", ctx.param("slug").unwrap_or_default())
        })
        .name("blog-post"),
        Route::eager("/contact", label("contact")).name("contact"),
    ]
}

/// A router over [`site_routes`] writing to `history`.
pub fn site_router(history: &Rc<MemoryHistory>) -> Router<String> {
    Router::builder()
        .routes(site_routes())
        .not_found(|ctx: &RouteContext| format!("404:{}", ctx.path()))
        .history(history.clone())
        .build()
        .expect("site routes are valid")
}

/// Build [`RouteParams`] from pairs.
pub fn params(pairs: &[(&str, &str)]) -> RouteParams {
    pairs.iter().copied().collect()
}

/// Assert that route parameters contain expected key-value pair
pub fn assert_param_equals(params: &RouteParams, key: &str, expected: &str) {
    let value = params.get(key);
    assert!(
        value.is_some(),
        "Parameter '{}' not found in RouteParams",
        key
    );
    assert_eq!(
        value.unwrap(),
        expected,
        "Parameter '{}' has wrong value",
        key
    );
}

// ============================================================================
// Controllable async pieces
// ============================================================================

type LoadSender = oneshot::Sender<Result<ViewFn<String>, LoadError>>;

/// A lazy loader whose loads finish only when the test says so.
#[derive(Clone, Default)]
pub struct GatedLoader {
    calls: Rc<Cell<usize>>,
    pending: Rc<RefCell<Vec<LoadSender>>>,
}

impl GatedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader closure for [`Route::lazy`].
    pub fn loader(&self) -> impl Fn() -> LoadFuture<String> + 'static {
        let calls = self.calls.clone();
        let pending = self.pending.clone();
        move || {
            calls.set(calls.get() + 1);
            let (tx, rx) = oneshot::channel();
            pending.borrow_mut().push(tx);
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(LoadError::new("loader dropped")))
            }
            .boxed_local()
        }
    }

    /// How many times the loader was invoked.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Loads started but not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Finish the oldest pending load with a view rendering `text`.
    pub fn resolve(&self, text: &'static str) {
        let tx = self.pending.borrow_mut().remove(0);
        let _ = tx.send(Ok(view(text)));
    }

    /// Fail the oldest pending load.
    pub fn fail(&self, message: &str) {
        let tx = self.pending.borrow_mut().remove(0);
        let _ = tx.send(Err(LoadError::new(message)));
    }
}

/// An interceptor that holds navigations to one path until released.
#[derive(Clone, Default)]
pub struct Gate {
    pending: Rc<RefCell<Vec<oneshot::Sender<NavigationAction>>>>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Middleware that waits on this gate for `path` and continues elsewhere.
    pub fn middleware(&self, path: &'static str) -> impl RouteMiddleware {
        let pending = self.pending.clone();
        middleware_fn(move |ctx: RouteContext| -> LocalBoxFuture<'static, NavigationAction> {
            if ctx.path() == path {
                let (tx, rx) = oneshot::channel();
                pending.borrow_mut().push(tx);
                async move { rx.await.unwrap_or_else(|_| NavigationAction::deny("gate dropped")) }
                    .boxed_local()
            } else {
                futures::future::ready(NavigationAction::Continue).boxed_local()
            }
        })
    }

    /// Navigations currently held.
    pub fn waiting(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answer the oldest held navigation.
    pub fn release(&self, action: NavigationAction) {
        let tx = self.pending.borrow_mut().remove(0);
        let _ = tx.send(action);
    }
}

/// Spawn a navigation on `pool` and collect its result.
pub fn spawn_navigation<F>(pool: &LocalPool, navigation: F) -> Rc<RefCell<Option<NavigationResult>>>
where
    F: Future<Output = NavigationResult> + 'static,
{
    let slot = Rc::new(RefCell::new(None));
    let sink = slot.clone();
    pool.spawner()
        .spawn_local(async move {
            *sink.borrow_mut() = Some(navigation.await);
        })
        .expect("local pool accepts tasks");
    slot
}
