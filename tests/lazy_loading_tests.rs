//! Lazy routes: load-once, retry after failure, single-flight and
//! last-navigation-wins when a slow load overlaps a fast navigation.

mod common;

use common::*;
use futures::executor::LocalPool;
use spa_navigator::*;
use std::rc::Rc;

fn lazy_router(history: &Rc<MemoryHistory>, features: &GatedLoader) -> Router<String> {
    Router::builder()
        .routes(site_routes())
        .route(Route::lazy("/features", features.loader()).name("features"))
        .on_error(|err: &NavigationError| format!("error:{}", err))
        .history(history.clone())
        .build()
        .unwrap()
}

#[test]
fn test_lazy_route_loads_once() {
    init_logging();
    let history = Rc::new(MemoryHistory::new("/"));
    let features = GatedLoader::new();
    let router = lazy_router(&history, &features);
    let outlet = RouterOutlet::mount(&router);
    let id = RouteId::new("features");
    let mut pool = LocalPool::new();

    assert_eq!(router.lazy_cache().state(&id), LoadState::NotStarted);
    let first = spawn_navigation(&pool, router.navigate("/features"));
    pool.run_until_stalled();
    assert_eq!(router.lazy_cache().state(&id), LoadState::InFlight);
    assert!(first.borrow().is_none());

    features.resolve("features");
    pool.run_until_stalled();
    assert!(first.borrow().as_ref().unwrap().is_committed());
    assert_eq!(outlet.current().as_deref(), Some("features"));

    pollster::block_on(router.navigate("/"));
    pollster::block_on(router.navigate("/features"));
    assert_eq!(features.calls(), 1);
    assert_eq!(router.lazy_cache().state(&id), LoadState::Resolved);
}

#[test]
fn test_slow_lazy_load_loses_to_later_navigation() {
    let history = Rc::new(MemoryHistory::new("/"));
    let features = GatedLoader::new();
    let router = lazy_router(&history, &features);
    let outlet = RouterOutlet::mount(&router);
    let mut pool = LocalPool::new();
    pollster::block_on(router.start());

    let slow = spawn_navigation(&pool, router.navigate("/features"));
    pool.run_until_stalled();
    let fast = spawn_navigation(&pool, router.navigate("/about"));
    pool.run_until_stalled();
    assert_eq!(outlet.current().as_deref(), Some("about"));

    features.resolve("features");
    pool.run_until_stalled();

    assert_eq!(*slow.borrow(), Some(NavigationResult::Superseded));
    assert!(fast.borrow().as_ref().unwrap().is_committed());
    assert_eq!(outlet.current().as_deref(), Some("about"));
    assert_eq!(history.entries(), vec!["/", "/about"]);

    // The abandoned load still populated the cache.
    assert_eq!(
        router.lazy_cache().state(&RouteId::new("features")),
        LoadState::Resolved
    );
    pollster::block_on(router.navigate("/features"));
    assert_eq!(features.calls(), 1);
    assert_eq!(outlet.current().as_deref(), Some("features"));
}

#[test]
fn test_failed_load_is_retried() {
    let history = Rc::new(MemoryHistory::new("/"));
    let features = GatedLoader::new();
    let router = lazy_router(&history, &features);
    let outlet = RouterOutlet::mount(&router);
    let mut pool = LocalPool::new();
    pollster::block_on(router.start());

    let first = spawn_navigation(&pool, router.navigate("/features"));
    pool.run_until_stalled();
    features.fail("chunk failed");
    pool.run_until_stalled();

    let err = first.borrow().as_ref().unwrap().error().cloned().unwrap();
    assert!(err.is_load());
    assert_eq!(
        outlet.current().as_deref(),
        Some("error:Failed to load route 'features': chunk failed")
    );
    assert_eq!(history.entries(), vec!["/"]);
    assert!(matches!(
        router.lazy_cache().state(&RouteId::new("features")),
        LoadState::Failed(_)
    ));

    let second = spawn_navigation(&pool, router.navigate("/features"));
    pool.run_until_stalled();
    features.resolve("features");
    pool.run_until_stalled();

    assert!(second.borrow().as_ref().unwrap().is_committed());
    assert_eq!(outlet.current().as_deref(), Some("features"));
    assert_eq!(features.calls(), 2);
}

#[test]
fn test_concurrent_navigations_share_one_load() {
    let history = Rc::new(MemoryHistory::new("/"));
    let features = GatedLoader::new();
    let router = lazy_router(&history, &features);
    let mut pool = LocalPool::new();

    let first = spawn_navigation(&pool, router.navigate("/features"));
    pool.run_until_stalled();
    let second = spawn_navigation(&pool, router.navigate("/features?tab=pricing"));
    pool.run_until_stalled();
    assert_eq!(features.calls(), 1);
    assert_eq!(features.pending(), 1);

    features.resolve("features");
    pool.run_until_stalled();

    assert_eq!(*first.borrow(), Some(NavigationResult::Superseded));
    assert_eq!(
        *second.borrow(),
        Some(NavigationResult::Committed {
            path: "/features?tab=pricing".into()
        })
    );
    assert_eq!(history.current_path(), "/features?tab=pricing");
}

#[test]
fn test_superseded_failure_is_not_published() {
    let history = Rc::new(MemoryHistory::new("/"));
    let features = GatedLoader::new();
    let router = lazy_router(&history, &features);
    let outlet = RouterOutlet::mount(&router);
    let mut pool = LocalPool::new();

    let slow = spawn_navigation(&pool, router.navigate("/features"));
    pool.run_until_stalled();
    pollster::block_on(router.navigate("/contact"));

    features.fail("offline");
    pool.run_until_stalled();

    assert_eq!(*slow.borrow(), Some(NavigationResult::Superseded));
    assert_eq!(outlet.current().as_deref(), Some("contact"));
}

#[test]
fn test_unnamed_lazy_route_is_keyed_by_pattern() {
    let docs = GatedLoader::new();
    let router: Router<String> = Router::builder()
        .route(Route::lazy("/docs/*page", docs.loader()))
        .build()
        .unwrap();
    let mut pool = LocalPool::new();

    let result = spawn_navigation(&pool, router.navigate("/docs/intro"));
    pool.run_until_stalled();
    docs.resolve("docs");
    pool.run_until_stalled();

    assert!(result.borrow().as_ref().unwrap().is_committed());
    assert_eq!(
        router.lazy_cache().state(&RouteId::new("/docs/*page")),
        LoadState::Resolved
    );
}
