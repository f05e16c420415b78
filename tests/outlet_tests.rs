//! Outlets and links working against a live router.

mod common;

use common::*;
use spa_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_outlet_follows_commits() {
    init_logging();
    let history = Rc::new(MemoryHistory::new("/"));
    let router = site_router(&history);
    let outlet = RouterOutlet::mount(&router);

    pollster::block_on(router.start());
    assert_eq!(outlet.current().as_deref(), Some("home"));

    pollster::block_on(router.navigate("/blog/outlets"));
    assert_eq!(outlet.current().as_deref(), Some("post:outlets"));

    pollster::block_on(router.navigate("/missing"));
    assert_eq!(outlet.current().as_deref(), Some("404:/missing"));
    assert_eq!(outlet.render_count(), 3);
}

#[test]
fn test_late_mount_renders_current_view() {
    let router = site_router(&Rc::new(MemoryHistory::new("/contact")));
    pollster::block_on(router.start());

    let outlet = RouterOutlet::mount(&router);
    assert_eq!(outlet.current().as_deref(), Some("contact"));
}

#[test]
fn test_several_outlets_share_one_router() {
    let router = site_router(&Rc::new(MemoryHistory::new("/")));
    let main = RouterOutlet::mount(&router);
    let mirror = RouterOutlet::mount(&router);
    assert_eq!(router.subscriber_count(), 2);

    pollster::block_on(router.navigate("/about"));
    assert_eq!(main.current(), mirror.current());
}

#[test]
fn test_error_view_replaces_content() {
    let router: Router<String> = Router::builder()
        .routes(site_routes())
        .on_error(|err: &NavigationError| format!("oops: {}", err))
        .build()
        .unwrap();
    let outlet = RouterOutlet::mount(&router);

    pollster::block_on(router.navigate("/about"));
    pollster::block_on(router.navigate("/nowhere"));

    assert_eq!(outlet.current().as_deref(), Some("oops: Route not found: /nowhere"));
    assert!(outlet.take_error().is_none());
    assert!(router.has_error_view());
}

#[test]
fn test_host_reporter_gets_errors_without_error_view() {
    let router: Router<String> = Router::builder().routes(site_routes()).build().unwrap();
    let outlet = RouterOutlet::mount(&router);
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = reported.clone();
    outlet.on_error_report(move |err| sink.borrow_mut().push(err.clone()));

    pollster::block_on(router.navigate("/about"));
    pollster::block_on(router.navigate("/nowhere"));

    assert!(!outlet.has_content());
    assert_eq!(
        *reported.borrow(),
        vec![NavigationError::NoMatch {
            path: "/nowhere".into()
        }]
    );
}

#[test]
fn test_dropping_outlet_unsubscribes() {
    let router = site_router(&Rc::new(MemoryHistory::new("/")));
    let outlet = RouterOutlet::mount(&router);
    assert_eq!(router.subscriber_count(), 1);

    drop(outlet);
    assert_eq!(router.subscriber_count(), 0);
    assert!(pollster::block_on(router.navigate("/about")).is_committed());
}

#[test]
fn test_outlet_outliving_router_is_inert() {
    let router = site_router(&Rc::new(MemoryHistory::new("/")));
    let outlet = RouterOutlet::mount(&router);
    pollster::block_on(router.navigate("/about"));

    drop(router);
    assert_eq!(outlet.current().as_deref(), Some("about"));
    drop(outlet);
}

#[test]
fn test_links_activate_and_track_current_route() {
    let history = Rc::new(MemoryHistory::new("/"));
    let router = site_router(&history);
    pollster::block_on(router.start());

    let blog = RouterLink::new("/blog").partial();
    let about = RouterLink::named("about", RouteParams::new());
    let post = RouterLink::named("blog-post", params(&[("slug", "links")]));

    pollster::block_on(post.activate(&router));
    let current = router.current().unwrap();
    assert!(blog.is_active(&current));
    assert!(post.is_active(&current));
    assert!(!about.is_active(&current));

    pollster::block_on(about.activate(&router));
    assert_eq!(history.entries(), vec!["/", "/blog/links", "/about"]);
    assert_eq!(about.href(&router).as_deref(), Some("/about"));
    assert!(!blog.is_active(&router.current().unwrap()));
}
