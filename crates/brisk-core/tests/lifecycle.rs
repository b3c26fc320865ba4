//! Lifecycle state machine behavior across a full request span.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use brisk_core::{
    clear_current, ContextError, Destroyable, LifecycleState, RequestContext, RequestHandler,
    Router, Violation,
};
use brisk_http::Upload;
use common::{Fixture, MockRequest};

struct TrackedResource {
    destroyed: Arc<AtomicUsize>,
}

impl Destroyable for TrackedResource {
    fn destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

struct NamedHandler;

impl RequestHandler for NamedHandler {
    fn name(&self) -> &str {
        "shop.cart.CartController.checkout"
    }
}

struct FixedRouter;

impl Router for FixedRouter {
    fn url_for(&self, _action_path: &str) -> Option<String> {
        Some("/cart/checkout".to_string())
    }
}

#[test]
fn test_resolve_transitions_and_notifies() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));

    assert_eq!(ctx.state(), LifecycleState::Created);
    ctx.resolve().unwrap();

    assert_eq!(ctx.state(), LifecycleState::SessionResolved);
    assert!(ctx.is_session_resolved());
    assert!(ctx.session().is_some());
    assert!(ctx.flash().is_some());
    assert_eq!(fixture.manager.resolved_fired.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.event_names(), vec!["session_resolved"]);
    clear_current();
}

#[test]
fn test_resolve_twice_fails_with_illegal_state() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));

    ctx.resolve().unwrap();
    let err = ctx.resolve().unwrap_err();
    assert!(matches!(
        err,
        ContextError::IllegalState {
            expected: LifecycleState::Created,
            actual: LifecycleState::SessionResolved,
        }
    ));
    clear_current();
}

#[test]
fn test_dissolve_writes_cookies_and_is_idempotent() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));

    ctx.resolve().unwrap();
    ctx.dissolve().unwrap();

    assert!(ctx.is_session_dissolved());
    let cookie_names: Vec<String> = fixture
        .response
        .cookies
        .lock()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(cookie_names, vec!["brisk_flash", "brisk_session"]);
    assert_eq!(
        fixture.event_names(),
        vec![
            "session_resolved",
            "session_will_dissolve",
            "session_dissolved"
        ]
    );

    // Second call is a no-op: no new cookies, no new events.
    ctx.dissolve().unwrap();
    assert_eq!(fixture.response.cookies.lock().len(), 2);
    assert_eq!(fixture.event_names().len(), 3);
    clear_current();
}

#[test]
fn test_session_failure_leaves_context_retryable() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));
    ctx.resolve().unwrap();

    fixture.manager.fail_session.store(true, Ordering::SeqCst);
    let err = ctx.dissolve().unwrap_err();
    assert!(matches!(err, ContextError::Session(_)));
    // Transition did not happen, but observers still heard the attempt.
    assert_eq!(ctx.state(), LifecycleState::SessionResolved);
    assert_eq!(
        fixture.event_names(),
        vec![
            "session_resolved",
            "session_will_dissolve",
            "session_dissolved"
        ]
    );

    fixture.manager.fail_session.store(false, Ordering::SeqCst);
    ctx.dissolve().unwrap();
    assert!(ctx.is_session_dissolved());
    clear_current();
}

#[test]
fn test_flash_failure_is_reported_but_does_not_block_transition() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));
    ctx.resolve().unwrap();

    fixture.manager.fail_flash.store(true, Ordering::SeqCst);
    let err = ctx.dissolve().unwrap_err();
    assert!(matches!(err, ContextError::Session(_)));
    // The transition is gated on the session serialization only.
    assert!(ctx.is_session_dissolved());
    clear_current();
}

#[test]
fn test_destroy_releases_all_resources() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));
    ctx.resolve().unwrap();

    let destroyed = Arc::new(AtomicUsize::new(0));
    ctx.set_attribute("user_name", "alice".to_string());
    ctx.set_destroyable_attribute(
        "db_conn",
        TrackedResource {
            destroyed: destroyed.clone(),
        },
    );
    ctx.add_violation(Violation::new("not_empty", "name is required"));
    ctx.add_upload(Upload::new("avatar", vec![1, 2, 3]));
    ctx.set_render_arg("title", "Cart");
    ctx.set_router(Arc::new(FixedRouter));
    ctx.set_handler(Arc::new(NamedHandler));
    ctx.set_param("page", "2");

    ctx.destroy();

    assert!(ctx.is_destroyed());
    assert!(ctx.attribute::<String>("user_name").is_none());
    assert!(!ctx.has_violations());
    assert!(ctx.uploads().is_empty());
    assert!(ctx.render_arg("title").is_none());
    assert!(ctx.router().is_none());
    assert!(ctx.handler().is_none());
    assert!(ctx.session().is_none());
    assert!(ctx.flash().is_none());
    assert!(RequestContext::current().is_none());
    assert_eq!(destroyed.load(Ordering::SeqCst), 1);

    // Idempotent: the destroy hook does not run a second time.
    ctx.destroy();
    assert_eq!(destroyed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_template_path_falls_back_to_action_path() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));

    assert_eq!(ctx.template_path(), None);
    ctx.set_action_path("shop.cart.CartController.checkout");
    assert_eq!(
        ctx.template_path().as_deref(),
        Some("shop/cart/CartController/checkout")
    );
    ctx.set_template_path("custom/checkout");
    assert_eq!(ctx.template_path().as_deref(), Some("custom/checkout"));
    clear_current();
}

#[test]
fn test_flash_violation_message_survives_into_flash() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));
    ctx.resolve().unwrap();

    // Equal violations collapse to one entry.
    ctx.add_violation(Violation::new("not_empty", "name is required"));
    ctx.add_violation(Violation::new("not_empty", "name is required"));
    ctx.add_violations(vec![
        Violation::new("max_len", "name is too long"),
        Violation::new("not_empty", "name is required"),
    ]);

    assert_eq!(ctx.violations().len(), 2);
    assert_eq!(
        ctx.violation_message(", "),
        "name is required, name is too long"
    );

    ctx.flash_violation_message(", ");
    let flash = ctx.flash().unwrap();
    assert_eq!(
        flash.message("error"),
        Some("name is required, name is too long".to_string())
    );
    clear_current();
}

#[test]
fn test_flash_violation_message_noop_without_violations() {
    let fixture = Fixture::new();
    let ctx = fixture.context(MockRequest::get("/cart"));
    ctx.resolve().unwrap();

    ctx.flash_violation_message("\n");
    assert!(ctx.flash().unwrap().message("error").is_none());
    clear_current();
}
