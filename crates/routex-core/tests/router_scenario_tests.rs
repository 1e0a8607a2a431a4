#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end executor scenarios
//!
//! Each test declares a registry, runs one request through the router and
//! checks the output, the final context and the error surface.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use routex_core::commands::{Echo, ForwardTo};
use routex_core::{
    BaseContext, Context, ExError, ExErrorKind, GetterExt, Outcome, Params, Registry, Request,
    Router, RouterConfig, Value,
};

use common::{constant, failing, flaky, passthrough, router_for, router_with_loggers};

#[test]
fn test_later_step_binds_earlier_result() {
    // GIVEN a route where A stores "x" and B reads cxt:x
    let mut registry = Registry::new();
    registry
        .route("r", "chain")
        .does(constant("from A"), "x")
        .does(passthrough(), "y")
        .using("input")
        .from("cxt:x")
        .register()
        .unwrap();

    // WHEN it runs
    let exec = router_for(registry).handle_request(&Request::new("r")).unwrap();

    // THEN B received A's result and the output is B's
    assert_eq!(exec.context.has("x"), Some("from A".into()));
    assert_eq!(exec.output, Some("from A".into()));
    assert_eq!(exec.route, "r");
}

#[test]
fn test_recoverable_logs_once_per_logger_and_continues() {
    // GIVEN two loggers and a route whose first step recovers from an error
    let mut registry = Registry::new();
    registry
        .route("r", "")
        .does(flaky("partial", "cache miss"), "a")
        .does(constant("done"), "b")
        .register()
        .unwrap();
    let (router, first, second) = router_with_loggers(registry);

    // WHEN it runs
    let exec = router.handle_request(&Request::new("r")).unwrap();

    // THEN each logger saw exactly one line
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first.lines()[0].prefix, "error");
    assert!(first.lines()[0].message.contains("cache miss"));

    // AND the partial result was stored and the next step ran
    assert_eq!(exec.context.has("a"), Some("partial".into()));
    assert_eq!(exec.output, Some("done".into()));
}

#[test]
fn test_fatal_halts_before_later_steps() {
    // GIVEN a route whose second step fails fatally
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = ran.clone();
    let mut registry = Registry::new();
    registry
        .route("r", "")
        .does(constant("ok"), "a")
        .does(failing("database unavailable"), "b")
        .does(
            move |_: &mut Context, _: &Params| {
                counter.fetch_add(1, Ordering::SeqCst);
                Outcome::ok("never")
            },
            "c",
        )
        .register()
        .unwrap();

    // WHEN it runs
    let err = router_for(registry)
        .handle_request(&Request::new("r"))
        .unwrap_err();

    // THEN the third step never ran and the error is the command's own
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(err.kind(), ExErrorKind::Fatal);
    assert_eq!(err.message(), "database unavailable");
    assert_eq!(err.route(), None);
}

#[test]
fn test_fatal_error_surfaces_unchanged() {
    let original = ExError::fatal("quota exceeded").with_key("user-7");
    let returned = original.clone();
    let mut registry = Registry::new();
    registry
        .route("r", "")
        .does(move |_: &mut Context, _: &Params| Outcome::fatal(returned.clone()), "a")
        .register()
        .unwrap();

    let err = router_for(registry)
        .handle_request(&Request::new("r"))
        .unwrap_err();

    assert_eq!(err.to_string(), original.to_string());
    assert_eq!(err.key(), Some("user-7"));
}

#[test]
fn test_reroute_keeps_outputs_and_starts_target_from_first_step() {
    // GIVEN a login route that records who asked, and a page that forwards
    let mut registry = Registry::new();
    registry
        .route("GET /login", "")
        .does(passthrough(), "seen")
        .using("input")
        .from("cxt:requested")
        .register()
        .unwrap();
    registry
        .route("GET /admin", "")
        .does(constant("/admin"), "requested")
        .does(ForwardTo, "unused")
        .using("route")
        .with_default("GET /login")
        .does(constant("unreachable"), "after")
        .register()
        .unwrap();

    // WHEN the page is requested
    let exec = router_for(registry)
        .handle_request(&Request::new("GET /admin"))
        .unwrap();

    // THEN the login route ran with the value stored before the reroute
    assert_eq!(exec.route, "GET /login");
    assert_eq!(exec.hops, 1);
    assert_eq!(exec.output, Some("/admin".into()));
    assert_eq!(exec.context.has("after"), None);
}

#[test]
fn test_reroute_cycle_hits_limit() {
    // GIVEN two routes that forward to each other
    let mut registry = Registry::new();
    for (id, target) in [("ping", "pong"), ("pong", "ping")] {
        registry
            .route(id, "")
            .does(ForwardTo, "hop")
            .using("route")
            .with_default(target)
            .register()
            .unwrap();
    }

    // WHEN one is requested
    let err = router_for(registry)
        .handle_request(&Request::new("ping"))
        .unwrap_err();

    // THEN the default limit stops the cycle
    assert_eq!(err.kind(), ExErrorKind::RerouteLimitExceeded);
    assert_eq!(err.code(), "ERR_REROUTE_LIMIT_EXCEEDED");
}

#[test]
fn test_reroute_limit_allows_exactly_max_hops() {
    // GIVEN a chain hop0 -> hop1 -> hop2 -> hop3 ending in a value
    let mut registry = Registry::new();
    for (id, target) in [("hop0", "hop1"), ("hop1", "hop2"), ("hop2", "hop3")] {
        registry
            .route(id, "")
            .does(ForwardTo, "hop")
            .using("route")
            .with_default(target)
            .register()
            .unwrap();
    }
    registry
        .route("hop3", "")
        .does(constant("end"), "out")
        .register()
        .unwrap();
    let router = Router::new(
        Arc::new(registry),
        BaseContext::new(),
        RouterConfig::default().with_max_reroutes(2),
    );

    // WHEN the request needs exactly two hops
    let exec = router.handle_request(&Request::new("hop1")).unwrap();

    // THEN it completes at the limit
    assert_eq!(exec.hops, 2);
    assert_eq!(exec.route, "hop3");
    assert_eq!(exec.output, Some(Value::from("end")));

    // AND a third hop is one too many
    let err = router.handle_request(&Request::new("hop0")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::RerouteLimitExceeded);
}

#[test]
fn test_reroute_to_unknown_route_is_not_found() {
    let mut registry = Registry::new();
    registry
        .route("r", "")
        .does(|_: &mut Context, _: &Params| Outcome::reroute("ghost"), "a")
        .register()
        .unwrap();

    let err = router_for(registry)
        .handle_request(&Request::new("r"))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.route(), Some("ghost"));
}

#[test]
fn test_front_page_with_message_builder() {
    // GIVEN "GET /" building a message and flushing it
    let mut registry = Registry::new();
    registry
        .route("GET /", "Front page")
        .does(
            |_: &mut Context, _: &Params| {
                Outcome::ok(format!("Route GET / executed on {}", Utc::now().to_rfc3339()))
            },
            "msg",
        )
        .does(Echo, "out")
        .using("content")
        .from("cxt:msg")
        .with_default("Hello World")
        .register()
        .unwrap();

    // WHEN it is requested
    let exec = router_for(registry)
        .handle_request(&Request::new("GET /"))
        .unwrap();

    // THEN the flushed output is the built message
    let built = exec.context.has("msg").expect("message stored under msg");
    assert_eq!(exec.output, Some(built.clone()));
    let output = built.to_string();
    assert!(output.starts_with("Route GET / executed on "));
    assert_eq!(exec.context.get_string("out", "").unwrap(), output);
}

#[test]
fn test_front_page_falls_back_to_default() {
    // GIVEN "GET /" with only the flush step
    let mut registry = Registry::new();
    registry
        .route("GET /", "Front page")
        .does(Echo, "out")
        .using("content")
        .from("cxt:msg")
        .with_default("Hello World")
        .register()
        .unwrap();

    // WHEN it is requested
    let exec = router_for(registry)
        .handle_request(&Request::new("GET /"))
        .unwrap();

    // THEN the static default is the output
    assert_eq!(exec.output, Some(Value::from("Hello World")));
}

#[test]
fn test_unknown_route_is_not_found() {
    let err = router_for(Registry::new())
        .handle_request(&Request::new("GET /nowhere"))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.code(), "ERR_NOT_FOUND");
}

#[test]
fn test_missing_named_command_is_not_found_at_execution() {
    // GIVEN a route naming a command nobody registered
    let mut registry = Registry::new();
    registry
        .route("r", "")
        .does(constant("first"), "a")
        .does_named("ghost", "b")
        .register()
        .expect("registration does not check command names");

    // WHEN it runs
    let err = router_for(registry)
        .handle_request(&Request::new("r"))
        .unwrap_err();

    // THEN the lookup fails with the command name attached
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.key(), Some("ghost"));
}

#[test]
fn test_named_command_runs() {
    let mut registry = Registry::new();
    registry.register_command("echo", Echo);
    registry
        .route("r", "")
        .does_named("echo", "out")
        .using("content")
        .from("query:text")
        .register()
        .unwrap();

    let exec = router_for(registry)
        .handle_request(&Request::new("r").with_query("text", "hi"))
        .unwrap();
    assert_eq!(exec.output, Some("hi".into()));
}

#[test]
fn test_request_sources_bind_in_declared_order() {
    let mut registry = Registry::new();
    registry
        .route("POST /users/:id", "")
        .does(passthrough(), "out")
        .using("input")
        .from("query:id path:1 post:id")
        .register()
        .unwrap();
    let router = router_for(registry);

    let request = Request::new("POST /users/:id")
        .with_path("/users/42")
        .with_form("id", "form-id");
    let exec = router.handle_request(&request).unwrap();
    assert_eq!(exec.output, Some("42".into()));

    let exec = router
        .handle_request(&request.clone().with_query("id", "query-id"))
        .unwrap();
    assert_eq!(exec.output, Some("query-id".into()));
}

#[test]
fn test_executions_do_not_leak_into_base() {
    let mut registry = Registry::new();
    registry.route("r", "").does(constant("v"), "k").register().unwrap();
    let router = router_for(registry);

    let exec = router.handle_request(&Request::new("r")).unwrap();
    assert_eq!(exec.context.has("k"), Some("v".into()));
    assert!(router.base().context().is_empty());
}

#[test]
fn test_request_id_reported_on_execution() {
    let mut registry = Registry::new();
    registry.route("r", "").register().unwrap();

    let request = Request::new("r");
    let exec = router_for(registry).handle_request(&request).unwrap();
    assert_eq!(exec.request_id, request.correlation.request_id);
}
