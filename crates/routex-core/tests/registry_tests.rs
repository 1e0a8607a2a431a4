#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use routex_core::{CommandRef, Registry, Request, RouteError};

use common::{constant, router_for};

#[test]
fn test_reregistering_route_overwrites() {
    // GIVEN a route registered twice under the same id
    let mut registry = Registry::new();
    registry
        .route("GET /", "first")
        .does(constant("old"), "out")
        .register()
        .unwrap();
    registry
        .route("GET /", "second")
        .does(constant("new"), "out")
        .register()
        .unwrap();

    // THEN only the second declaration remains
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.describe("GET /"), Some("second"));

    // AND executing it runs the second declaration
    let exec = router_for(registry)
        .handle_request(&Request::new("GET /"))
        .unwrap();
    assert_eq!(exec.output, Some("new".into()));
}

#[test]
fn test_route_names_sorted() {
    let mut registry = Registry::new();
    for id in ["POST /b", "GET /a", "GET /"] {
        registry.route(id, "").register().unwrap();
    }
    assert_eq!(registry.route_names(), vec!["GET /", "GET /a", "POST /b"]);
    assert!(registry.contains("GET /a"));
    assert!(!registry.contains("DELETE /a"));
}

#[test]
fn test_failed_declaration_registers_nothing() {
    let mut registry = Registry::new();
    let err = registry
        .route("r", "")
        .does(constant("x"), "a")
        .with_default("orphan")
        .register()
        .unwrap_err();

    assert!(matches!(err, RouteError::InvalidDeclaration { ref route, .. } if route == "r"));
    assert!(registry.get("r").is_none());
}

#[test]
fn test_included_steps_are_a_snapshot() {
    // GIVEN a page including a shared prelude
    let mut registry = Registry::new();
    registry
        .route("prelude", "")
        .does(constant("v1"), "banner")
        .register()
        .unwrap();
    registry
        .route("page", "")
        .includes("prelude")
        .register()
        .unwrap();

    // WHEN the prelude is redefined afterwards
    registry
        .route("prelude", "")
        .does(constant("v2"), "banner")
        .register()
        .unwrap();

    // THEN the page keeps the steps it copied
    let exec = router_for(registry)
        .handle_request(&Request::new("page"))
        .unwrap();
    assert_eq!(exec.output, Some("v1".into()));
}

#[test]
fn test_named_steps_keep_their_reference() {
    let mut registry = Registry::new();
    registry
        .route("r", "")
        .does_named("render", "html")
        .register()
        .unwrap();

    let route = registry.get("r").unwrap();
    assert!(matches!(&route.steps[0].command, CommandRef::Named(name) if name == "render"));
    assert_eq!(route.steps[0].command.label(), "render");
}
