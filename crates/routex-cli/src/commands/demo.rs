//! Demo registry served by the CLI
//!
//! | route          | steps                                                  |
//! |----------------|--------------------------------------------------------|
//! | `GET /`        | build a timestamped message, flush it                  |
//! | `GET /hello`   | flush `query:name`, default `Hello World`              |
//! | `GET /users`   | flush path segment 1 (`--path /users/<id>`)            |
//! | `POST /echo`   | flush the `content` form field                         |
//! | `GET /old`     | forward to `GET /`                                     |
//! | `GET /loop`    | forward to itself until the hop limit                  |
//! | `GET /fail`    | fail fatally                                           |
//! | `GET /degrade` | recover from an error, then flush a fallback           |

use chrono::Utc;
use routex_core::commands::{Echo, ForwardTo, LogMessage};
use routex_core::{Context, ExError, Outcome, Params, Registry, Result};

/// Builds `"Route GET / executed on <timestamp>"`
fn message_builder(_cxt: &mut Context, _params: &Params) -> Outcome {
    Outcome::ok(format!("Route GET / executed on {}", Utc::now().to_rfc3339()))
}

fn always_fails(_cxt: &mut Context, _params: &Params) -> Outcome {
    Outcome::fatal(ExError::fatal("demo failure"))
}

fn degrade(_cxt: &mut Context, _params: &Params) -> Outcome {
    Outcome::recoverable(ExError::recoverable("upstream slow; serving fallback"))
}

/// Declare every demo route
///
/// # Errors
///
/// Returns the first declaration error; the demo declarations are static, so
/// this only fails if they are edited into an invalid shape.
pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register_command("flush", Echo);
    registry.register_command("forward", ForwardTo);
    registry.register_command("log", LogMessage);

    registry
        .route("GET /", "Front page with a timestamped message")
        .does(message_builder, "msg")
        .does_named("flush", "out")
        .using("content")
        .from("cxt:msg")
        .with_default("Hello World")
        .register()?;

    registry
        .route("GET /hello", "Greets the `name` query field")
        .does_named("flush", "out")
        .using("content")
        .from("query:name")
        .with_default("Hello World")
        .register()?;

    registry
        .route("GET /users", "Echoes the user id path segment")
        .does_named("flush", "out")
        .using("content")
        .from("path:1")
        .with_default("anonymous")
        .register()?;

    registry
        .route("POST /echo", "Echoes the `content` form field")
        .does_named("flush", "out")
        .using("content")
        .from("post:content")
        .register()?;

    registry
        .route("GET /old", "Moved to GET /")
        .does_named("forward", "forwarded")
        .using("route")
        .with_default("GET /")
        .register()?;

    registry
        .route("GET /loop", "Forwards to itself")
        .does_named("forward", "forwarded")
        .using("route")
        .with_default("GET /loop")
        .register()?;

    registry
        .route("GET /fail", "Always fails")
        .does(always_fails, "never")
        .register()?;

    registry
        .route("GET /degrade", "Recovers from an error")
        .does(degrade, "status")
        .does_named("log", "logged")
        .using("msg")
        .with_default("serving fallback")
        .does_named("flush", "out")
        .using("content")
        .with_default("fallback")
        .register()?;

    Ok(registry)
}
