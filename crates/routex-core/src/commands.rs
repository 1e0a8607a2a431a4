//! Built-in commands
//!
//! Small general-purpose operations that routes can use directly or register
//! by name:
//!
//! ```
//! use routex_core::commands::{Echo, ForwardTo};
//! use routex_core::Registry;
//!
//! let mut registry = Registry::new();
//! registry.register_command("echo", Echo);
//! registry.register_command("forward", ForwardTo);
//! ```

use crate::command::Command;
use crate::context::Context;
use crate::errors::ExError;
use crate::getter::{Getter, GetterExt};
use crate::params::Params;
use crate::signal::Outcome;

/// Copies every resolved parameter into the context under its own name
///
/// Unresolved parameters are skipped. Produces no result.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddToContext;

impl Command for AddToContext {
    fn execute(&self, cxt: &mut Context, params: &Params) -> Outcome {
        for name in params.names() {
            if let Some(value) = params.has(&name) {
                cxt.add(name, value);
            }
        }
        Outcome::done()
    }

    fn name(&self) -> &str {
        "add_to_context"
    }
}

/// Sends the `msg` parameter to every context logger
///
/// The optional `level` parameter becomes the log prefix (default `info`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMessage;

impl Command for LogMessage {
    fn execute(&self, cxt: &mut Context, params: &Params) -> Outcome {
        let Some(msg) = params.has("msg") else {
            return Outcome::done();
        };
        let level = match params.get_string("level", "info") {
            Ok(level) => level,
            Err(err) => return Outcome::recoverable(ExError::from(err)),
        };
        cxt.log(&level, &msg.to_string());
        Outcome::done()
    }

    fn name(&self) -> &str {
        "log_message"
    }
}

/// Reroutes to the route named by the `route` parameter
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardTo;

impl Command for ForwardTo {
    fn execute(&self, _cxt: &mut Context, params: &Params) -> Outcome {
        if let Err(err) = params.requires(&["route"]) {
            return Outcome::fatal(err.into());
        }
        match params.get_string("route", "") {
            Ok(route) => Outcome::reroute(route),
            Err(err) => Outcome::fatal(err.into()),
        }
    }

    fn name(&self) -> &str {
        "forward_to"
    }
}

/// Returns the `content` parameter as its result
///
/// An unresolved `content` yields the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Command for Echo {
    fn execute(&self, _cxt: &mut Context, params: &Params) -> Outcome {
        Outcome::ok(params.get("content", "".into()))
    }

    fn name(&self) -> &str {
        "echo"
    }
}
