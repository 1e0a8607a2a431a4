//! Step outcomes and control signals

use crate::errors::ExError;
use crate::value::Value;

/// Control-flow instruction returned by a command
#[derive(Debug, Clone)]
pub enum Signal {
    /// Store the result and run the next step
    Continue,
    /// End the execution successfully
    Stop,
    /// Abandon this route and run the named one from its first step
    Reroute(String),
    /// Log through every context logger, store the result, keep going
    Recoverable(ExError),
    /// End the execution and surface the error unchanged
    Fatal(ExError),
}

impl Signal {
    /// Short label used in log fields
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Continue => "continue",
            Signal::Stop => "stop",
            Signal::Reroute(_) => "reroute",
            Signal::Recoverable(_) => "recoverable",
            Signal::Fatal(_) => "fatal",
        }
    }
}

/// Result value plus signal, as produced by one command invocation
#[derive(Debug, Clone)]
pub struct Outcome {
    pub value: Option<Value>,
    pub signal: Signal,
}

impl Outcome {
    /// Normal completion with a result
    pub fn ok(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            signal: Signal::Continue,
        }
    }

    /// Normal completion without a result; nothing is stored
    pub fn done() -> Self {
        Self {
            value: None,
            signal: Signal::Continue,
        }
    }

    pub fn stop() -> Self {
        Self {
            value: None,
            signal: Signal::Stop,
        }
    }

    /// Stop, storing `value` under the step's output name first
    pub fn stop_with(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            signal: Signal::Stop,
        }
    }

    pub fn reroute(route: impl Into<String>) -> Self {
        Self {
            value: None,
            signal: Signal::Reroute(route.into()),
        }
    }

    pub fn recoverable(error: ExError) -> Self {
        Self {
            value: None,
            signal: Signal::Recoverable(error),
        }
    }

    /// Recoverable error that still produced a (partial) result
    pub fn recoverable_with(value: impl Into<Value>, error: ExError) -> Self {
        Self {
            value: Some(value.into()),
            signal: Signal::Recoverable(error),
        }
    }

    pub fn fatal(error: ExError) -> Self {
        Self {
            value: None,
            signal: Signal::Fatal(error),
        }
    }
}

impl<E: Into<ExError>> From<Result<Value, E>> for Outcome {
    /// `Ok` continues with the value, `Err` is fatal
    fn from(result: Result<Value, E>) -> Self {
        match result {
            Ok(value) => Outcome::ok(value),
            Err(err) => Outcome::fatal(err.into()),
        }
    }
}
