//! routex core - request/command execution kernel
//!
//! This crate provides:
//! - [`Context`], the per-execution key/value store with shared datasource and
//!   logger tables
//! - the [`Getter`] read interface and first-match resolution via
//!   [`get_from_first`]
//! - the route [`Registry`] and its fluent [`RouteBuilder`]
//! - the chain executor, [`Router`], driven by each command's [`Outcome`]
//!
//! A transport (HTTP server, CLI) turns its input into a [`Request`], calls
//! [`Router::handle_request`], and maps the resulting [`Execution`] or
//! [`ExError`] back onto its own wire format.
//!
//! ```
//! use std::sync::Arc;
//! use routex_core::commands::Echo;
//! use routex_core::{BaseContext, Registry, Request, Router, RouterConfig};
//!
//! let mut registry = Registry::new();
//! registry
//!     .route("GET /", "Front page")
//!     .does(Echo, "out")
//!     .using("content")
//!     .from("cxt:msg")
//!     .with_default("Hello World")
//!     .register()
//!     .unwrap();
//!
//! let router = Router::new(Arc::new(registry), BaseContext::new(), RouterConfig::default());
//! let exec = router.handle_request(&Request::new("GET /")).unwrap();
//! assert_eq!(exec.output.unwrap().to_string(), "Hello World");
//! ```

mod binding;

pub mod base;
pub mod command;
pub mod commands;
pub mod config;
pub mod context;
pub mod datasource;
pub mod errors;
pub mod getter;
pub mod logger;
pub mod logging_facility;
pub mod params;
pub mod registry;
pub mod request;
pub mod router;
pub mod signal;
pub mod source;
pub mod value;

pub use routex_core_types::schema;
pub use routex_core_types::{RequestContext, RequestId, TraceId};

// Re-export commonly used types
pub use base::BaseContext;
pub use command::Command;
pub use config::RouterConfig;
pub use context::Context;
pub use datasource::{GettableDatasource, KeyValueDatasource, MapDatasource};
pub use errors::{ExError, ExErrorKind, Result, RouteError};
pub use getter::{get_from_first, DefaultGetter, Getter, GetterExt, Origin};
pub use logger::{LogLine, LogSink, MemorySink, TracingSink};
pub use params::{ParamOrigin, Params};
pub use registry::{Binding, CommandRef, Registry, Route, RouteBuilder, Step};
pub use request::Request;
pub use router::{Completion, Execution, Router};
pub use signal::{Outcome, Signal};
pub use source::Source;
pub use value::{SharedValue, Value};
