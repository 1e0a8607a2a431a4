//! Structured logging facility for routex
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The executor emits one start event and exactly one end (or end_error)
//! event per execution, plus `reroute` and `recovered` events in between.
//! Context log sinks (`Context::log`) are a separate, host-chosen channel;
//! [`TracingSink`](crate::TracingSink) bridges the two.
//!
//! # Usage
//!
//! ```rust
//! use routex_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
