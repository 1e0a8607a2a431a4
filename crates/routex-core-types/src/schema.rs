//! Canonical schema constants for structured logging and events
//!
//! These constants keep executor, command and sink output consistent.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Execution identifiers
pub const FIELD_ROUTE: &str = "route";
pub const FIELD_STEP: &str = "step";
pub const FIELD_HOPS: &str = "hops";
pub const FIELD_TARGET: &str = "target";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_REROUTE: &str = "reroute";
pub const EVENT_RECOVERED: &str = "recovered";

// Canonical operation names used by the executor
pub const OP_EXECUTE: &str = "execute_route";
pub const OP_STEP: &str = "execute_step";
