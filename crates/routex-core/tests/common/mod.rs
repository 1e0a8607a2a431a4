use std::sync::Arc;

use routex_core::{
    BaseContext, Context, ExError, GetterExt, MemorySink, Outcome, Params, Registry, Router,
    RouterConfig,
};

/// Build a router over `registry` with an empty base context
#[allow(dead_code)]
pub fn router_for(registry: Registry) -> Router {
    Router::new(Arc::new(registry), BaseContext::new(), RouterConfig::default())
}

/// Build a router whose base context carries two memory loggers
///
/// Returns the router and both sinks so tests can count lines per logger.
#[allow(dead_code)]
pub fn router_with_loggers(registry: Registry) -> (Router, Arc<MemorySink>, Arc<MemorySink>) {
    let first = Arc::new(MemorySink::new());
    let second = Arc::new(MemorySink::new());
    let base = BaseContext::new()
        .with_logger("first", first.clone())
        .with_logger("second", second.clone());
    let router = Router::new(Arc::new(registry), base, RouterConfig::default());
    (router, first, second)
}

/// A command that always returns `value`
#[allow(dead_code)]
pub fn constant(value: &'static str) -> impl Fn(&mut Context, &Params) -> Outcome + Send + Sync {
    move |_: &mut Context, _: &Params| Outcome::ok(value)
}

/// A command that returns its `input` parameter, or `"<unset>"`
#[allow(dead_code)]
pub fn passthrough() -> impl Fn(&mut Context, &Params) -> Outcome + Send + Sync {
    |_: &mut Context, p: &Params| match p.get_string("input", "<unset>") {
        Ok(s) => Outcome::ok(s),
        Err(err) => Outcome::fatal(err.into()),
    }
}

/// A command that fails fatally with `message`
#[allow(dead_code)]
pub fn failing(message: &'static str) -> impl Fn(&mut Context, &Params) -> Outcome + Send + Sync {
    move |_: &mut Context, _: &Params| Outcome::fatal(ExError::fatal(message))
}

/// A command that records a recoverable error but still yields `value`
#[allow(dead_code)]
pub fn flaky(value: &'static str, message: &'static str) -> impl Fn(&mut Context, &Params) -> Outcome + Send + Sync {
    move |_: &mut Context, _: &Params| Outcome::recoverable_with(value, ExError::recoverable(message))
}
