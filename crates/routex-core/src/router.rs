//! Chain executor
//!
//! [`Router::handle_request`] resolves the request's route and runs its steps
//! in order against a fresh copy of the base context. Each step's bindings
//! are resolved into a [`Params`](crate::Params) view, the command is invoked,
//! and its [`Signal`] decides what happens next:
//!
//! | signal        | stores result | next                                   |
//! |---------------|---------------|----------------------------------------|
//! | `Continue`    | yes           | next step                              |
//! | `Recoverable` | yes           | log to every context logger, next step |
//! | `Stop`        | yes           | finish successfully                    |
//! | `Reroute(id)` | yes           | first step of `id`, same context       |
//! | `Fatal(err)`  | no            | return `err` unchanged                 |
//!
//! A "result" is only stored when the outcome carries a value.

use std::sync::Arc;
use std::time::Instant;

use routex_core_types::schema::{EVENT_RECOVERED, EVENT_REROUTE, OP_EXECUTE, OP_STEP};
use routex_core_types::RequestId;

use crate::base::BaseContext;
use crate::binding::{bind_params, Scope};
use crate::config::RouterConfig;
use crate::context::Context;
use crate::errors::{ExError, RouteError};
use crate::registry::{Registry, Step};
use crate::request::Request;
use crate::signal::{Outcome, Signal};
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};

/// How an execution ended, without its context
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub request_id: RequestId,
    /// The route that was running when the execution ended
    pub route: String,
    /// Reroutes taken
    pub hops: usize,
    pub output: Option<Value>,
}

/// A finished execution, handed back to the transport
#[derive(Debug, Clone)]
pub struct Execution {
    pub request_id: RequestId,
    pub route: String,
    pub hops: usize,
    pub output: Option<Value>,
    /// The per-execution store as the last step left it
    pub context: Context,
}

impl Execution {
    fn new(completion: Completion, context: Context) -> Self {
        Self {
            request_id: completion.request_id,
            route: completion.route,
            hops: completion.hops,
            output: completion.output,
            context,
        }
    }
}

/// Runs routes from a shared registry against copies of a base context
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<Registry>,
    base: BaseContext,
    config: RouterConfig,
}

impl Router {
    pub fn new(registry: Arc<Registry>, base: BaseContext, config: RouterConfig) -> Self {
        Self {
            registry,
            base,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn base(&self) -> &BaseContext {
        &self.base
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Execute `request` against a fresh copy of the base context
    ///
    /// # Errors
    ///
    /// - `NotFound` if the route, a reroute target or a named command is not
    ///   registered
    /// - `RerouteLimitExceeded` once more than `max_reroutes` reroutes happen
    /// - any error a command returned with `Signal::Fatal`, unchanged
    pub fn handle_request(&self, request: &Request) -> Result<Execution, ExError> {
        let mut cxt = self.base.new_context();
        let completion = self.execute(request, &mut cxt)?;
        Ok(Execution::new(completion, cxt))
    }

    /// Execute `request` against a caller-supplied context
    ///
    /// # Errors
    ///
    /// Same as [`Router::handle_request`].
    pub fn execute(&self, request: &Request, cxt: &mut Context) -> Result<Completion, ExError> {
        let span = tracing::info_span!(
            "execution",
            request_id = %request.correlation.request_id,
            trace_id = request.correlation.trace_id.as_ref().map(|t| t.as_str()),
        );
        let _guard = span.enter();

        log_op_start!(OP_EXECUTE, route = %request.route);
        let start = Instant::now();

        let completion = self.execute_impl(request, cxt).map_err(|e| {
            log_op_error!(
                OP_EXECUTE,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                route = %request.route
            );
            e
        })?;

        log_op_end!(
            OP_EXECUTE,
            duration_ms = start.elapsed().as_millis() as u64,
            route = %completion.route,
            hops = completion.hops
        );

        Ok(completion)
    }

    fn execute_impl(&self, request: &Request, cxt: &mut Context) -> Result<Completion, ExError> {
        let mut route_id = request.route.clone();
        let mut hops = 0usize;
        let mut last_stored: Option<String> = None;

        'routes: loop {
            let route = self
                .registry
                .get(&route_id)
                .ok_or_else(|| RouteError::RouteNotFound {
                    route: route_id.clone(),
                })?;

            for (index, step) in route.steps.iter().enumerate() {
                let command = self.registry.resolve_command(&route.id, &step.command)?;
                let params = bind_params(step, &Scope { cxt: &*cxt, request });

                tracing::debug!(
                    component = module_path!(),
                    op = OP_STEP,
                    route = %route.id,
                    step = index,
                    command = command.name(),
                    params = params.len(),
                    "invoking step"
                );

                let Outcome { value, signal } = command.execute(cxt, &params);
                tracing::debug!(
                    component = module_path!(),
                    op = OP_STEP,
                    route = %route.id,
                    step = index,
                    signal = signal.label(),
                    stored = value.is_some(),
                    "step finished"
                );

                match signal {
                    Signal::Continue => store(cxt, step, value, &mut last_stored),
                    Signal::Recoverable(err) => {
                        store(cxt, step, value, &mut last_stored);
                        tracing::warn!(
                            component = module_path!(),
                            op = OP_STEP,
                            event = EVENT_RECOVERED,
                            route = %route.id,
                            step = index,
                            err.kind = ?err.kind(),
                            err.code = err.code(),
                            "{}",
                            err
                        );
                        cxt.log("error", &err.to_string());
                    }
                    Signal::Stop => {
                        store(cxt, step, value, &mut last_stored);
                        break 'routes Ok(finish(request, route_id, hops, route.output.as_deref(), last_stored, cxt));
                    }
                    Signal::Reroute(target) => {
                        store(cxt, step, value, &mut last_stored);
                        hops += 1;
                        if hops > self.config.max_reroutes {
                            return Err(RouteError::RerouteLimitExceeded {
                                route: target,
                                limit: self.config.max_reroutes,
                            }
                            .into());
                        }
                        tracing::info!(
                            component = module_path!(),
                            op = OP_STEP,
                            event = EVENT_REROUTE,
                            route = %route.id,
                            step = index,
                            target = %target,
                            hops,
                        );
                        route_id = target;
                        continue 'routes;
                    }
                    Signal::Fatal(err) => return Err(err),
                }
            }

            break Ok(finish(request, route_id, hops, route.output.as_deref(), last_stored, cxt));
        }
    }
}

fn store(cxt: &mut Context, step: &Step, value: Option<Value>, last_stored: &mut Option<String>) {
    if let Some(value) = value {
        cxt.add(step.output.clone(), value);
        *last_stored = Some(step.output.clone());
    }
}

fn finish(
    request: &Request,
    route: String,
    hops: usize,
    designated: Option<&str>,
    last_stored: Option<String>,
    cxt: &Context,
) -> Completion {
    let output = designated
        .or(last_stored.as_deref())
        .and_then(|key| cxt.has(key));
    Completion {
        request_id: request.correlation.request_id.clone(),
        route,
        hops,
        output,
    }
}
