//! Route registry and declaration builder
//!
//! Routes are declared once at start-up and then shared read-only by every
//! execution:
//!
//! ```
//! use routex_core::{Context, GetterExt, Outcome, Params, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .route("GET /", "Say hello")
//!     .does(
//!         |_: &mut Context, p: &Params| Outcome::ok(p.get_string("who", "world").unwrap_or_default()),
//!         "greeting",
//!     )
//!     .using("who")
//!     .from("query:name cxt:default_name")
//!     .with_default("world")
//!     .register()
//!     .unwrap();
//!
//! assert_eq!(registry.describe("GET /"), Some("Say hello"));
//! ```
//!
//! Re-registering an identifier replaces the earlier route. Operation
//! references are not checked here; a step naming an unregistered command
//! fails when it runs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::command::Command;
use crate::errors::{Result, RouteError};
use crate::source::Source;
use crate::value::Value;

/// How a step refers to its command
#[derive(Clone)]
pub enum CommandRef {
    Inline(Arc<dyn Command>),
    /// Looked up in the registry's command table when the step runs
    Named(String),
}

impl CommandRef {
    pub fn label(&self) -> &str {
        match self {
            CommandRef::Inline(cmd) => cmd.name(),
            CommandRef::Named(name) => name,
        }
    }
}

impl std::fmt::Debug for CommandRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandRef::Inline(cmd) => write!(f, "Inline({})", cmd.name()),
            CommandRef::Named(name) => write!(f, "Named({name})"),
        }
    }
}

/// A named parameter and where to look for it
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    pub sources: Vec<Source>,
    pub default: Option<Value>,
}

/// One command invocation within a route
#[derive(Debug, Clone)]
pub struct Step {
    pub command: CommandRef,
    pub output: String,
    pub bindings: Vec<Binding>,
}

/// An immutable route declaration
#[derive(Debug, Clone)]
pub struct Route {
    pub id: String,
    pub description: String,
    pub steps: Vec<Step>,
    /// Context key handed back as the execution output; defaults to the last
    /// stored result
    pub output: Option<String>,
}

/// All declared routes plus the named-command table
#[derive(Default)]
pub struct Registry {
    routes: HashMap<String, Arc<Route>>,
    commands: HashMap<String, Arc<dyn Command>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin declaring a route
    pub fn route(&mut self, id: impl Into<String>, description: impl Into<String>) -> RouteBuilder<'_> {
        RouteBuilder {
            registry: self,
            route: Route {
                id: id.into(),
                description: description.into(),
                steps: Vec::new(),
                output: None,
            },
            current_binding: None,
            error: None,
        }
    }

    /// Insert a finished route; last write wins
    pub fn insert(&mut self, route: Route) {
        if self.routes.contains_key(&route.id) {
            tracing::debug!(
                component = module_path!(),
                route = %route.id,
                "route redefined; replacing earlier declaration"
            );
        }
        self.routes.insert(route.id.clone(), Arc::new(route));
    }

    /// Make a command available to steps declared with `does_named`
    pub fn register_command(&mut self, name: impl Into<String>, command: impl Command + 'static) {
        self.commands.insert(name.into(), Arc::new(command));
    }

    pub fn get(&self, id: &str) -> Option<Arc<Route>> {
        self.routes.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    pub fn describe(&self, id: &str) -> Option<&str> {
        self.routes.get(id).map(|r| r.description.as_str())
    }

    /// Declared route identifiers, sorted
    pub fn route_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve a step's command reference
    ///
    /// # Errors
    ///
    /// Returns `CommandNotFound` for a name missing from the command table.
    pub fn resolve_command(&self, route: &str, command: &CommandRef) -> Result<Arc<dyn Command>> {
        match command {
            CommandRef::Inline(cmd) => Ok(cmd.clone()),
            CommandRef::Named(name) => {
                self.commands
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RouteError::CommandNotFound {
                        name: name.clone(),
                        route: route.to_string(),
                    })
            }
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut commands: Vec<&String> = self.commands.keys().collect();
        commands.sort();
        f.debug_struct("Registry")
            .field("routes", &self.route_names())
            .field("commands", &commands)
            .finish()
    }
}

/// Accumulates one route declaration; finish with [`RouteBuilder::register`]
///
/// Declaration mistakes (a binding before any step, a malformed source
/// specifier) are remembered and reported by `register`, so the chain itself
/// never needs `?`.
pub struct RouteBuilder<'r> {
    registry: &'r mut Registry,
    route: Route,
    current_binding: Option<usize>,
    error: Option<RouteError>,
}

impl RouteBuilder<'_> {
    /// Append a step running `command` and storing its result under `output`
    pub fn does(self, command: impl Command + 'static, output: impl Into<String>) -> Self {
        self.push_step(CommandRef::Inline(Arc::new(command)), output.into())
    }

    /// Append a step running the registry command called `name`
    pub fn does_named(self, name: impl Into<String>, output: impl Into<String>) -> Self {
        self.push_step(CommandRef::Named(name.into()), output.into())
    }

    /// Start a parameter binding on the most recent step
    pub fn using(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match self.route.steps.last_mut() {
            Some(step) => {
                step.bindings.push(Binding {
                    name,
                    sources: Vec::new(),
                    default: None,
                });
                self.current_binding = Some(step.bindings.len() - 1);
            }
            None => self.fail(format!("parameter '{name}' declared before any step")),
        }
        self
    }

    /// Append whitespace-separated `source:key` specifiers to the current binding
    pub fn from(mut self, specs: &str) -> Self {
        let sources = match Source::parse_list(specs) {
            Ok(sources) => sources,
            Err(err) => {
                self.record(err);
                return self;
            }
        };
        match self.binding_mut() {
            Some(binding) => binding.sources.extend(sources),
            None => self.fail(format!("sources '{specs}' declared before using()")),
        }
        self
    }

    /// Static fallback for the current binding
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.binding_mut() {
            Some(binding) => binding.default = Some(value),
            None => self.fail("default declared before using()".to_string()),
        }
        self
    }

    /// Splice in the steps of an already registered route
    pub fn includes(mut self, route_id: &str) -> Self {
        match self.registry.get(route_id) {
            Some(included) => {
                self.route.steps.extend(included.steps.iter().cloned());
                self.current_binding = None;
            }
            None => self.record(RouteError::RouteNotFound {
                route: route_id.to_string(),
            }),
        }
        self
    }

    /// Designate which context key is the execution output
    pub fn output(mut self, key: impl Into<String>) -> Self {
        self.route.output = Some(key.into());
        self
    }

    /// Store the route in the registry
    ///
    /// # Errors
    ///
    /// Returns the first declaration error encountered while building.
    pub fn register(self) -> Result<()> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.registry.insert(self.route);
        Ok(())
    }

    fn push_step(mut self, command: CommandRef, output: String) -> Self {
        self.route.steps.push(Step {
            command,
            output,
            bindings: Vec::new(),
        });
        self.current_binding = None;
        self
    }

    fn binding_mut(&mut self) -> Option<&mut Binding> {
        let index = self.current_binding?;
        self.route.steps.last_mut()?.bindings.get_mut(index)
    }

    fn fail(&mut self, reason: String) {
        let route = self.route.id.clone();
        self.record(RouteError::InvalidDeclaration { route, reason });
    }

    fn record(&mut self, err: RouteError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
