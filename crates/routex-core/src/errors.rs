use routex_core_types::RequestId;
use thiserror::Error;

/// Result type alias using RouteError
pub type Result<T> = std::result::Result<T, RouteError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that a transport binding can turn
/// into a status code, an exit code or a message without inspecting the
/// concrete error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Resolution
    NotFound,
    TypeMismatch,

    // Chain control
    Recoverable,
    Fatal,
    RerouteLimitExceeded,

    // Setup
    InvalidInput,
    InvalidConfig,

    // Integration
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::Recoverable => "ERR_RECOVERABLE",
            ExErrorKind::Fatal => "ERR_FATAL",
            ExErrorKind::RerouteLimitExceeded => "ERR_REROUTE_LIMIT_EXCEEDED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// This is what escapes the executor. Commands build one to attach to a
/// `Recoverable` or `Fatal` signal; the executor surfaces `Fatal` payloads
/// without rewriting them.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    route: Option<String>,
    step: Option<usize>,
    key: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            route: None,
            step: None,
            key: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Shorthand for a `Fatal` error carrying a message
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(ExErrorKind::Fatal).with_message(message)
    }

    /// Shorthand for a `Recoverable` error carrying a message
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self::new(ExErrorKind::Recoverable).with_message(message)
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add route context
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Add step index context
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = Some(step);
        self
    }

    /// Add key context (context key, parameter or datasource name)
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(route) = &self.route {
            write!(f, " (route: {})", route)?;
        }
        if let Some(step) = self.step {
            write!(f, " (step: {})", step)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Concrete failures raised by the store, the resolver and the executor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// No route registered under the identifier
    #[error("Route not found: {route}")]
    RouteNotFound { route: String },

    /// A step references a named command that was never registered
    #[error("Command not found: {name} (route {route})")]
    CommandNotFound { name: String, route: String },

    /// Context key is absent
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// Typed accessor invoked against a value of another type
    #[error("Type mismatch for {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Reroute chain exceeded the configured hop limit
    #[error("Reroute limit of {limit} exceeded while rerouting to {route}")]
    RerouteLimitExceeded { route: String, limit: usize },

    /// Malformed `source:key` specifier in a parameter binding
    #[error("Invalid source specifier '{spec}': {reason}")]
    InvalidSource { spec: String, reason: String },

    /// Route declaration used out of order (e.g. `using` before `does`)
    #[error("Invalid route declaration for {route}: {reason}")]
    InvalidDeclaration { route: String, reason: String },

    /// Required parameters were not resolved
    #[error("Missing required parameters: {}", names.join(", "))]
    MissingParams { names: Vec<String> },

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("I/O error: {reason}")]
    Io { reason: String },
}

/// Conversion from RouteError to ExError
impl From<RouteError> for ExError {
    fn from(err: RouteError) -> Self {
        let message = err.to_string();
        match err {
            RouteError::RouteNotFound { route } => ExError::new(ExErrorKind::NotFound)
                .with_route(route)
                .with_op("resolve_route")
                .with_message(message),

            RouteError::CommandNotFound { name, route } => ExError::new(ExErrorKind::NotFound)
                .with_route(route)
                .with_key(name)
                .with_op("resolve_command")
                .with_message(message),

            RouteError::KeyNotFound { key } => ExError::new(ExErrorKind::NotFound)
                .with_key(key)
                .with_message(message),

            RouteError::TypeMismatch { key, .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_key(key)
                .with_message(message),

            RouteError::RerouteLimitExceeded { route, .. } => {
                ExError::new(ExErrorKind::RerouteLimitExceeded)
                    .with_route(route)
                    .with_op("reroute")
                    .with_message(message)
            }

            RouteError::InvalidSource { spec, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_key(spec)
                .with_message(message),

            RouteError::InvalidDeclaration { route, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_route(route)
                    .with_op("register_route")
                    .with_message(message)
            }

            RouteError::MissingParams { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            RouteError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            RouteError::Io { .. } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

impl From<toml::de::Error> for RouteError {
    fn from(err: toml::de::Error) -> Self {
        RouteError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for RouteError {
    fn from(err: std::io::Error) -> Self {
        RouteError::Io {
            reason: err.to_string(),
        }
    }
}
