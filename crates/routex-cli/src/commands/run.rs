//! Run command
//!
//! Usage: routex run <ROUTE> [--path <SEG>]... [--query <K=V>]... [--form <K=V>]... [--config <FILE>]

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use routex_core::logging_facility;
use routex_core::{
    BaseContext, ExError, ExErrorKind, Request, Router, RouterConfig, TracingSink,
};

use super::demo;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Route identifier, e.g. "GET /"
    pub route: String,

    /// Path segment; repeat for each segment, or pass a whole path
    #[arg(long = "path", value_name = "SEG")]
    pub path: Vec<String>,

    /// Query field as KEY=VALUE
    #[arg(long = "query", value_name = "K=V")]
    pub query: Vec<String>,

    /// Form field as KEY=VALUE
    #[arg(long = "form", value_name = "K=V")]
    pub form: Vec<String>,

    /// TOML router configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the final context as JSON after the output
    #[arg(long)]
    pub dump_context: bool,
}

/// Execute run command
///
/// # Errors
///
/// Returns the executor's error unchanged, or `InvalidInput`/`InvalidConfig`
/// for bad arguments.
pub fn execute(args: RunArgs) -> Result<(), ExError> {
    let config = match &args.config {
        Some(path) => RouterConfig::load(path)?,
        None => RouterConfig::default(),
    };
    logging_facility::init(config.log_profile);
    tracing::debug!(max_reroutes = config.max_reroutes, "router configured");

    let request = build_request(&args)?;
    let base = BaseContext::new().with_logger("tracing", Arc::new(TracingSink));
    let router = Router::new(Arc::new(demo::registry()?), base, config);

    let exec = router.handle_request(&request)?;

    if let Some(output) = &exec.output {
        println!("{}", output);
    }
    if args.dump_context {
        let map = exec
            .context
            .as_map()
            .into_iter()
            .map(|(k, v)| (k, v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        println!("{}", serde_json::Value::Object(map));
    }
    Ok(())
}

fn build_request(args: &RunArgs) -> Result<Request, ExError> {
    let mut request = Request::new(args.route.clone());
    request.path = args
        .path
        .iter()
        .flat_map(|seg| seg.split('/'))
        .filter(|seg| !seg.is_empty())
        .map(str::to_string)
        .collect();
    for field in &args.query {
        let (key, value) = split_field(field)?;
        request = request.with_query(key, value);
    }
    for field in &args.form {
        let (key, value) = split_field(field)?;
        request = request.with_form(key, value);
    }
    Ok(request)
}

fn split_field(field: &str) -> Result<(&str, &str), ExError> {
    field.split_once('=').ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_key(field)
            .with_message(format!("expected KEY=VALUE, got '{}'", field))
    })
}
