//! Routes command
//!
//! Usage: routex routes [--steps]

use clap::Args;
use routex_core::ExError;

use super::demo;

#[derive(Debug, Args)]
pub struct RoutesArgs {
    /// Also list each route's steps and their output names
    #[arg(long)]
    pub steps: bool,
}

/// Execute routes command
///
/// # Errors
///
/// Returns `InvalidInput` if the demo registry fails to build.
pub fn execute(args: RoutesArgs) -> Result<(), ExError> {
    let registry = demo::registry()?;

    for id in registry.route_names() {
        let description = registry.describe(&id).unwrap_or_default();
        println!("{:<16} {}", id, description);

        if args.steps {
            if let Some(route) = registry.get(&id) {
                for step in &route.steps {
                    println!("    {} -> {}", step.command.label(), step.output);
                }
            }
        }
    }
    Ok(())
}
