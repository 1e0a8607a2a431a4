//! routex CLI
//!
//! Command-line transport for the routex executor: turns arguments into a
//! request, runs it against the demo registry and prints the output.

use clap::{Parser, Subcommand};
use routex_core::{ExError, ExErrorKind};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "routex")]
#[command(about = "routex - run declared command chains", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Execute a route and print its output
    Run(commands::run::RunArgs),
    /// List the declared routes
    Routes(commands::routes::RoutesArgs),
}

/// Process exit code for a failed command
fn exit_code(err: &ExError) -> i32 {
    match err.kind() {
        ExErrorKind::NotFound => 2,
        _ => 1,
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Routes(args) => commands::routes::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}
