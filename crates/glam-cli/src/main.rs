//! `glam`: command-line front end for the glam type checker.

mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    // Logging is off unless GLAM_LOG is set, e.g. GLAM_LOG=glam_compiler=trace.
    if let Ok(filter) = EnvFilter::try_from_env("GLAM_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Check {
            files,
            format,
            dump_types,
        } => commands::check_files(files.as_slice(), *format, *dump_types),
        Commands::Ast { file } => commands::print_ast(file),
        Commands::Tokens { file } => commands::print_tokens(file),
    };

    match result {
        Ok(outcome) => {
            print!("{}", outcome.output);
            if outcome.failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
