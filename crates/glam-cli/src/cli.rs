//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per diagnostic, with the offending source line
    #[default]
    Text,
    /// A JSON array with one report per file
    Json,
}

/// glam type checker
#[derive(Parser, Debug)]
#[command(name = "glam", version, about = "glam type checker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lex, parse, and type-check source files
    #[command(visible_alias = "c")]
    Check {
        /// The .glam files to check
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print the type of every top-level binding
        #[arg(long)]
        dump_types: bool,
    },
    /// Print the parsed AST (debug)
    Ast {
        /// The file to parse
        file: PathBuf,
    },
    /// Print the token stream (debug)
    Tokens {
        /// The file to lex
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_defaults_to_text() {
        let cli = Cli::try_parse_from(["glam", "check", "a.glam", "b.glam"]).unwrap();
        match cli.command {
            Commands::Check {
                files,
                format,
                dump_types,
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(format, OutputFormat::Text);
                assert!(!dump_types);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn check_json_with_types() {
        let cli =
            Cli::try_parse_from(["glam", "c", "--format", "json", "--dump-types", "a.glam"]).unwrap();
        match cli.command {
            Commands::Check {
                format, dump_types, ..
            } => {
                assert_eq!(format, OutputFormat::Json);
                assert!(dump_types);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn check_requires_files() {
        assert!(Cli::try_parse_from(["glam", "check"]).is_err());
    }

    #[test]
    fn debug_subcommands() {
        assert!(matches!(
            Cli::try_parse_from(["glam", "ast", "x.glam"]).unwrap().command,
            Commands::Ast { .. }
        ));
        assert!(matches!(
            Cli::try_parse_from(["glam", "tokens", "x.glam"]).unwrap().command,
            Commands::Tokens { .. }
        ));
    }
}
