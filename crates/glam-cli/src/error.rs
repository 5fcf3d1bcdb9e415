//! CLI error type.

use std::path::PathBuf;

/// Failures that stop a command before it can report diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
