//! Driver-level errors: problems getting source text to the pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dofile needs a file path")]
    MissingDofilePath,
}

pub type CliResult<T> = Result<T, CliError>;

/// Read a whole source file.
pub fn read_source(path: impl Into<PathBuf>) -> CliResult<String> {
    let path = path.into();
    std::fs::read_to_string(&path).map_err(|source| CliError::ReadFile { path, source })
}
