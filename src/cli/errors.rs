use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid option setting '{pair}', expected KEY=VALUE")]
    InvalidOption { pair: String },

    #[error("cannot read argument file {path}: {detail}")]
    ArgumentFile { path: PathBuf, detail: String },

    #[error("{failed} of {total} tasks did not complete")]
    TasksFailed { failed: usize, total: usize },

    #[error(transparent)]
    Core(#[from] scorebook::Error),
}
