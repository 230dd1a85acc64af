//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, JSON and XML errors, and provides semantic variants
//! for the task lifecycle: missing sources, load failures, cancellation, and
//! generic pipeline failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The task's source path does not exist at execution time.
    #[error("could not find file {0}")]
    SourceNotFound(PathBuf),

    /// A variant-specific load failed; no artifact was obtained.
    #[error("could not load {path}: {detail}")]
    Load { path: PathBuf, detail: String },

    /// Processing was cancelled mid-pipeline; the book is force-persisted
    /// with backup before this is re-raised.
    #[error("processing cancelled for book {0}")]
    Cancelled(String),

    /// Any non-cancellation failure inside the processing pipeline.
    #[error("processing failed for book {radix}: {detail}")]
    Pipeline { radix: String, detail: String },

    /// A sheet number referenced outside the book's existing stubs.
    #[error("no sheet {number} in book {radix}")]
    UnknownSheet { radix: String, number: u32 },

    /// A persisted book or script file that cannot be decoded.
    #[error("malformed file {path}: {detail}")]
    Format { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    pub fn format<E: std::fmt::Display>(path: &std::path::Path, e: E) -> Self {
        Error::Format {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    }
}
