//! Command Line Interface (CLI) layer for Scorebook.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration driver (`runner`) that executes the task sequence.
//! It wires user-provided options to the underlying library functionality.
//!
//! If you are embedding Scorebook into another application, prefer using
//! the library API instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::{CliArgs, expand_arg_files};
pub use runner::run;
