//! Engine collaborator contracts.
//!
//! The orchestration core drives artifacts through these traits only: an
//! [`Engine`] turns a source path into a [`Book`] handle, and a `Book`
//! exposes its sheets ("stubs") by 1-based number. The concrete file-backed
//! implementation lives in [`book`]; tests substitute their own.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::core::step::Step;
use crate::error::Result;

pub mod book;

pub use book::{OmrEngine, ScoreBook};

/// An artifact handle: one scanned score, owned exclusively by its task for
/// the task's duration.
pub trait Book: std::fmt::Debug {
    /// Canonical short name, used for logging and default output naming.
    fn radix(&self) -> &str;

    /// Default persisted location for this book (`<folder>/<radix>.omr`).
    fn default_path(&self) -> PathBuf;

    /// Existing stub numbers, ascending.
    fn stub_numbers(&self) -> Vec<u32>;

    /// Existing valid stub numbers, ascending.
    fn valid_stub_numbers(&self) -> Vec<u32>;

    /// First valid stub, if any.
    fn first_valid_stub(&self) -> Option<u32>;

    /// Create the stubs, restricted to the given 1-based subset when present.
    fn create_stubs(&mut self, subset: Option<&BTreeSet<u32>>) -> Result<()>;

    /// Make per-sheet presentation available on an interactive surface.
    /// No effect in batch mode.
    fn create_stub_tabs(&mut self);

    /// Advance the given sheet through all stages up to and including
    /// `target`. Idempotent: a sheet already there is unaffected.
    fn ensure_step(&mut self, number: u32, target: Step) -> Result<()>;

    /// Export the book's current transcription (MusicXML) to `target`,
    /// in the context of the given sheet.
    fn export_to(&self, number: u32, target: &Path) -> Result<()>;

    /// Print the book (PDF) to `target`, in the context of the given sheet.
    fn print_to(&self, number: u32, target: &Path) -> Result<()>;

    /// Persist the book to `path`. With `backup`, any previously persisted
    /// version at that path is backed up first.
    fn store(&self, path: &Path, backup: bool) -> Result<()>;

    /// Release the handle. Does not persist.
    fn close(&mut self);
}

/// Loads artifacts from source paths.
pub trait Engine {
    /// Run a script file; the returned book carries whatever state the
    /// script produced.
    fn load_script(&self, path: &Path) -> Result<Box<dyn Book>>;

    /// Open or create a book from an image source.
    fn load_input(&self, path: &Path) -> Result<Box<dyn Book>>;

    /// Open a book from a previously persisted file.
    fn load_book(&self, path: &Path) -> Result<Box<dyn Book>>;
}
