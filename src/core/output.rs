//! Output actions: print, export, save.
//!
//! Each action is built from one [`OutputSpec`] triple and invoked once per
//! book, against the book's first valid sheet. The explicit file wins over
//! the folder; with neither, the action targets the book's default folder.
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::core::params::OutputSpec;
use crate::engine::Book;
use crate::error::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Print,
    Export,
    Save,
}

impl OutputKind {
    fn extension(self) -> &'static str {
        match self {
            OutputKind::Print => "pdf",
            OutputKind::Export => "mxl",
            OutputKind::Save => "omr",
        }
    }
}

/// One resolved output request, ready to run against a book.
#[derive(Debug)]
pub struct OutputAction {
    kind: OutputKind,
    spec: OutputSpec,
}

impl OutputAction {
    pub fn new(kind: OutputKind, spec: &OutputSpec) -> Self {
        Self {
            kind,
            spec: spec.clone(),
        }
    }

    /// Target resolution: explicit file, else folder + `<radix>.<ext>`,
    /// else sibling of the book's default path.
    fn target(&self, book: &dyn Book) -> PathBuf {
        let file_name = format!("{}.{}", book.radix(), self.kind.extension());
        let default = book.default_path().with_file_name(&file_name);
        self.spec.target(&file_name, default)
    }

    /// Run the action once, in the context of the book's first valid sheet.
    pub fn run(&self, book: &dyn Book) -> Result<()> {
        let Some(sheet) = book.first_valid_stub() else {
            warn!("No valid sheet in book {}, skipping {:?}", book.radix(), self.kind);
            return Ok(());
        };
        let target = self.target(book);
        debug!("{:?} output for {} -> {}", self.kind, book.radix(), target.display());

        match self.kind {
            OutputKind::Print => book.print_to(sheet, &target),
            OutputKind::Export => book.export_to(sheet, &target),
            OutputKind::Save => book.store(&target, false),
        }
    }
}
