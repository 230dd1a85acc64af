//! The shared processing pipeline for input and book tasks.
//!
//! One call drives a loaded book to completion: make sure its storage folder
//! and stubs exist, advance every selected valid sheet to the requested
//! step, dispatch the requested output actions, and clean up whatever the
//! outcome. Cancellation is caught once, the book is force-persisted with a
//! backup, and the cancellation re-raised; any other failure is logged,
//! wrapped, and re-raised after an unconditional close. Log scopes are RAII
//! guards, so the push/pop balance holds on every exit path.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::output::{OutputAction, OutputKind};
use crate::core::params::ParameterModel;
use crate::engine::Book;
use crate::error::{Error, Result};
use crate::log;

/// Process a loaded book according to the parameters.
///
/// `interactive` tells whether an interactive surface is present: sheets get
/// presentation tabs, and the book is left open at the end instead of being
/// closed here.
pub fn process_book(
    book: &mut dyn Book,
    params: &ParameterModel,
    interactive: bool,
) -> Result<()> {
    let default_path = book.default_path();
    let folder = default_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Opened before the steps, popped after cleanup: the close itself is
    // still attributed to this book in the diagnostic output.
    let _book_scope = log::push_book(book.radix(), &folder);

    let outcome = run_steps(book, params, interactive, &folder);
    let mut cancelled = false;

    let result = match outcome {
        Ok(()) => Ok(()),
        Err(err @ Error::Cancelled(_)) => {
            warn!("Cancelled book {}", book.radix());
            cancelled = true;
            Err(err)
        }
        Err(err) => {
            warn!("Exception occurred while processing {}: {err}", book.radix());
            Err(Error::Pipeline {
                radix: book.radix().to_string(),
                detail: err.to_string(),
            })
        }
    };

    if !interactive {
        if cancelled {
            // Save the book in its current state, backing up any prior
            // persisted version first.
            if let Err(store_err) = book.store(&default_path, true) {
                warn!("Could not store cancelled book {}: {store_err}", book.radix());
            }
        }
        book.close();
    }

    result
}

fn run_steps(
    book: &mut dyn Book,
    params: &ParameterModel,
    interactive: bool,
    folder: &Path,
) -> Result<()> {
    if !folder.exists() {
        fs::create_dir_all(folder)?;
    }

    // Make sure stubs are available.
    if book.stub_numbers().is_empty() {
        book.create_stubs(params.sheet_ids.as_ref())?;
    }

    if interactive {
        book.create_stub_tabs();
    }

    // Specific step to reach?
    if let Some(target) = params.step {
        match &params.sheet_ids {
            Some(ids) => info!("Launching {target} on book {} sheets {ids:?}", book.radix()),
            None => info!("Launching {target} on book {}", book.radix()),
        }

        for number in book.valid_stub_numbers() {
            let _sheet_scope = log::push_sheet(number);
            if params.selects_sheet(number) {
                book.ensure_step(number, target)?;
            }
        }
    }

    if params.print.requested() {
        OutputAction::new(OutputKind::Print, &params.print).run(book)?;
    }
    if params.export.requested() {
        OutputAction::new(OutputKind::Export, &params.export).run(book)?;
    }
    if params.save.requested() {
        OutputAction::new(OutputKind::Save, &params.save).run(book)?;
    }

    Ok(())
}
