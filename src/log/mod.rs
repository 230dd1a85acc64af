//! Diagnostic log-context scoping.
//!
//! A process-wide stack records which book (and optionally which sheet) the
//! current work belongs to; every record emitted inside a scope carries the
//! radix/sheet fields through an entered `tracing` span. Scopes are RAII
//! guards: the stack entry is popped and the span exited on drop, on every
//! exit path. Task execution is strictly sequential, so a single shared
//! stack is safe; interleaving tasks would corrupt it.
use std::path::Path;
use std::sync::Mutex;

use tracing::info_span;
use tracing::span::EnteredSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Book(String),
    Sheet(u32),
}

static CONTEXT: Mutex<Vec<Scope>> = Mutex::new(Vec::new());

fn stack() -> std::sync::MutexGuard<'static, Vec<Scope>> {
    // A poisoned stack only means a test panicked inside a scope.
    CONTEXT.lock().unwrap_or_else(|e| e.into_inner())
}

/// Current nesting depth; zero outside any task.
pub fn depth() -> usize {
    stack().len()
}

/// Guard for a book-scoped log context, keyed by radix and storage folder.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct BookScope {
    _span: EnteredSpan,
}

impl Drop for BookScope {
    fn drop(&mut self) {
        let mut ctx = stack();
        debug_assert!(matches!(ctx.last(), Some(Scope::Book(_))));
        ctx.pop();
    }
}

/// Guard for a sheet-scoped log context nested inside a book scope.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct SheetScope {
    _span: EnteredSpan,
}

impl Drop for SheetScope {
    fn drop(&mut self) {
        let mut ctx = stack();
        debug_assert!(matches!(ctx.last(), Some(Scope::Sheet(_))));
        ctx.pop();
    }
}

/// Open a book-scoped context. The folder is the book's storage folder,
/// recorded on the span for diagnostics.
pub fn push_book(radix: &str, folder: &Path) -> BookScope {
    stack().push(Scope::Book(radix.to_string()));
    let span = info_span!("book", radix = %radix, folder = %folder.display()).entered();
    BookScope { _span: span }
}

/// Open a sheet-scoped context within the current book.
pub fn push_sheet(number: u32) -> SheetScope {
    stack().push(Scope::Sheet(number));
    let span = info_span!("sheet", number).entered();
    SheetScope { _span: span }
}

/// Tests observing [`depth`] share one process-wide stack; they serialize
/// on this lock.
#[cfg(test)]
pub(crate) static TEST_SERIAL: Mutex<()> = Mutex::new(());
