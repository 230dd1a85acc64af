//! CLI tasks: one callable unit per source path.
//!
//! A task is `{kind, path, radix}`, immutable once built. Execution checks
//! the source exists, obtains the book through the variant-specific load,
//! and hands Input/Book tasks to the shared pipeline; a script's effects
//! are already applied by its load, so its processing is a no-op.
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::core::params::ParameterModel;
use crate::core::pipeline;
use crate::core::radix::{AliasTable, radix_of};
use crate::engine::{Book, Engine};
use crate::error::{Error, Result};

/// The closed set of task variants. They differ only in how the book
/// handle is obtained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Script,
    Input,
    Book,
}

#[derive(Debug, Clone)]
pub struct CliTask {
    pub kind: TaskKind,
    pub path: PathBuf,
    radix: String,
}

impl CliTask {
    pub fn new(kind: TaskKind, path: PathBuf, aliases: &AliasTable) -> Self {
        let radix = radix_of(&path, aliases);
        Self { kind, path, radix }
    }

    pub fn radix(&self) -> &str {
        &self.radix
    }

    /// Run this task to completion: success, cancellation, or failure.
    pub fn execute(
        &self,
        engine: &dyn Engine,
        params: &ParameterModel,
        interactive: bool,
    ) -> Result<()> {
        // Check source does exist.
        if !self.path.exists() {
            warn!("Could not find file {}", self.path.display());
            return Err(Error::SourceNotFound(self.path.clone()));
        }

        // Obtain the book instance. Load errors propagate uncaught: there
        // is nothing to clean up yet.
        let mut book = self.load(engine, interactive)?;

        // Process the book instance.
        match self.kind {
            TaskKind::Script => Ok(()),
            TaskKind::Input | TaskKind::Book => {
                pipeline::process_book(book.as_mut(), params, interactive)
            }
        }
    }

    fn load(&self, engine: &dyn Engine, interactive: bool) -> Result<Box<dyn Book>> {
        match self.kind {
            TaskKind::Script => engine.load_script(&self.path),
            TaskKind::Input => engine.load_input(&self.path),
            TaskKind::Book => {
                let mut book = engine.load_book(&self.path)?;
                if interactive {
                    // Tabs are now accessible.
                    book.create_stub_tabs();
                }
                Ok(book)
            }
        }
    }
}

impl fmt::Display for CliTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            TaskKind::Script => "Script",
            TaskKind::Input => "Input",
            TaskKind::Book => "Book",
        };
        write!(f, "{} {}", label, self.path.display())
    }
}

/// Build the ordered task list: declared inputs, then trailing positional
/// paths (also inputs), then books, then scripts. Within-group order is
/// preserved; empty lists produce no tasks.
pub fn build_tasks(params: &ParameterModel, aliases: &AliasTable) -> Vec<CliTask> {
    let mut tasks = Vec::new();

    for input in &params.inputs {
        tasks.push(CliTask::new(TaskKind::Input, input.clone(), aliases));
    }

    // Arguments are considered as inputs.
    for argument in &params.arguments {
        tasks.push(CliTask::new(TaskKind::Input, argument.clone(), aliases));
    }

    for book in &params.books {
        tasks.push(CliTask::new(TaskKind::Book, book.clone(), aliases));
    }

    for script in &params.scripts {
        tasks.push(CliTask::new(TaskKind::Script, script.clone(), aliases));
    }

    tasks
}
