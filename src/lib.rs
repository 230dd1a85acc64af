#![doc = r#"
Scorebook — batch CLI core for a music-score recognition engine.

This crate turns command-line parameters into an ordered list of processing
tasks and drives each one through load, transcription-step execution, output
generation, and cleanup. It powers the `scorebook` CLI and can be embedded
in other applications through the library API.

Overview
--------
- A [`core::params::ParameterModel`] is built once per invocation and read
  only afterward.
- [`core::task::build_tasks`] turns its path lists into an ordered sequence
  of tasks: inputs, trailing positionals (as inputs), books, scripts.
- Each task is executed exactly once, strictly sequentially. Input and book
  tasks run the shared pipeline ([`core::pipeline::process_book`]); script
  effects are applied by the load itself.
- The pipeline cleans up on every outcome: a cancelled book is force-saved
  with a backup and closed, a failed or finished one is closed, and the
  diagnostic log scopes ([`log`]) are always popped.

Quick start: drive one input through a step
-------------------------------------------
```rust,no_run
use std::path::PathBuf;
use scorebook::{AliasTable, OmrEngine, ParameterModel, Step, build_tasks};

fn main() -> scorebook::Result<()> {
    let params = ParameterModel {
        batch: true,
        step: Some(Step::Binary),
        inputs: vec![PathBuf::from("sonata.png")],
        ..ParameterModel::default()
    };

    let aliases = AliasTable::default();
    let engine = OmrEngine::new(None, aliases.clone());

    for task in build_tasks(&params, &aliases) {
        task.execute(&engine, &params, false)?;
    }
    Ok(())
}
```

Error handling
--------------
All public functions return [`Result`]; match on [`Error`] to distinguish
missing sources, load failures, cancellation, and generic pipeline failures.

Useful modules
--------------
- [`core`] — parameter model, tasks, pipeline, steps, outputs.
- [`engine`] — collaborator contracts plus the file-backed implementation.
- [`log`] — book/sheet-scoped diagnostic contexts.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod core;
pub mod engine;
pub mod error;
pub mod log;

// Curated public API surface
pub use crate::core::params::{OutputSpec, ParameterModel};
pub use crate::core::pipeline::process_book;
pub use crate::core::radix::{AliasTable, radix_of};
pub use crate::core::step::Step;
pub use crate::core::task::{CliTask, TaskKind, build_tasks};
pub use crate::engine::{Book, Engine, OmrEngine, ScoreBook};
pub use crate::error::{Error, Result};
