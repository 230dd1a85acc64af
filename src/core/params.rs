//! The immutable parameter snapshot read by the whole run.
//! Built once from the parsed command line (or assembled directly by
//! embedders), then handed read-only to task building and the pipeline.
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::step::Step;

/// One output action request: a bare flag, an explicit target file, and/or a
/// target folder. The explicit file always wins over the folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSpec {
    pub enabled: bool,
    pub file: Option<PathBuf>,
    pub folder: Option<PathBuf>,
}

impl OutputSpec {
    /// Whether this action was requested at all (flag, file, or folder given).
    pub fn requested(&self) -> bool {
        self.enabled || self.file.is_some() || self.folder.is_some()
    }

    /// Resolve the concrete target: explicit file, else folder joined with
    /// the given file name, else the provided default.
    pub fn target(&self, file_name: &str, default: PathBuf) -> PathBuf {
        if let Some(file) = &self.file {
            file.clone()
        } else if let Some(folder) = &self.folder {
            folder.join(file_name)
        } else {
            default
        }
    }
}

/// Snapshot of everything parsed from the command line.
///
/// Created once per invocation and read-only afterward. Trailing positional
/// paths are kept separate here and folded into inputs at task-build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterModel {
    /// Help mode: list usage and the ordered step table, run nothing.
    pub help: bool,
    /// Batch mode: no interactive surface.
    pub batch: bool,
    /// Target transcription step for every input referenced on the CLI.
    pub step: Option<Step>,
    /// Application options, unique keys (a later duplicate wins at parse).
    pub options: BTreeMap<String, String>,
    /// Script files to run, in declaration order.
    pub scripts: Vec<PathBuf>,
    /// Input image files to load, in declaration order.
    pub inputs: Vec<PathBuf>,
    /// Book files to load, in declaration order.
    pub books: Vec<PathBuf>,
    /// Trailing positional paths; treated as inputs.
    pub arguments: Vec<PathBuf>,
    /// Specific 1-based sheet ids; None means all sheets.
    pub sheet_ids: Option<BTreeSet<u32>>,
    pub print: OutputSpec,
    pub export: OutputSpec,
    pub save: OutputSpec,
}

impl ParameterModel {
    /// Whether a given 1-based sheet number is selected by the sheet subset.
    /// An absent subset selects everything.
    pub fn selects_sheet(&self, number: u32) -> bool {
        match &self.sheet_ids {
            Some(ids) => ids.contains(&number),
            None => true,
        }
    }
}
