use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use scorebook::core::step::help_footer;
use scorebook::{OutputSpec, ParameterModel, Step};

use super::errors::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "scorebook",
    version,
    about = "Scorebook CLI: batch transcription of music scores",
    after_help = help_footer()
)]
pub struct CliArgs {
    /// Runs with no graphic user interface
    #[arg(long)]
    pub batch: bool,

    /// Defines a specific transcription step, performed on each input
    /// referenced from the command line
    #[arg(long, value_enum, value_name = "STEP")]
    pub step: Option<Step>,

    /// Defines an application option (repeatable)
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Runs the provided script file (repeatable)
    #[arg(long = "script", value_name = "SCRIPT_FILE")]
    pub scripts: Vec<PathBuf>,

    /// Loads the provided input image file (repeatable)
    #[arg(long = "input", value_name = "INPUT_FILE")]
    pub inputs: Vec<PathBuf>,

    /// Loads the provided book file (repeatable)
    #[arg(long = "book", value_name = "BOOK_FILE")]
    pub books: Vec<PathBuf>,

    /// Selects specific sheets (1-based)
    #[arg(long, value_name = "N", num_args = 1..)]
    pub sheets: Option<Vec<u32>>,

    /// Exports MusicXML
    #[arg(long)]
    pub export: bool,

    /// Exports MusicXML to a specific file
    #[arg(long, value_name = "EXPORT_FILE")]
    pub export_as: Option<PathBuf>,

    /// Exports MusicXML to a specific folder (ignored if --export-as is used)
    #[arg(long, value_name = "EXPORT_FOLDER")]
    pub export_dir: Option<PathBuf>,

    /// Prints out book
    #[arg(long)]
    pub print: bool,

    /// Prints out book to a specific file
    #[arg(long, value_name = "PRINT_FILE")]
    pub print_as: Option<PathBuf>,

    /// Prints out book to a specific folder (ignored if --print-as is used)
    #[arg(long, value_name = "PRINT_FOLDER")]
    pub print_dir: Option<PathBuf>,

    /// Saves book
    #[arg(long)]
    pub save: bool,

    /// Saves book to a specific file
    #[arg(long, value_name = "BOOK_FILE")]
    pub save_as: Option<PathBuf>,

    /// Saves book to a specific folder (ignored if --save-as is used)
    #[arg(long, value_name = "BOOK_FOLDER")]
    pub save_dir: Option<PathBuf>,

    /// Trailing paths, treated as input files
    #[arg(value_name = "INPUT_FILES")]
    pub arguments: Vec<PathBuf>,
}

impl CliArgs {
    /// Build the read-only parameter snapshot for this run.
    pub fn into_params(self) -> Result<ParameterModel, AppError> {
        let mut options = BTreeMap::new();
        for pair in &self.options {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(AppError::InvalidOption { pair: pair.clone() });
            };
            // Unique keys: a later duplicate wins.
            options.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(ParameterModel {
            help: false,
            batch: self.batch,
            step: self.step,
            options,
            scripts: self.scripts,
            inputs: self.inputs,
            books: self.books,
            arguments: self.arguments,
            sheet_ids: self.sheets.map(|ids| ids.into_iter().collect()),
            print: OutputSpec {
                enabled: self.print,
                file: self.print_as,
                folder: self.print_dir,
            },
            export: OutputSpec {
                enabled: self.export,
                file: self.export_as,
                folder: self.export_dir,
            },
            save: OutputSpec {
                enabled: self.save,
                file: self.save_as,
                folder: self.save_dir,
            },
        })
    }
}

/// Expand `@file` indirections: each such token is replaced by the lines of
/// the named file, one argument per line; a blank line becomes an empty
/// argument. Other tokens pass through unchanged.
pub fn expand_arg_files<I>(args: I) -> Result<Vec<String>, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    for arg in args {
        match arg.strip_prefix('@') {
            Some(path) => {
                let content =
                    fs::read_to_string(path).map_err(|e| AppError::ArgumentFile {
                        path: PathBuf::from(path),
                        detail: e.to_string(),
                    })?;
                out.extend(content.lines().map(str::to_string));
            }
            None => out.push(arg),
        }
    }
    Ok(out)
}
