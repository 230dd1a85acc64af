use std::path::PathBuf;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use scorebook::core::step::help_footer;
use scorebook::{AliasTable, Error, OmrEngine, build_tasks};

use super::args::CliArgs;
use super::errors::AppError;

/// Execute the whole run: build the task list and drive each task to
/// completion, strictly sequentially. A failed or cancelled task does not
/// stop the sequence; the tally decides the overall status.
pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let params = args.into_params()?;
    debug!("Command line parameters: {:?}", params);

    if params.help {
        info!("{}", help_footer());
        return Ok(());
    }

    let aliases = AliasTable::load_default().map_err(AppError::Core)?;
    let base_folder = params.options.get("base-folder").map(PathBuf::from);
    let engine = OmrEngine::new(base_folder, aliases.clone());

    // This front end carries no interactive surface; books are always
    // closed at task end.
    let interactive = false;

    let tasks = build_tasks(&params, &aliases);
    if tasks.is_empty() {
        info!("No input, book or script to process");
        return Ok(());
    }

    let total = tasks.len();
    let mut cancelled = 0;
    let mut failed = 0;

    for task in &tasks {
        info!("Processing {task}");
        match task.execute(&engine, &params, interactive) {
            Ok(()) => info!("Completed {task}"),
            Err(err @ Error::Cancelled(_)) => {
                warn!("{err}");
                cancelled += 1;
            }
            Err(err) => {
                warn!("Error processing {task}: {err}");
                failed += 1;
            }
        }
    }

    info!(
        "Run complete: {} succeeded, {} cancelled, {} failed",
        total - cancelled - failed,
        cancelled,
        failed
    );

    if cancelled + failed > 0 {
        return Err(AppError::TasksFailed {
            failed: cancelled + failed,
            total,
        }
        .into());
    }
    Ok(())
}
