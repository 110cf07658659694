//! `devprofile apply`: provision from the hierarchy file.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{build_context, report_config, resolve_paths, run_tasks_to_completion, select_tasks};
use crate::cli::{ApplyOpts, GlobalOpts};
use crate::config::Config;
use crate::logging::{Log, Logger};
use crate::tasks;

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved, the hierarchy
/// file cannot be read, or any task fails.
pub fn run(global: &GlobalOpts, opts: &ApplyOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("devprofile {}", super::version::version()));

    let (home, path) = resolve_paths(global)?;

    log.stage("Loading configuration");
    log.info(&format!("hierarchy: {}", path.display()));
    let config = Config::load(&path, &home)
        .with_context(|| format!("loading hierarchy file {}", path.display()))?;
    report_config(&config, log.as_ref());

    let ctx = build_context(config, global, Arc::clone(log) as Arc<dyn Log>);
    let all = tasks::all_tasks();
    let selected = select_tasks(&all, &opts.only, &opts.skip);
    run_tasks_to_completion(selected, &ctx, log)
}
