//! `devprofile interactive`: build the hierarchy from answers, then provision it.
use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::{
    build_context, report_config, resolve_paths, run_tasks_to_completion, select_tasks,
};
use crate::cli::{GlobalOpts, InteractiveOpts};
use crate::config::file::HierarchyFile;
use crate::config::prompt::{InteractivePlan, Prompter};
use crate::config::{Config, Settings, toml_loader};
use crate::logging::{Log, Logger};
use crate::tasks::{self, Scope};

/// Ask the questions and merge the answers with `settings`.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written.
pub fn collect<R: BufRead, W: Write>(
    input: R,
    output: W,
    settings: Settings,
) -> Result<InteractivePlan> {
    let mut plan = Prompter::new(input, output)
        .run()
        .context("reading answers")?;
    plan.file.settings = settings;
    Ok(plan)
}

/// Run the interactive command.
///
/// Settings are taken from the hierarchy file when one exists; its
/// providers are ignored in favour of the answers.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved, the answers
/// cannot be read or saved, or any task fails.
pub fn run(global: &GlobalOpts, opts: &InteractiveOpts, log: &Arc<Logger>) -> Result<()> {
    let (home, path) = resolve_paths(global)?;
    let existing: HierarchyFile = toml_loader::load_config_or_default(&path)?;

    let stdin = std::io::stdin();
    let plan = collect(stdin.lock(), std::io::stdout(), existing.settings)?;

    if let Some(save) = &opts.save {
        if global.dry_run {
            log.dry_run(&format!("would save hierarchy to {}", save.display()));
        } else {
            plan.file.save(save)?;
            log.info(&format!("saved hierarchy to {}", save.display()));
        }
    }

    log.stage("Validating answers");
    let config = Config::from_file(&plan.file, &home, "interactive")?;
    report_config(&config, log.as_ref());

    let ctx = build_context(config, global, Arc::clone(log) as Arc<dyn Log>).with_scope(Scope {
        source: plan.source,
        ssh: plan.ssh,
    });
    let all = tasks::all_tasks();
    run_tasks_to_completion(select_tasks(&all, &[], &[]), &ctx, log)
}
