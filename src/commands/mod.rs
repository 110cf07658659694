//! Subcommand entry points and the helpers they share.
pub mod apply;
pub mod interactive;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::exec::SystemExecutor;
use crate::keygen::SshKeygen;
use crate::logging::{Log, Logger};
use crate::lookup::{GitHubLookup, NoLookup, UserLookup};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Resolve the home directory and the hierarchy file path for this run.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved.
pub fn resolve_paths(global: &GlobalOpts) -> Result<(PathBuf, PathBuf)> {
    let home = config::resolve_home(global.home.as_deref(), config::env_var)?;
    let hierarchy = global
        .config
        .clone()
        .unwrap_or_else(|| config::default_hierarchy_path(&home, config::env_var));
    Ok((home, hierarchy))
}

/// Log the layout and every validation warning.
pub fn report_config(config: &Config, log: &dyn Log) {
    log.info(&format!(
        "{} account(s) across {} provider(s)",
        config.hierarchy.identities().len(),
        config.hierarchy.providers().len()
    ));
    log.debug(&format!("source root: {}", config.layout.source_root.display()));
    log.debug(&format!("ssh root: {}", config.layout.ssh_root.display()));
    if !config.warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            config.warnings.len()
        ));
        for warning in &config.warnings {
            log.warn(&format!("  {warning}"));
        }
    }
}

/// Build the task context with the real key generator and, unless
/// disabled, the GitHub user id lookup.
#[must_use]
pub fn build_context(config: Config, global: &GlobalOpts, log: Arc<dyn Log>) -> Context {
    let lookup: Arc<dyn UserLookup> = if global.offline || !config.settings.github_lookup {
        Arc::new(NoLookup)
    } else {
        Arc::new(GitHubLookup::new())
    };
    Context::new(
        Arc::new(config),
        Platform::detect(),
        log,
        global.dry_run,
        Arc::new(SshKeygen::new(Arc::new(SystemExecutor))),
        lookup,
    )
}

/// Filter `all` by `--only` and `--skip` (case-insensitive name substrings).
///
/// `--only` wins when both are given.
#[must_use]
pub fn select_tasks<'a>(all: &'a [Box<dyn Task>], only: &[String], skip: &[String]) -> Vec<&'a dyn Task> {
    all.iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !only.is_empty() {
                return only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            if !skip.is_empty() {
                return !skip.iter().any(|s| name.contains(&s.to_lowercase()));
            }
            true
        })
        .map(AsRef::as_ref)
        .collect()
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    let report = ctx.report();
    if !report.has_failures() && !report.entries().iter().any(|e| e.outcome.is_change()) {
        log.info("everything is already up to date");
    }
    log.print_summary();

    if log.has_failures() {
        anyhow::bail!("{} task(s) failed", log.failure_count());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn names(tasks: &[&dyn Task]) -> Vec<String> {
        tasks.iter().map(|t| t.name().to_string()).collect()
    }

    #[test]
    fn select_all_by_default() {
        let all = tasks::all_tasks();
        assert_eq!(select_tasks(&all, &[], &[]).len(), all.len());
    }

    #[test]
    fn only_matches_substrings_case_insensitively() {
        let all = tasks::all_tasks();
        let selected = select_tasks(&all, &["SSH".to_string()], &[]);
        assert_eq!(
            names(&selected),
            ["Create SSH directories", "Provision SSH keys", "Merge SSH config"]
        );
    }

    #[test]
    fn skip_removes_matches() {
        let all = tasks::all_tasks();
        let selected = select_tasks(&all, &[], &["git".to_string(), "keys".to_string()]);
        assert_eq!(
            names(&selected),
            [
                "Create source directories",
                "Create SSH directories",
                "Merge SSH config"
            ]
        );
    }

    fn alice_context() -> (Context, tempfile::TempDir, Arc<Logger>) {
        let log = Arc::new(Logger::new("test"));
        let (ctx, tmp) = tasks::test_helpers::context_for(tasks::test_helpers::ALICE);
        let ctx = ctx.with_log(Arc::clone(&log) as Arc<dyn Log>);
        (ctx, tmp, log)
    }

    #[test]
    fn completion_succeeds_when_every_task_passes() {
        let (ctx, tmp, log) = alice_context();
        let all = tasks::all_tasks();
        run_tasks_to_completion(select_tasks(&all, &[], &[]), &ctx, &log).unwrap();
        assert!(!log.has_failures());
        assert!(tmp.path().join("src/github.com/alice").is_dir());
    }

    #[test]
    fn completion_fails_when_a_task_fails() {
        let (ctx, tmp, log) = alice_context();
        std::fs::create_dir_all(tmp.path().join("src/github.com")).unwrap();
        std::fs::write(tmp.path().join("src/github.com/alice"), "blocked").unwrap();

        let all = tasks::all_tasks();
        let err = run_tasks_to_completion(select_tasks(&all, &[], &[]), &ctx, &log).unwrap_err();
        assert!(log.has_failures());
        assert_eq!(err.to_string(), format!("{} task(s) failed", log.failure_count()));
    }

    #[test]
    fn explicit_paths_are_used() {
        let home = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            home: Some(home.path().to_path_buf()),
            config: Some(PathBuf::from("/tmp/h.toml")),
            ..GlobalOpts::default()
        };
        let (resolved, hierarchy) = resolve_paths(&global).unwrap();
        assert_eq!(resolved, dunce::canonicalize(home.path()).unwrap());
        assert_eq!(hierarchy, PathBuf::from("/tmp/h.toml"));
    }
}
