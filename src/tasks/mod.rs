//! Named tasks that run the provisioning pass in a fixed order.
mod context;
pub mod directories;
pub mod git_config;
pub mod keys;
mod processing;
pub mod ssh_config;

pub use context::{Context, Scope};
pub use processing::{TaskResult, TaskStats, process_report};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task has anything to do for the current context.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity failed. Siblings of a failed entity
    /// are still processed before the error is returned.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete provisioning pass, in execution order.
///
/// Directories come before keys and configs so the later steps find their
/// parents in place.
#[must_use]
pub fn all_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(directories::CreateSourceDirectories),
        Box::new(directories::CreateSshDirectories),
        Box::new(keys::ProvisionSshKeys),
        Box::new(ssh_config::MergeSshConfig),
        Box::new(git_config::MergeGitConfig),
        Box::new(git_config::MergeAccountGitConfigs),
    ]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_helpers::make_static_context;

    /// A mock task for testing `execute()`.
    struct MockTask {
        name: &'static str,
        should_run: bool,
        result: Result<TaskResult, String>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            self.name
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            self.result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    #[test]
    fn task_order_is_fixed() {
        let names: Vec<String> = all_tasks().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            [
                "Create source directories",
                "Create SSH directories",
                "Provision SSH keys",
                "Merge SSH config",
                "Merge git config",
                "Merge account git configs",
            ]
        );
    }

    #[test]
    fn execute_skips_non_applicable_task() {
        let (ctx, _tmp, log) = make_static_context();
        let task = MockTask {
            name: "test-task",
            should_run: false,
            result: Ok(TaskResult::Ok),
        };

        execute(&task, &ctx);
        assert_eq!(log.failure_count(), 0);
        assert_eq!(
            log.task_entries()[0].status,
            TaskStatus::NotApplicable
        );
    }

    #[test]
    fn execute_records_ok_task() {
        let (ctx, _tmp, log) = make_static_context();
        let task = MockTask {
            name: "ok-task",
            should_run: true,
            result: Ok(TaskResult::Ok),
        };

        execute(&task, &ctx);
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn execute_records_failed_task() {
        let (ctx, _tmp, log) = make_static_context();
        let task = MockTask {
            name: "fail-task",
            should_run: true,
            result: Err("kaboom".to_string()),
        };

        execute(&task, &ctx);
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn execute_records_skipped_task() {
        let (ctx, _tmp, log) = make_static_context();
        let task = MockTask {
            name: "skip-task",
            should_run: true,
            result: Ok(TaskResult::Skipped("ssh-keygen not found".to_string())),
        };

        execute(&task, &ctx);
        assert_eq!(log.failure_count(), 0);
        assert_eq!(
            log.task_entries()[0].message.as_deref(),
            Some("ssh-keygen not found")
        );
    }

    #[test]
    fn execute_records_dry_run_task() {
        let (ctx, _tmp, log) = make_static_context();
        let task = MockTask {
            name: "dry-task",
            should_run: true,
            result: Ok(TaskResult::DryRun),
        };

        execute(&task, &ctx);
        assert_eq!(log.failure_count(), 0);
    }
}
