//! Source and SSH directory tasks.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_report};
use crate::resources::directory::{DirectoryLayout, materialize};

/// Create `source-root/provider/[organisation/]account` for every account.
#[derive(Debug)]
pub struct CreateSourceDirectories;

impl Task for CreateSourceDirectories {
    fn name(&self) -> &'static str {
        "Create source directories"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.scope.source && !ctx.config.hierarchy.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = &ctx.config;
        let report = materialize(
            &config.layout.source_root,
            &config.hierarchy,
            DirectoryLayout::Source,
            ctx.dry_run,
        );
        process_report(ctx, report)
    }
}

/// Create `ssh-root/provider/account` for every account.
#[derive(Debug)]
pub struct CreateSshDirectories;

impl Task for CreateSshDirectories {
    fn name(&self) -> &'static str {
        "Create SSH directories"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.scope.ssh && !ctx.config.hierarchy.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = &ctx.config;
        let report = materialize(
            &config.layout.ssh_root,
            &config.hierarchy,
            DirectoryLayout::Ssh,
            ctx.dry_run,
        );
        process_report(ctx, report)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tasks::Scope;
    use crate::tasks::test_helpers::{ALICE, context_for, empty_context};

    #[test]
    fn not_applicable_without_accounts() {
        let (ctx, _tmp) = empty_context();
        assert!(!CreateSourceDirectories.should_run(&ctx));
        assert!(!CreateSshDirectories.should_run(&ctx));
    }

    #[test]
    fn scope_gates_each_half() {
        let (ctx, _tmp) = context_for(ALICE);
        let ctx = ctx.with_scope(Scope {
            source: false,
            ssh: true,
        });
        assert!(!CreateSourceDirectories.should_run(&ctx));
        assert!(CreateSshDirectories.should_run(&ctx));
    }

    #[test]
    fn creates_both_trees() {
        let (ctx, tmp) = context_for(ALICE);
        assert!(matches!(
            CreateSourceDirectories.run(&ctx).unwrap(),
            TaskResult::Ok
        ));
        assert!(matches!(CreateSshDirectories.run(&ctx).unwrap(), TaskResult::Ok));
        assert!(tmp.path().join("src/github.com/alice").is_dir());
        assert!(tmp.path().join(".ssh/github.com/alice").is_dir());
        assert_eq!(ctx.report().entries().len(), 2);
    }

    #[test]
    fn blocked_path_fails_the_task() {
        let (ctx, tmp) = context_for(ALICE);
        std::fs::create_dir_all(tmp.path().join("src/github.com")).unwrap();
        std::fs::write(tmp.path().join("src/github.com/alice"), "").unwrap();
        assert!(CreateSourceDirectories.run(&ctx).is_err());
    }
}
