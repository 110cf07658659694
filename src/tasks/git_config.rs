//! Top-level and account-level Git config tasks.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_report};
use crate::merge::git_config::{merge_account_configs, merge_gitconfig};

/// Add a conditional include per account to `~/.gitconfig`.
#[derive(Debug)]
pub struct MergeGitConfig;

impl Task for MergeGitConfig {
    fn name(&self) -> &'static str {
        "Merge git config"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.scope.source && !ctx.config.hierarchy.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = &ctx.config;
        let report = merge_gitconfig(
            &config.layout,
            &config.hierarchy,
            &ctx.templates,
            ctx.platform.supports_chmod(),
            ctx.dry_run,
        );
        process_report(ctx, report)
    }
}

/// Write each account's identity into its own `.gitconfig`.
#[derive(Debug)]
pub struct MergeAccountGitConfigs;

impl Task for MergeAccountGitConfigs {
    fn name(&self) -> &'static str {
        "Merge account git configs"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.scope.source && !ctx.config.hierarchy.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = &ctx.config;
        let report = merge_account_configs(
            &config.layout,
            &config.hierarchy,
            &ctx.templates,
            ctx.lookup.as_ref(),
            ctx.log.as_ref(),
            ctx.dry_run,
        );
        process_report(ctx, report)
    }
}
