//! SSH client config task.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_report};
use crate::merge::ssh_config::merge_ssh_config;

/// Append missing `Host` blocks to the SSH client config.
#[derive(Debug)]
pub struct MergeSshConfig;

impl Task for MergeSshConfig {
    fn name(&self) -> &'static str {
        "Merge SSH config"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.scope.ssh
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let config = &ctx.config;
        let report = merge_ssh_config(
            &config.layout,
            &config.hierarchy,
            &ctx.templates,
            ctx.platform,
            ctx.dry_run,
        );
        process_report(ctx, report)
    }
}
