//! SSH key pair task.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_report};
use crate::resources::key_pair::provision_keys;

/// Ensure every account has a complete SSH key pair.
#[derive(Debug)]
pub struct ProvisionSshKeys;

impl Task for ProvisionSshKeys {
    fn name(&self) -> &'static str {
        "Provision SSH keys"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.scope.ssh && !ctx.config.hierarchy.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if !ctx.key_generator.is_available() {
            return Ok(TaskResult::Skipped("ssh-keygen not found".to_string()));
        }
        let config = &ctx.config;
        let report = provision_keys(
            &config.layout.ssh_root,
            &config.hierarchy,
            ctx.key_generator.as_ref(),
            &config.settings.key_spec(),
            ctx.platform.supports_chmod(),
            ctx.dry_run,
        );
        process_report(ctx, report)
    }
}
