//! `Host` blocks in the SSH client config.
use std::collections::HashSet;

use super::{Candidate, MergeTarget, merge_into, template_outcome};
use crate::config::Layout;
use crate::config::hierarchy::{Hierarchy, Identity};
use crate::platform::Platform;
use crate::report::{Report, Step};
use crate::template::{self, TemplateSet};

/// SSH config file mode.
pub const SSH_CONFIG_MODE: u32 = 0o600;

/// Marker that identifies an account's `Host` block.
#[must_use]
pub fn host_marker(identity: &Identity<'_>) -> String {
    format!("Host {}", identity.host_alias())
}

/// Append a `Host {account}.{provider}` block for every account that does
/// not have one yet. The config is created empty when absent.
///
/// Organisation and standalone accounts with the same name share one alias
/// and therefore one block.
#[must_use]
pub fn merge_ssh_config(
    layout: &Layout,
    hierarchy: &Hierarchy,
    templates: &TemplateSet,
    platform: Platform,
    dry_run: bool,
) -> Report {
    let mut seen = HashSet::new();
    let identities: Vec<Identity<'_>> = hierarchy
        .identities()
        .into_iter()
        .filter(|id| seen.insert(id.host_alias()))
        .collect();

    let text = match templates.get(template::SSH_HOST) {
        Ok(text) => text,
        Err(e) => {
            let mut report = Report::new();
            for id in identities {
                report.push(Step::SshConfig, id.host_alias(), template_outcome(&e));
            }
            return report;
        }
    };

    let keychain = platform.keychain_flag();
    let candidates = identities
        .iter()
        .map(|id| {
            let text = &text;
            Candidate::new(id.host_alias(), host_marker(id), move || {
                Ok(template::render(
                    text,
                    &[
                        ("username", id.account),
                        ("provider", id.provider.domain()),
                        ("hostname", id.provider.ssh_host()),
                        ("keychain", keychain),
                        ("ssh_dir", layout.ssh_dir.as_str()),
                    ],
                ))
            })
        })
        .collect();

    let target = MergeTarget::new(layout.ssh_config.clone(), Step::SshConfig)
        .with_mode(platform.supports_chmod().then_some(SSH_CONFIG_MODE))
        .create_when_absent();
    merge_into(&target, candidates, dry_run)
}
