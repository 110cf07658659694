//! Top-level and per-account Git configuration.
//!
//! The top-level `~/.gitconfig` gets one `includeIf "gitdir:..."` block per
//! account directory; each included file carries that account's identity.
use super::{Candidate, MergeTarget, merge_into, template_outcome};
use crate::config::Layout;
use crate::config::hierarchy::{Hierarchy, HostingProvider, Identity};
use crate::logging::Log;
use crate::lookup::UserLookup;
use crate::report::{Report, Step};
use crate::template::{self, TemplateSet};

/// Top-level Git config mode.
pub const GITCONFIG_MODE: u32 = 0o644;

/// File name of the account-level config inside the account directory.
pub const ACCOUNT_GITCONFIG: &str = ".gitconfig";

/// Marker of an account's conditional include block.
#[must_use]
pub fn include_marker(source_dir: &str, identity: &Identity<'_>) -> String {
    format!("gitdir:~/{source_dir}/{}/", identity.relative_source())
}

/// Commit email for an account.
///
/// Organisation accounts use `{account}@{organisation}.com`. Standalone
/// GitHub accounts use the noreply address, prefixed with the numeric user
/// id when it is known; other standalone accounts use `{account}@{provider}`.
#[must_use]
pub fn email_address(identity: &Identity<'_>, github_id: &str) -> String {
    match (identity.organisation, identity.provider) {
        (Some(org), _) => format!("{}@{org}.com", identity.account),
        (None, HostingProvider::GitHub) if github_id.is_empty() => {
            format!("{}@users.noreply.github.com", identity.account)
        }
        (None, HostingProvider::GitHub) => {
            format!("{github_id}+{}@users.noreply.github.com", identity.account)
        }
        (None, provider) => format!("{}@{provider}", identity.account),
    }
}

/// Marker of an account's identity block.
///
/// Organisation accounts are recognised by their email line, standalone
/// accounts by their name line.
#[must_use]
pub fn account_marker(identity: &Identity<'_>) -> String {
    match identity.organisation {
        Some(_) => format!("email = {}", email_address(identity, "")),
        None => format!("name = {}", identity.account),
    }
}

/// Append a conditional include for every account directory to the
/// top-level Git config, writing the preamble first when the file is new.
#[must_use]
pub fn merge_gitconfig(
    layout: &Layout,
    hierarchy: &Hierarchy,
    templates: &TemplateSet,
    set_modes: bool,
    dry_run: bool,
) -> Report {
    let identities = hierarchy.identities();
    let loaded = templates
        .get(template::GITCONFIG_INCLUDE)
        .and_then(|include| Ok((include, templates.get(template::GITCONFIG_PREAMBLE)?)));
    let (include, preamble) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            let mut report = Report::new();
            for id in &identities {
                report.push(Step::GitConfig, id.to_string(), template_outcome(&e));
            }
            return report;
        }
    };

    let source_dir = layout.source_dir.as_str();
    let candidates = identities
        .iter()
        .map(|id| {
            let include = &include;
            Candidate::new(id.to_string(), include_marker(source_dir, id), move || {
                let path = id.relative_source();
                Ok(template::render(
                    include,
                    &[("source_dir", source_dir), ("path", path.as_str())],
                ))
            })
        })
        .collect();

    let target = MergeTarget::new(layout.gitconfig.clone(), Step::GitConfig)
        .with_mode(set_modes.then_some(GITCONFIG_MODE))
        .with_preamble(preamble.into_owned());
    merge_into(&target, candidates, dry_run)
}

/// Resolve the GitHub user id for `identity`, or an empty string.
fn github_id(identity: &Identity<'_>, lookup: &dyn UserLookup, log: &dyn Log) -> String {
    if identity.provider != HostingProvider::GitHub {
        return String::new();
    }
    lookup.user_id(identity.account).unwrap_or_else(|e| {
        log.warn(&format!("{identity}: user id lookup failed, rendering it empty: {e}"));
        String::new()
    })
}

/// Append an identity block to each account's own `.gitconfig`.
///
/// Accounts whose provider has no template are skipped. The remote user id
/// is only looked up when a block actually has to be rendered.
#[must_use]
pub fn merge_account_configs(
    layout: &Layout,
    hierarchy: &Hierarchy,
    templates: &TemplateSet,
    lookup: &dyn UserLookup,
    log: &dyn Log,
    dry_run: bool,
) -> Report {
    let mut report = Report::new();
    for id in hierarchy.identities() {
        let text = match templates.get(&template::account_template(id.provider)) {
            Ok(text) => text,
            Err(e) => {
                report.push(Step::AccountGitConfig, id.to_string(), template_outcome(&e));
                continue;
            }
        };

        let candidate = Candidate::new(id.to_string(), account_marker(&id), || {
            let user_id = github_id(&id, lookup, log);
            let email = email_address(&id, &user_id);
            Ok(template::render(
                &text,
                &[
                    ("username", id.account),
                    ("organisation", id.organisation.unwrap_or(id.account)),
                    ("email", email.as_str()),
                    ("github_id", user_id.as_str()),
                    ("provider", id.provider.domain()),
                    ("ssh_dir", layout.ssh_dir.as_str()),
                ],
            ))
        });

        let path = id.source_dir(&layout.source_root).join(ACCOUNT_GITCONFIG);
        let target = MergeTarget::new(path, Step::AccountGitConfig);
        report.extend(merge_into(&target, vec![candidate], dry_run));
    }
    report
}
