//! Identity hierarchy model: providers, organisations and accounts.
//!
//! The tree has three fixed levels and no back-references. Traversal goes
//! through [`Hierarchy::identities`], which hands every account out together
//! with its parent context as an [`Identity`].
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize;
use crate::error::ValidationError;

/// A supported source-hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HostingProvider {
    /// Bitbucket Cloud.
    #[serde(rename = "bitbucket.org")]
    Bitbucket,
    /// Azure DevOps.
    #[serde(rename = "dev.azure.com")]
    AzureDevOps,
    /// GitHub.
    #[serde(rename = "github.com")]
    GitHub,
    /// GitLab.
    #[serde(rename = "gitlab.com")]
    GitLab,
    /// SourceForge.
    #[serde(rename = "sourceforge.net")]
    SourceForge,
}

impl HostingProvider {
    /// Every supported provider, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Bitbucket,
        Self::AzureDevOps,
        Self::GitHub,
        Self::GitLab,
        Self::SourceForge,
    ];

    /// Domain name used for directories, host aliases and template names.
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::Bitbucket => "bitbucket.org",
            Self::AzureDevOps => "dev.azure.com",
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
            Self::SourceForge => "sourceforge.net",
        }
    }

    /// Host that serves Git over SSH. Azure DevOps uses a dedicated
    /// `ssh.` subdomain; every other provider serves SSH at its domain.
    #[must_use]
    pub const fn ssh_host(self) -> &'static str {
        match self {
            Self::AzureDevOps => "ssh.dev.azure.com",
            other => other.domain(),
        }
    }
}

impl fmt::Display for HostingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.domain())
    }
}

impl FromStr for HostingProvider {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.domain().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownProvider(s.to_string()))
    }
}

/// Sanitize `raw` and reject names that cannot be used as a path segment.
fn validated_name(kind: &'static str, raw: &str) -> Result<String, ValidationError> {
    let name = sanitize(raw);
    if name.is_empty() {
        return Err(ValidationError::EmptyName {
            kind,
            raw: raw.to_string(),
        });
    }
    if name.chars().all(|c| c == '.') && name.len() <= 2 {
        return Err(ValidationError::ReservedName { kind, name });
    }
    Ok(name)
}

/// An individual identity (username) under a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    name: String,
}

impl Account {
    /// Create an account from raw input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is empty or reserved after
    /// sanitization.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validated_name("account", raw)?,
        })
    }

    /// Sanitized account name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named group under a provider owning an ordered list of accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organisation {
    name: String,
    accounts: Vec<Account>,
}

impl Organisation {
    /// Create an empty organisation from raw input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is empty or reserved after
    /// sanitization.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validated_name("organisation", raw)?,
            accounts: Vec::new(),
        })
    }

    /// Append an account, preserving insertion order.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Sanitized organisation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accounts in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}

/// A hosting provider with its organisations and standalone accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    kind: HostingProvider,
    organisations: Vec<Organisation>,
    accounts: Vec<Account>,
}

impl Provider {
    /// Create a provider with no organisations or accounts.
    #[must_use]
    pub const fn new(kind: HostingProvider) -> Self {
        Self {
            kind,
            organisations: Vec::new(),
            accounts: Vec::new(),
        }
    }

    /// Append an organisation.
    #[must_use]
    pub fn with_organisation(mut self, organisation: Organisation) -> Self {
        self.organisations.push(organisation);
        self
    }

    /// Append a standalone account.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Which hosting provider this is.
    #[must_use]
    pub const fn kind(&self) -> HostingProvider {
        self.kind
    }

    /// Organisations in insertion order.
    #[must_use]
    pub fn organisations(&self) -> &[Organisation] {
        &self.organisations
    }

    /// Standalone accounts in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// `true` when the provider would produce no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.organisations.iter().all(|o| o.accounts.is_empty())
    }
}

/// The full declared tree. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    providers: Vec<Provider>,
}

impl Hierarchy {
    /// Build a hierarchy from providers in declaration order.
    #[must_use]
    pub const fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// All declared providers, including empty ones.
    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// `true` when no provider yields an identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.iter().all(Provider::is_empty)
    }

    /// Every account together with its parent context.
    ///
    /// Order: providers in declaration order; within a provider, each
    /// organisation's accounts first, then the standalone accounts. Empty
    /// organisations and providers contribute nothing.
    #[must_use]
    pub fn identities(&self) -> Vec<Identity<'_>> {
        let mut out = Vec::new();
        for provider in &self.providers {
            for organisation in &provider.organisations {
                for account in &organisation.accounts {
                    out.push(Identity {
                        provider: provider.kind,
                        organisation: Some(&organisation.name),
                        account: &account.name,
                    });
                }
            }
            for account in &provider.accounts {
                out.push(Identity {
                    provider: provider.kind,
                    organisation: None,
                    account: &account.name,
                });
            }
        }
        out
    }
}

/// One account as reached through the tree, with explicit parent context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity<'a> {
    /// Owning provider.
    pub provider: HostingProvider,
    /// Owning organisation, or `None` for a standalone account.
    pub organisation: Option<&'a str>,
    /// Account name.
    pub account: &'a str,
}

impl Identity<'_> {
    /// `provider/[organisation/]account` with forward slashes.
    #[must_use]
    pub fn relative_source(&self) -> String {
        match self.organisation {
            Some(org) => format!("{}/{org}/{}", self.provider, self.account),
            None => format!("{}/{}", self.provider, self.account),
        }
    }

    /// The account's working directory under `source_root`.
    #[must_use]
    pub fn source_dir(&self, source_root: &Path) -> PathBuf {
        let base = source_root.join(self.provider.domain());
        match self.organisation {
            Some(org) => base.join(org).join(self.account),
            None => base.join(self.account),
        }
    }

    /// The account's SSH directory; organisation nesting is not reflected.
    #[must_use]
    pub fn ssh_dir(&self, ssh_root: &Path) -> PathBuf {
        ssh_root.join(self.provider.domain()).join(self.account)
    }

    /// Path of the private key; the public key adds `.pub`.
    #[must_use]
    pub fn key_path(&self, ssh_root: &Path) -> PathBuf {
        self.ssh_dir(ssh_root).join(format!("{}_rsa", self.account))
    }

    /// SSH host alias `{account}.{provider}`.
    #[must_use]
    pub fn host_alias(&self) -> String {
        format!("{}.{}", self.account, self.provider)
    }
}

impl fmt::Display for Identity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_source())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn account(name: &str) -> Account {
        Account::new(name).unwrap()
    }

    fn sample() -> Hierarchy {
        Hierarchy::new(vec![
            Provider::new(HostingProvider::GitHub)
                .with_organisation(
                    Organisation::new("contoso")
                        .unwrap()
                        .with_account(account("bob"))
                        .with_account(account("alice")),
                )
                .with_organisation(Organisation::new("empty-org").unwrap())
                .with_account(account("bob")),
            Provider::new(HostingProvider::GitLab),
        ])
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(
            " GitHub.com ".parse::<HostingProvider>().unwrap(),
            HostingProvider::GitHub
        );
        assert_eq!(
            "dev.azure.com".parse::<HostingProvider>().unwrap(),
            HostingProvider::AzureDevOps
        );
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = "codeberg.org".parse::<HostingProvider>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownProvider("codeberg.org".into()));
    }

    #[test]
    fn provider_display_is_domain() {
        for p in HostingProvider::ALL {
            assert_eq!(p.to_string(), p.domain());
        }
    }

    #[test]
    fn only_azure_uses_a_separate_ssh_host() {
        assert_eq!(HostingProvider::AzureDevOps.ssh_host(), "ssh.dev.azure.com");
        assert_eq!(HostingProvider::GitHub.ssh_host(), "github.com");
        assert_eq!(HostingProvider::Bitbucket.ssh_host(), "bitbucket.org");
    }

    #[test]
    fn account_name_is_sanitized() {
        assert_eq!(account("  alice smith ").name(), "alicesmith");
    }

    #[test]
    fn empty_account_name_is_rejected() {
        let err = Account::new(" !! ").unwrap_err();
        assert!(matches!(err, ValidationError::EmptyName { kind: "account", .. }));
    }

    #[test]
    fn dot_names_are_reserved() {
        assert!(matches!(
            Organisation::new("..").unwrap_err(),
            ValidationError::ReservedName { .. }
        ));
        assert!(matches!(
            Account::new(".").unwrap_err(),
            ValidationError::ReservedName { .. }
        ));
        assert_eq!(account("...").name(), "...");
    }

    #[test]
    fn identities_follow_declaration_order() {
        let h = sample();
        let ids: Vec<String> = h.identities().iter().map(ToString::to_string).collect();
        assert_eq!(
            ids,
            [
                "github.com/contoso/bob",
                "github.com/contoso/alice",
                "github.com/bob"
            ]
        );
    }

    #[test]
    fn organisational_and_standalone_same_name_are_distinct() {
        let h = sample();
        let ids = h.identities();
        let org_bob = ids[0];
        let solo_bob = ids[2];
        assert_ne!(org_bob, solo_bob);

        let root = Path::new("/home/u/src");
        assert_ne!(org_bob.source_dir(root), solo_bob.source_dir(root));
        // The SSH layout is flat, so both share a key directory
        let ssh = Path::new("/home/u/.ssh");
        assert_eq!(org_bob.ssh_dir(ssh), solo_bob.ssh_dir(ssh));
    }

    #[test]
    fn empty_containers_are_not_materialized() {
        let h = sample();
        assert!(h.providers()[1].is_empty());
        assert!(!h.is_empty());
        assert!(Hierarchy::new(vec![Provider::new(HostingProvider::GitLab)]).is_empty());
        assert!(Hierarchy::default().identities().is_empty());
    }

    #[test]
    fn identity_paths() {
        let id = Identity {
            provider: HostingProvider::AzureDevOps,
            organisation: Some("contoso"),
            account: "bob",
        };
        assert_eq!(
            id.source_dir(Path::new("/h/src")),
            PathBuf::from("/h/src/dev.azure.com/contoso/bob")
        );
        assert_eq!(
            id.ssh_dir(Path::new("/h/.ssh")),
            PathBuf::from("/h/.ssh/dev.azure.com/bob")
        );
        assert_eq!(
            id.key_path(Path::new("/h/.ssh")),
            PathBuf::from("/h/.ssh/dev.azure.com/bob/bob_rsa")
        );
        assert_eq!(id.host_alias(), "bob.dev.azure.com");
        assert_eq!(id.relative_source(), "dev.azure.com/contoso/bob");
    }
}
