//! Turning a raw hierarchy file into a validated [`Hierarchy`].
//!
//! Invalid entities are dropped and reported as [`ValidationWarning`]s;
//! everything else proceeds.
use super::file::HierarchyFile;
use super::hierarchy::{Account, Hierarchy, HostingProvider, Organisation, Provider};

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (file path, or `interactive`).
    pub source: String,
    /// The entity that triggered the warning (`provider[/org][/account]`).
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning about `item` found in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.source, self.item, self.message)
    }
}

/// Provider under construction; organisations keep their accounts apart
/// until the final fold.
struct Draft {
    kind: HostingProvider,
    organisations: Vec<(Organisation, Vec<Account>)>,
    accounts: Vec<Account>,
}

struct Collector<'a> {
    source: &'a str,
    warnings: Vec<ValidationWarning>,
}

impl Collector<'_> {
    fn warn(&mut self, item: impl Into<String>, message: impl Into<String>) {
        self.warnings
            .push(ValidationWarning::new(self.source, item, message));
    }

    fn note_renamed(&mut self, context: &str, raw: &str, name: &str) {
        if raw.trim() != name {
            self.warn(
                format!("{context}/{name}"),
                format!("name '{raw}' was sanitized to '{name}'"),
            );
        }
    }

    /// Validate `raw` and append it to `accounts` unless it is invalid or a
    /// duplicate within the same container.
    fn add_account(&mut self, accounts: &mut Vec<Account>, context: &str, raw: &str) {
        let account = match Account::new(raw) {
            Ok(account) => account,
            Err(e) => {
                self.warn(format!("{context}/{raw}"), format!("{e}; account dropped"));
                return;
            }
        };
        self.note_renamed(context, raw, account.name());
        if accounts.iter().any(|a| a.name() == account.name()) {
            self.warn(
                format!("{context}/{}", account.name()),
                "duplicate account; later entry dropped",
            );
            return;
        }
        accounts.push(account);
    }
}

/// Validate `raw` into a [`Hierarchy`].
///
/// - unknown providers and names that sanitize to nothing are dropped;
/// - a provider declared twice is merged into its first declaration, and
///   likewise for organisations within one provider;
/// - duplicate accounts within one container are dropped;
/// - empty organisations and providers are kept but warned about, since
///   they materialize nothing.
#[must_use]
pub fn build_hierarchy(raw: &HierarchyFile, source: &str) -> (Hierarchy, Vec<ValidationWarning>) {
    let mut out = Collector {
        source,
        warnings: Vec::new(),
    };
    let mut drafts: Vec<Draft> = Vec::new();

    for entry in &raw.providers {
        let kind = match entry.name.parse::<HostingProvider>() {
            Ok(kind) => kind,
            Err(e) => {
                out.warn(&entry.name, format!("{e}; provider dropped"));
                continue;
            }
        };

        let draft = if let Some(pos) = drafts.iter().position(|d| d.kind == kind) {
            out.warn(kind.domain(), "provider declared more than once; entries merged");
            drafts.get_mut(pos)
        } else {
            drafts.push(Draft {
                kind,
                organisations: Vec::new(),
                accounts: Vec::new(),
            });
            drafts.last_mut()
        };
        let Some(draft) = draft else { continue };

        for org_entry in &entry.organisations {
            let organisation = match Organisation::new(&org_entry.name) {
                Ok(o) => o,
                Err(e) => {
                    out.warn(
                        format!("{kind}/{}", org_entry.name),
                        format!("{e}; organisation dropped"),
                    );
                    continue;
                }
            };
            out.note_renamed(kind.domain(), &org_entry.name, organisation.name());
            let context = format!("{kind}/{}", organisation.name());

            let existing = draft
                .organisations
                .iter()
                .position(|(o, _)| o.name() == organisation.name());
            let slot = if let Some(pos) = existing {
                out.warn(&context, "organisation declared more than once; entries merged");
                draft.organisations.get_mut(pos)
            } else {
                draft.organisations.push((organisation, Vec::new()));
                draft.organisations.last_mut()
            };
            let Some((_, accounts)) = slot else { continue };

            for raw_account in &org_entry.accounts {
                out.add_account(accounts, &context, raw_account);
            }
        }

        for raw_account in &entry.accounts {
            out.add_account(&mut draft.accounts, kind.domain(), raw_account);
        }
    }

    let mut providers = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let mut provider = Provider::new(draft.kind);
        for (organisation, accounts) in draft.organisations {
            if accounts.is_empty() {
                out.warn(
                    format!("{}/{}", draft.kind, organisation.name()),
                    "organisation has no accounts; nothing to provision",
                );
            }
            provider = provider
                .with_organisation(accounts.into_iter().fold(organisation, Organisation::with_account));
        }
        provider = draft
            .accounts
            .into_iter()
            .fold(provider, Provider::with_account);
        if provider.is_empty() {
            out.warn(
                draft.kind.domain(),
                "provider has no accounts; nothing to provision",
            );
        }
        providers.push(provider);
    }

    (Hierarchy::new(providers), out.warnings)
}
