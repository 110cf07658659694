//! Declarative hierarchy file (`hierarchy.toml`).
//!
//! ```toml
//! [settings]
//! source_dir = "src"
//!
//! [[providers]]
//! name = "github.com"
//! accounts = ["alice"]
//!
//! [[providers.organisations]]
//! name = "contoso"
//! accounts = ["bob", "carol"]
//! ```
//!
//! Names are kept raw here; validation sanitizes them.
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::Settings;
use super::hierarchy::Hierarchy;

/// Top-level document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyFile {
    /// Optional `[settings]` table.
    #[serde(default)]
    pub settings: Settings,
    /// Declared providers in order.
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

/// One `[[providers]]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderEntry {
    /// Provider domain, e.g. `github.com`.
    pub name: String,
    /// Standalone accounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
    /// Organisations under this provider.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organisations: Vec<OrganisationEntry>,
}

/// One `[[providers.organisations]]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganisationEntry {
    /// Organisation name.
    pub name: String,
    /// Accounts in the organisation.
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl HierarchyFile {
    /// Describe an already validated hierarchy.
    #[must_use]
    pub fn from_hierarchy(hierarchy: &Hierarchy, settings: Settings) -> Self {
        let providers = hierarchy
            .providers()
            .iter()
            .map(|p| ProviderEntry {
                name: p.kind().to_string(),
                accounts: p.accounts().iter().map(|a| a.name().to_string()).collect(),
                organisations: p
                    .organisations()
                    .iter()
                    .map(|o| OrganisationEntry {
                        name: o.name().to_string(),
                        accounts: o.accounts().iter().map(|a| a.name().to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            settings,
            providers,
        }
    }

    /// Write the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        super::toml_loader::save_config(path, self)
    }
}
