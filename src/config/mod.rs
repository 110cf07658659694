//! Run configuration: settings, resolved layout and the identity hierarchy.
pub mod file;
pub mod hierarchy;
pub mod prompt;
pub mod sanitize;
pub mod toml_loader;
pub mod validation;

use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::keygen::KeySpec;
use hierarchy::Hierarchy;
use validation::ValidationWarning;

/// Tunables read from the `[settings]` table of the hierarchy file.
///
/// Every field is optional in the file; missing fields take the defaults
/// shown on [`Settings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Source root, relative to the home directory.
    pub source_dir: String,
    /// SSH root, relative to the home directory.
    pub ssh_dir: String,
    /// Key type passed to the generator.
    pub key_algorithm: String,
    /// Key size in bits.
    pub key_bits: u32,
    /// Directory whose files shadow the built-in templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Resolve GitHub numeric user ids for noreply addresses.
    pub github_lookup: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let key = KeySpec::default();
        Self {
            source_dir: "src".to_string(),
            ssh_dir: ".ssh".to_string(),
            key_algorithm: key.algorithm,
            key_bits: key.bits,
            templates_dir: None,
            github_lookup: true,
        }
    }
}

impl Settings {
    /// Key generation policy.
    #[must_use]
    pub fn key_spec(&self) -> KeySpec {
        KeySpec {
            algorithm: self.key_algorithm.clone(),
            bits: self.key_bits,
        }
    }
}

/// Normalise a home-relative directory setting to forward slashes.
fn relative_dir(setting: &'static str, value: &str) -> Result<String, SetupError> {
    let normalized = value.replace('\\', "/");
    let normalized = normalized.trim_matches('/');
    let invalid = || SetupError::InvalidLayoutDir {
        setting,
        value: value.to_string(),
    };
    if normalized.is_empty() || value.starts_with(['/', '\\']) || Path::new(value).is_absolute() {
        return Err(invalid());
    }
    if Path::new(normalized)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(invalid());
    }
    Ok(normalized.to_string())
}

/// Absolute paths every component works against, derived once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Home directory.
    pub home: PathBuf,
    /// Source root setting as written in `~/`-relative config text.
    pub source_dir: String,
    /// SSH root setting as written in `~/`-relative config text.
    pub ssh_dir: String,
    /// `home/source_dir`.
    pub source_root: PathBuf,
    /// `home/ssh_dir`.
    pub ssh_root: PathBuf,
    /// SSH client config (`ssh_root/config`).
    pub ssh_config: PathBuf,
    /// Top-level Git config (`home/.gitconfig`).
    pub gitconfig: PathBuf,
}

impl Layout {
    /// Resolve the layout for `home`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidLayoutDir`] when `source_dir` or
    /// `ssh_dir` is empty, absolute, or leaves the home directory.
    pub fn resolve(home: &Path, settings: &Settings) -> Result<Self, SetupError> {
        let source_dir = relative_dir("source_dir", &settings.source_dir)?;
        let ssh_dir = relative_dir("ssh_dir", &settings.ssh_dir)?;
        let source_root = home.join(&source_dir);
        let ssh_root = home.join(&ssh_dir);
        Ok(Self {
            home: home.to_path_buf(),
            ssh_config: ssh_root.join("config"),
            gitconfig: home.join(".gitconfig"),
            source_dir,
            ssh_dir,
            source_root,
            ssh_root,
        })
    }
}

/// Pick the home directory from an explicit override or the environment.
///
/// `HOME` wins over `USERPROFILE`. The result is canonicalized without the
/// Windows `\\?\` prefix.
///
/// # Errors
///
/// Returns a [`SetupError`] when no candidate is set or it cannot be
/// resolved.
pub fn resolve_home(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, SetupError> {
    let candidate = match explicit {
        Some(path) => path.to_path_buf(),
        None => env("HOME")
            .or_else(|| env("USERPROFILE"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or(SetupError::HomeNotSet)?,
    };
    dunce::canonicalize(&candidate).map_err(|source| SetupError::HomeUnresolvable {
        path: candidate.display().to_string(),
        source,
    })
}

/// Read an environment variable, treating invalid Unicode as unset.
#[must_use]
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Default location of the hierarchy file:
/// `$XDG_CONFIG_HOME/devprofile/hierarchy.toml`, falling back to
/// `~/.config/devprofile/hierarchy.toml`.
#[must_use]
pub fn default_hierarchy_path(home: &Path, env: impl Fn(&str) -> Option<String>) -> PathBuf {
    env("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map_or_else(|| home.join(".config"), PathBuf::from)
        .join("devprofile")
        .join("hierarchy.toml")
}

/// Everything a provisioning run needs, loaded and validated.
#[derive(Debug, Clone)]
pub struct Config {
    /// Effective settings.
    pub settings: Settings,
    /// Paths derived from the home directory and settings.
    pub layout: Layout,
    /// Validated identity hierarchy.
    pub hierarchy: Hierarchy,
    /// Entities dropped or renamed during validation.
    pub warnings: Vec<ValidationWarning>,
}

impl Config {
    /// Load and validate the hierarchy file at `path` for `home`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the layout
    /// settings are invalid. Invalid entities are dropped with a warning
    /// instead.
    pub fn load(path: &Path, home: &Path) -> Result<Self> {
        let raw: file::HierarchyFile = toml_loader::load_config(path)?;
        Self::from_file(&raw, home, &path.display().to_string())
    }

    /// Validate an in-memory hierarchy file; `source` names it in warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout settings are invalid.
    pub fn from_file(raw: &file::HierarchyFile, home: &Path, source: &str) -> Result<Self> {
        let layout = Layout::resolve(home, &raw.settings).context("resolving directory layout")?;
        let (hierarchy, warnings) = validation::build_hierarchy(raw, source);
        Ok(Self {
            settings: raw.settings.clone(),
            layout,
            hierarchy,
            warnings,
        })
    }
}
