//! SSH key pair provisioning.
//!
//! A pair is `absent` (neither file), `partial` (exactly one file) or
//! `complete` (both). Absent and partial pairs are (re)generated; complete
//! pairs are never regenerated, only their permissions are re-asserted.
use anyhow::{Result, bail};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::chmod::ensure_mode;
use super::helpers::fs::{ensure_parent_dir, remove_existing};
use super::{Resource, ResourceChange, ResourceState, reconcile};
use crate::config::hierarchy::Hierarchy;
use crate::keygen::{KeyGenerator, KeySpec};
use crate::report::{Outcome, Report, Step};

/// Private key mode.
pub const PRIVATE_KEY_MODE: u32 = 0o600;
/// Public key mode.
pub const PUBLIC_KEY_MODE: u32 = 0o644;

/// Public key path for a private key path.
#[must_use]
pub fn public_key_path(private: &Path) -> PathBuf {
    let mut name = private.as_os_str().to_os_string();
    name.push(".pub");
    PathBuf::from(name)
}

/// One account's key pair.
pub struct KeyPairResource<'a> {
    /// Private key path; the public key is alongside with `.pub`.
    pub private: PathBuf,
    /// Key comment (the account name).
    pub comment: String,
    spec: &'a KeySpec,
    generator: &'a dyn KeyGenerator,
    set_modes: bool,
}

impl std::fmt::Debug for KeyPairResource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairResource")
            .field("private", &self.private)
            .field("comment", &self.comment)
            .field("spec", &self.spec)
            .field("set_modes", &self.set_modes)
            .finish_non_exhaustive()
    }
}

impl<'a> KeyPairResource<'a> {
    /// Create a key pair resource. `set_modes` enables 0600/0644 handling.
    #[must_use]
    pub fn new(
        private: PathBuf,
        comment: impl Into<String>,
        spec: &'a KeySpec,
        generator: &'a dyn KeyGenerator,
        set_modes: bool,
    ) -> Self {
        Self {
            private,
            comment: comment.into(),
            spec,
            generator,
            set_modes,
        }
    }

    /// Public key path.
    #[must_use]
    pub fn public(&self) -> PathBuf {
        public_key_path(&self.private)
    }

    /// Set private and public key modes.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or cannot be changed.
    pub fn assert_modes(&self) -> Result<()> {
        if self.set_modes {
            ensure_mode(self.private.clone(), PRIVATE_KEY_MODE)?;
            ensure_mode(self.public(), PUBLIC_KEY_MODE)?;
        }
        Ok(())
    }

    fn remove_both(&self) -> Result<()> {
        remove_existing(&self.private)?;
        remove_existing(&self.public())
    }
}

impl Resource for KeyPairResource<'_> {
    fn description(&self) -> String {
        self.private.display().to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        let public = self.public();
        for path in [&self.private, &public] {
            if path.is_dir() {
                return Ok(ResourceState::Invalid {
                    reason: format!("a directory occupies {}", path.display()),
                });
            }
        }
        match (self.private.exists(), public.exists()) {
            (true, true) => Ok(ResourceState::Correct),
            (false, false) => Ok(ResourceState::Missing),
            (true, false) => Ok(ResourceState::Incorrect {
                current: format!("public key {} is missing", public.display()),
            }),
            (false, true) => Ok(ResourceState::Incorrect {
                current: format!("private key {} is missing", self.private.display()),
            }),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        // Partial pairs are regenerated from scratch
        self.remove_both()?;
        ensure_parent_dir(&self.private)?;

        if let Err(e) = self
            .generator
            .generate_key_pair(&self.private, self.spec, &self.comment)
        {
            // Leave the pair absent rather than half-written
            self.remove_both()?;
            return Err(e.into());
        }
        if !self.private.exists() || !self.public().exists() {
            self.remove_both()?;
            bail!(
                "key generator did not produce both {} and {}",
                self.private.display(),
                self.public().display()
            );
        }
        self.assert_modes()?;
        Ok(ResourceChange::Applied)
    }
}

/// Ensure every account has a complete key pair under `ssh_root`.
///
/// Each key path is handled once even when several identities share it
/// (an organisation account and a standalone account with the same name).
#[must_use]
pub fn provision_keys(
    ssh_root: &Path,
    hierarchy: &Hierarchy,
    generator: &dyn KeyGenerator,
    spec: &KeySpec,
    set_modes: bool,
    dry_run: bool,
) -> Report {
    let mut report = Report::new();
    let mut seen = HashSet::new();
    for id in hierarchy.identities() {
        let private = id.key_path(ssh_root);
        if !seen.insert(private.clone()) {
            continue;
        }
        let resource = KeyPairResource::new(private, id.account, spec, generator, set_modes);
        let mut outcome = reconcile(&resource, dry_run);
        if outcome == Outcome::AlreadyExists
            && !dry_run
            && let Err(e) = resource.assert_modes()
        {
            outcome = Outcome::Failed {
                reason: format!("{e:#}"),
            };
        }
        report.push(Step::KeyPair, resource.description(), outcome);
    }
    report
}
