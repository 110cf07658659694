//! Key-pair generation capability.
//!
//! The key provisioner only depends on [`KeyGenerator`]; production code
//! plugs in [`SshKeygen`], tests plug in a stub that writes placeholder files.
use std::path::Path;
use std::sync::Arc;

use crate::error::ExternalProcessError;
use crate::exec::{Executor, display_command};

/// Algorithm and size policy for generated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    /// Key type passed to the generator (e.g. `"rsa"`).
    pub algorithm: String,
    /// Key size in bits.
    pub bits: u32,
}

impl Default for KeySpec {
    fn default() -> Self {
        Self {
            algorithm: "rsa".to_string(),
            bits: 4096,
        }
    }
}

/// Something that can produce an SSH key pair at a given path.
///
/// Implementations write the private key to `path` and the public key to
/// `path` + `.pub`, with an empty passphrase.
#[cfg_attr(test, mockall::automock)]
pub trait KeyGenerator: Send + Sync {
    /// Whether the generator can run on this machine.
    fn is_available(&self) -> bool;

    /// Generate a key pair at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExternalProcessError`] carrying the attempted command if
    /// generation fails.
    fn generate_key_pair(
        &self,
        path: &Path,
        spec: &KeySpec,
        comment: &str,
    ) -> Result<(), ExternalProcessError>;
}

/// [`KeyGenerator`] that shells out to `ssh-keygen`.
pub struct SshKeygen {
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for SshKeygen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshKeygen")
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl SshKeygen {
    /// Program name looked up on `PATH`.
    pub const PROGRAM: &'static str = "ssh-keygen";

    /// Create a generator that runs `ssh-keygen` through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Build the `ssh-keygen` argument vector.
    fn args(path: &str, bits: &str, spec: &KeySpec, comment: &str) -> Vec<String> {
        [
            "-q",
            "-t",
            spec.algorithm.as_str(),
            "-b",
            bits,
            "-f",
            path,
            "-C",
            comment,
            "-N",
            "",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }
}

impl KeyGenerator for SshKeygen {
    fn is_available(&self) -> bool {
        self.executor.which(Self::PROGRAM)
    }

    fn generate_key_pair(
        &self,
        path: &Path,
        spec: &KeySpec,
        comment: &str,
    ) -> Result<(), ExternalProcessError> {
        let path = path.to_string_lossy();
        let bits = spec.bits.to_string();
        let args = Self::args(&path, &bits, spec, comment);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        self.executor
            .run(Self::PROGRAM, &args)
            .map(|_| ())
            .map_err(|e| ExternalProcessError {
                command: display_command(Self::PROGRAM, &args),
                reason: format!("{e:#}"),
            })
    }
}
