//! Domain-specific error types for the provisioning engine.
//!
//! Engine code returns the typed errors below; command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//! Per-entity failures never propagate past the step that produced them:
//! they are turned into report entries and logged.
//!
//! # Error hierarchy
//!
//! ```text
//! ProvisionError
//! ├── Validation(ValidationError)          — empty names, unknown providers
//! ├── Filesystem(FilesystemError)          — create/permission/read/write failures
//! ├── ExternalProcess(ExternalProcessError)— key generation failed
//! ├── TemplateMissing(TemplateMissingError)— no template for a provider
//! ├── RemoteLookup(RemoteLookupError)      — user id lookup failed
//! └── Setup(SetupError)                    — home / config resolution (fatal)
//! ```

use thiserror::Error;

/// Top-level error type for the provisioning engine.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// A name or provider in the hierarchy was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A filesystem operation failed.
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// The external key generator failed.
    #[error("External process error: {0}")]
    ExternalProcess(#[from] ExternalProcessError),

    /// No template is available for the requested entry.
    #[error("Template error: {0}")]
    TemplateMissing(#[from] TemplateMissingError),

    /// A remote identifier lookup failed.
    #[error("Remote lookup error: {0}")]
    RemoteLookup(#[from] RemoteLookupError),

    /// Startup could not resolve the environment.
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),
}

/// Errors raised while turning raw input into hierarchy names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The name sanitized to the empty string.
    #[error("{kind} name '{raw}' is empty after sanitization")]
    EmptyName {
        /// Entity kind (`"account"`, `"organisation"`).
        kind: &'static str,
        /// The raw input as supplied.
        raw: String,
    },

    /// The name would address the parent or current directory (`.`/`..`).
    #[error("{kind} name '{name}' is reserved")]
    ReservedName {
        /// Entity kind (`"account"`, `"organisation"`).
        kind: &'static str,
        /// The sanitized name.
        name: String,
    },

    /// The provider is not one of the supported hosting providers.
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
}

/// A filesystem operation that failed for one path.
#[derive(Error, Debug)]
#[error("{operation} {path}: {source}")]
pub struct FilesystemError {
    /// Short verb describing the operation (e.g. `"create directory"`).
    pub operation: &'static str,
    /// Path the operation targeted.
    pub path: String,
    /// Underlying I/O error.
    pub source: std::io::Error,
}

impl FilesystemError {
    /// Build an error for `operation` on `path`.
    pub fn new(operation: &'static str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self {
            operation,
            path: path.display().to_string(),
            source,
        }
    }
}

/// The external key generator could not produce a key pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("command `{command}` failed: {reason}")]
pub struct ExternalProcessError {
    /// The exact command line that was attempted.
    pub command: String,
    /// Exit status or spawn failure description.
    pub reason: String,
}

/// No template exists for the requested entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no template '{name}'")]
pub struct TemplateMissingError {
    /// Relative template name (e.g. `accounts/sourceforge.net.gitconfig`).
    pub name: String,
}

/// A remote user lookup failed or returned an unusable response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteLookupError {
    /// The HTTP request failed (network, non-2xx status, timeout).
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Requested URL.
        url: String,
        /// Failure description.
        reason: String,
    },

    /// The response was not valid JSON.
    #[error("invalid response from {url}: {reason}")]
    InvalidResponse {
        /// Requested URL.
        url: String,
        /// Parse failure description.
        reason: String,
    },

    /// The response did not carry the expected field.
    #[error("field '{field}' missing in response from {url}")]
    MissingField {
        /// Requested URL.
        url: String,
        /// Name of the absent field.
        field: &'static str,
    },
}

/// Fatal errors raised while resolving the run environment.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Neither `HOME` nor `USERPROFILE` is set.
    #[error("cannot resolve home directory: neither HOME nor USERPROFILE is set")]
    HomeNotSet,

    /// The home directory does not exist or cannot be resolved.
    #[error("cannot resolve home directory {path}: {source}")]
    HomeUnresolvable {
        /// The candidate home path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configured root directory is empty, absolute, or escapes the home
    /// directory.
    #[error("invalid {setting} '{value}': must be a non-empty path inside the home directory")]
    InvalidLayoutDir {
        /// Settings key (`source_dir` or `ssh_dir`).
        setting: &'static str,
        /// The configured value.
        value: String,
    },
}
