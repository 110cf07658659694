//! Per-entity outcome report for one provisioning run.
//!
//! Every step appends one [`ReportEntry`] per subject it looked at. A second
//! run over an unchanged tree reports [`Outcome::AlreadyExists`] everywhere.
use std::fmt;

/// Which provisioning step produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Source directory under the source root.
    SourceDirectory,
    /// Per-account directory under the SSH root.
    SshDirectory,
    /// SSH key pair.
    KeyPair,
    /// `Host` block in the SSH client config.
    SshConfig,
    /// Conditional include in the top-level Git config.
    GitConfig,
    /// Identity block in an account-level Git config.
    AccountGitConfig,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SourceDirectory => "source directory",
            Self::SshDirectory => "ssh directory",
            Self::KeyPair => "key pair",
            Self::SshConfig => "ssh config",
            Self::GitConfig => "git config",
            Self::AccountGitConfig => "account git config",
        })
    }
}

/// What happened to one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Created from nothing.
    Created,
    /// Already present; nothing was touched.
    AlreadyExists,
    /// Partially present and regenerated.
    Repaired,
    /// Would have been created or repaired (dry run).
    Planned,
    /// Deliberately not processed.
    Skipped {
        /// Why the subject was skipped.
        reason: String,
    },
    /// Processing failed; siblings were unaffected.
    Failed {
        /// Error description.
        reason: String,
    },
}

impl Outcome {
    /// Whether this outcome changed (or would change) the filesystem.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Repaired | Self::Planned)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::AlreadyExists => f.write_str("already exists"),
            Self::Repaired => f.write_str("repaired"),
            Self::Planned => f.write_str("planned"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// One line of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Step that produced the entry.
    pub step: Step,
    /// What was looked at (a path, or `provider/[org/]account`).
    pub subject: String,
    /// What happened.
    pub outcome: Outcome,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.step, self.subject, self.outcome)
    }
}

/// Ordered collection of [`ReportEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, step: Step, subject: impl Into<String>, outcome: Outcome) {
        self.entries.push(ReportEntry {
            step,
            subject: subject.into(),
            outcome,
        });
    }

    /// Append every entry of `other`.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Entries produced by `step`.
    pub fn for_step(&self, step: Step) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.step == step)
    }

    /// Whether any entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, Outcome::Failed { .. }))
    }

    /// `true` when every entry is [`Outcome::AlreadyExists`].
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.outcome == Outcome::AlreadyExists)
    }
}
