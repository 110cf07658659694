//! Append-only merging of rendered blocks into shared config files.
//!
//! Each target is read once. A candidate is present when its marker occurs
//! anywhere in the current content, including blocks appended earlier in
//! the same pass. Absent candidates are rendered and appended, and the file
//! is written at most once. Existing text is never edited or removed.
pub mod git_config;
pub mod ssh_config;

use std::path::{Path, PathBuf};

use crate::error::ProvisionError;
use crate::report::{Outcome, Report, Step};
use crate::resources::chmod::ensure_mode;
use crate::resources::helpers::fs::{ensure_parent_dir, read_if_exists};

/// Deferred block renderer. `Err` carries a failure reason.
pub type Render<'a> = Box<dyn FnOnce() -> Result<String, String> + 'a>;

/// One block that should be present in a target file.
pub struct Candidate<'a> {
    /// Report subject.
    pub subject: String,
    /// Substring that identifies the block in existing content.
    pub marker: String,
    /// Produces the block text; only called when the marker is absent.
    pub render: Render<'a>,
}

impl std::fmt::Debug for Candidate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("subject", &self.subject)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

impl<'a> Candidate<'a> {
    /// Create a candidate.
    pub fn new(
        subject: impl Into<String>,
        marker: impl Into<String>,
        render: impl FnOnce() -> Result<String, String> + 'a,
    ) -> Self {
        Self {
            subject: subject.into(),
            marker: marker.into(),
            render: Box::new(render),
        }
    }
}

/// A file that blocks are merged into.
#[derive(Debug, Clone)]
pub struct MergeTarget {
    /// File path.
    pub path: PathBuf,
    /// Report step for entries about this file.
    pub step: Step,
    /// Permission mode applied after merging, when supported.
    pub mode: Option<u32>,
    /// Initial content when the file does not exist yet.
    pub preamble: String,
    /// Create the file even when no block is added.
    pub create_when_absent: bool,
}

impl MergeTarget {
    /// A target with no mode, no preamble, written only when a block is added.
    #[must_use]
    pub const fn new(path: PathBuf, step: Step) -> Self {
        Self {
            path,
            step,
            mode: None,
            preamble: String::new(),
            create_when_absent: false,
        }
    }

    /// Apply `mode` after writing.
    #[must_use]
    pub const fn with_mode(mut self, mode: Option<u32>) -> Self {
        self.mode = mode;
        self
    }

    /// Start a new file with `preamble`.
    #[must_use]
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Create the file even if nothing is appended.
    #[must_use]
    pub const fn create_when_absent(mut self) -> Self {
        self.create_when_absent = true;
        self
    }
}

/// Outcome for a template that could not be loaded.
///
/// A missing template skips the entity; anything else fails it.
#[must_use]
pub fn template_outcome(error: &ProvisionError) -> Outcome {
    match error {
        ProvisionError::TemplateMissing(e) => Outcome::Skipped {
            reason: e.to_string(),
        },
        other => Outcome::Failed {
            reason: other.to_string(),
        },
    }
}

fn append_block(content: &mut String, block: &str) {
    if !content.is_empty() && !content.ends_with('\n') && !block.starts_with('\n') {
        content.push('\n');
    }
    content.push_str(block);
    if !block.ends_with('\n') {
        content.push('\n');
    }
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content)
        .map_err(|e| crate::error::FilesystemError::new("write", path, e))?;
    Ok(())
}

/// Merge `candidates` into `target`, returning one entry per candidate in
/// candidate order.
#[must_use]
pub fn merge_into(target: &MergeTarget, candidates: Vec<Candidate<'_>>, dry_run: bool) -> Report {
    let mut report = Report::new();

    let existing = match read_if_exists(&target.path) {
        Ok(existing) => existing,
        Err(e) => {
            let reason = format!("{e:#}");
            for candidate in candidates {
                report.push(
                    target.step,
                    candidate.subject,
                    Outcome::Failed {
                        reason: reason.clone(),
                    },
                );
            }
            return report;
        }
    };
    let absent = existing.is_none();
    let mut content = existing.unwrap_or_else(|| target.preamble.clone());

    // None marks a block appended in this pass; resolved once the file is written
    let mut results: Vec<(String, Option<Outcome>)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if content.contains(&candidate.marker) {
            results.push((candidate.subject, Some(Outcome::AlreadyExists)));
            continue;
        }
        let outcome = match (candidate.render)() {
            Ok(block) if block.contains(&candidate.marker) => {
                append_block(&mut content, &block);
                None
            }
            Ok(_) => Some(Outcome::Failed {
                reason: format!(
                    "rendered block does not contain its marker '{}'",
                    candidate.marker
                ),
            }),
            Err(reason) => Some(Outcome::Failed { reason }),
        };
        results.push((candidate.subject, outcome));
    }
    let any_added = results.iter().any(|(_, outcome)| outcome.is_none());

    let appended = if dry_run {
        Ok(Outcome::Planned)
    } else {
        let written = if any_added || (absent && target.create_when_absent) {
            write_file(&target.path, &content)
        } else {
            Ok(())
        };
        written
            .and_then(|()| match target.mode {
                Some(mode) if target.path.exists() => ensure_mode(target.path.clone(), mode),
                _ => Ok(()),
            })
            .map(|()| Outcome::Created)
    };
    let appended = appended.map_err(|e| format!("{e:#}"));

    if let Err(reason) = &appended
        && !any_added
    {
        report.push(
            target.step,
            target.path.display().to_string(),
            Outcome::Failed {
                reason: reason.clone(),
            },
        );
    }
    for (subject, outcome) in results {
        let outcome = outcome.unwrap_or_else(|| match &appended {
            Ok(outcome) => outcome.clone(),
            Err(reason) => Outcome::Failed {
                reason: reason.clone(),
            },
        });
        report.push(target.step, subject, outcome);
    }
    report
}
