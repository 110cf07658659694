//! Per-task result and outcome tallying.
use anyhow::{Result, bail};

use super::context::Context;
use crate::report::{Outcome, Report, ReportEntry};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use devprofile_cli::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("ssh-keygen not found".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task was skipped (a required tool is missing).
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for tasks that process many entities.
///
/// Provides consistent summary logging across all tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of entities created, repaired or planned.
    pub changed: u32,
    /// Number of entities already in the correct state.
    pub already_ok: u32,
    /// Number of entities skipped (e.g. no template for the provider).
    pub skipped: u32,
    /// Number of entities that failed.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome.
    pub const fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created | Outcome::Repaired | Outcome::Planned => self.changed += 1,
            Outcome::AlreadyExists => self.already_ok += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    ///
    /// # Examples
    ///
    /// ```
    /// use devprofile_cli::tasks::TaskStats;
    ///
    /// let stats = TaskStats { changed: 5, already_ok: 12, skipped: 0, failed: 1 };
    /// assert_eq!(stats.summary(false), "5 changed, 12 already ok, 1 failed");
    /// assert_eq!(stats.summary(true), "5 would change, 12 already ok, 1 failed");
    /// ```
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }

    /// Log the summary and return the appropriate `TaskResult`.
    ///
    /// # Errors
    ///
    /// Returns an error when any entity failed, so the task is recorded as
    /// failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            bail!("{} of {} entities failed", self.failed, self.total());
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }

    const fn total(&self) -> u32 {
        self.changed + self.already_ok + self.skipped + self.failed
    }
}

/// Log a single report entry at the level its outcome warrants.
fn log_entry(ctx: &Context, entry: &ReportEntry) {
    let subject = &entry.subject;
    match &entry.outcome {
        Outcome::Created => ctx.log.info(&format!("created {subject}")),
        Outcome::Repaired => ctx.log.info(&format!("repaired {subject}")),
        Outcome::Planned => ctx.log.dry_run(&format!("would provision {subject}")),
        Outcome::AlreadyExists => ctx.log.debug(&format!("ok: {subject} (already exists)")),
        Outcome::Skipped { reason } => ctx.log.warn(&format!("skipped {subject}: {reason}")),
        Outcome::Failed { reason } => ctx.log.error(&format!("{subject}: {reason}")),
    }
}

/// Log every entry of a step's report, add it to the run report and
/// summarize it.
///
/// # Errors
///
/// Returns an error when any entry failed.
pub fn process_report(ctx: &Context, report: Report) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for entry in report.entries() {
        log_entry(ctx, entry);
        stats.count(&entry.outcome);
    }
    ctx.record(report);
    stats.finish(ctx)
}
