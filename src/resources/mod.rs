//! Idempotent resource primitives (check + apply pattern).
pub mod chmod;
pub mod directory;
pub mod helpers;
pub mod key_pair;

use anyhow::Result;

use crate::report::Outcome;

/// State of a resource on disk.
///
/// # Examples
///
/// ```
/// use devprofile_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let partial = ResourceState::Incorrect { current: "only alice_rsa.pub".into() };
/// let blocked = ResourceState::Invalid { reason: "a file occupies the path".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// The current value of the resource.
        current: String,
    },
    /// Resource cannot be applied (e.g. a file occupies a directory path).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined (I/O failures,
    /// permission issues).
    fn current_state(&self) -> Result<ResourceState>;

    /// Bring the resource to its desired state.
    ///
    /// Never deletes anything beyond what the resource itself owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be applied.
    fn apply(&self) -> Result<ResourceChange>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

/// Check `resource` and apply it if needed, mapping the result to a report
/// [`Outcome`]. Errors become [`Outcome::Failed`]; they never propagate.
///
/// `Missing` becomes `Created`, `Incorrect` becomes `Repaired`; in a dry
/// run both become `Planned` and nothing is applied.
pub fn reconcile(resource: &dyn Resource, dry_run: bool) -> Outcome {
    let state = match resource.current_state() {
        Ok(state) => state,
        Err(e) => {
            return Outcome::Failed {
                reason: format!("{e:#}"),
            };
        }
    };
    let fixed = match state {
        ResourceState::Correct => return Outcome::AlreadyExists,
        ResourceState::Invalid { reason } => return Outcome::Failed { reason },
        ResourceState::Missing if dry_run => return Outcome::Planned,
        ResourceState::Incorrect { .. } if dry_run => return Outcome::Planned,
        ResourceState::Missing => Outcome::Created,
        ResourceState::Incorrect { .. } => Outcome::Repaired,
    };
    match resource.apply() {
        Ok(ResourceChange::Applied) => fixed,
        Ok(ResourceChange::AlreadyCorrect) => Outcome::AlreadyExists,
        Ok(ResourceChange::Skipped { reason }) => Outcome::Skipped { reason },
        Err(e) => Outcome::Failed {
            reason: format!("{e:#}"),
        },
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct TestResource {
        state: ResourceState,
        result: Result<ResourceChange, String>,
        applied: Cell<bool>,
    }

    impl TestResource {
        fn new(state: ResourceState) -> Self {
            Self {
                state,
                result: Ok(ResourceChange::Applied),
                applied: Cell::new(false),
            }
        }
    }

    impl Resource for TestResource {
        fn description(&self) -> String {
            "test resource".to_string()
        }

        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.set(true);
            self.result.clone().map_err(|e| anyhow::anyhow!("{e}"))
        }
    }

    #[test]
    fn needs_change_for_missing_and_incorrect() {
        assert!(TestResource::new(ResourceState::Missing).needs_change().unwrap());
        let partial = ResourceState::Incorrect {
            current: "wrong".to_string(),
        };
        assert!(TestResource::new(partial).needs_change().unwrap());
        assert!(!TestResource::new(ResourceState::Correct).needs_change().unwrap());
    }

    #[test]
    fn reconcile_creates_missing() {
        let r = TestResource::new(ResourceState::Missing);
        assert_eq!(reconcile(&r, false), Outcome::Created);
        assert!(r.applied.get());
    }

    #[test]
    fn reconcile_repairs_incorrect() {
        let r = TestResource::new(ResourceState::Incorrect {
            current: "partial".into(),
        });
        assert_eq!(reconcile(&r, false), Outcome::Repaired);
    }

    #[test]
    fn reconcile_leaves_correct_alone() {
        let r = TestResource::new(ResourceState::Correct);
        assert_eq!(reconcile(&r, false), Outcome::AlreadyExists);
        assert!(!r.applied.get());
    }

    #[test]
    fn reconcile_dry_run_only_plans() {
        let r = TestResource::new(ResourceState::Missing);
        assert_eq!(reconcile(&r, true), Outcome::Planned);
        assert!(!r.applied.get());
    }

    #[test]
    fn reconcile_reports_invalid_and_errors_as_failed() {
        let r = TestResource::new(ResourceState::Invalid {
            reason: "a file occupies the path".into(),
        });
        assert_eq!(
            reconcile(&r, false),
            Outcome::Failed {
                reason: "a file occupies the path".into()
            }
        );

        let mut r = TestResource::new(ResourceState::Missing);
        r.result = Err("permission denied".into());
        assert_eq!(
            reconcile(&r, false),
            Outcome::Failed {
                reason: "permission denied".into()
            }
        );
    }
}
