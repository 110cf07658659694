//! Directory materialization for the source and SSH trees.
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{Resource, ResourceChange, ResourceState, reconcile};
use crate::config::hierarchy::Hierarchy;
use crate::error::FilesystemError;
use crate::report::{Report, Step};

/// Which tree is being materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryLayout {
    /// `root/provider/[organisation/]account`.
    Source,
    /// `root/provider/account`; organisations are not reflected.
    Ssh,
}

impl DirectoryLayout {
    const fn step(self) -> Step {
        match self {
            Self::Source => Step::SourceDirectory,
            Self::Ssh => Step::SshDirectory,
        }
    }
}

/// A directory that must exist.
#[derive(Debug, Clone)]
pub struct DirectoryResource {
    /// Absolute directory path.
    pub path: PathBuf,
}

impl DirectoryResource {
    /// Create a directory resource.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Resource for DirectoryResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn current_state(&self) -> Result<ResourceState> {
        match std::fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Ok(ResourceState::Correct),
            Ok(_) => Ok(ResourceState::Invalid {
                reason: format!("a file occupies {}", self.path.display()),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResourceState::Missing),
            Err(e) => Err(FilesystemError::new("inspect directory", &self.path, e).into()),
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        std::fs::create_dir_all(&self.path)
            .map_err(|e| FilesystemError::new("create directory", &self.path, e))?;
        Ok(ResourceChange::Applied)
    }
}

/// Directory paths for every identity under `root`, deduplicated and in
/// traversal order.
#[must_use]
pub fn directory_paths(root: &Path, hierarchy: &Hierarchy, layout: DirectoryLayout) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    hierarchy
        .identities()
        .iter()
        .map(|id| match layout {
            DirectoryLayout::Source => id.source_dir(root),
            DirectoryLayout::Ssh => id.ssh_dir(root),
        })
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Ensure every identity's directory exists under `root`.
///
/// Creates only; never deletes or renames. A failure is recorded for that
/// path and the traversal continues.
#[must_use]
pub fn materialize(
    root: &Path,
    hierarchy: &Hierarchy,
    layout: DirectoryLayout,
    dry_run: bool,
) -> Report {
    let mut report = Report::new();
    for path in directory_paths(root, hierarchy, layout) {
        let resource = DirectoryResource::new(path);
        let outcome = reconcile(&resource, dry_run);
        report.push(layout.step(), resource.description(), outcome);
    }
    report
}
