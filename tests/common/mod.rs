// Shared helpers for integration tests.
//
// Provides a temporary home directory and a stub key generator so each
// integration test can run full provisioning passes without touching the
// real home or spawning `ssh-keygen`.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use devprofile_cli::config::Config;
use devprofile_cli::config::file::HierarchyFile;
use devprofile_cli::error::ExternalProcessError;
use devprofile_cli::keygen::{KeyGenerator, KeySpec};
use devprofile_cli::logging::{Log, Logger};
use devprofile_cli::lookup::NoLookup;
use devprofile_cli::platform::{Os, Platform};
use devprofile_cli::report::Report;
use devprofile_cli::tasks::{self, Context};

/// Key generator that writes placeholder key files.
#[derive(Debug, Default)]
pub struct StubKeyGenerator;

impl KeyGenerator for StubKeyGenerator {
    fn is_available(&self) -> bool {
        true
    }

    fn generate_key_pair(
        &self,
        path: &Path,
        spec: &KeySpec,
        comment: &str,
    ) -> Result<(), ExternalProcessError> {
        let fail = |e: std::io::Error| ExternalProcessError {
            command: "stub-keygen".to_string(),
            reason: e.to_string(),
        };
        std::fs::write(path, format!("PRIVATE {}", spec.algorithm)).map_err(fail)?;
        let mut public = path.as_os_str().to_os_string();
        public.push(".pub");
        std::fs::write(public, format!("ssh-rsa AAAA {comment}\n")).map_err(fail)
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
pub struct TestHome {
    /// Temporary directory used as `HOME`.
    pub dir: tempfile::TempDir,
}

impl TestHome {
    /// Create an empty home.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp home"),
        }
    }

    /// Path to the home directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `home/relative`.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Read `home/relative` to a string.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.join(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Build a task context for `hierarchy` (TOML text).
    pub fn context(&self, hierarchy: &str, dry_run: bool) -> (Context, Arc<Logger>) {
        let raw: HierarchyFile = toml::from_str(hierarchy).expect("parse hierarchy");
        let config = Config::from_file(&raw, self.path(), "test").expect("valid config");
        let log = Arc::new(Logger::new("test"));
        let ctx = Context::new(
            Arc::new(config),
            Platform::new(Os::Linux),
            Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            Arc::new(StubKeyGenerator),
            Arc::new(NoLookup),
        );
        (ctx, log)
    }

    /// Run every task once and return the run report and failed task count.
    pub fn provision(&self, hierarchy: &str, dry_run: bool) -> (Report, usize) {
        let (ctx, log) = self.context(hierarchy, dry_run);
        for task in tasks::all_tasks() {
            tasks::execute(task.as_ref(), &ctx);
        }
        (ctx.report(), log.failure_count())
    }
}

/// One standalone GitHub account.
pub const ALICE: &str = r#"
[[providers]]
name = "github.com"
accounts = ["alice"]
"#;

/// One Azure DevOps organisation account.
pub const CONTOSO_BOB: &str = r#"
[[providers]]
name = "dev.azure.com"

[[providers.organisations]]
name = "contoso"
accounts = ["bob"]
"#;
