//! Shared state handed to every task.
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::keygen::KeyGenerator;
use crate::logging::Log;
use crate::lookup::UserLookup;
use crate::platform::Platform;
use crate::report::Report;
use crate::template::TemplateSet;

/// Which halves of the pass are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Source directories and Git configuration.
    pub source: bool,
    /// SSH directories, keys and the SSH config.
    pub ssh: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            source: true,
            ssh: true,
        }
    }
}

/// Shared context for task execution.
pub struct Context {
    /// Validated configuration.
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Platform,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Enabled halves of the pass.
    pub scope: Scope,
    /// Key pair generator.
    pub key_generator: Arc<dyn KeyGenerator>,
    /// Remote user id lookup.
    pub lookup: Arc<dyn UserLookup>,
    /// Block templates.
    pub templates: TemplateSet,
    report: Mutex<Report>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("scope", &self.scope)
            .field("key_generator", &"<dyn KeyGenerator>")
            .field("lookup", &"<dyn UserLookup>")
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context for task execution.
    ///
    /// Templates come from `config.settings.templates_dir` when set.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        platform: Platform,
        log: Arc<dyn Log>,
        dry_run: bool,
        key_generator: Arc<dyn KeyGenerator>,
        lookup: Arc<dyn UserLookup>,
    ) -> Self {
        let templates = config
            .settings
            .templates_dir
            .as_ref()
            .map_or_else(TemplateSet::builtin, |dir| {
                TemplateSet::with_overrides(config.layout.home.join(dir))
            });
        Self {
            config,
            platform,
            log,
            dry_run,
            scope: Scope::default(),
            key_generator,
            lookup,
            templates,
            report: Mutex::new(Report::new()),
        }
    }

    /// Restrict the pass to `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Enable or disable dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replace the key generator.
    #[must_use]
    pub fn with_key_generator(mut self, key_generator: Arc<dyn KeyGenerator>) -> Self {
        self.key_generator = key_generator;
        self
    }

    /// Replace the logger.
    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn Log>) -> Self {
        self.log = log;
        self
    }

    /// Append a step's entries to the run report.
    pub fn record(&self, report: Report) {
        self.report
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .extend(report);
    }

    /// Snapshot of the run report so far.
    #[must_use]
    pub fn report(&self) -> Report {
        self.report
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}
