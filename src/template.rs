//! Placeholder templates for SSH and Git config blocks.
//!
//! Templates use `{{name}}` placeholders. Rendering substitutes the supplied
//! variables and leaves unknown placeholders untouched; it never fails.
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::hierarchy::HostingProvider;
use crate::error::{FilesystemError, ProvisionError, TemplateMissingError};

/// `Host` block appended to the SSH client config.
pub const SSH_HOST: &str = "ssh_host.conf";
/// Preamble written when the top-level Git config does not exist.
pub const GITCONFIG_PREAMBLE: &str = "gitconfig_preamble";
/// Conditional include block for the top-level Git config.
pub const GITCONFIG_INCLUDE: &str = "gitconfig_include";

/// Relative name of the account-level Git config template for `provider`.
#[must_use]
pub fn account_template(provider: HostingProvider) -> String {
    format!("accounts/{provider}.gitconfig")
}

fn builtin(name: &str) -> Option<&'static str> {
    Some(match name {
        SSH_HOST => include_str!("../templates/ssh_host.conf"),
        GITCONFIG_PREAMBLE => include_str!("../templates/gitconfig_preamble"),
        GITCONFIG_INCLUDE => include_str!("../templates/gitconfig_include"),
        "accounts/bitbucket.org.gitconfig" => {
            include_str!("../templates/accounts/bitbucket.org.gitconfig")
        }
        "accounts/dev.azure.com.gitconfig" => {
            include_str!("../templates/accounts/dev.azure.com.gitconfig")
        }
        "accounts/github.com.gitconfig" => {
            include_str!("../templates/accounts/github.com.gitconfig")
        }
        "accounts/gitlab.com.gitconfig" => {
            include_str!("../templates/accounts/gitlab.com.gitconfig")
        }
        _ => return None,
    })
}

/// Fill `{{name}}` placeholders in `template` from `vars`.
///
/// Whitespace inside the braces is ignored. Placeholders without a matching
/// variable, and unterminated `{{`, are copied verbatim.
///
/// # Examples
///
/// ```
/// use devprofile_cli::template::render;
///
/// let out = render("Host {{username}}.{{ provider }}", &[
///     ("username", "alice"),
///     ("provider", "github.com"),
/// ]);
/// assert_eq!(out, "Host alice.github.com");
/// assert_eq!(render("{{unknown}}", &[]), "{{unknown}}");
/// ```
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);
        let Some(end) = tail.find("}}") else {
            out.push_str(tail);
            return out;
        };
        let (placeholder, after) = tail.split_at(end + 2);
        let key = placeholder
            .trim_start_matches("{{")
            .trim_end_matches("}}")
            .trim();
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(placeholder),
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Template source: built-ins, optionally shadowed by files in an override
/// directory with the same relative name.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    override_dir: Option<PathBuf>,
}

impl TemplateSet {
    /// Built-in templates only.
    #[must_use]
    pub const fn builtin() -> Self {
        Self { override_dir: None }
    }

    /// Prefer templates under `dir`, falling back to built-ins.
    #[must_use]
    pub fn with_overrides(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    /// Override directory, if any.
    #[must_use]
    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Fetch the template text for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::TemplateMissing`] when neither an override
    /// nor a built-in exists, or [`ProvisionError::Filesystem`] when an
    /// override exists but cannot be read.
    pub fn get(&self, name: &str) -> Result<Cow<'static, str>, ProvisionError> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(name);
            if path.is_file() {
                return std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|e| FilesystemError::new("read template", &path, e).into());
            }
        }
        builtin(name).map(Cow::Borrowed).ok_or_else(|| {
            TemplateMissingError {
                name: name.to_string(),
            }
            .into()
        })
    }
}
