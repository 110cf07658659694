//! Interactive yes/no builder for the hierarchy.
//!
//! The prompter is generic over its input and output so tests can drive it
//! with in-memory buffers.
use std::io::{self, BufRead, Write};

use super::file::{HierarchyFile, OrganisationEntry, ProviderEntry};
use super::hierarchy::{Account, HostingProvider, Organisation};
use crate::error::ValidationError;

/// Answers collected by [`Prompter::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractivePlan {
    /// Declared providers, organisations and accounts.
    pub file: HierarchyFile,
    /// Create source directories and Git configuration.
    pub source: bool,
    /// Create SSH directories, keys and the SSH config.
    pub ssh: bool,
}

/// Line-oriented question/answer session.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter reading answers from `input` and writing questions
    /// to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line. `None` on end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}\n> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask a yes/no question. Anything starting with `y` is yes; end of
    /// input counts as no.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading or writing fails.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(&format!("{question}\n[Y]es or [N]o"))?
            .is_some_and(|answer| answer.trim().to_lowercase().starts_with('y')))
    }

    /// Ask for a name until `parse` accepts it. Returns the raw accepted
    /// answer, or `None` on end of input.
    fn ask_name<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> io::Result<Option<String>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(_) => return Ok(Some(answer.trim().to_string())),
                Err(e) => writeln!(self.output, "{e}, try again")?,
            }
        }
    }

    /// Collect one or more account names for `context`.
    fn ask_accounts(&mut self, context: &str) -> io::Result<Vec<String>> {
        let mut accounts = Vec::new();
        loop {
            let question = format!("Enter the account name for [{context}]");
            let Some(name) = self.ask_name(&question, Account::new)? else {
                break;
            };
            accounts.push(name);
            if !self.confirm(&format!("Add another account for [{context}]?"))? {
                break;
            }
        }
        Ok(accounts)
    }

    fn ask_provider(&mut self, provider: HostingProvider) -> io::Result<Option<ProviderEntry>> {
        if !self.confirm(&format!("Set up [{provider}]?"))? {
            return Ok(None);
        }
        let mut entry = ProviderEntry {
            name: provider.to_string(),
            ..ProviderEntry::default()
        };
        while self.confirm(&format!("Add an organisation under [{provider}]?"))? {
            let question = format!("Enter the organisation name for [{provider}]");
            let Some(name) = self.ask_name(&question, Organisation::new)? else {
                break;
            };
            let accounts = self.ask_accounts(&format!("{provider}/{name}"))?;
            entry.organisations.push(OrganisationEntry { name, accounts });
        }
        if self.confirm(&format!("Add accounts directly under [{provider}]?"))? {
            entry.accounts = self.ask_accounts(provider.domain())?;
        }
        Ok(Some(entry))
    }

    /// Walk every supported provider, then ask which parts to provision.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading or writing fails.
    pub fn run(&mut self) -> io::Result<InteractivePlan> {
        let mut file = HierarchyFile::default();
        for provider in HostingProvider::ALL {
            if let Some(entry) = self.ask_provider(provider)? {
                file.providers.push(entry);
            }
        }
        let source = self.confirm("Set up source directories and git config?")?;
        let ssh = self.confirm("Set up SSH key directories and config?")?;
        Ok(InteractivePlan { file, source, ssh })
    }
}
