//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the developer profile provisioner.
#[derive(Parser, Debug)]
#[command(
    name = "devprofile",
    about = "Provision source directories, SSH keys and Git identities per account",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the home directory (default: HOME, then USERPROFILE)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Hierarchy file (default: $XDG_CONFIG_HOME/devprofile/hierarchy.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not query remote APIs for account ids
    #[arg(long, global = true)]
    pub offline: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision everything declared in the hierarchy file
    Apply(ApplyOpts),
    /// Build the hierarchy by answering questions, then provision it
    Interactive(InteractiveOpts),
    /// Print version information
    Version,
}

/// Options for the `apply` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ApplyOpts {
    /// Skip specific tasks
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific tasks
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Options for the `interactive` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InteractiveOpts {
    /// Save the answers as a hierarchy file
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}
