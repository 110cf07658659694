//! `devprofile` command-line entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use devprofile_cli::{cli, commands, logging};

fn command_name(command: &cli::Command) -> &'static str {
    match command {
        cli::Command::Apply(_) => "apply",
        cli::Command::Interactive(_) => "interactive",
        cli::Command::Version => "version",
    }
}

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let command = command_name(&args.command);
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    match &args.command {
        cli::Command::Apply(opts) => commands::apply::run(&args.global, opts, &log),
        cli::Command::Interactive(opts) => commands::interactive::run(&args.global, opts, &log),
        cli::Command::Version => Ok(()),
    }
}
