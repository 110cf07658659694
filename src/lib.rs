//! Developer profile provisioner.
//!
//! Turns a hierarchy of hosting providers, organisations and accounts into
//! a working layout: one source directory per account, an SSH key pair and
//! `Host` alias per account, and Git configuration that selects the right
//! identity by directory. Every step is idempotent and append-only.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: settings, the hierarchy model and its TOML file
//! - **[`resources`]**: idempotent `check + apply` primitives (directories, key pairs, modes)
//! - **[`merge`]**: marker-based appending to SSH and Git config files
//! - **[`tasks`]**: the named steps of a provisioning pass
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `interactive`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod keygen;
pub mod logging;
pub mod lookup;
pub mod merge;
pub mod platform;
pub mod report;
pub mod resources;
pub mod tasks;
pub mod template;
