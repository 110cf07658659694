//! Command: print version information.

/// Version string, preferring the build-time `DEVPROFILE_VERSION`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DEVPROFILE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the devprofile version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("devprofile {}", version());
}
