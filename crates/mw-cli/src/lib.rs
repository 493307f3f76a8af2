//! mutt-wizard CLI
//!
//! Shared by the `mw` and `mailsync` binaries. Argument parsing lives in
//! [`cli`]; each subcommand's output and exit behavior lives in
//! [`commands`].

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod interactive;
pub mod logging;

use colored::Colorize;

/// Print `error` the way both binaries report failures, then exit 1.
pub fn exit_with(error: &error::CliError) -> ! {
    eprintln!("{}: {}", "error".red().bold(), error);
    std::process::exit(1);
}
