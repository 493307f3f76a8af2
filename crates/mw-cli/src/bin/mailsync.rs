//! mailsync: synchronize mail for every account `mw` configured.
//!
//! Same arguments as `mw sync`; the reader's `o` macro calls it.

use clap::Parser;

use mw_cli::cli::MailsyncCli;
use mw_cli::commands;
use mw_cli::context::Context;
use mw_cli::error::Result;
use mw_cli::{exit_with, logging};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => exit_with(&e),
    }
}

fn run() -> Result<i32> {
    let cli = MailsyncCli::parse();
    logging::init(cli.global.verbose);

    let ctx = Context::load(&cli.global)?;
    commands::run_sync(&ctx, &cli.sync)
}
