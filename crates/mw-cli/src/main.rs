//! mutt-wizard CLI
//!
//! Configures neomutt, isync, and msmtp for one or more mail accounts.

use clap::{CommandFactory, Parser};

use mw_cli::cli::{Cli, Commands, OauthAction};
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
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(1);
    };

    let ctx = Context::load(&cli.global)?;
    match command {
        Commands::Add(args) => commands::run_add(ctx, args)?,
        Commands::List => commands::run_list(&ctx)?,
        Commands::Oauth { action } => match action {
            OauthAction::Login { email, no_browser } => {
                commands::run_oauth_login(&ctx, &email, no_browser)?
            }
            OauthAction::Token { email } => commands::run_oauth_token(&ctx, &email)?,
        },
        Commands::Reset { yes } => commands::run_reset(&ctx, yes)?,
        Commands::Sync(args) => return commands::run_sync(&ctx, &args),
    }
    Ok(0)
}
