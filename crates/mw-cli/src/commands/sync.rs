//! `mw sync` and the `mailsync` binary

use colored::Colorize;
use mw_core::Error as CoreError;

use crate::cli::SyncArgs;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Exit status for a sync run; 1 when nothing is configured.
pub fn run_sync(ctx: &Context, args: &SyncArgs) -> Result<i32> {
    let driver = ctx.sync_driver(args);
    let plan = match driver.plan(&args.accounts) {
        Ok(plan) => plan,
        Err(CoreError::NoAccountsConfigured) => {
            println!("No accounts configured.");
            return Ok(1);
        }
        Err(e) => return Err(CliError::from(e)),
    };

    for account in &plan.skipped {
        println!("{} Account {account} not found.", "ERROR:".red().bold());
    }

    let report = driver.execute(&plan);
    for channel in &report.failed {
        eprintln!("{} sync failed for {channel}", "warning:".yellow().bold());
    }
    Ok(0)
}
