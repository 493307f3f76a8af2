//! `mw reset`

use tracing::debug;

use crate::context::Context;
use crate::error::Result;
use crate::interactive::confirm_reset;

pub fn run_reset(ctx: &Context, yes: bool) -> Result<()> {
    if !yes && !confirm_reset()? {
        println!("Aborted.");
        return Ok(());
    }

    let report = ctx.reconciler().reset(true)?;
    debug!(
        removed = report.removed.len(),
        dropped_lines = report.dropped_lines,
        "Reset finished"
    );
    println!("mutt-wizard configuration cleared.");
    Ok(())
}
