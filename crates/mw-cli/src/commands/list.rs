//! `mw list`

use mw_meta::Registry;

use crate::context::Context;
use crate::error::Result;

/// Print registered accounts as a numbered, sorted list.
pub fn run_list(ctx: &Context) -> Result<()> {
    let registry = Registry::load(&ctx.paths.accounts_file)?;
    for (idx, email) in registry.emails().enumerate() {
        println!("{}. {}", idx + 1, email);
    }
    Ok(())
}
