//! `mw oauth login` and `mw oauth token`

use tracing::debug;

use crate::context::Context;
use crate::error::Result;

pub fn run_oauth_login(ctx: &Context, email: &str, no_browser: bool) -> Result<()> {
    let transition = ctx.reconciler().refresh_credential(email, !no_browser)?;
    debug!(email, ?transition, "Login finished");
    println!("OAuth token refreshed.");
    Ok(())
}

/// Print only the token: the sync and relay tools read stdout as the password.
pub fn run_oauth_token(ctx: &Context, email: &str) -> Result<()> {
    let token = ctx.reconciler().access_token(email)?;
    println!("{token}");
    Ok(())
}
