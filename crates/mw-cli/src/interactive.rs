//! Interactive prompts for CLI commands
//!
//! Uses dialoguer on a terminal. When stdin is piped, the answer is read
//! as a plain line so scripts can still answer.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Confirm;

use crate::error::Result;

pub const RESET_PROMPT: &str = "Remove all mutt-wizard data (config, tokens, mail)?";

/// Ask before a destructive reset. Anything but yes declines.
pub fn confirm_reset() -> Result<bool> {
    if io::stdin().is_terminal() {
        return Ok(Confirm::new()
            .with_prompt(RESET_PROMPT)
            .default(false)
            .interact()?);
    }

    print!("{RESET_PROMPT} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
