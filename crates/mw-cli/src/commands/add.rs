//! `mw add`

use mw_meta::{AccountDraft, AccountKind};

use crate::cli::AddArgs;
use crate::context::Context;
use crate::error::Result;

fn kind(args: &AddArgs) -> AccountKind {
    if args.gmail_oauth {
        AccountKind::GmailOAuth
    } else if args.gmail {
        AccountKind::Gmail
    } else {
        AccountKind::Generic
    }
}

/// Build the account from flags and settings defaults, then provision it.
pub fn run_add(mut ctx: Context, args: AddArgs) -> Result<()> {
    let defaults = &ctx.settings.defaults;
    let draft = AccountDraft {
        kind: kind(&args),
        login: args.login,
        display_name: args.realname,
        imap_host: args.imap,
        imap_port: args.imap_port.unwrap_or(defaults.imap_port),
        smtp_host: args.smtp,
        smtp_port: args.smtp_port.unwrap_or(defaults.smtp_port),
        secret_store_prefix: args.pass_prefix,
        email: args.email,
    };
    let account = draft.build()?;

    if let Some(max_messages) = args.max_messages {
        ctx.settings.defaults.max_messages = max_messages;
    }
    let client_secrets = args.client_secrets.map(|p| ctx.expand(&p));

    let reconciler = ctx.reconciler();
    let email = account.email.clone();
    let id = reconciler.add_account(account, client_secrets.as_deref(), !args.no_browser)?;

    println!("Configured {email} (account #{id}).");
    Ok(())
}
