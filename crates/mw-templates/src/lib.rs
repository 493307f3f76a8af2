//! Config file rendering for the mail stack.
//!
//! Every function here is pure: it takes an account and the resolved paths
//! and returns the text of one artifact. Writing and merging that text is
//! the reconciler's job.
//!
//! | Module      | Consumer                         |
//! |-------------|----------------------------------|
//! | [`neomutt`] | the mail reader (and mailcap)    |
//! | [`mbsync`]  | the IMAP synchronizer            |
//! | [`msmtp`]   | the SMTP relay                   |

pub mod mbsync;
pub mod msmtp;
pub mod neomutt;

mod password;

pub use mbsync::{render_sync_account, sync_marker};
pub use msmtp::{relay_marker, render_relay_account, render_relay_defaults};
pub use neomutt::{
    OPENFILE_SH, SWITCH_MUTTRC, mailboxes_for_account, render_account_muttrc, render_base_muttrc,
    render_mailcap, source_line, switch_macro_line,
};
pub use password::password_command;
