//! Sync tool (mbsync) account fragments.

use std::path::Path;

use mw_fs::Paths;
use mw_meta::Account;

use crate::password::password_command;

/// Marker identifying an account's fragment in the sync config.
pub fn sync_marker(account: &Account) -> String {
    format!("IMAPStore {}-remote", account.email)
}

/// One account's store and channel definitions.
///
/// The first line is [`sync_marker`]. `max_messages` of 0 means unlimited.
pub fn render_sync_account(
    account: &Account,
    paths: &Paths,
    ca_bundle: &Path,
    max_messages: u32,
) -> String {
    let email = &account.email;
    let maildir = paths.account_maildir(email.as_str());
    let auth_mechs = if account.uses_oauth() { "XOAUTH2" } else { "LOGIN" };

    [
        sync_marker(account),
        format!("Host {}", account.imap_host),
        format!("Port {}", account.imap_port),
        format!("User {}", account.login),
        format!("PassCmd \"{}\"", password_command(account)),
        format!("AuthMechs {auth_mechs}"),
        "TLSType IMAPS".to_string(),
        format!("CertificateFile {}", ca_bundle.display()),
        String::new(),
        format!("MaildirStore {email}-local"),
        "Subfolders Verbatim".to_string(),
        format!("Path {}/", maildir.display()),
        format!("Inbox {}/INBOX", maildir.display()),
        String::new(),
        format!("Channel {email}"),
        "Expunge Both".to_string(),
        format!("Far :{email}-remote:"),
        format!("Near :{email}-local:"),
        "Patterns * !\"[Gmail]/All Mail\" !\"*fts-flatcurve*\" !\"*virtual*\"".to_string(),
        "Create Both".to_string(),
        "SyncState *".to_string(),
        format!("MaxMessages {max_messages}"),
        "ExpireUnread no".to_string(),
        "# End profile".to_string(),
        String::new(),
    ]
    .join("\n")
}
