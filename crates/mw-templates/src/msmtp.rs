//! SMTP relay (msmtp) configuration.

use std::path::Path;

use mw_fs::Paths;
use mw_meta::Account;

use crate::password::password_command;

/// Marker identifying an account's fragment in the relay config.
pub fn relay_marker(account: &Account) -> String {
    format!("account {}", account.email)
}

/// Provider-agnostic defaults, written once when the relay config is created.
pub fn render_relay_defaults(paths: &Paths, ca_bundle: &Path) -> String {
    [
        "defaults".to_string(),
        "auth on".to_string(),
        "tls on".to_string(),
        format!("tls_trust_file {}", ca_bundle.display()),
        format!("logfile {}", paths.msmtp_log.display()),
        String::new(),
    ]
    .join("\n")
}

/// One account's relay block; the first line is [`relay_marker`].
pub fn render_relay_account(account: &Account, ca_bundle: &Path) -> String {
    let auth = if account.uses_oauth() { "auth xoauth2" } else { "auth on" };

    [
        relay_marker(account),
        format!("host {}", account.smtp_host),
        format!("port {}", account.smtp_port),
        format!("from {}", account.email),
        format!("user {}", account.login),
        format!("passwordeval \"{}\"", password_command(account)),
        auth.to_string(),
        "tls on".to_string(),
        format!("tls_trust_file {}", ca_bundle.display()),
        String::new(),
    ]
    .join("\n")
}
