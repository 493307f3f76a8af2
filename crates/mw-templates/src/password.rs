use mw_meta::Account;

/// Shell command the sync and relay tools run to obtain the password.
///
/// OAuth accounts call back into `mw`, so no secret is ever written into a
/// generated file.
pub fn password_command(account: &Account) -> String {
    if account.uses_oauth() {
        format!("mw oauth token {}", account.email)
    } else {
        format!("pass {}{}", account.secret_store_prefix, account.email)
    }
}
