//! Mail reader files: base settings, account switching, per-account config.

use std::path::Path;

use mw_fs::Paths;
use mw_meta::Account;

/// Reset per-account state before another account file is sourced.
pub const SWITCH_MUTTRC: &str = "\
# vim: filetype=neomuttrc
# Unbind per-account settings before switching accounts.
unset hostname
unmy_hdr Organization
unmailboxes *
unalternates *
unset signature
";

/// Attachment opener referenced from the generated mailcap.
pub const OPENFILE_SH: &str = r#"#!/bin/sh

# Opens files via xdg-open/open without mutt side effects.
tempdir="${XDG_CACHE_HOME:-$HOME/.cache}/mutt-wizard/files"
file="$tempdir/${1##*/}"
[ "$(uname)" = "Darwin" ] && opener="open" || opener="setsid -f xdg-open"
mkdir -p "$tempdir"
cp -f "$1" "$file"
$opener "$file" >/dev/null 2>&1
find "${tempdir:?}" -mtime +1 -type f -delete
"#;

/// Shared reader settings sourced from the top-level muttrc.
///
/// `i` is unbound in index and pager so the switch macros can use it as a
/// prefix.
pub fn render_base_muttrc(paths: &Paths) -> String {
    let mailcap_path = format!(
        "{}:{}:$mailcap_path",
        paths.mutt_config.join("mailcap").display(),
        paths.mailcap.display()
    );

    format!(
        r#"# vim: filetype=neomuttrc
# Base settings managed by mutt-wizard.
set send_charset="us-ascii:utf-8"
set mailcap_path = "{mailcap_path}"
set mime_type_query_command = "file --mime-type -b %s"
set date_format="%y/%m/%d %I:%M%p"
set index_format="%2C %Z %?X?A& ? %D %-15.15F %s (%-4.4c)"
set sort = "reverse-date"
set sleep_time = 0
set markers = no
set wait_key = no
set mail_check=60

bind index i noop
bind pager i noop
"#
    )
}

pub fn render_mailcap(paths: &Paths) -> String {
    let openfile = paths.openfile.display();
    format!(
        "\
text/plain; $EDITOR %s ;
text/html; {openfile} %s ; nametemplate=%s.html
text/html; lynx -assume_charset=%{{charset}} -display_charset=utf-8 -dump -width=1024 %s; nametemplate=%s.html; copiousoutput;
image/*; {openfile} %s ;
video/*; setsid mpv --quiet %s &; copiousoutput
audio/*; mpv %s ;
application/pdf; {openfile} %s ;
application/pgp-encrypted; gpg -d '%s'; copiousoutput;
application/pgp-keys; gpg --import '%s'; copiousoutput;
application/x-subrip; $EDITOR %s ;
"
    )
}

/// Remote mailbox names, which double as local maildir directory names.
pub fn mailboxes_for_account(account: &Account) -> &'static [&'static str] {
    if account.is_managed_provider {
        &[
            "INBOX",
            "[Gmail]/Drafts",
            "[Gmail]/Sent Mail",
            "[Gmail]/Trash",
            "[Gmail]/Spam",
            "[Gmail]/All Mail",
        ]
    } else {
        &["INBOX", "Drafts", "Sent", "Trash", "Spam", "Archive"]
    }
}

/// The per-account reader file. Wholly owned and regenerated on every add.
pub fn render_account_muttrc(account: &Account, paths: &Paths) -> String {
    let email = &account.email;
    let folder = paths.account_maildir(email.as_str());
    let cache = paths.account_cache(email.as_str());

    let (postponed, trash, record) = if account.is_managed_provider {
        ("+[Gmail]/Drafts", "+[Gmail]/Trash", "+[Gmail]/Sent Mail")
    } else {
        ("+Drafts", "+Trash", "+Sent")
    };

    let mailboxes = mailboxes_for_account(account)
        .iter()
        .map(|mailbox| format!("\"={mailbox}\""))
        .collect::<Vec<_>>()
        .join(" ");

    [
        "# vim: filetype=neomuttrc".to_string(),
        format!("# muttrc file for account {email}"),
        format!("set real_name = \"{}\"", account.display_name),
        format!("set from = \"{email}\""),
        format!(
            "set sendmail = \"msmtp -C {} -a {email}\"",
            paths.msmtp_config.display()
        ),
        format!("alias me {} <{email}>", account.display_name),
        format!("set folder = \"{}\"", folder.display()),
        format!("set header_cache = \"{}\"", cache.join("headers").display()),
        format!(
            "set message_cachedir = \"{}\"",
            cache.join("bodies").display()
        ),
        "set mbox_type = Maildir".to_string(),
        format!("set hostname = \"{}\"", email.domain()),
        source_line(&paths.switch_muttrc),
        "set spool_file = \"+INBOX\"".to_string(),
        format!("set postponed = \"{postponed}\""),
        format!("set trash = \"{trash}\""),
        format!("set record = \"{record}\""),
        format!("mailboxes {mailboxes}"),
        format!("macro index o \"<shell-escape>mailsync {email}<enter>\" \"sync {email}\""),
        String::new(),
    ]
    .join("\n")
}

/// A `source` directive, which is also its own merge marker.
pub fn source_line(path: &Path) -> String {
    format!("source {}", path.display())
}

/// The keybinding that switches the reader to one account.
///
/// Bound to `i<id>`; the trailing `"switch to <email>"` description is what
/// teardown looks for.
pub fn switch_macro_line(id: u32, account_file: &Path, email: &str) -> String {
    format!(
        "macro index,pager i{id} '<sync-mailbox><enter-command>source {}<enter><change-folder>!<enter>;<check-stats>' \"switch to {email}\"",
        account_file.display()
    )
}
