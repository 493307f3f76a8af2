//! Reset behavior: what goes, what stays.

use std::fs;

use mw_core::{Error, Reconciler};
use mw_meta::{Account, AccountDraft, AccountKind, Settings};
use mw_test_utils::{ScriptedFlow, TestEnv};
use pretty_assertions::assert_eq;

fn reconciler(env: &TestEnv) -> Reconciler {
    Reconciler::new(
        env.paths.clone(),
        Settings::default(),
        Box::new(ScriptedFlow::failing()),
    )
    .with_platform(env.platform.clone())
}

fn generic(email: &str) -> Account {
    let mut draft = AccountDraft::new(email, AccountKind::Generic);
    draft.imap_host = Some("imap.x.com".into());
    draft.smtp_host = Some("smtp.x.com".into());
    draft.secret_store_prefix = "mail/".into();
    draft.build().unwrap()
}

#[test]
fn test_add_two_then_reset_leaves_nothing_registered() {
    let env = TestEnv::new();
    let unrelated = "set sort = threads";
    let main_path = env.write_file(".config/mutt/muttrc", &format!("{unrelated}\n"));
    let engine = reconciler(&env);

    engine.add_account(generic("a@x.com"), None, false).unwrap();
    engine.add_account(generic("b@x.com"), None, false).unwrap();
    engine.reset(true).unwrap();

    assert!(engine.list_accounts().unwrap().is_empty());
    let main = env.read(&main_path);
    assert!(!main.contains("a@x.com"));
    assert!(!main.contains("b@x.com"));
    assert!(main.contains(unrelated));
}

#[test]
fn test_reset_keeps_exactly_the_foreign_line() {
    let env = TestEnv::new();
    let engine = reconciler(&env);
    engine.add_account(generic("a@x.com"), None, false).unwrap();

    // One foreign line, one generated source line, one generated macro
    let main_path = env.paths.main_muttrc();
    let generated: Vec<String> = env
        .read(&main_path)
        .lines()
        .filter(|l| l.contains("accounts") || l.contains("switch to a@x.com"))
        .map(String::from)
        .collect();
    assert_eq!(generated.len(), 2);
    fs::write(&main_path, format!("set mark_old = no\n{}\n", generated.join("\n"))).unwrap();

    let report = engine.reset(true).unwrap();

    assert_eq!(env.read(&main_path), "set mark_old = no\n");
    assert_eq!(report.dropped_lines, 2);
}

#[test]
fn test_reset_removes_owned_trees() {
    let env = TestEnv::new();
    let engine = reconciler(&env);
    engine.add_account(generic("a@x.com"), None, false).unwrap();
    let cache = env.paths.account_cache("a@x.com");
    fs::create_dir_all(&cache).unwrap();
    let log = env.write_file(".local/state/msmtp/msmtp.log", "sent\n");
    let other_mail = env.paths.maildir_root.join("someone@else.org");
    fs::create_dir_all(&other_mail).unwrap();

    let report = engine.reset(true).unwrap();

    assert!(!env.paths.app_config.exists());
    assert!(!env.paths.account_muttrc("a@x.com").exists());
    assert!(!env.paths.account_maildir("a@x.com").exists());
    assert!(!env.paths.cache_dir.exists());
    assert!(!log.exists());
    assert!(other_mail.is_dir());
    assert!(report.removed.contains(&env.paths.app_config));
    assert!(report.removed.contains(&env.paths.account_maildir("a@x.com")));
}

#[test]
fn test_unconfirmed_reset_changes_nothing() {
    let env = TestEnv::new();
    let engine = reconciler(&env);
    engine.add_account(generic("a@x.com"), None, false).unwrap();
    let before = env.read(&env.paths.main_muttrc());

    let err = engine.reset(false).unwrap_err();

    assert!(matches!(err, Error::ResetNotConfirmed));
    assert_eq!(env.read(&env.paths.main_muttrc()), before);
    assert!(env.paths.app_config.is_dir());
    assert_eq!(engine.list_accounts().unwrap().len(), 1);
}

#[test]
fn test_real_isyncrc_survives_reset() {
    let env = TestEnv::new();
    let isyncrc = env.write_file(".config/isyncrc", "# hand written\n");
    let engine = reconciler(&env);
    engine.add_account(generic("a@x.com"), None, false).unwrap();

    engine.reset(true).unwrap();

    assert_eq!(env.read(&isyncrc), "# hand written\n");
}

#[cfg(unix)]
#[test]
fn test_isyncrc_symlink_removed_by_reset() {
    let env = TestEnv::new();
    let engine = reconciler(&env);
    engine.add_account(generic("a@x.com"), None, false).unwrap();
    assert!(fs::symlink_metadata(&env.paths.isyncrc).is_ok());

    engine.reset(true).unwrap();

    assert!(fs::symlink_metadata(&env.paths.isyncrc).is_err());
}

#[test]
fn test_reset_on_empty_home_succeeds() {
    let env = TestEnv::new();
    let engine = reconciler(&env);

    let report = engine.reset(true).unwrap();

    assert!(report.removed.is_empty());
    assert_eq!(report.dropped_lines, 0);
}

#[test]
fn test_identifier_pool_restarts_after_reset() {
    let env = TestEnv::new();
    let engine = reconciler(&env);
    for i in 1..=3 {
        engine.add_account(generic(&format!("u{i}@x.com")), None, false).unwrap();
    }

    engine.reset(true).unwrap();

    assert_eq!(engine.add_account(generic("new@x.com"), None, false).unwrap(), 1);
}

#[test]
fn test_reset_does_not_need_a_ca_bundle() {
    let env = TestEnv::new();
    reconciler(&env).add_account(generic("a@x.com"), None, false).unwrap();

    let mut settings = Settings::default();
    settings.platform.ca_bundles = Some(vec![env.path("nonexistent/ca.pem")]);
    let engine = Reconciler::new(env.paths.clone(), settings, Box::new(ScriptedFlow::failing()));

    let err = engine.add_account(generic("b@x.com"), None, false).unwrap_err();
    assert!(matches!(err, Error::Fs(mw_fs::Error::CaBundleNotFound { .. })));

    engine.reset(true).unwrap();
    assert!(engine.list_accounts().unwrap().is_empty());
    assert!(!env.paths.account_muttrc("a@x.com").exists());
}

#[test]
fn test_reset_keeps_crlf_user_lines_byte_identical() {
    let env = TestEnv::new();
    let user = "set sort = threads\r\nset editor = vim\r\n";
    let main_path = env.write_file(".config/mutt/muttrc", user);
    let engine = reconciler(&env);

    engine.add_account(generic("a@x.com"), None, false).unwrap();
    engine.reset(true).unwrap();

    assert_eq!(env.read(&main_path), user);
}
