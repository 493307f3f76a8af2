//! Account provisioning against an isolated home directory.

use std::fs;

use mw_core::{Error, MAIN_MUTTRC_HEADER, Reconciler};
use mw_meta::{Account, AccountDraft, AccountKind, AuthMethod, Registry, Settings};
use mw_test_utils::{ScriptedFlow, TestEnv};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn reconciler(env: &TestEnv, flow: ScriptedFlow) -> Reconciler {
    Reconciler::new(
        env.paths.clone(),
        Settings::default(),
        Box::new(flow),
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

fn gmail_oauth(email: &str) -> Account {
    AccountDraft::new(email, AccountKind::GmailOAuth)
        .build()
        .unwrap()
}

fn macro_ids(content: &str) -> Vec<u32> {
    content
        .lines()
        .filter_map(|l| l.strip_prefix("macro index,pager i"))
        .filter_map(|rest| rest.split_whitespace().next())
        .map(|n| n.parse().unwrap())
        .collect()
}

#[test]
fn test_first_account_creates_every_artifact() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());

    let id = engine.add_account(generic("a@x.com"), None, false).unwrap();
    assert_eq!(id, 1);

    let paths = &env.paths;
    let main = env.read(&paths.main_muttrc());
    assert!(main.starts_with(MAIN_MUTTRC_HEADER));
    assert_eq!(TestEnv::count_lines(&main, &format!("source {}", paths.base_muttrc.display())), 1);
    assert_eq!(
        TestEnv::count_lines(&main, &format!("source {}", paths.account_muttrc("a@x.com").display())),
        1
    );
    assert!(main.contains("macro index,pager i1 "));
    assert!(main.contains("\"switch to a@x.com\""));

    assert!(paths.account_muttrc("a@x.com").is_file());
    assert!(paths.base_muttrc.is_file());
    assert!(paths.switch_muttrc.is_file());
    assert!(paths.mailcap.is_file());
    assert!(paths.openfile.is_file());
    for sub in ["cur", "new", "tmp"] {
        assert!(paths.account_maildir("a@x.com").join("INBOX").join(sub).is_dir());
        assert!(paths.account_maildir("a@x.com").join("Archive").join(sub).is_dir());
    }

    let relay = env.read(&paths.msmtp_config);
    assert!(relay.starts_with("defaults\n"));
    assert!(relay.contains("account a@x.com"));
    assert!(relay.contains("passwordeval \"pass mail/a@x.com\""));

    let sync = env.read(&paths.mbsync_config);
    assert!(sync.starts_with("IMAPStore a@x.com-remote"));
    assert!(sync.contains("Channel a@x.com"));

    let registry = Registry::load(&paths.accounts_file).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(!paths.env_file.exists());
}

#[test]
fn test_repeated_add_is_idempotent() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());
    let paths = &env.paths;

    let first = engine.add_account(generic("a@x.com"), None, false).unwrap();
    let snapshot = |p: &std::path::Path| env.read(p);
    let main = snapshot(&paths.main_muttrc());
    let relay = snapshot(&paths.msmtp_config);
    let sync = snapshot(&paths.mbsync_config);

    let second = engine.add_account(generic("a@x.com"), None, false).unwrap();

    assert_eq!(first, second);
    assert_eq!(snapshot(&paths.main_muttrc()), main);
    assert_eq!(snapshot(&paths.msmtp_config), relay);
    assert_eq!(snapshot(&paths.mbsync_config), sync);
    assert_eq!(engine.list_accounts().unwrap().len(), 1);
}

#[test]
fn test_identifiers_are_distinct_and_bounded() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());

    let n = 12;
    let ids: Vec<u32> = (1..=n)
        .map(|i| engine.add_account(generic(&format!("u{i}@x.com")), None, false).unwrap())
        .collect();

    assert_eq!(ids, (1..=n).collect::<Vec<_>>());
    let mut in_file = macro_ids(&env.read(&env.paths.main_muttrc()));
    in_file.sort_unstable();
    in_file.dedup();
    assert_eq!(in_file.len(), n as usize);
    assert!(in_file.iter().all(|id| (1..=n.max(9)).contains(id)));
}

#[test]
fn test_freed_identifier_is_reused_when_low_pool_is_full() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());
    for i in 1..=9 {
        engine.add_account(generic(&format!("u{i}@x.com")), None, false).unwrap();
    }

    let main_path = env.paths.main_muttrc();
    let kept: String = env
        .read(&main_path)
        .lines()
        .filter(|l| !l.contains("switch to u4@x.com"))
        .map(|l| format!("{l}\n"))
        .collect();
    fs::write(&main_path, kept).unwrap();

    let id = engine.add_account(generic("new@x.com"), None, false).unwrap();
    assert_eq!(id, 4);
}

#[test]
fn test_existing_muttrc_content_is_preserved() {
    let env = TestEnv::new();
    let user = "set editor = \"nvim\"\nbind index j next-entry\n";
    let main_path = env.write_file(".config/mutt/muttrc", user);
    let engine = reconciler(&env, ScriptedFlow::failing());

    engine.add_account(generic("a@x.com"), None, false).unwrap();

    let main = env.read(&main_path);
    assert!(main.starts_with(user));
    assert!(!main.contains(MAIN_MUTTRC_HEADER));
}

#[test]
fn test_relay_defaults_written_once() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());

    engine.add_account(generic("a@x.com"), None, false).unwrap();
    engine.add_account(generic("b@x.com"), None, false).unwrap();

    let relay = env.read(&env.paths.msmtp_config);
    assert_eq!(TestEnv::count_lines(&relay, "defaults"), 1);
    assert!(relay.contains("account a@x.com"));
    assert!(relay.contains("account b@x.com"));
}

#[test]
fn test_address_that_prefixes_another_still_gets_its_blocks() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());

    engine.add_account(generic("a@x.com.au"), None, false).unwrap();
    engine.add_account(generic("a@x.com"), None, false).unwrap();

    let relay = env.read(&env.paths.msmtp_config);
    let accounts: Vec<&str> = relay.lines().filter(|l| l.starts_with("account ")).collect();
    assert_eq!(accounts, vec!["account a@x.com.au", "account a@x.com"]);

    let sync = env.read(&env.paths.mbsync_config);
    assert_eq!(TestEnv::count_lines(&sync, "IMAPStore a@x.com-remote"), 1);
    assert_eq!(TestEnv::count_lines(&sync, "IMAPStore a@x.com.au-remote"), 1);

    engine.add_account(generic("a@x.com"), None, false).unwrap();
    assert_eq!(env.read(&env.paths.msmtp_config), relay);
}

#[cfg(unix)]
#[test]
fn test_isyncrc_alias_created_with_sync_config() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());

    engine.add_account(generic("a@x.com"), None, false).unwrap();

    let target = fs::read_link(&env.paths.isyncrc).unwrap();
    assert_eq!(target, env.paths.mbsync_config);
}

#[test]
fn test_isyncrc_real_file_is_left_alone() {
    let env = TestEnv::new();
    let isyncrc = env.write_file(".config/isyncrc", "# mine\n");
    let engine = reconciler(&env, ScriptedFlow::failing());

    engine.add_account(generic("a@x.com"), None, false).unwrap();

    assert_eq!(env.read(&isyncrc), "# mine\n");
}

#[test]
fn test_sasl_path_written_to_env_file() {
    let env = TestEnv::with_sasl();
    let engine = reconciler(&env, ScriptedFlow::failing());

    engine.add_account(generic("a@x.com"), None, false).unwrap();

    let sasl = env.platform.sasl_path.as_ref().unwrap();
    assert_eq!(
        env.read(&env.paths.env_file),
        format!("SASL_PATH={}\n", sasl.display())
    );
}

#[test]
fn test_oauth_without_client_secrets_is_rejected() {
    let env = TestEnv::new();
    let flow = ScriptedFlow::new();
    let calls = flow.calls();
    let engine = reconciler(&env, flow);

    let err = engine
        .add_account(gmail_oauth("a@gmail.com"), None, false)
        .unwrap_err();

    assert!(matches!(err, Error::CredentialConfigRequired { .. }));
    assert_eq!(err.to_string(), "--client-secrets is required for Gmail OAuth");
    assert_eq!(calls.total(), 0);
    assert!(engine.list_accounts().unwrap().is_empty());
}

#[test]
fn test_oauth_with_missing_client_secrets_file() {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::new());
    let missing = env.path("nowhere/client.json");

    let err = engine
        .add_account(gmail_oauth("a@gmail.com"), Some(&missing), false)
        .unwrap_err();

    assert!(matches!(err, Error::CredentialConfigNotFound { .. }));
}

#[test]
fn test_oauth_account_authorizes_once_and_stores_client_config() {
    let env = TestEnv::new();
    let secrets = env.write_client_secrets();
    let flow = ScriptedFlow::new();
    let calls = flow.calls();
    let engine = reconciler(&env, flow);

    engine
        .add_account(gmail_oauth("a@gmail.com"), Some(&secrets), true)
        .unwrap();

    assert_eq!(calls.local.get(), 1);
    assert_eq!(calls.total(), 1);
    let stored = env.paths.client_file("a@gmail.com");
    assert_eq!(env.read(&stored), env.read(&secrets));
    assert!(env.paths.token_file("a@gmail.com").is_file());

    let registry = Registry::load(&env.paths.accounts_file).unwrap();
    let account = registry.accounts().next().unwrap();
    assert_eq!(account.auth_method, AuthMethod::DelegatedOAuth);
    assert_eq!(account.credential_config.as_deref(), Some(stored.as_path()));

    let sync = env.read(&env.paths.mbsync_config);
    assert!(sync.contains("PassCmd \"mw oauth token a@gmail.com\""));
    assert!(sync.contains("AuthMechs XOAUTH2"));

    // Valid stored credential: no further flow calls
    engine
        .add_account(gmail_oauth("a@gmail.com"), Some(&secrets), true)
        .unwrap();
    assert_eq!(calls.total(), 1);
}

#[rstest]
#[case::gmail_app_password(AccountKind::Gmail, "[Gmail]/All Mail")]
#[case::generic(AccountKind::Generic, "Archive")]
fn test_maildir_skeleton_follows_provider(#[case] kind: AccountKind, #[case] mailbox: &str) {
    let env = TestEnv::new();
    let engine = reconciler(&env, ScriptedFlow::failing());
    let mut draft = AccountDraft::new("a@x.com", kind);
    draft.imap_host = Some("imap.x.com".into());
    draft.smtp_host = Some("smtp.x.com".into());

    engine.add_account(draft.build().unwrap(), None, false).unwrap();

    assert!(env.paths.account_maildir("a@x.com").join(mailbox).join("new").is_dir());
}
