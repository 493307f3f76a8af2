//! Account provisioning
//!
//! Adding an account is a fixed sequence of steps, each safe to repeat:
//!
//! | Step                         | Kind                    |
//! |------------------------------|-------------------------|
//! | directories                  | create if absent        |
//! | base, switch, mailcap files  | unconditional overwrite |
//! | top-level muttrc directives  | merge once              |
//! | stored client config         | unconditional overwrite |
//! | per-account muttrc           | unconditional overwrite |
//! | maildir skeleton             | create if absent        |
//! | relay and sync fragments     | merge once              |
//! | registry record              | upsert                  |
//!
//! Nothing is rolled back on failure. Re-running the same add after fixing
//! the cause completes the remaining steps and leaves the finished ones as
//! they are.

use std::path::{Path, PathBuf};

use mw_auth::{AuthorizationFlow, ClientConfig, CredentialManager, Transition};
use mw_blocks::{MergeOutcome, merge_fragment, merge_line};
use mw_fs::{Paths, Platform, io};
use mw_meta::{Account, AuthMethod, EmailAddress, Registry, Settings};
use mw_templates::{
    OPENFILE_SH, SWITCH_MUTTRC, mailboxes_for_account, relay_marker, render_account_muttrc,
    render_base_muttrc, render_mailcap, render_relay_account, render_relay_defaults,
    render_sync_account, source_line, switch_macro_line, sync_marker,
};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::identifier::{existing_id_for, next_account_id};

/// Header written when the top-level muttrc does not exist yet.
pub const MAIN_MUTTRC_HEADER: &str = "# vim: filetype=neomuttrc\n";

/// The engine behind every `mw` command.
pub struct Reconciler {
    paths: Paths,
    /// Resolved from settings by `add_account` when not given.
    platform: Option<Platform>,
    settings: Settings,
    credentials: CredentialManager,
}

impl Reconciler {
    pub fn new(paths: Paths, settings: Settings, flow: Box<dyn AuthorizationFlow>) -> Self {
        let credentials = CredentialManager::new(flow, settings.oauth.scopes.clone());
        Self {
            paths,
            platform: None,
            settings,
            credentials,
        }
    }

    /// Use `platform` instead of searching the configured candidates.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Provision `account` and record it, returning its switch identifier.
    ///
    /// OAuth accounts need `credential_config`, the client secrets file to
    /// authorize against. `interactive` allows opening a browser.
    pub fn add_account(
        &self,
        mut account: Account,
        credential_config: Option<&Path>,
        interactive: bool,
    ) -> Result<u32> {
        account.validate(false)?;
        let email = account.email.clone();
        debug!(%email, "Provisioning account");

        let platform = self.platform()?;
        self.ensure_dirs()?;
        self.write_base_files(&platform)?;
        self.ensure_main_muttrc()?;

        if account.auth_method == AuthMethod::DelegatedOAuth {
            let source = credential_config.ok_or_else(|| Error::CredentialConfigRequired {
                email: email.clone(),
            })?;
            let stored = self.store_credential_config(&email, source)?;
            let token_path = self.paths.token_file(email.as_str());
            let (_, transition) =
                self.credentials
                    .ensure_valid(&token_path, &stored, self.open_browser(interactive))?;
            debug!(%email, ?transition, "Credential ready");
            account.credential_config = Some(stored);
        }

        let main_muttrc = self.paths.main_muttrc();
        let content = io::read_text(&main_muttrc)?;
        let id = existing_id_for(&content, email.as_str()).unwrap_or_else(|| next_account_id(&content));
        debug!(%email, id, "Allocated switch identifier");

        let account_muttrc = self.paths.account_muttrc(email.as_str());
        io::write_text(&account_muttrc, &render_account_muttrc(&account, &self.paths))?;
        merge_line(&main_muttrc, &source_line(&account_muttrc))?;
        merge_line(
            &main_muttrc,
            &switch_macro_line(id, &account_muttrc, email.as_str()),
        )?;

        self.ensure_maildirs(&account)?;
        self.merge_relay(&account, &platform)?;
        self.merge_sync(&account, &platform)?;

        account.validate(true)?;
        let mut registry = Registry::load(&self.paths.accounts_file)?;
        if registry.upsert(account).is_some() {
            debug!(%email, "Replaced existing registry record");
        }
        registry.save(&self.paths.accounts_file)?;

        info!(%email, id, "Configured account");
        Ok(id)
    }

    /// Registered emails in sorted order.
    pub fn list_accounts(&self) -> Result<Vec<EmailAddress>> {
        let registry = Registry::load(&self.paths.accounts_file)?;
        Ok(registry.emails().cloned().collect())
    }

    /// Bring the stored credential for `email` to a valid state.
    pub fn refresh_credential(&self, email: &str, interactive: bool) -> Result<Transition> {
        let (token_path, client_path) = self.credential_paths(email)?;
        let (_, transition) =
            self.credentials
                .ensure_valid(&token_path, &client_path, self.open_browser(interactive))?;
        info!(email, ?transition, "Credential refreshed");
        Ok(transition)
    }

    /// A currently valid access token for `email`, for use as a password.
    pub fn access_token(&self, email: &str) -> Result<String> {
        let (token_path, client_path) = self.credential_paths(email)?;
        Ok(self.credentials.access_token(&token_path, &client_path)?)
    }

    fn credential_paths(&self, email: &str) -> Result<(PathBuf, PathBuf)> {
        let registry = Registry::load(&self.paths.accounts_file)?;
        let account = EmailAddress::parse(email)
            .ok()
            .and_then(|email| registry.get(&email).cloned())
            .ok_or_else(|| Error::AccountNotFound {
                email: email.to_string(),
            })?;

        let client_path = match (&account.credential_config, account.uses_oauth()) {
            (Some(path), true) => path.clone(),
            _ => {
                return Err(Error::NotOAuthAccount {
                    email: account.email,
                });
            }
        };
        Ok((self.paths.token_file(account.email.as_str()), client_path))
    }

    /// Only provisioning needs host resources; a missing CA bundle fails here.
    fn platform(&self) -> Result<Platform> {
        match &self.platform {
            Some(platform) => Ok(platform.clone()),
            None => Ok(self.settings.platform.candidates().resolve()?),
        }
    }

    fn open_browser(&self, interactive: bool) -> bool {
        interactive && self.settings.oauth.open_browser
    }

    fn ensure_dirs(&self) -> Result<()> {
        for dir in self.paths.required_dirs() {
            io::ensure_dir(dir)?;
        }
        Ok(())
    }

    /// Wholly owned files, rewritten on every run.
    fn write_base_files(&self, platform: &Platform) -> Result<()> {
        io::write_text(&self.paths.base_muttrc, &render_base_muttrc(&self.paths))?;
        io::write_text(&self.paths.switch_muttrc, SWITCH_MUTTRC)?;
        io::write_text(&self.paths.mailcap, &render_mailcap(&self.paths))?;
        io::write_executable(&self.paths.openfile, OPENFILE_SH)?;

        if let Some(sasl_path) = &platform.sasl_path {
            io::write_text(
                &self.paths.env_file,
                &format!("SASL_PATH={}\n", sasl_path.display()),
            )?;
        }
        debug!(dir = %self.paths.app_config.display(), "Wrote base files");
        Ok(())
    }

    fn ensure_main_muttrc(&self) -> Result<()> {
        let main_muttrc = self.paths.main_muttrc();
        if io::read_text_if_exists(&main_muttrc)?.is_none() {
            io::write_text(&main_muttrc, MAIN_MUTTRC_HEADER)?;
        }
        merge_line(&main_muttrc, &source_line(&self.paths.base_muttrc))?;
        Ok(())
    }

    fn store_credential_config(&self, email: &EmailAddress, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(Error::CredentialConfigNotFound {
                path: source.to_path_buf(),
            });
        }
        // Fail on a malformed file before anything is authorized against it
        ClientConfig::load(source)?;

        let stored = self.paths.client_file(email.as_str());
        io::copy_file(source, &stored)?;
        debug!(%email, path = %stored.display(), "Stored client configuration");
        Ok(stored)
    }

    fn ensure_maildirs(&self, account: &Account) -> Result<()> {
        let root = self.paths.account_maildir(account.email.as_str());
        for mailbox in mailboxes_for_account(account) {
            for sub in ["cur", "new", "tmp"] {
                io::ensure_dir(&root.join(mailbox).join(sub))?;
            }
        }
        Ok(())
    }

    fn merge_relay(&self, account: &Account, platform: &Platform) -> Result<()> {
        let config = &self.paths.msmtp_config;
        let ca_bundle = platform.ca_bundle();
        if io::read_text_if_exists(config)?.is_none() {
            io::write_text(config, &render_relay_defaults(&self.paths, ca_bundle))?;
        }
        merge_fragment(
            config,
            &line_marker(relay_marker(account)),
            &render_relay_account(account, ca_bundle),
        )?;
        Ok(())
    }

    fn merge_sync(&self, account: &Account, platform: &Platform) -> Result<()> {
        let fragment = render_sync_account(
            account,
            &self.paths,
            platform.ca_bundle(),
            self.settings.defaults.max_messages,
        );
        let outcome = merge_fragment(
            &self.paths.mbsync_config,
            &line_marker(sync_marker(account)),
            &fragment,
        )?;

        if outcome == MergeOutcome::Created {
            self.link_isyncrc();
        }
        Ok(())
    }

    /// Point the indexer's default isync config at ours. Best effort.
    fn link_isyncrc(&self) {
        let alias = &self.paths.isyncrc;
        if alias.exists() || io::is_symlink(alias) {
            return;
        }
        if let Err(e) = io::create_symlink(&self.paths.mbsync_config, alias) {
            warn!("Could not link {}: {e}", alias.display());
        }
    }
}

/// A marker that must match a whole line, so `account a@x.com` is not
/// found inside `account a@x.com.au`.
fn line_marker(marker: String) -> String {
    marker + "\n"
}
