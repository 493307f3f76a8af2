//! Resource locations derived from the XDG base directories
//!
//! [`Paths`] is a pure function of four base directories. [`BaseDirs`]
//! resolves those from the environment with the usual XDG fallbacks.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Directory name used for everything the tool owns outright.
pub const APP_NAME: &str = "mutt-wizard";

/// The four XDG base directories everything else hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirs {
    pub config_home: PathBuf,
    pub data_home: PathBuf,
    pub cache_home: PathBuf,
    pub state_home: PathBuf,
}

impl BaseDirs {
    /// Resolve base directories from the process environment.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        Ok(Self::resolve(&home, |key| std::env::var(key).ok()))
    }

    /// Resolve base directories with an explicit home and variable lookup.
    ///
    /// Empty variables count as unset. A leading `~` is expanded against
    /// `home`.
    pub fn resolve(home: &Path, var: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str, fallback: &str| -> PathBuf {
            match var(key).filter(|v| !v.is_empty()) {
                Some(value) => expand_home(&value, home),
                None => home.join(fallback),
            }
        };

        Self {
            config_home: lookup("XDG_CONFIG_HOME", ".config"),
            data_home: lookup("XDG_DATA_HOME", ".local/share"),
            cache_home: lookup("XDG_CACHE_HOME", ".cache"),
            state_home: lookup("XDG_STATE_HOME", ".local/state"),
        }
    }
}

fn expand_home(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        home.to_path_buf()
    } else if let Some(rest) = value.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(value)
    }
}

/// Every file and directory the tool reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub config_home: PathBuf,
    pub data_home: PathBuf,
    pub cache_home: PathBuf,
    pub state_home: PathBuf,
    /// Wholly owned configuration root; removed as a unit by reset.
    pub app_config: PathBuf,
    pub mutt_config: PathBuf,
    pub mutt_accounts: PathBuf,
    pub maildir_root: PathBuf,
    pub mbsync_config: PathBuf,
    pub msmtp_config: PathBuf,
    pub msmtp_log: PathBuf,
    pub tokens_dir: PathBuf,
    pub clients_dir: PathBuf,
    pub base_muttrc: PathBuf,
    pub switch_muttrc: PathBuf,
    pub mailcap: PathBuf,
    pub openfile: PathBuf,
    pub cache_dir: PathBuf,
    pub accounts_file: PathBuf,
    pub env_file: PathBuf,
    /// Optional user settings, deliberately outside `app_config`.
    pub settings_file: PathBuf,
    /// Alias the indexer and isync look for by default.
    pub isyncrc: PathBuf,
}

impl Paths {
    pub fn new(base: BaseDirs) -> Self {
        let BaseDirs {
            config_home,
            data_home,
            cache_home,
            state_home,
        } = base;

        let app_config = config_home.join(APP_NAME);
        let mutt_config = config_home.join("mutt");

        Self {
            mutt_accounts: mutt_config.join("accounts"),
            maildir_root: data_home.join("mail"),
            mbsync_config: app_config.join("mbsyncrc"),
            msmtp_config: app_config.join("msmtp").join("config"),
            msmtp_log: state_home.join("msmtp").join("msmtp.log"),
            tokens_dir: app_config.join("tokens"),
            clients_dir: app_config.join("clients"),
            base_muttrc: app_config.join(format!("{APP_NAME}.muttrc")),
            switch_muttrc: app_config.join("switch.muttrc"),
            mailcap: app_config.join("mailcap"),
            openfile: app_config.join("openfile"),
            cache_dir: cache_home.join(APP_NAME),
            accounts_file: app_config.join("accounts.json"),
            env_file: app_config.join("env"),
            settings_file: config_home.join(format!("{APP_NAME}.toml")),
            isyncrc: config_home.join("isyncrc"),
            app_config,
            mutt_config,
            config_home,
            data_home,
            cache_home,
            state_home,
        }
    }

    /// Resolve all paths from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(BaseDirs::from_env()?))
    }

    /// The reader's top-level file, which may be mostly user-authored.
    pub fn main_muttrc(&self) -> PathBuf {
        self.mutt_config.join("muttrc")
    }

    /// Per-account reader file.
    pub fn account_muttrc(&self, email: &str) -> PathBuf {
        self.mutt_accounts.join(format!("{email}.muttrc"))
    }

    /// Local mailbox tree for one account.
    pub fn account_maildir(&self, email: &str) -> PathBuf {
        self.maildir_root.join(email)
    }

    /// Stored credential for one account.
    pub fn token_file(&self, email: &str) -> PathBuf {
        self.tokens_dir.join(format!("{email}.json"))
    }

    /// Stored OAuth client configuration for one account.
    pub fn client_file(&self, email: &str) -> PathBuf {
        self.clients_dir.join(format!("{email}.json"))
    }

    /// Header and body cache for one account.
    pub fn account_cache(&self, email: &str) -> PathBuf {
        self.cache_dir.join(email.replace('@', "_"))
    }

    /// Directories provisioning creates up front.
    pub fn required_dirs(&self) -> Vec<&Path> {
        let mut dirs = vec![
            self.app_config.as_path(),
            self.mutt_config.as_path(),
            self.mutt_accounts.as_path(),
            self.maildir_root.as_path(),
            self.tokens_dir.as_path(),
            self.clients_dir.as_path(),
            self.cache_dir.as_path(),
        ];
        for file in [&self.mbsync_config, &self.msmtp_config, &self.msmtp_log] {
            if let Some(parent) = file.parent() {
                dirs.push(parent);
            }
        }
        dirs
    }
}
