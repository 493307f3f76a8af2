//! Optional user settings
//!
//! Loaded from `mutt-wizard.toml` in the config home (or an explicit path).
//! Every key is optional; a missing file means all defaults:
//!
//! ```toml
//! [defaults]
//! imap_port = 993
//! smtp_port = 587
//! max_messages = 0
//!
//! [oauth]
//! open_browser = true
//! scopes = ["https://mail.google.com/"]
//!
//! [platform]
//! ca_bundles = ["/etc/ssl/certs/ca-certificates.crt"]
//! sasl_dirs = ["/usr/lib/sasl2"]
//!
//! [sync]
//! notmuch = true
//! program = "mbsync"
//! ```

use std::path::{Path, PathBuf};

use mw_fs::{PlatformCandidates, io};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const GMAIL_SCOPE: &str = "https://mail.google.com/";

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub defaults: AccountDefaults,
    #[serde(default)]
    pub oauth: OAuthSettings,
    #[serde(default)]
    pub platform: PlatformSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(content) = io::read_text_if_exists(path)? else {
            return Ok(Self::default());
        };
        toml::from_str(&content).map_err(|e| Error::InvalidSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Values used when `mw add` is not given them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountDefaults {
    #[serde(default = "default_imap_port")]
    pub imap_port: u16,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Per-mailbox cap written into each sync channel; 0 is unlimited.
    #[serde(default)]
    pub max_messages: u32,
}

fn default_imap_port() -> u16 {
    993
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for AccountDefaults {
    fn default() -> Self {
        Self {
            imap_port: default_imap_port(),
            smtp_port: default_smtp_port(),
            max_messages: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OAuthSettings {
    #[serde(default = "default_true")]
    pub open_browser: bool,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_scopes() -> Vec<String> {
    vec![GMAIL_SCOPE.to_string()]
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            open_browser: true,
            scopes: default_scopes(),
        }
    }
}

/// Candidate lists overriding the built-in host resource search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSettings {
    #[serde(default)]
    pub ca_bundles: Option<Vec<PathBuf>>,
    #[serde(default)]
    pub sasl_dirs: Option<Vec<PathBuf>>,
}

impl PlatformSettings {
    /// Ordered candidates, built-in lists where nothing is configured.
    pub fn candidates(&self) -> PlatformCandidates {
        let defaults = PlatformCandidates::default();
        PlatformCandidates {
            ca_bundles: self.ca_bundles.clone().unwrap_or(defaults.ca_bundles),
            sasl_dirs: self.sasl_dirs.clone().unwrap_or(defaults.sasl_dirs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSettings {
    /// Run `notmuch new` after synchronizing.
    #[serde(default = "default_true")]
    pub notmuch: bool,
    /// Synchronizer binary, by name or path.
    #[serde(default = "default_sync_program")]
    pub program: String,
}

fn default_sync_program() -> String {
    "mbsync".to_string()
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            notmuch: true,
            program: default_sync_program(),
        }
    }
}
