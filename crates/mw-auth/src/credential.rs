//! Stored credentials and their lifecycle state.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mw_fs::io;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ClientConfig;
use crate::error::{Error, Result};

/// Tokens are treated as expired this many seconds before their expiry.
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// Tokens as returned by an authorization or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<Duration>,
}

/// One account's persisted OAuth credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Credential {
    /// Build a credential from a fresh grant.
    ///
    /// A grant without a refresh token keeps `previous_refresh`; token
    /// endpoints usually omit it on refresh.
    pub fn from_grant(
        grant: TokenGrant,
        client: &ClientConfig,
        scopes: &[String],
        previous_refresh: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let expiry = grant
            .expires_in
            .and_then(|d| TimeDelta::from_std(d).ok())
            .map(|d| now + d);

        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.or(previous_refresh),
            expiry,
            token_uri: client.token_uri.clone(),
            client_id: client.client_id.clone(),
            scopes: scopes.to_vec(),
        }
    }

    /// Whether the access token is expired, or within [`EXPIRY_SKEW_SECS`] of it.
    ///
    /// A credential without an expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| now + TimeDelta::seconds(EXPIRY_SKEW_SECS) >= expiry)
    }

    /// Overwrite `path` with this credential, readable by the owner only.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::CredentialSerialize {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        io::write_private(path, &content)?;
        Ok(())
    }
}

/// Where a stored credential sits in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    /// No credential file.
    Absent,
    /// Usable as is.
    Valid(Credential),
    /// Expired, but holds a refresh token.
    Stale(Credential),
    /// Malformed, or expired with nothing to refresh it with.
    Invalid,
}

impl CredentialState {
    pub fn classify(credential: Credential, now: DateTime<Utc>) -> Self {
        if !credential.is_expired(now) {
            Self::Valid(credential)
        } else if credential.refresh_token.is_some() {
            Self::Stale(credential)
        } else {
            Self::Invalid
        }
    }

    /// Read and classify the credential at `path`.
    ///
    /// Only I/O failures are errors; unparsable content is `Invalid`.
    pub fn read(path: &Path, now: DateTime<Utc>) -> Result<Self> {
        let Some(content) = io::read_text_if_exists(path)? else {
            return Ok(Self::Absent);
        };

        match serde_json::from_str::<Credential>(&content) {
            Ok(credential) => Ok(Self::classify(credential, now)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Malformed credential file");
                Ok(Self::Invalid)
            }
        }
    }
}
