//! Credential state machine for one account at a time.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::client::ClientConfig;
use crate::credential::{Credential, CredentialState};
use crate::error::Result;
use crate::flow::AuthorizationFlow;

/// Which transition [`CredentialManager::ensure_valid`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The stored credential was valid; nothing was written.
    Unchanged,
    /// A stale credential was refreshed silently.
    Refreshed,
    /// A new credential was obtained through the authorization flow.
    Authorized,
}

/// Drives stored credentials through absent, stale, and valid states.
pub struct CredentialManager {
    flow: Box<dyn AuthorizationFlow>,
    scopes: Vec<String>,
}

impl CredentialManager {
    pub fn new(flow: Box<dyn AuthorizationFlow>, scopes: Vec<String>) -> Self {
        Self { flow, scopes }
    }

    /// Make sure `token_path` holds a usable credential and return it.
    ///
    /// Every transition other than [`Transition::Unchanged`] overwrites the
    /// whole credential file.
    pub fn ensure_valid(
        &self,
        token_path: &Path,
        client_path: &Path,
        open_browser: bool,
    ) -> Result<(Credential, Transition)> {
        let state = CredentialState::read(token_path, Utc::now())?;

        let (credential, transition) = match state {
            CredentialState::Valid(credential) => {
                debug!(path = %token_path.display(), "Credential is valid");
                return Ok((credential, Transition::Unchanged));
            }
            CredentialState::Stale(stale) => {
                let client = ClientConfig::load(client_path)?;
                match self.try_refresh(&client, stale) {
                    Some(credential) => (credential, Transition::Refreshed),
                    None => (self.authorize(&client, open_browser)?, Transition::Authorized),
                }
            }
            CredentialState::Absent | CredentialState::Invalid => {
                let client = ClientConfig::load(client_path)?;
                (self.authorize(&client, open_browser)?, Transition::Authorized)
            }
        };

        credential.save(token_path)?;
        info!(path = %token_path.display(), ?transition, "Stored credential");
        Ok((credential, transition))
    }

    /// Ensure a valid credential without opening a browser, then return
    /// its access token.
    pub fn access_token(&self, token_path: &Path, client_path: &Path) -> Result<String> {
        let (credential, _) = self.ensure_valid(token_path, client_path, false)?;
        Ok(credential.access_token)
    }

    fn try_refresh(&self, client: &ClientConfig, stale: Credential) -> Option<Credential> {
        let refresh_token = stale.refresh_token?;
        match self.flow.refresh(client, &refresh_token) {
            Ok(grant) => Some(Credential::from_grant(
                grant,
                client,
                &stale.scopes,
                Some(refresh_token),
                Utc::now(),
            )),
            Err(e) => {
                warn!("Token refresh failed, re-authorizing: {e}");
                None
            }
        }
    }

    /// Local flow first; any failure there falls back to the console flow.
    fn authorize(&self, client: &ClientConfig, open_browser: bool) -> Result<Credential> {
        let grant = match self.flow.authorize_local(client, &self.scopes, open_browser) {
            Ok(grant) => grant,
            Err(e) => {
                warn!("Local authorization failed, falling back to console: {e}");
                self.flow.authorize_console(client, &self.scopes)?
            }
        };
        Ok(Credential::from_grant(
            grant,
            client,
            &self.scopes,
            None,
            Utc::now(),
        ))
    }
}
