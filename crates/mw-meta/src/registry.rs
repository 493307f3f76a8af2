//! Persistent account registry
//!
//! The registry is the single source of truth for which accounts exist.
//! It is read whole before a mutation and written whole afterwards:
//!
//! ```json
//! {
//!   "a@x.com": { "email": "a@x.com", "auth_method": "pass", ... }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use mw_fs::io;
use tracing::debug;

use crate::account::{Account, AuthMethod, EmailAddress};
use crate::error::{Error, Result};

/// Accounts keyed by email, in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registry {
    accounts: BTreeMap<EmailAddress, Account>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from `path`. A missing file is an empty registry.
    ///
    /// Records are rejected when they do not parse, when their key differs
    /// from their `email`, or when their auth settings are inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(content) = io::read_text_if_exists(path)? else {
            debug!(path = %path.display(), "No registry file, starting empty");
            return Ok(Self::new());
        };

        let invalid = |message: String| Error::InvalidRegistry {
            path: path.to_path_buf(),
            message,
        };

        let raw: BTreeMap<String, Account> =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        let mut accounts = BTreeMap::new();
        for (key, mut account) in raw {
            if key != account.email.as_str() {
                return Err(invalid(format!(
                    "entry '{key}' holds the record for '{}'",
                    account.email
                )));
            }
            // Older registries tag every non-Gmail account as "oauth" even
            // though its configs always read the secret store.
            if !account.is_managed_provider && account.auth_method == AuthMethod::DelegatedOAuth {
                account.auth_method = AuthMethod::SecretStore;
            }
            account
                .validate(true)
                .map_err(|e| invalid(e.to_string()))?;
            accounts.insert(account.email.clone(), account);
        }

        debug!(path = %path.display(), count = accounts.len(), "Loaded registry");
        Ok(Self { accounts })
    }

    /// Write the whole registry to `path` atomically, keys sorted.
    pub fn save(&self, path: &Path) -> Result<()> {
        let serialize_error = |e: serde_json::Error| Error::RegistrySerialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        // Going through Value sorts the keys inside each record too
        let value = serde_json::to_value(&self.accounts).map_err(serialize_error)?;
        let content = serde_json::to_string_pretty(&value).map_err(serialize_error)?;
        io::write_text(path, &content)?;
        debug!(path = %path.display(), count = self.accounts.len(), "Saved registry");
        Ok(())
    }

    /// Insert or wholly replace the record for `account.email`.
    ///
    /// Returns the previous record, if any.
    pub fn upsert(&mut self, account: Account) -> Option<Account> {
        self.accounts.insert(account.email.clone(), account)
    }

    pub fn get(&self, email: &EmailAddress) -> Option<&Account> {
        self.accounts.get(email)
    }

    /// Emails in sorted order.
    pub fn emails(&self) -> impl Iterator<Item = &EmailAddress> {
        self.accounts.keys()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
