//! Account records and the email address that identifies them.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const GMAIL_IMAP_HOST: &str = "imap.gmail.com";
pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";

/// A validated email address.
///
/// The address is embedded verbatim in file names and config directives,
/// so anything that could escape a directory or break a line is rejected.
///
/// # Example
///
/// ```
/// use mw_meta::EmailAddress;
///
/// let email: EmailAddress = "alice@example.com".parse().unwrap();
/// assert_eq!(email.local_part(), "alice");
/// assert_eq!(email.domain(), "example.com");
/// assert!("../x@y".parse::<EmailAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let invalid = |reason| Error::InvalidEmail {
            email: value.clone(),
            reason,
        };

        if value.is_empty() {
            return Err(invalid("empty address"));
        }
        if value == "." || value == ".." {
            return Err(invalid("not an address"));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("contains whitespace or control characters"));
        }
        if value.contains('/') || value.contains('\\') {
            return Err(invalid("contains a path separator"));
        }

        let mut parts = value.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {}
            (_, _, Some(_)) => return Err(invalid("more than one '@'")),
            _ => return Err(invalid("expected local@domain")),
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(&self.0, |(local, _)| local)
    }

    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl FromStr for EmailAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the account's password comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    /// `pass <prefix><email>`
    #[serde(rename = "pass")]
    SecretStore,
    /// `mw oauth token <email>`
    #[serde(rename = "oauth")]
    DelegatedOAuth,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::SecretStore => write!(f, "pass"),
            AuthMethod::DelegatedOAuth => write!(f, "oauth"),
        }
    }
}

/// One configured mail account, as stored in the registry.
///
/// Field names on disk keep the historical registry keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub email: EmailAddress,
    pub login: String,
    #[serde(rename = "realname")]
    pub display_name: String,
    pub imap_host: String,
    pub imap_port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    #[serde(rename = "is_gmail")]
    pub is_managed_provider: bool,
    pub auth_method: AuthMethod,
    #[serde(rename = "pass_prefix", default)]
    pub secret_store_prefix: String,
    #[serde(rename = "client_secret", default)]
    pub credential_config: Option<PathBuf>,
}

impl Account {
    /// Whether the generated configs fetch passwords through `mw oauth token`.
    pub fn uses_oauth(&self) -> bool {
        self.is_managed_provider && self.auth_method == AuthMethod::DelegatedOAuth
    }

    /// Check the record's internal invariants.
    ///
    /// `require_credential_config` is false while an account is still being
    /// provisioned and its client configuration has not been stored yet.
    pub fn validate(&self, require_credential_config: bool) -> Result<()> {
        let invalid = |message: &str| Error::InvalidAccount {
            email: self.email.to_string(),
            message: message.to_string(),
        };

        if self.imap_port == 0 || self.smtp_port == 0 {
            return Err(invalid("ports must be positive"));
        }
        if self.imap_host.is_empty() || self.smtp_host.is_empty() {
            return Err(invalid("IMAP and SMTP hosts must not be empty"));
        }
        if self.auth_method == AuthMethod::DelegatedOAuth {
            if !self.is_managed_provider {
                return Err(invalid("OAuth is only supported for Gmail accounts"));
            }
            if require_credential_config && self.credential_config.is_none() {
                return Err(invalid("OAuth account has no stored client configuration"));
            }
        }
        Ok(())
    }
}

/// Provider preset selected when adding an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountKind {
    /// Any IMAP/SMTP provider; hosts must be given explicitly.
    #[default]
    Generic,
    /// Gmail with an app password from the secret store.
    Gmail,
    /// Gmail with delegated OAuth.
    GmailOAuth,
}

/// Caller-supplied account description, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct AccountDraft {
    pub email: String,
    pub kind: AccountKind,
    pub login: Option<String>,
    pub display_name: Option<String>,
    pub imap_host: Option<String>,
    pub imap_port: u16,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub secret_store_prefix: String,
}

impl AccountDraft {
    pub fn new(email: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            email: email.into(),
            kind,
            imap_port: 993,
            smtp_port: 587,
            ..Self::default()
        }
    }

    /// Apply provider defaults and validate.
    pub fn build(self) -> Result<Account> {
        let email = EmailAddress::parse(self.email)?;
        let login = self.login.unwrap_or_else(|| email.to_string());
        let display_name = self
            .display_name
            .unwrap_or_else(|| email.local_part().to_string());

        let (imap_host, smtp_host, is_managed_provider, auth_method) = match self.kind {
            AccountKind::Generic => match (self.imap_host, self.smtp_host) {
                (Some(imap), Some(smtp)) => (imap, smtp, false, AuthMethod::SecretStore),
                _ => return Err(Error::MissingHosts),
            },
            AccountKind::Gmail | AccountKind::GmailOAuth => (
                self.imap_host
                    .unwrap_or_else(|| GMAIL_IMAP_HOST.to_string()),
                self.smtp_host
                    .unwrap_or_else(|| GMAIL_SMTP_HOST.to_string()),
                true,
                if self.kind == AccountKind::GmailOAuth {
                    AuthMethod::DelegatedOAuth
                } else {
                    AuthMethod::SecretStore
                },
            ),
        };

        // OAuth never reads the secret store
        let secret_store_prefix = match auth_method {
            AuthMethod::SecretStore => self.secret_store_prefix,
            AuthMethod::DelegatedOAuth => String::new(),
        };

        let account = Account {
            email,
            login,
            display_name,
            imap_host,
            imap_port: self.imap_port,
            smtp_host,
            smtp_port: self.smtp_port,
            is_managed_provider,
            auth_method,
            secret_store_prefix,
            credential_config: None,
        };
        account.validate(false)?;
        Ok(account)
    }
}
