//! Error types for mw-core

use std::path::PathBuf;

use mw_meta::EmailAddress;

/// Result type for mw-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// How an error is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Something the caller supplied is missing or wrong.
    UserInput,
    /// The host is missing a resource or refused a write.
    Environment,
    /// Obtaining or refreshing a credential failed.
    Authorization,
}

/// Errors that can occur in mw-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// OAuth account added without a client secrets file
    #[error("--client-secrets is required for Gmail OAuth")]
    CredentialConfigRequired { email: EmailAddress },

    /// Client secrets file given on the command line does not exist
    #[error("Client secrets file not found: {path}")]
    CredentialConfigNotFound { path: PathBuf },

    #[error("Account not found in accounts.json: {email}")]
    AccountNotFound { email: String },

    /// Credential operation on an account that does not use OAuth
    #[error("Account {email} does not have a stored client_secret")]
    NotOAuthAccount { email: EmailAddress },

    #[error("Reset was not confirmed")]
    ResetNotConfirmed,

    #[error("No accounts configured.")]
    NoAccountsConfigured,

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from mw-fs
    #[error(transparent)]
    Fs(#[from] mw_fs::Error),

    /// Merge error from mw-blocks
    #[error(transparent)]
    Blocks(#[from] mw_blocks::Error),

    /// Metadata error from mw-meta
    #[error(transparent)]
    Meta(#[from] mw_meta::Error),

    /// Credential error from mw-auth
    #[error(transparent)]
    Auth(#[from] mw_auth::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        use ErrorCategory::*;

        match self {
            Error::CredentialConfigRequired { .. }
            | Error::CredentialConfigNotFound { .. }
            | Error::AccountNotFound { .. }
            | Error::NotOAuthAccount { .. }
            | Error::ResetNotConfirmed
            | Error::NoAccountsConfigured => UserInput,

            Error::Fs(_) | Error::Blocks(_) => Environment,

            Error::Meta(mw_meta::Error::Fs(_)) => Environment,
            Error::Meta(_) => UserInput,

            Error::Auth(mw_auth::Error::Fs(_)) => Environment,
            Error::Auth(mw_auth::Error::InvalidClientConfig { .. }) => UserInput,
            Error::Auth(_) => Authorization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_bundle_is_environmental() {
        let err = Error::from(mw_fs::Error::CaBundleNotFound { searched: vec![] });
        assert_eq!(err.category(), ErrorCategory::Environment);
        assert!(err.to_string().contains("CA certificate not found"));
    }

    #[test]
    fn refresh_failure_is_authorization() {
        let err = Error::from(mw_auth::Error::RefreshFailed("invalid_grant".into()));
        assert_eq!(err.category(), ErrorCategory::Authorization);
    }

    #[test]
    fn missing_hosts_is_user_input() {
        let err = Error::from(mw_meta::Error::MissingHosts);
        assert_eq!(err.category(), ErrorCategory::UserInput);
    }
}
