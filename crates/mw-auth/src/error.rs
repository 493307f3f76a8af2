//! Error types for mw-auth

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] mw_fs::Error),

    #[error("Invalid OAuth client configuration at {path}: {message}")]
    InvalidClientConfig { path: PathBuf, message: String },

    #[error("Failed to serialize credential for {path}: {message}")]
    CredentialSerialize { path: PathBuf, message: String },

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("OAuth callback server failed: {0}")]
    CallbackServerFailed(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}
