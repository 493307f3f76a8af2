//! Error types for mw-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] mw_fs::Error),

    #[error("Invalid email address '{email}': {reason}")]
    InvalidEmail { email: String, reason: &'static str },

    #[error("Invalid account {email}: {message}")]
    InvalidAccount { email: String, message: String },

    #[error("Non-Gmail accounts require --imap and --smtp")]
    MissingHosts,

    #[error("Invalid account registry at {path}: {message}")]
    InvalidRegistry { path: PathBuf, message: String },

    #[error("Failed to serialize account registry for {path}: {message}")]
    RegistrySerialize { path: PathBuf, message: String },

    #[error("Invalid settings at {path}: {message}")]
    InvalidSettings { path: PathBuf, message: String },
}
