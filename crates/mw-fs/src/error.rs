//! Error types for mw-fs

use std::path::PathBuf;

/// Result type for mw-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mw-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Could not determine the home directory")]
    HomeNotFound,

    #[error("CA certificate not found. Please install ca-certificates. Searched: {}", format_paths(.searched))]
    CaBundleNotFound { searched: Vec<PathBuf> },

    #[error("Symbolic links are not supported on this platform: {path}")]
    SymlinkUnsupported { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
