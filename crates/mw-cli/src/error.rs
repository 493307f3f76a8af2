//! Error types for mw-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mw-core
    #[error(transparent)]
    Core(#[from] mw_core::Error),

    /// Error from mw-meta
    #[error(transparent)]
    Meta(#[from] mw_meta::Error),

    /// Error from mw-fs
    #[error(transparent)]
    Fs(#[from] mw_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_transparent() {
        let error = CliError::from(mw_core::Error::NoAccountsConfigured);
        assert_eq!(error.to_string(), "No accounts configured.");
    }
}
