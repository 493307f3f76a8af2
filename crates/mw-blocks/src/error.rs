//! Error types for mw-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] mw_fs::Error),

    #[error("Empty marker for fragment merged into {path}")]
    EmptyMarker { path: std::path::PathBuf },
}
