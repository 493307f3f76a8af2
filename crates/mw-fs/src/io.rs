//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock on the temp file while writing.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_atomic_with_mode(path, content, None)
}

fn write_atomic_with_mode(path: &Path, content: &[u8], mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    if let Some(mode) = mode {
        set_mode(&temp_path, mode)?;
    }

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Read text content from a file, or `None` if it does not exist.
pub fn read_text_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Write text content atomically and mark the file executable (0755).
pub fn write_executable(path: &Path, content: &str) -> Result<()> {
    write_atomic_with_mode(path, content.as_bytes(), Some(0o755))
}

/// Write text content atomically, readable by the owner only (0600).
///
/// The mode is applied before the rename, so the target path never holds
/// the content with wider permissions.
pub fn write_private(path: &Path, content: &str) -> Result<()> {
    write_atomic_with_mode(path, content.as_bytes(), Some(0o600))
}

/// Copy a file verbatim into place, atomically.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let content = fs::read(from).map_err(|e| Error::io(from, e))?;
    write_atomic(to, &content)
}

/// Create a directory and its parents if absent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Remove a file if present. Returns whether something was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Remove a directory tree if present. Returns whether something was removed.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Whether `path` itself is a symbolic link (dangling links included).
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Remove `path` only if it is a symbolic link.
///
/// A regular file or directory at that path is left alone.
pub fn remove_symlink_if_present(path: &Path) -> Result<bool> {
    if !is_symlink(path) {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    Ok(true)
}

/// Create a symbolic link at `link` pointing to `target`.
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::io(link, e))
}

/// Create a symbolic link at `link` pointing to `target`.
#[cfg(not(unix))]
pub fn create_symlink(_target: &Path, link: &Path) -> Result<()> {
    Err(Error::SymlinkUnsupported {
        path: link.to_path_buf(),
    })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_text_if_exists_returns_none_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_text_if_exists(&dir.path().join("missing")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn remove_file_if_exists_reports_absence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        assert!(!remove_file_if_exists(&path).unwrap());

        fs::write(&path, "x").unwrap();
        assert!(remove_file_if_exists(&path).unwrap());
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn remove_symlink_leaves_regular_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("isyncrc");
        fs::write(&path, "user owned").unwrap();

        assert!(!remove_symlink_if_present(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "user owned");
    }

    #[cfg(unix)]
    #[test]
    fn remove_symlink_removes_dangling_links() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("isyncrc");
        create_symlink(&dir.path().join("gone"), &link).unwrap();

        assert!(is_symlink(&link));
        assert!(remove_symlink_if_present(&link).unwrap());
        assert!(!is_symlink(&link));
    }
}
