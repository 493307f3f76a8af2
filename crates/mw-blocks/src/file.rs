//! Fragment merging applied to files on disk.

use std::path::Path;

use mw_fs::io;
use tracing::debug;

use crate::error::{Error, Result};
use crate::marker::contains_marker;
use crate::writer::{append_fragment, append_line, retain_lines};

/// What a merge did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target did not exist and now holds exactly the fragment.
    Created,
    /// The fragment was appended after the existing content.
    Appended,
    /// The marker was already present; nothing was written.
    AlreadyPresent,
}

impl MergeOutcome {
    /// Whether the file on disk changed.
    pub fn wrote(self) -> bool {
        !matches!(self, Self::AlreadyPresent)
    }
}

/// Merge `fragment` into `path` unless `marker` is already present.
///
/// Calling this any number of times with the same marker leaves the file
/// exactly as a single call does.
pub fn merge_fragment(path: &Path, marker: &str, fragment: &str) -> Result<MergeOutcome> {
    merge_with(path, marker, fragment, |existing| append_fragment(existing, fragment))
}

/// Merge a one-line directive, using the line itself as its marker.
///
/// A missing file is created holding just the line.
pub fn merge_line(path: &Path, line: &str) -> Result<MergeOutcome> {
    let terminated = format!("{line}\n");
    merge_with(path, line, &terminated, |existing| append_line(existing, line))
}

fn merge_with(
    path: &Path,
    marker: &str,
    initial: &str,
    append: impl FnOnce(&str) -> String,
) -> Result<MergeOutcome> {
    if marker.is_empty() {
        return Err(Error::EmptyMarker {
            path: path.to_path_buf(),
        });
    }

    let outcome = match io::read_text_if_exists(path)? {
        None => {
            io::write_text(path, initial)?;
            MergeOutcome::Created
        }
        Some(existing) if contains_marker(&existing, marker) => MergeOutcome::AlreadyPresent,
        Some(existing) => {
            io::write_text(path, &append(&existing))?;
            MergeOutcome::Appended
        }
    };

    debug!(path = %path.display(), marker, ?outcome, "Merged fragment");
    Ok(outcome)
}

/// Rewrite `path` keeping only the lines `keep` accepts.
///
/// A missing file is left missing. Returns the number of lines dropped;
/// when nothing is dropped the file is not rewritten.
pub fn filter_file(path: &Path, keep: impl FnMut(&str) -> bool) -> Result<usize> {
    let Some(existing) = io::read_text_if_exists(path)? else {
        return Ok(0);
    };

    let (filtered, dropped) = retain_lines(&existing, keep);
    if dropped > 0 {
        io::write_text(path, &filtered)?;
    }

    debug!(path = %path.display(), dropped, "Filtered lines");
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_marker_is_rejected() {
        let dir = tempdir().unwrap();
        let result = merge_fragment(&dir.path().join("f"), "", "frag");
        assert!(matches!(result, Err(Error::EmptyMarker { .. })));
        assert!(!dir.path().join("f").exists());
    }

    #[test]
    fn test_filter_missing_file_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("muttrc");
        assert_eq!(filter_file(&path, |_| false).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_filter_unchanged_file_is_not_rewritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("muttrc");
        // No trailing newline: a rewrite would add one
        fs::write(&path, "set sort = threads").unwrap();

        assert_eq!(filter_file(&path, |_| true).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "set sort = threads");
    }
}
