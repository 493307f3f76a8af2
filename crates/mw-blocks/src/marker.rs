//! The "already applied" predicate.

/// Whether `marker` occurs anywhere in `content`.
///
/// This is the only test merging performs: the target is never inspected
/// for semantic correctness, only for the marker substring. An empty marker
/// never matches, so it can't silently suppress every merge.
///
/// # Example
/// ```
/// use mw_blocks::contains_marker;
///
/// let mbsyncrc = "IMAPStore a@x.com-remote\nHost imap.x.com\n";
/// assert!(contains_marker(mbsyncrc, "IMAPStore a@x.com-remote"));
/// assert!(!contains_marker(mbsyncrc, "IMAPStore b@x.com-remote"));
/// ```
pub fn contains_marker(content: &str, marker: &str) -> bool {
    !marker.is_empty() && content.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_anywhere_in_content() {
        let content = "# user stuff\naccount a@x.com\nhost smtp.x.com\n";
        assert!(contains_marker(content, "account a@x.com"));
    }

    #[test]
    fn empty_marker_never_matches() {
        assert!(!contains_marker("anything", ""));
        assert!(!contains_marker("", ""));
    }

    #[test]
    fn marker_is_case_sensitive() {
        assert!(!contains_marker("Account A@X.COM", "account a@x.com"));
    }
}
