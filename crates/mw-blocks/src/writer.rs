//! Pure text transformations for fragment merging.
//!
//! Nothing here touches the filesystem; [`crate::file`] wraps these with
//! read and atomic write.

/// Appends a fragment after existing content, separated by a newline.
///
/// Every byte of `content` is preserved, in place, ahead of the appended
/// region.
///
/// # Example
/// ```
/// use mw_blocks::writer::append_fragment;
///
/// let result = append_fragment("defaults\nauth on\n", "account a@x.com\n");
/// assert_eq!(result, "defaults\nauth on\n\naccount a@x.com\n");
/// ```
pub fn append_fragment(content: &str, fragment: &str) -> String {
    let mut result = String::with_capacity(content.len() + fragment.len() + 1);
    result.push_str(content);
    result.push('\n');
    result.push_str(fragment);
    result
}

/// Appends a single line, terminating the previous last line if needed.
///
/// Used for one-line directives (`source ...`, `macro ...`) where a blank
/// separator line per directive would only add noise.
///
/// # Example
/// ```
/// use mw_blocks::writer::append_line;
///
/// assert_eq!(append_line("set a\n", "source b"), "set a\nsource b\n");
/// assert_eq!(append_line("set a", "source b"), "set a\nsource b\n");
/// assert_eq!(append_line("", "source b"), "source b\n");
/// ```
pub fn append_line(content: &str, line: &str) -> String {
    let mut result = String::with_capacity(content.len() + line.len() + 2);
    result.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        result.push('\n');
    }
    result.push_str(line);
    result.push('\n');
    result
}

/// Keeps the lines for which `keep` returns true, in their original order.
///
/// `keep` sees each line without its terminator. Kept lines are copied
/// byte for byte, `\r\n` and an unterminated last line included. Returns
/// the rewritten content and the number of lines dropped.
pub fn retain_lines(content: &str, mut keep: impl FnMut(&str) -> bool) -> (String, usize) {
    let mut result = String::with_capacity(content.len());
    let mut dropped = 0;

    for raw in content.split_inclusive('\n') {
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if keep(line) {
            result.push_str(raw);
        } else {
            dropped += 1;
        }
    }

    (result, dropped)
}
