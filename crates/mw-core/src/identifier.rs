//! Account switch identifiers
//!
//! Each account gets a small number `N`, bound as `i<N>` in the reader's
//! top-level file. Only lines of the switch-macro form are considered when
//! collecting numbers in use; other integers in the file are ignored.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Highest identifier handed out before falling back to `max + 1`.
pub const MAX_PREFERRED_ID: u32 = 9;

static SWITCH_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^macro index,pager i(\d+)").expect("switch macro pattern is valid")
});

/// Identifier embedded in a switch-macro line, if the line is one.
fn macro_id(line: &str) -> Option<u32> {
    SWITCH_MACRO
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// All identifiers used by switch macros in `content`.
pub fn used_ids(content: &str) -> BTreeSet<u32> {
    content.lines().filter_map(macro_id).collect()
}

/// The smallest unused identifier in `1..=9`, else one past the largest.
///
/// When the largest is `u32::MAX`, the smallest free identifier above 9.
///
/// # Example
///
/// ```
/// use mw_core::identifier::next_account_id;
///
/// let muttrc = "macro index,pager i1 '...' \"switch to a@x.com\"\n\
///               macro index,pager i3 '...' \"switch to c@x.com\"\n";
/// assert_eq!(next_account_id(muttrc), 2);
/// ```
pub fn next_account_id(content: &str) -> u32 {
    let used = used_ids(content);
    if let Some(id) = (1..=MAX_PREFERRED_ID).find(|id| !used.contains(id)) {
        return id;
    }
    used.last()
        .and_then(|max| max.checked_add(1))
        .or_else(|| (MAX_PREFERRED_ID + 1..=u32::MAX).find(|id| !used.contains(id)))
        .unwrap_or(u32::MAX)
}

/// The identifier already bound to `email`'s switch macro, if any.
pub fn existing_id_for(content: &str, email: &str) -> Option<u32> {
    let description = format!("\"switch to {email}\"");
    content
        .lines()
        .filter(|line| line.trim_end().ends_with(&description))
        .find_map(macro_id)
}
