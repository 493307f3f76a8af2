//! Fragment merging for files mutt-wizard shares with the user.
//!
//! A fragment is a block of generated text identified by a marker: a
//! literal substring whose presence anywhere in the target is taken as
//! proof the fragment was already applied. Merging is strictly additive:
//!
//! ```text
//! merge(file, marker, fragment)
//!   file missing            -> create with exactly `fragment`
//!   marker already present  -> no write
//!   otherwise               -> existing bytes, "\n", fragment
//! ```
//!
//! The [`marker`] module holds the predicate, [`writer`] the pure text
//! transformations, and [`file`] applies them to files on disk.

pub mod error;
pub mod file;
pub mod marker;
pub mod writer;

pub use error::{Error, Result};
pub use file::{MergeOutcome, filter_file, merge_fragment, merge_line};
pub use marker::contains_marker;
pub use writer::{append_fragment, append_line, retain_lines};
