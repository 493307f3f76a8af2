use std::fs;

use mw_blocks::{contains_marker, merge_fragment, writer::append_fragment};
use proptest::prelude::*;
use tempfile::tempdir;

proptest! {
    #[test]
    fn test_append_never_alters_existing_bytes(
        existing in "\\PC*",
        fragment in "\\PC*",
    ) {
        let result = append_fragment(&existing, &fragment);
        prop_assert!(result.starts_with(&existing));
        prop_assert!(result.ends_with(&fragment));
        prop_assert_eq!(result.len(), existing.len() + 1 + fragment.len());
    }

    #[test]
    fn test_merge_is_idempotent(
        existing in proptest::option::of("[a-z \\n]{0,80}"),
        name in "[a-z]{1,12}",
        body in "[a-z \\n]{0,40}",
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target");
        if let Some(existing) = &existing {
            fs::write(&path, existing).unwrap();
        }

        let marker = format!("IMAPStore {name}@x.com-remote");
        let fragment = format!("{marker}\n{body}\n");

        merge_fragment(&path, &marker, &fragment).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        merge_fragment(&path, &marker, &fragment).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert!(contains_marker(&first, &marker));
        if let Some(existing) = &existing {
            prop_assert!(first.starts_with(existing.as_str()));
        }
    }
}
