//! Property tests for project-boundary path handling.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use tether::domain::value_objects::{ensure_within, SafePath};

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => proptest::string::string_regex("[a-z0-9_-]{1,8}").unwrap(),
        1 => Just("..".to_string()),
        1 => Just(".".to_string()),
    ]
}

fn relative() -> impl Strategy<Value = PathBuf> {
    proptest::collection::vec(segment(), 1..6).prop_map(|s| s.iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Whatever `ensure_within` accepts is strictly inside the root.
    #[test]
    fn property_ensure_within_never_escapes(rel in relative()) {
        let root = Path::new("/work/project-that-does-not-exist");
        if let Ok(resolved) = ensure_within(root, &rel) {
            prop_assert!(resolved.starts_with(root));
            prop_assert_ne!(resolved.as_path(), root);
            prop_assert!(!resolved.components().any(|c| c.as_os_str() == ".."));
        }
    }

    /// PROPERTY: Paths without `..` are accepted as record paths and stay inside.
    #[test]
    fn property_safe_paths_resolve_inside(parts in proptest::collection::vec("[a-z]{1,8}", 1..5)) {
        let rel: PathBuf = parts.iter().collect();
        let safe = SafePath::new(&rel).unwrap();
        let root = Path::new("/work/project-that-does-not-exist");
        prop_assert!(ensure_within(root, safe.as_path()).is_ok());
        prop_assert_eq!(safe.to_record_string(), parts.join("/"));
    }
}
