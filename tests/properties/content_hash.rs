//! Property tests for directory content hashing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use tether::domain::ports::ContentHasher;
use tether::infrastructure::Sha256Hasher;

/// Directory components carry no dots, so a file name never collides with a directory
fn file_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,6}(/[a-z]{1,6})?\\.(md|py|txt)").unwrap()
}

fn tree() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    proptest::collection::btree_map(
        file_name(),
        proptest::collection::vec(any::<u8>(), 0..64),
        1..6,
    )
}

/// Write `files` under `root` in the given order of keys
fn materialize(root: &Path, files: &BTreeMap<String, Vec<u8>>, reverse: bool) {
    let mut entries: Vec<_> = files.iter().collect();
    if reverse {
        entries.reverse();
    }
    for (rel, bytes) in entries {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The hash depends on relative paths and bytes only, not on the
    /// directory's location or the order files were created in.
    #[test]
    fn property_hash_ignores_location_and_creation_order(files in tree()) {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let a_root = a.path().join("skill");
        let b_root = b.path().join("nested/elsewhere/skill");
        materialize(&a_root, &files, false);
        materialize(&b_root, &files, true);

        let hasher = Sha256Hasher::new();
        prop_assert_eq!(hasher.hash(&a_root).unwrap(), hasher.hash(&b_root).unwrap());
    }

    /// PROPERTY: Changing any byte of any file changes the hash.
    #[test]
    fn property_hash_changes_with_content(files in tree(), pick in any::<prop::sample::Index>()) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("skill");
        materialize(&root, &files, false);

        let hasher = Sha256Hasher::new();
        let before = hasher.hash(&root).unwrap();

        let (rel, bytes) = files.iter().nth(pick.index(files.len())).unwrap();
        let mut changed = bytes.clone();
        match changed.first_mut() {
            Some(b) => *b = b.wrapping_add(1),
            None => changed.push(0),
        }
        fs::write(root.join(rel), &changed).unwrap();

        prop_assert_ne!(before, hasher.hash(&root).unwrap());
    }

    /// PROPERTY: Renaming a file changes the hash even with identical bytes.
    #[test]
    fn property_hash_changes_with_relative_path(files in tree(), pick in any::<prop::sample::Index>()) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("skill");
        materialize(&root, &files, false);

        let hasher = Sha256Hasher::new();
        let before = hasher.hash(&root).unwrap();

        let (rel, _) = files.iter().nth(pick.index(files.len())).unwrap();
        let renamed = format!("{}.renamed", rel);
        prop_assume!(!files.contains_key(&renamed));
        fs::rename(root.join(rel), root.join(&renamed)).unwrap();

        prop_assert_ne!(before, hasher.hash(&root).unwrap());
    }
}
