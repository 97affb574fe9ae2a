//! Property tests for deployment record identity.

use std::collections::HashSet;

use proptest::prelude::*;

use tether::domain::entities::{DeploymentRecord, DeploymentSet};
use tether::domain::value_objects::{ArtifactType, ContentHash, SafePath};

const NAMES: &[&str] = &["pdf", "review", "planner"];
const PROFILES: &[Option<&str>] = &[None, Some("claude_code"), Some("codex")];

fn artifact_type() -> impl Strategy<Value = ArtifactType> {
    prop::sample::select(ArtifactType::ALL.to_vec())
}

fn record(name: &str, artifact_type: ArtifactType, profile: Option<&str>, n: u8) -> DeploymentRecord {
    let mut record = DeploymentRecord::new(
        name,
        artifact_type,
        "default",
        SafePath::new(format!("{}/{}", artifact_type.directory_name(), name)).unwrap(),
        ContentHash::from_bytes(&[n]),
    );
    record.deployment_profile_id = profile.map(str::to_string);
    record
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: After any sequence of upserts there is exactly one record per
    /// (name, type, profile) identity, holding the last value written.
    #[test]
    fn property_upsert_keeps_one_record_per_identity(
        ops in proptest::collection::vec(
            (0..NAMES.len(), artifact_type(), 0..PROFILES.len(), any::<u8>()),
            0..40,
        )
    ) {
        let mut set = DeploymentSet::new();
        let mut last = std::collections::HashMap::new();

        for (name, artifact_type, profile, n) in &ops {
            let record = record(NAMES[*name], *artifact_type, PROFILES[*profile], *n);
            last.insert(record.key(), record.content_hash.clone());
            set.upsert(record);
        }

        let keys: HashSet<_> = set.records().iter().map(DeploymentRecord::key).collect();
        prop_assert_eq!(keys.len(), set.len());
        prop_assert_eq!(set.len(), last.len());
        for r in set.records() {
            prop_assert_eq!(Some(&r.content_hash), last.get(&r.key()));
        }
    }

    /// PROPERTY: A record without a profile id and one with the default id
    /// share an identity.
    #[test]
    fn property_legacy_profile_is_default(artifact_type in artifact_type(), n in any::<u8>()) {
        let mut set = DeploymentSet::new();
        set.upsert(record("pdf", artifact_type, None, n));
        let replaced = set.upsert(record("pdf", artifact_type, Some("claude_code"), n.wrapping_add(1)));
        prop_assert!(replaced);
        prop_assert_eq!(set.len(), 1);
    }
}
