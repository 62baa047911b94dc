//! # Index Merge and Sort Properties
//!
//! Property tests over randomly generated index documents:
//!
//! - merging disjoint documents is order-independent,
//! - republishing identical entries never duplicates them,
//! - on key collision the incoming entry wins,
//! - after sorting, every chart's versions are non-increasing.

use std::collections::BTreeSet;

use chartpub_core::{ChartMetadata, IndexDocument};
use proptest::prelude::*;
use semver::Version;

type Key = (String, String);

fn key_strategy() -> impl Strategy<Value = Key> {
    (
        prop::sample::select(vec!["alpha", "beta", "gamma", "delta"]),
        (0u64..4, 0u64..6, 0u64..6),
    )
        .prop_map(|(name, (major, minor, patch))| {
            (name.to_string(), format!("{major}.{minor}.{patch}"))
        })
}

fn keys_strategy() -> impl Strategy<Value = BTreeSet<Key>> {
    prop::collection::btree_set(key_strategy(), 0..24)
}

fn document(keys: &BTreeSet<Key>, digest: &str) -> IndexDocument {
    let mut index = IndexDocument::new();
    for (name, version) in keys {
        index.add(
            ChartMetadata::new(name.as_str(), version.as_str()),
            &format!("{name}-{version}.tgz"),
            "https://charts.example.com",
            digest,
        );
    }
    index
}

fn keys_of(index: &IndexDocument) -> BTreeSet<Key> {
    index
        .entries
        .values()
        .flatten()
        .map(|cv| (cv.name().to_string(), cv.version().to_string()))
        .collect()
}

proptest! {
    #[test]
    fn disjoint_merge_is_order_independent(a in keys_strategy(), b in keys_strategy()) {
        let b: BTreeSet<Key> = b.difference(&a).cloned().collect();
        let doc_a = document(&a, "a");
        let doc_b = document(&b, "b");

        let mut ab = doc_a.clone();
        ab.merge(doc_b.clone());
        ab.sort_entries();

        let mut ba = doc_b;
        ba.merge(doc_a);
        ba.sort_entries();

        prop_assert_eq!(&ab.entries, &ba.entries);
        let union: BTreeSet<Key> = a.union(&b).cloned().collect();
        prop_assert_eq!(keys_of(&ab), union);
        prop_assert_eq!(ab.len(), a.len() + b.len());
    }

    #[test]
    fn identical_republish_does_not_duplicate(keys in keys_strategy()) {
        let doc = document(&keys, "same");
        let mut merged = doc.clone();
        merged.merge(doc.clone());
        merged.merge(doc);
        prop_assert_eq!(merged.len(), keys.len());
    }

    #[test]
    fn incoming_entry_wins_on_collision(current in keys_strategy(), incoming in keys_strategy()) {
        let mut merged = document(&current, "old");
        merged.merge(document(&incoming, "new"));

        for (name, version) in keys_of(&merged) {
            let entry = merged.get(&name, &version).unwrap();
            let expected = if incoming.contains(&(name.clone(), version.clone())) { "new" } else { "old" };
            prop_assert_eq!(entry.digest.as_str(), expected);
            prop_assert_eq!(merged.versions(&name).iter().filter(|cv| cv.version() == version).count(), 1);
        }
    }

    #[test]
    fn sorted_versions_are_non_increasing(a in keys_strategy(), b in keys_strategy()) {
        let mut merged = document(&a, "a");
        merged.merge(document(&b, "b"));
        merged.sort_entries();

        for name in merged.chart_names() {
            let versions: Vec<Version> = merged
                .versions(name)
                .iter()
                .map(|cv| Version::parse(cv.version()).unwrap())
                .collect();
            for pair in versions.windows(2) {
                prop_assert!(pair[0] >= pair[1], "{} sorted out of order: {:?}", name, versions);
            }
        }
    }
}
