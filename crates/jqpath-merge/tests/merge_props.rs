// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tests for deep merge

use jqpath_merge::{MergeOptions, merge};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn document() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i16>().prop_map(|n| json!(n)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-c]", inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Merging with an empty map overlay changes nothing for map bases
    #[test]
    fn prop_empty_overlay_is_identity(base in document()) {
        let overlay = Value::Object(Map::new());
        let merged = merge(&base, &overlay, &MergeOptions::default());
        if base.is_object() {
            prop_assert_eq!(merged, base);
        } else {
            prop_assert_eq!(merged, overlay);
        }
    }

    /// Merging a document onto itself is idempotent with replace
    #[test]
    fn prop_self_merge_idempotent(doc in document()) {
        prop_assert_eq!(merge(&doc, &doc, &MergeOptions::default()), doc);
    }

    /// Every top-level overlay key ends up in the result
    #[test]
    fn prop_overlay_keys_present(base in document(), overlay in document()) {
        let merged = merge(&base, &overlay, &MergeOptions::default());
        if let (Some(result), Some(source)) = (merged.as_object(), overlay.as_object()) {
            for key in source.keys() {
                prop_assert!(result.contains_key(key));
            }
        }
    }
}
