#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for flatten / unflatten
//!
//! Tests:
//! - unflatten on arbitrary JSON objects never panics
//! - flatten then unflatten restores documents without empty containers

use jqpath::{FlattenOptions, flatten, unflatten};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fn has_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty() || map.values().any(has_empty_container),
        Value::Array(items) => items.is_empty() || items.iter().any(has_empty_container),
        _ => false,
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let options = FlattenOptions::default();

    if let Value::Object(map) = &value {
        let _ = unflatten(map, &options);
    }

    if !has_empty_container(&value) {
        let flat = flatten(&value, &options);
        let rebuilt = unflatten(&flat, &options).expect("flattened keys always rebuild");
        assert_eq!(rebuilt, value);
    }
});
