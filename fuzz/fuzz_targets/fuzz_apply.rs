#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for find and apply
//!
//! Input is `path\njson`.
//!
//! Tests:
//! - find, set and delete never panic
//! - A successful concrete set is visible to find
//! - max_results yields a prefix of the full result

use jqpath::{ApplyOptions, FindOptions, Operation, Path, apply, find};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Some((path_text, json_text)) = input.split_once('\n') else {
        return;
    };
    let Ok(path) = Path::parse(path_text) else {
        return;
    };
    let Ok(document) = serde_json::from_str::<Value>(json_text) else {
        return;
    };

    let all: Vec<_> = find(&document, &path, &FindOptions::default()).collect();
    let two: Vec<_> = find(&document, &path, &FindOptions::default().max_results(2)).collect();
    assert_eq!(&two[..], &all[..all.len().min(2)]);

    for options in [ApplyOptions::default(), ApplyOptions::default().create_missing()] {
        let mut copy = document.clone();
        let marker = json!({"fuzz": true});
        if apply(&mut copy, &path, Operation::Set(marker.clone()), &options).is_ok()
            && path.is_concrete()
        {
            let found: Vec<_> = find(&copy, &path, &FindOptions::default()).values().collect();
            assert_eq!(found, vec![&marker]);
        }

        let mut copy = document.clone();
        let _ = apply(&mut copy, &path, Operation::Delete, &options);
    }
});
