#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for path normalization
//!
//! Tests:
//! - normalize on arbitrary input with several separators
//! - Only syntax errors come back from a parse
//! - A parsed path renders to text that parses to the same steps

use jqpath::{Path, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for separator in ['.', '/', ':'] {
        match normalize(input, separator) {
            Ok(path) => {
                assert!(!path.is_empty(), "parsed paths have steps");
                let rendered = path.to_string_with(separator);
                let reparsed = normalize(rendered.as_str(), separator)
                    .unwrap_or_else(|e| panic!("rendered path {rendered:?} failed: {e}"));
                assert_eq!(path, reparsed);
            }
            Err(err) => assert!(err.is_syntax(), "normalize only fails with syntax errors"),
        }
    }

    // Structured input through the JSON array form
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(input) {
        let _ = normalize(&value, '.');
    }

    let _ = input.parse::<Path>();
});
