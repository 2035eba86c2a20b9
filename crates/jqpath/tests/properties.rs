// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end behavior through the public API

use jqpath::{
    ApplyOptions, ErrorKind, ExtractOptions, Extracted, FindOptions, FlattenOptions, Operation,
    Path, apply, extract, find, flatten, unflatten,
};
use serde_json::{Value, json};

#[test]
fn negative_index_is_late_bound() {
    let path = Path::parse("[-1]").unwrap();

    let mut three = json!(["a", "b", "c"]);
    let first: Vec<_> = find(&three, &path, &FindOptions::default()).values().collect();
    assert_eq!(first, vec![&json!("c")]);

    apply(&mut three, &path, Operation::Set(json!("z")), &ApplyOptions::default()).unwrap();
    assert_eq!(three, json!(["a", "b", "z"]));

    let two = json!(["x", "y"]);
    let other: Vec<_> = find(&two, &path, &FindOptions::default()).values().collect();
    assert_eq!(other, vec![&json!("y")]);
}

#[test]
fn wildcard_follows_insertion_order() {
    let doc = json!({"a": 1, "b": 2});
    let result = extract(&doc, "*", &ExtractOptions::default()).unwrap();
    assert_eq!(result, Extracted::Many(vec![json!(1), json!(2)]));

    let reversed = json!({"b": 2, "a": 1});
    let result = extract(&reversed, "*", &ExtractOptions::default()).unwrap();
    assert_eq!(result, Extracted::Many(vec![json!(2), json!(1)]));
}

#[test]
fn selector_filters_users() {
    let doc = json!({"users": [
        {"name": "John", "active": true},
        {"name": "Jane", "active": false}
    ]});
    let result = extract(&doc, "users.*[?(@.active==true)].name", &ExtractOptions::default())
        .unwrap();
    assert_eq!(result, Extracted::Many(vec![json!("John")]));
}

#[test]
fn selector_filters_keyed_records() {
    let doc = json!({"users": {"u1": {"active": true}, "u2": {"active": false}}});
    let result = extract(&doc, "users[?(@.active==true)]", &ExtractOptions::default()).unwrap();
    assert_eq!(result, Extracted::Many(vec![json!({"active": true})]));

    let with_paths = ExtractOptions::default().with_paths();
    let result = extract(&doc, "users[?(@.active==false)]", &with_paths).unwrap();
    assert_eq!(
        result,
        Extracted::WithPaths(vec![("users.u2".to_string(), json!({"active": false}))])
    );
}

#[test]
fn read_is_absence_tolerant_write_is_strict() {
    let mut doc = json!({});
    let read = extract(&doc, "a.b", &ExtractOptions::default()).unwrap();
    assert_eq!(read, Extracted::Single(None));

    let path = Path::parse("a.b").unwrap();
    let err = apply(&mut doc, &path, Operation::Set(json!(1)), &ApplyOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(doc, json!({}));

    apply(
        &mut doc,
        &path,
        Operation::Set(json!(1)),
        &ApplyOptions::default().create_missing(),
    )
    .unwrap();
    assert_eq!(doc, json!({"a": {"b": 1}}));
}

#[test]
fn max_results_bounds_a_wide_wildcard() {
    let leaves: Vec<Value> = (0..100).map(|i| json!({"v": i})).collect();
    let doc = json!({"items": leaves});
    let path = Path::parse("items[*].v").unwrap();

    let all: Vec<_> = find(&doc, &path, &FindOptions::default()).collect();
    let three: Vec<_> = find(&doc, &path, &FindOptions::default().max_results(3)).collect();
    assert_eq!(all.len(), 100);
    assert_eq!(three.len(), 3);
    assert_eq!(three[..], all[..3]);
}

#[test]
fn flatten_unflatten_round_trip() {
    let doc = json!({
        "store": {
            "book": [
                {"title": "A", "price": 8.95, "tags": ["x", "y"]},
                {"title": "B", "price": 12.99, "isbn": null}
            ],
            "bicycle": {"color": "red"}
        },
        "flag": false
    });
    let options = FlattenOptions::default();
    let flat = flatten(&doc, &options);
    assert_eq!(flat["store.book[0].tags[1]"], json!("y"));
    assert_eq!(unflatten(&flat, &options).unwrap(), doc);
}

#[test]
fn matched_paths_feed_back_into_writes() {
    let mut doc = json!({"a": [{"k": 1}, {"k": 2}], "b.c": {"k": 3}});
    let found = extract(&doc, "*..k", &ExtractOptions::default());
    assert!(found.unwrap_err().is_syntax());

    let Extracted::WithPaths(pairs) =
        extract(&doc, "a[*].k", &ExtractOptions::default().with_paths()).unwrap()
    else {
        panic!("paths were requested");
    };
    for (at, value) in pairs {
        let bumped = json!(value.as_i64().unwrap() * 10);
        jqpath::set(&mut doc, at.as_str(), bumped).unwrap();
    }
    jqpath::set(&mut doc, r#"["b.c"].k"#, json!(30)).unwrap();
    assert_eq!(doc, json!({"a": [{"k": 10}, {"k": 20}], "b.c": {"k": 30}}));
}
