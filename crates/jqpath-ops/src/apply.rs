// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write-side mutation
//!
//! [`apply`] sets or deletes the value at every location a [`Path`] reaches.
//! Unlike [`find`](crate::find), it is strict: a missing intermediate
//! container is a [`PathError::NotFound`] unless `create_missing` is set, a
//! step of the wrong kind is a [`PathError::TypeMismatch`], and an index that
//! would leave a gap is a [`PathError::Index`].
//!
//! # Branch atomicity
//!
//! Each branch of a fan-out path is planned against the document before
//! anything is written, so a branch that fails never writes partially. The
//! branches planned before the first failure are written and the failure is
//! returned: mutation is per-branch atomic, not transactional across
//! branches.

use jqpath_core::node::{MAP, SEQUENCE};
use jqpath_core::{
    ConcretePath, Node, NodeMut, Path, PathError, Result, Segment, Step, resolve_index,
};
use serde_json::{Map, Value};

/// What to do at each target location
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Assign the value, inserting or appending where allowed
    Set(Value),
    /// Remove the key or element
    Delete,
}

impl Operation {
    const fn name(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Delete => "delete",
        }
    }
}

/// Options for [`apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Create missing intermediate containers on set; treat missing targets
    /// as a no-op on delete
    pub create_missing: bool,
}

impl ApplyOptions {
    /// Enable `create_missing`
    #[must_use]
    pub const fn create_missing(mut self) -> Self {
        self.create_missing = true;
        self
    }
}

/// Apply `operation` at every location `path` reaches
///
/// The document is mutated in place. Returns the number of locations
/// written; a delete of something already absent does not count.
///
/// # Errors
///
/// - [`PathError::NotFound`] when an intermediate key is missing and
///   `create_missing` is off
/// - [`PathError::TypeMismatch`] when a step does not fit the node kind
/// - [`PathError::Index`] when an index resolves below zero, past the end
///   (for delete without `create_missing`), or leaves a gap
///
/// Branches planned before the failing one have already been written.
pub fn apply(
    document: &mut Value,
    path: &Path,
    operation: Operation,
    options: &ApplyOptions,
) -> Result<usize> {
    tracing::debug!(
        path = %path,
        op = operation.name(),
        create_missing = options.create_missing,
        "apply"
    );

    let mut planner = Planner {
        steps: path.steps(),
        delete: matches!(operation, Operation::Delete),
        create: options.create_missing,
        targets: Vec::new(),
    };
    let failure = planner
        .plan(Some(document), 0, &mut ConcretePath::root())
        .err();
    let targets = planner.targets;

    match operation {
        Operation::Set(value) => {
            for target in &targets {
                write_value(document, target, value.clone(), options.create_missing)?;
            }
        }
        Operation::Delete => {
            // Back to front, so earlier sibling indices stay valid
            for target in targets.iter().rev() {
                remove_value(document, target)?;
            }
        }
    }

    tracing::debug!(
        written = targets.len(),
        failed = failure.is_some(),
        "apply finished"
    );
    match failure {
        Some(err) => Err(err),
        None => Ok(targets.len()),
    }
}

/// Walks the document read-only and records one target per branch.
/// `None` stands for a container that a set will create.
struct Planner<'p> {
    steps: &'p [Step],
    delete: bool,
    create: bool,
    targets: Vec<ConcretePath>,
}

impl Planner<'_> {
    fn plan(&mut self, node: Option<&Value>, depth: usize, at: &mut ConcretePath) -> Result<()> {
        let Some(step) = self.steps.get(depth) else {
            tracing::trace!(branch = %at, "planned");
            self.targets.push(at.clone());
            return Ok(());
        };
        let last = depth + 1 == self.steps.len();

        let Some(value) = node else {
            return self.plan_created(step, depth, at);
        };

        match (step, Node::from(value)) {
            (Step::Key(key), Node::Map(map)) => match map.get(key) {
                Some(child) => self.descend(Some(child), depth, at, Segment::Key(key.clone())),
                None if self.delete => {
                    if last || self.create {
                        Ok(())
                    } else {
                        Err(not_found(key, at))
                    }
                }
                None if last || self.create => {
                    self.descend(None, depth, at, Segment::Key(key.clone()))
                }
                None => Err(not_found(key, at)),
            },
            (Step::Index(index), Node::Sequence(items)) => {
                let len = items.len();
                let resolved = resolve_index(*index, len);
                match usize::try_from(resolved) {
                    Ok(i) if i < len => {
                        self.descend(Some(&items[i]), depth, at, Segment::Index(i))
                    }
                    Ok(i) if i == len && !self.delete && (last || self.create) => {
                        self.descend(None, depth, at, Segment::Index(i))
                    }
                    _ if self.delete && self.create => Ok(()),
                    _ => Err(PathError::Index {
                        index: *index,
                        resolved,
                        len,
                    }),
                }
            }
            (Step::Wildcard, Node::Map(map)) => {
                for (key, child) in map {
                    self.descend(Some(child), depth, at, Segment::Key(key.clone()))?;
                }
                Ok(())
            }
            (Step::Wildcard, Node::Sequence(items)) => {
                for (i, child) in items.iter().enumerate() {
                    self.descend(Some(child), depth, at, Segment::Index(i))?;
                }
                Ok(())
            }
            (Step::Selector(predicate), Node::Sequence(items)) => {
                for (i, child) in items.iter().enumerate() {
                    if predicate.matches(child) {
                        self.descend(Some(child), depth, at, Segment::Index(i))?;
                    }
                }
                Ok(())
            }
            (Step::Selector(predicate), _) if predicate.matches(value) => {
                self.plan(Some(value), depth + 1, at)
            }
            (Step::Selector(predicate), Node::Map(map)) => {
                for (key, child) in map {
                    if predicate.matches(child) {
                        self.descend(Some(child), depth, at, Segment::Key(key.clone()))?;
                    }
                }
                Ok(())
            }
            (Step::Selector(_), Node::Scalar(_)) => Ok(()),
            (Step::Key(_), node) => Err(mismatch(step, MAP, node.kind_name())),
            (Step::Index(_), node) => Err(mismatch(step, SEQUENCE, node.kind_name())),
            (Step::Wildcard, node) => Err(mismatch(step, "map or sequence", node.kind_name())),
        }
    }

    /// Plan below a container that does not exist yet. Its kind follows the
    /// step applied to it, so only an empty map or empty sequence is assumed.
    fn plan_created(&mut self, step: &Step, depth: usize, at: &mut ConcretePath) -> Result<()> {
        match step {
            Step::Key(key) => self.descend(None, depth, at, Segment::Key(key.clone())),
            Step::Index(index) => match resolve_index(*index, 0) {
                0 => self.descend(None, depth, at, Segment::Index(0)),
                resolved => Err(PathError::Index {
                    index: *index,
                    resolved,
                    len: 0,
                }),
            },
            Step::Wildcard | Step::Selector(_) => Ok(()),
        }
    }

    fn descend(
        &mut self,
        child: Option<&Value>,
        depth: usize,
        at: &mut ConcretePath,
        segment: Segment,
    ) -> Result<()> {
        at.push(segment);
        let result = self.plan(child, depth + 1, at);
        at.pop();
        result
    }
}

fn not_found(key: &str, at: &ConcretePath) -> PathError {
    PathError::NotFound {
        segment: key.to_owned(),
        path: at.to_string(),
    }
}

fn mismatch(step: &Step, expected: &'static str, found: &'static str) -> PathError {
    PathError::TypeMismatch {
        step: step.render(),
        expected,
        found,
    }
}

fn segment_mismatch(segment: &Segment, found: &'static str) -> PathError {
    let (step, expected) = match segment {
        Segment::Key(key) => (Step::Key(key.clone()), MAP),
        Segment::Index(i) => (Step::Index(i64::try_from(*i).unwrap_or(i64::MAX)), SEQUENCE),
    };
    mismatch(&step, expected, found)
}

fn empty_container(next: &Segment) -> Value {
    match next {
        Segment::Key(_) => Value::Object(Map::new()),
        Segment::Index(_) => Value::Array(Vec::new()),
    }
}

/// Move one segment down, creating the container the next segment needs
fn step_into<'v>(
    node: &'v mut Value,
    segments: &[Segment],
    depth: usize,
    create: bool,
) -> Result<&'v mut Value> {
    let segment = &segments[depth];
    let next = &segments[depth + 1];
    match (segment, NodeMut::from(node)) {
        (Segment::Key(key), NodeMut::Map(map)) => {
            if create {
                Ok(map
                    .entry(key.clone())
                    .or_insert_with(|| empty_container(next)))
            } else {
                map.get_mut(key).ok_or_else(|| {
                    not_found(key, &segments[..depth].iter().cloned().collect())
                })
            }
        }
        (Segment::Index(i), NodeMut::Sequence(items)) => {
            if create && *i == items.len() {
                items.push(empty_container(next));
            }
            let len = items.len();
            items.get_mut(*i).ok_or(PathError::Index {
                index: i64::try_from(*i).unwrap_or(i64::MAX),
                resolved: i64::try_from(*i).unwrap_or(i64::MAX),
                len,
            })
        }
        (segment, node) => Err(segment_mismatch(segment, node.kind_name())),
    }
}

fn write_value(document: &mut Value, target: &ConcretePath, value: Value, create: bool) -> Result<()> {
    let segments = target.segments();
    let Some((last, parents)) = segments.split_last() else {
        *document = value;
        return Ok(());
    };

    let mut current = document;
    for depth in 0..parents.len() {
        current = step_into(current, segments, depth, create)?;
    }

    match (last, NodeMut::from(current)) {
        (Segment::Key(key), NodeMut::Map(map)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (Segment::Index(i), NodeMut::Sequence(items)) => {
            if *i < items.len() {
                items[*i] = value;
                Ok(())
            } else if *i == items.len() {
                items.push(value);
                Ok(())
            } else {
                let index = i64::try_from(*i).unwrap_or(i64::MAX);
                Err(PathError::Index {
                    index,
                    resolved: index,
                    len: items.len(),
                })
            }
        }
        (segment, node) => Err(segment_mismatch(segment, node.kind_name())),
    }
}

fn remove_value(document: &mut Value, target: &ConcretePath) -> Result<()> {
    let segments = target.segments();
    let Some((last, parents)) = segments.split_last() else {
        *document = Value::Null;
        return Ok(());
    };

    let mut current = document;
    for depth in 0..parents.len() {
        current = step_into(current, segments, depth, false)?;
    }

    match (last, NodeMut::from(current)) {
        (Segment::Key(key), NodeMut::Map(map)) => {
            map.shift_remove(key);
            Ok(())
        }
        (Segment::Index(i), NodeMut::Sequence(items)) => {
            if *i < items.len() {
                items.remove(*i);
            }
            Ok(())
        }
        (segment, node) => Err(segment_mismatch(segment, node.kind_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jqpath_core::ErrorKind;
    use serde_json::json;

    fn p(text: &str) -> Path {
        Path::parse(text).unwrap()
    }

    fn strict() -> ApplyOptions {
        ApplyOptions::default()
    }

    fn lenient() -> ApplyOptions {
        ApplyOptions::default().create_missing()
    }

    #[test]
    fn test_set_existing_key() {
        let mut doc = json!({"a": {"b": 1}});
        let n = apply(&mut doc, &p("a.b"), Operation::Set(json!(2)), &strict()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(doc, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_set_final_key_inserts() {
        let mut doc = json!({"a": {}});
        apply(&mut doc, &p("a.new"), Operation::Set(json!(true)), &strict()).unwrap();
        assert_eq!(doc, json!({"a": {"new": true}}));
    }

    #[test]
    fn test_missing_intermediate_strict_vs_create() {
        let mut doc = json!({});
        let err = apply(&mut doc, &p("a.b"), Operation::Set(json!(1)), &strict()).unwrap_err();
        assert_eq!(
            err,
            PathError::NotFound {
                segment: "a".into(),
                path: String::new()
            }
        );
        assert_eq!(doc, json!({}));

        apply(&mut doc, &p("a.b"), Operation::Set(json!(1)), &lenient()).unwrap();
        assert_eq!(doc, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_create_missing_picks_sequence_for_index() {
        let mut doc = json!({});
        apply(&mut doc, &p("a.b[0].c"), Operation::Set(json!(1)), &lenient()).unwrap();
        assert_eq!(doc, json!({"a": {"b": [{"c": 1}]}}));
    }

    #[test]
    fn test_negative_index_set() {
        let mut doc = json!(["a", "b", "c"]);
        apply(&mut doc, &p("[-1]"), Operation::Set(json!("z")), &strict()).unwrap();
        assert_eq!(doc, json!(["a", "b", "z"]));
    }

    #[test]
    fn test_append_at_length() {
        let mut doc = json!({"xs": [1, 2]});
        apply(&mut doc, &p("xs[2]"), Operation::Set(json!(3)), &strict()).unwrap();
        assert_eq!(doc, json!({"xs": [1, 2, 3]}));
    }

    #[test]
    fn test_gap_is_index_error_even_with_create() {
        let mut doc = json!({"xs": [1]});
        for opts in [strict(), lenient()] {
            let err = apply(&mut doc, &p("xs[3]"), Operation::Set(json!(0)), &opts).unwrap_err();
            assert_eq!(
                err,
                PathError::Index {
                    index: 3,
                    resolved: 3,
                    len: 1
                }
            );
        }
        let err = apply(&mut doc, &p("xs[-5]"), Operation::Set(json!(0)), &lenient()).unwrap_err();
        assert!(matches!(err, PathError::Index { resolved: -4, .. }));
        assert_eq!(doc, json!({"xs": [1]}));
    }

    #[test]
    fn test_intermediate_append_needs_create() {
        let mut doc = json!({"xs": []});
        let err = apply(&mut doc, &p("xs[0].a"), Operation::Set(json!(1)), &strict()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
        apply(&mut doc, &p("xs[0].a"), Operation::Set(json!(1)), &lenient()).unwrap();
        assert_eq!(doc, json!({"xs": [{"a": 1}]}));
    }

    #[test]
    fn test_type_mismatch_names_kinds() {
        let mut doc = json!({"a": [1], "m": {"k": 1}});
        let err = apply(&mut doc, &p("a.b"), Operation::Set(json!(1)), &lenient()).unwrap_err();
        assert_eq!(
            err,
            PathError::TypeMismatch {
                step: "b".into(),
                expected: "map",
                found: "sequence"
            }
        );
        let err = apply(&mut doc, &p("m[0]"), Operation::Set(json!(1)), &lenient()).unwrap_err();
        assert_eq!(
            err,
            PathError::TypeMismatch {
                step: "[0]".into(),
                expected: "sequence",
                found: "map"
            }
        );
        let err = apply(&mut doc, &p("a[0].x"), Operation::Set(json!(1)), &lenient()).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { found: "number", .. }));
    }

    #[test]
    fn test_delete_key_and_absent_key() {
        let mut doc = json!({"a": 1, "b": 2, "c": 3});
        assert_eq!(apply(&mut doc, &p("b"), Operation::Delete, &strict()).unwrap(), 1);
        assert_eq!(doc, json!({"a": 1, "c": 3}));
        let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(apply(&mut doc, &p("zz"), Operation::Delete, &strict()).unwrap(), 0);
    }

    #[test]
    fn test_delete_index_shifts() {
        let mut doc = json!([1, 2, 3]);
        apply(&mut doc, &p("[0]"), Operation::Delete, &strict()).unwrap();
        assert_eq!(doc, json!([2, 3]));
        apply(&mut doc, &p("[-1]"), Operation::Delete, &strict()).unwrap();
        assert_eq!(doc, json!([2]));
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut doc = json!([1]);
        let err = apply(&mut doc, &p("[4]"), Operation::Delete, &strict()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
        assert_eq!(apply(&mut doc, &p("[4]"), Operation::Delete, &lenient()).unwrap(), 0);
        assert_eq!(doc, json!([1]));
    }

    #[test]
    fn test_delete_missing_intermediate() {
        let mut doc = json!({});
        let err = apply(&mut doc, &p("a.b"), Operation::Delete, &strict()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(apply(&mut doc, &p("a.b"), Operation::Delete, &lenient()).unwrap(), 0);
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_fan_out_set() {
        let mut doc = json!({"users": [{"n": 1}, {"n": 2}]});
        let n = apply(&mut doc, &p("users[*].seen"), Operation::Set(json!(true)), &strict()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            doc,
            json!({"users": [{"n": 1, "seen": true}, {"n": 2, "seen": true}]})
        );
    }

    #[test]
    fn test_fan_out_delete_with_selector() {
        let mut doc = json!({"xs": [{"k": 1}, {"k": 2}, {"k": 1}, {"k": 3}]});
        let n = apply(&mut doc, &p("xs[?(@.k==1)]"), Operation::Delete, &strict()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(doc, json!({"xs": [{"k": 2}, {"k": 3}]}));
    }

    #[test]
    fn test_fan_out_delete_all_elements() {
        let mut doc = json!({"xs": [1, 2, 3]});
        apply(&mut doc, &p("xs.*"), Operation::Delete, &strict()).unwrap();
        assert_eq!(doc, json!({"xs": []}));
    }

    #[test]
    fn test_per_branch_atomicity() {
        // The second branch is a scalar, so its `.a.b` step fails; the first
        // branch is written, the third is never planned.
        let mut doc = json!({"x": {}, "y": 5, "z": {}});
        let err = apply(&mut doc, &p("*.a.b"), Operation::Set(json!(1)), &lenient()).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { found: "number", .. }));
        assert_eq!(doc, json!({"x": {"a": {"b": 1}}, "y": 5, "z": {}}));
    }

    #[test]
    fn test_failed_branch_creates_nothing() {
        // `a` and `b` would be created before `[1]` fails on the new sequence
        let mut doc = json!({});
        let err = apply(&mut doc, &p("a.b[1]"), Operation::Set(json!(1)), &lenient()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn test_wildcard_on_scalar_is_mismatch() {
        let mut doc = json!({"a": 1});
        let err = apply(&mut doc, &p("a.*"), Operation::Set(json!(0)), &strict()).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { expected: "map or sequence", .. }));
    }

    #[test]
    fn test_selector_self_match_on_map() {
        let mut doc = json!({"users": [{"name": "J", "active": true}, {"name": "K", "active": false}]});
        apply(
            &mut doc,
            &p("users.*[?(@.active==false)].name"),
            Operation::Set(json!("off")),
            &strict(),
        )
        .unwrap();
        assert_eq!(doc["users"][1]["name"], json!("off"));
        assert_eq!(doc["users"][0]["name"], json!("J"));
    }

    #[test]
    fn test_selector_filters_keyed_records() {
        let mut doc = json!({"users": {
            "u1": {"active": true},
            "u2": {"active": false},
            "u3": {"active": true}
        }});
        let n = apply(
            &mut doc,
            &p("users[?(@.active==true)].seen"),
            Operation::Set(json!(1)),
            &strict(),
        )
        .unwrap();
        assert_eq!(n, 2);
        assert_eq!(doc["users"]["u1"]["seen"], json!(1));
        assert!(doc["users"]["u2"].get("seen").is_none());

        let n = apply(&mut doc, &p("users[?(@.active==true)]"), Operation::Delete, &strict()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(doc, json!({"users": {"u2": {"active": false}}}));
    }

    #[test]
    fn test_root_self_match() {
        let mut doc = json!({"k": 1});
        apply(&mut doc, &p("[?(@.k==1)]"), Operation::Set(json!([1])), &strict()).unwrap();
        assert_eq!(doc, json!([1]));
        let mut doc = json!({"k": 1});
        apply(&mut doc, &p("[?(@.k==1)]"), Operation::Delete, &strict()).unwrap();
        assert_eq!(doc, Value::Null);
    }

    #[test]
    fn test_null_intermediate_is_not_coerced() {
        let mut doc = json!({"a": null});
        let err = apply(&mut doc, &p("a.b"), Operation::Set(json!(1)), &lenient()).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { found: "null", .. }));
    }
}
