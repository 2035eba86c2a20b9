// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-side traversal
//!
//! [`find`] walks a document along a [`Path`] and lazily yields every
//! `(ConcretePath, &Value)` it reaches. The walk is depth-first over an
//! explicit worklist in document order: map insertion order, then sequence
//! index order. A wildcard or selector step leaves a cursor on the worklist
//! that hands out one child per advance, so a bounded search never visits
//! or tests children past its last match.
//!
//! Absence is not an error here. A missing key, an out-of-range index or a
//! step that does not fit the node kind just ends that branch.

use jqpath_core::{ConcretePath, Node, Path, Predicate, Segment, Step, resolve_index};
use serde_json::Value;
use std::iter::Enumerate;
use std::slice;

/// Bounds on how much of the document a [`find`] call explores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Stop after the first match
    pub only_first: bool,
    /// Stop after this many matches
    pub max_results: Option<usize>,
}

impl FindOptions {
    /// Stop after the first match
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.only_first = true;
        self
    }

    /// Stop after `n` matches
    #[must_use]
    pub const fn max_results(mut self, n: usize) -> Self {
        self.max_results = Some(n);
        self
    }

    fn limit(&self) -> Option<usize> {
        match (self.only_first, self.max_results) {
            (true, Some(n)) => Some(n.min(1)),
            (true, None) => Some(1),
            (false, limit) => limit,
        }
    }
}

enum Members<'a> {
    Map(serde_json::map::Iter<'a>),
    Sequence(Enumerate<slice::Iter<'a, Value>>),
}

/// Children of one fanned-out node not yet handed out
struct Cursor<'a, 'p> {
    members: Members<'a>,
    filter: Option<&'p Predicate>,
    /// Step index the children continue from
    depth: usize,
    parent: ConcretePath,
}

impl<'a> Cursor<'a, '_> {
    fn advance(&mut self) -> Option<(&'a Value, ConcretePath)> {
        let filter = self.filter;
        let keep = |child: &Value| filter.is_none_or(|predicate| predicate.matches(child));
        let (segment, child) = match &mut self.members {
            Members::Map(members) => members
                .find(|&(_, child)| keep(child))
                .map(|(key, child)| (Segment::Key(key.clone()), child))?,
            Members::Sequence(elements) => elements
                .find(|&(_, child)| keep(child))
                .map(|(i, child)| (Segment::Index(i), child))?,
        };
        Some((child, self.parent.child(segment)))
    }
}

enum Frame<'a, 'p> {
    Node {
        node: &'a Value,
        depth: usize,
        path: ConcretePath,
    },
    Children(Cursor<'a, 'p>),
}

/// Lazy sequence of matches produced by [`find`]
pub struct Matches<'a, 'p> {
    steps: &'p [Step],
    stack: Vec<Frame<'a, 'p>>,
    remaining: Option<usize>,
}

impl<'a, 'p> Matches<'a, 'p> {
    fn new(document: &'a Value, path: &'p Path, limit: Option<usize>) -> Self {
        Self {
            steps: path.steps(),
            stack: vec![Frame::Node {
                node: document,
                depth: 0,
                path: ConcretePath::root(),
            }],
            remaining: limit,
        }
    }

    /// Drop the paths and keep only the matched values
    pub fn values(self) -> impl Iterator<Item = &'a Value> {
        self.map(|(_, value)| value)
    }

    fn expand(&mut self, step: &'p Step, node: &'a Value, depth: usize, path: ConcretePath) {
        let next = depth + 1;
        let (members, filter) = match (step, Node::from(node)) {
            (Step::Key(key), Node::Map(map)) => {
                if let Some(child) = map.get(key) {
                    self.stack.push(Frame::Node {
                        node: child,
                        depth: next,
                        path: path.child(Segment::Key(key.clone())),
                    });
                }
                return;
            }
            (Step::Index(index), Node::Sequence(items)) => {
                let resolved = resolve_index(*index, items.len());
                if let Some((i, child)) = usize::try_from(resolved)
                    .ok()
                    .and_then(|i| items.get(i).map(|child| (i, child)))
                {
                    self.stack.push(Frame::Node {
                        node: child,
                        depth: next,
                        path: path.child(Segment::Index(i)),
                    });
                }
                return;
            }
            (Step::Wildcard, Node::Map(map)) => (Members::Map(map.iter()), None),
            (Step::Wildcard, Node::Sequence(items)) => {
                (Members::Sequence(items.iter().enumerate()), None)
            }
            (Step::Selector(predicate), Node::Sequence(items)) => {
                (Members::Sequence(items.iter().enumerate()), Some(predicate))
            }
            // A map or scalar that satisfies the predicate is kept whole; a map
            // that does not has its members filtered instead
            (Step::Selector(predicate), kind) => {
                if predicate.matches(node) {
                    self.stack.push(Frame::Node {
                        node,
                        depth: next,
                        path,
                    });
                    return;
                }
                let Node::Map(map) = kind else {
                    return;
                };
                (Members::Map(map.iter()), Some(predicate))
            }
            _ => return,
        };
        self.stack.push(Frame::Children(Cursor {
            members,
            filter,
            depth: next,
            parent: path,
        }));
    }
}

impl<'a> Iterator for Matches<'a, '_> {
    type Item = (ConcretePath, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }
        let steps = self.steps;
        while let Some(frame) = self.stack.pop() {
            let (node, depth, path) = match frame {
                Frame::Node { node, depth, path } => (node, depth, path),
                Frame::Children(mut cursor) => {
                    let Some((child, path)) = cursor.advance() else {
                        continue;
                    };
                    let depth = cursor.depth;
                    self.stack.push(Frame::Children(cursor));
                    (child, depth, path)
                }
            };
            let Some(step) = steps.get(depth) else {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                    if *remaining == 0 {
                        self.stack.clear();
                    }
                }
                tracing::trace!(path = %path, "match");
                return Some((path, node));
            };
            self.expand(step, node, depth, path);
        }
        None
    }
}

/// Find every location `path` reaches in `document`
///
/// Results come in document order. `only_first` and `max_results` stop the
/// walk early instead of truncating a full result.
#[must_use]
pub fn find<'a, 'p>(
    document: &'a Value,
    path: &'p Path,
    options: &FindOptions,
) -> Matches<'a, 'p> {
    tracing::debug!(
        path = %path,
        only_first = options.only_first,
        max_results = ?options.max_results,
        "find"
    );
    Matches::new(document, path, options.limit())
}

/// First match of `path`, if any
#[must_use]
pub fn find_first<'a>(document: &'a Value, path: &Path) -> Option<(ConcretePath, &'a Value)> {
    find(document, path, &FindOptions::default().first()).next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values<'a>(doc: &'a Value, path: &Path) -> Vec<&'a Value> {
        find(doc, path, &FindOptions::default()).values().collect()
    }

    fn paths(doc: &Value, path: &Path) -> Vec<String> {
        find(doc, path, &FindOptions::default())
            .map(|(p, _)| p.to_string())
            .collect()
    }

    #[test]
    fn test_key_and_index() {
        let doc = json!({"a": {"b": [10, 20, 30]}});
        let path = Path::parse("a.b[1]").unwrap();
        assert_eq!(values(&doc, &path), vec![&json!(20)]);
        assert_eq!(paths(&doc, &path), vec!["a.b[1]"]);
    }

    #[test]
    fn test_negative_index_resolves_per_document() {
        let path = Path::parse("[-1]").unwrap();
        let three = json!(["a", "b", "c"]);
        let two = json!(["x", "y"]);
        assert_eq!(values(&three, &path), vec![&json!("c")]);
        assert_eq!(values(&two, &path), vec![&json!("y")]);
        assert_eq!(paths(&two, &path), vec!["[1]"]);
    }

    #[test]
    fn test_absent_yields_nothing() {
        let doc = json!({"a": [1]});
        for text in ["x", "a.b", "a[1]", "a[-2]", "a[0].c", "a[0][0]", "a.*.*"] {
            let path = Path::parse(text).unwrap();
            assert!(values(&doc, &path).is_empty(), "{text}");
        }
    }

    #[test]
    fn test_wildcard_map_insertion_order() {
        let doc = json!({"b": 2, "a": 1, "c": 3});
        let path = Path::parse("*").unwrap();
        assert_eq!(values(&doc, &path), vec![&json!(2), &json!(1), &json!(3)]);
    }

    #[test]
    fn test_nested_wildcards_depth_first() {
        let doc = json!({"x": [1, 2], "y": [3]});
        let path = Path::parse("*[*]").unwrap();
        assert_eq!(paths(&doc, &path), vec!["x[0]", "x[1]", "y[0]"]);
    }

    #[test]
    fn test_selector_over_sequence() {
        let doc = json!({"users": [
            {"name": "John", "active": true},
            {"name": "Jane", "active": false},
            {"name": "Jim", "active": true}
        ]});
        let path = Path::parse("users[?(@.active==true)].name").unwrap();
        assert_eq!(values(&doc, &path), vec![&json!("John"), &json!("Jim")]);
        assert_eq!(paths(&doc, &path), vec!["users[0].name", "users[2].name"]);
    }

    #[test]
    fn test_selector_filters_map_itself() {
        let doc = json!({"users": [
            {"name": "John", "active": true},
            {"name": "Jane", "active": false}
        ]});
        let path = Path::parse("users.*[?(@.active==true)].name").unwrap();
        assert_eq!(values(&doc, &path), vec![&json!("John")]);
        assert_eq!(paths(&doc, &path), vec!["users[0].name"]);
    }

    #[test]
    fn test_selector_filters_map_members() {
        let doc = json!({"users": {
            "u1": {"active": true},
            "u2": {"active": false},
            "u3": {"active": true, "name": "x"}
        }});
        let path = Path::parse("users[?(@.active==true)]").unwrap();
        assert_eq!(paths(&doc, &path), vec!["users.u1", "users.u3"]);
        assert_eq!(values(&doc, &path)[0], &json!({"active": true}));

        let scalars = json!({"a": 1, "b": 5, "c": "9"});
        let path = Path::parse("[?(@>2)]").unwrap();
        assert_eq!(paths(&scalars, &path), vec!["b"]);
    }

    #[test]
    fn test_matching_map_is_not_split() {
        let doc = json!({"m": {"active": true, "inner": {"active": true}}});
        let path = Path::parse("m[?(@.active==true)]").unwrap();
        assert_eq!(paths(&doc, &path), vec!["m"]);
    }

    #[test]
    fn test_only_first_and_max_results() {
        let doc = json!({"a": [1, 2, 3, 4]});
        let path = Path::parse("a.*").unwrap();
        let first: Vec<_> = find(&doc, &path, &FindOptions::default().first())
            .values()
            .collect();
        assert_eq!(first, vec![&json!(1)]);
        let two: Vec<_> = find(&doc, &path, &FindOptions::default().max_results(2))
            .values()
            .collect();
        assert_eq!(two, vec![&json!(1), &json!(2)]);
        let none: Vec<_> = find(&doc, &path, &FindOptions::default().max_results(0))
            .values()
            .collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_first_concrete() {
        let doc = json!({"a": {"b": null}});
        let path = Path::parse("a.b").unwrap();
        let (at, value) = find_first(&doc, &path).unwrap();
        assert_eq!(at.to_string(), "a.b");
        assert_eq!(value, &Value::Null);
    }

    #[test]
    fn test_path_reusable_across_documents() {
        let path = Path::parse("items[*].id").unwrap();
        let a = json!({"items": [{"id": 1}]});
        let b = json!({"items": [{"id": 2}, {"id": 3}]});
        assert_eq!(values(&a, &path).len(), 1);
        assert_eq!(values(&b, &path).len(), 2);
    }

    #[test]
    fn test_lazy_iteration_can_stop_early() {
        let doc = json!({"a": (0..1000).collect::<Vec<_>>()});
        let path = Path::parse("a[*]").unwrap();
        let mut matches = find(&doc, &path, &FindOptions::default());
        assert_eq!(matches.next().map(|(_, v)| v), Some(&json!(0)));
        assert_eq!(matches.next().map(|(_, v)| v), Some(&json!(1)));
    }

    /// Children still held by cursors on the worklist
    fn pending(matches: &Matches<'_, '_>) -> Vec<usize> {
        matches
            .stack
            .iter()
            .map(|frame| match frame {
                Frame::Node { .. } => 1,
                Frame::Children(cursor) => match &cursor.members {
                    Members::Map(members) => members.len(),
                    Members::Sequence(elements) => elements.len(),
                },
            })
            .collect()
    }

    #[test]
    fn test_wildcard_expands_one_child_per_match() {
        let doc = json!({"a": (0..10_000).collect::<Vec<_>>()});
        let path = Path::parse("a[*]").unwrap();
        let mut matches = find(&doc, &path, &FindOptions::default());
        assert_eq!(matches.next().map(|(_, v)| v), Some(&json!(0)));
        assert_eq!(pending(&matches), vec![9_999]);
        assert_eq!(matches.next().map(|(_, v)| v), Some(&json!(1)));
        assert_eq!(pending(&matches), vec![9_998]);
    }

    #[test]
    fn test_selector_stops_testing_after_last_match() {
        let doc = json!({"a": (0..10_000).map(|k| json!({"k": k})).collect::<Vec<_>>()});
        let path = Path::parse("a[?(@.k>=5)].k").unwrap();
        let mut matches = find(&doc, &path, &FindOptions::default());
        assert_eq!(matches.next().map(|(_, v)| v), Some(&json!(5)));
        // Elements 0..=5 were tested; the rest are untouched
        assert_eq!(pending(&matches), vec![9_994]);

        let first = find(&doc, &path, &FindOptions::default().first());
        assert_eq!(first.values().collect::<Vec<_>>(), vec![&json!(5)]);
    }

    #[test]
    fn test_nested_cursors_keep_document_order() {
        let doc = json!({"x": {"p": [1, 2]}, "y": {"p": [3]}});
        let path = Path::parse("*.p[*]").unwrap();
        let mut matches = find(&doc, &path, &FindOptions::default());
        assert_eq!(matches.next().map(|(p, _)| p.to_string()).as_deref(), Some("x.p[0]"));
        assert_eq!(pending(&matches), vec![1, 1]);
        let rest: Vec<_> = matches.map(|(p, _)| p.to_string()).collect();
        assert_eq!(rest, vec!["x.p[1]", "y.p[0]"]);
    }
}
