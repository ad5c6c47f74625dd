//! Key-matched tree diff.
//!
//! Compares two versions of a node sequence level by level, matching
//! siblings by identity key rather than position. The output is an ordered
//! batch whose paths are valid when the edits are replayed one after the
//! other against a collection that started out equal to the left-hand side.
//!
//! The diff is single-pass: a changed selector or condition is a delete plus
//! an insert, and a sibling that moved against the order of the others is
//! deleted and re-inserted rather than searched for a cheaper move.

pub mod types;

use std::collections::HashMap;

use indexmap::IndexMap;
use stylesheet_ast::{Declaration, Node, NodeKey, Tree};

use crate::css_text::serialize_node;

pub use types::{Diff, Edit, Path, PropertyChanges};

// ── Public API ────────────────────────────────────────────────────────────

/// Diffs two sibling sequences located at `base`.
pub fn diff(lhs: &[Node], rhs: &[Node], base: &[usize]) -> Diff {
    let mut out = Vec::new();
    diff_seq(&mut out, base, lhs, rhs);
    tracing::trace!(path = ?base, edits = out.len(), "diffed sequence");
    out
}

/// Diffs two versions of the node at `path`.
pub fn diff_node(lhs: &Node, rhs: &Node, path: &[usize]) -> Diff {
    let mut out = Vec::new();
    diff_pair(&mut out, path, lhs, rhs);
    out
}

/// Diffs two trees. Without a previous tree every node is an insertion.
///
/// ```
/// use dynamic_stylesheet::stylesheet_diff::{diff_trees, Edit};
/// use stylesheet_ast::{Rule, Tree};
///
/// let tree = Tree::from(vec![Rule::new("a").with("color", "red").into()]);
/// assert!(diff_trees(Some(&tree), &tree).is_empty());
/// assert!(matches!(&diff_trees(None, &tree)[0], Edit::Raw { path, .. } if path == &[0]));
/// ```
pub fn diff_trees(lhs: Option<&Tree>, rhs: &Tree) -> Diff {
    match lhs {
        Some(lhs) => diff(&lhs.nodes, &rhs.nodes, &[]),
        None => rhs
            .iter()
            .enumerate()
            .map(|(i, node)| Edit::Raw {
                path: vec![i],
                value: serialize_node(node),
            })
            .collect(),
    }
}

/// Diffs two declaration lists of the rule at `path`.
///
/// Emits at most one edit: a [`Edit::Properties`] holding deletions and
/// updates in left-hand order followed by creations in right-hand order.
pub fn diff_declarations(lhs: &[Declaration], rhs: &[Declaration], path: &[usize]) -> Option<Edit> {
    let mut out = Vec::new();
    diff_props(&mut out, path, lhs.iter(), rhs.iter());
    out.pop()
}

// ── Core ──────────────────────────────────────────────────────────────────

fn child_path(path: &[usize], idx: usize) -> Path {
    let mut p = Vec::with_capacity(path.len() + 1);
    p.extend_from_slice(path);
    p.push(idx);
    p
}

fn diff_props<'a>(
    out: &mut Diff,
    path: &[usize],
    lhs: impl Iterator<Item = &'a Declaration>,
    rhs: impl Iterator<Item = &'a Declaration>,
) {
    let mut remaining: IndexMap<&str, &str> = rhs
        .map(|d| (d.property.as_str(), d.value.as_str()))
        .collect();
    let mut changes = PropertyChanges::new();
    for d in lhs {
        match remaining.shift_remove(d.property.as_str()) {
            None => {
                changes.insert(d.property.clone(), None);
            }
            Some(value) if value != d.value => {
                changes.insert(d.property.clone(), Some(value.to_string()));
            }
            Some(_) => {}
        }
    }
    for (property, value) in remaining {
        changes.insert(property.to_string(), Some(value.to_string()));
    }
    if !changes.is_empty() {
        out.push(Edit::Properties {
            path: path.to_vec(),
            value: changes,
        });
    }
}

fn diff_seq(out: &mut Diff, path: &[usize], lhs: &[Node], rhs: &[Node]) {
    if lhs.is_empty() && rhs.is_empty() {
        return;
    }
    if lhs.iter().chain(rhs).all(|n| matches!(n, Node::Declaration(_))) {
        diff_props(
            out,
            path,
            lhs.iter().filter_map(Node::as_declaration),
            rhs.iter().filter_map(Node::as_declaration),
        );
        return;
    }

    let mut rhs_index: HashMap<NodeKey, usize> = HashMap::with_capacity(rhs.len());
    for (j, node) in rhs.iter().enumerate() {
        rhs_index.entry(node.key()).or_insert(j);
    }

    // Left-hand nodes are visited in order. `at` is where the node sits once
    // the deletions emitted so far have been replayed.
    let mut placed = vec![false; rhs.len()];
    let mut deleted = 0usize;
    let mut last_kept: Option<usize> = None;
    for (i, node) in lhs.iter().enumerate() {
        let at = i - deleted;
        match rhs_index.remove(&node.key()) {
            Some(j) if last_kept.map_or(true, |k| j > k) => {
                last_kept = Some(j);
                placed[j] = true;
                diff_pair(out, &child_path(path, at), node, &rhs[j]);
            }
            _ => {
                out.push(Edit::Node {
                    path: child_path(path, at),
                    value: None,
                });
                deleted += 1;
            }
        }
    }

    // Survivors are now in right-hand relative order, so inserting the rest
    // in ascending right-hand order lands every node on its final index.
    for (j, node) in rhs.iter().enumerate() {
        if !placed[j] {
            out.push(Edit::Raw {
                path: child_path(path, j),
                value: serialize_node(node),
            });
        }
    }
}

fn diff_pair(out: &mut Diff, path: &[usize], lhs: &Node, rhs: &Node) {
    match (lhs, rhs) {
        (Node::Rule(a), Node::Rule(b)) if a.selector == b.selector => {
            diff_props(out, path, a.declarations.iter(), b.declarations.iter());
        }
        (Node::Group(a), Node::Group(b)) if a.name == b.name && a.condition == b.condition => {
            diff_seq(out, path, &a.children, &b.children);
        }
        (Node::Declaration(a), Node::Declaration(b)) if a == b => {}
        _ => out.push(Edit::Node {
            path: path.to_vec(),
            value: Some(serialize_node(rhs)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylesheet_ast::{Group, Rule};

    fn rule(selector: &str) -> Node {
        Rule::new(selector).with("color", "red").into()
    }

    fn media(condition: &str, children: Vec<Node>) -> Node {
        let mut group = Group::new("media", condition);
        group.children = children;
        group.into()
    }

    fn props(pairs: &[(&str, Option<&str>)]) -> PropertyChanges {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn identical_sequences_produce_nothing() {
        let nodes = vec![rule("a"), media("print", vec![rule("b")])];
        assert!(diff(&nodes, &nodes, &[]).is_empty());
        assert!(diff(&[], &[], &[3]).is_empty());
    }

    #[test]
    fn property_changes_collapse_into_one_edit() {
        let lhs = Rule::new(".myclass")
            .with("background", "red")
            .with("color", "red")
            .with("z-index", "1");
        let rhs = Rule::new(".myclass")
            .with("background", "blue")
            .with("color", "red")
            .with("font-size", "16px");
        assert_eq!(
            diff_node(&lhs.into(), &rhs.into(), &[0]),
            vec![Edit::Properties {
                path: vec![0],
                value: props(&[
                    ("background", Some("blue")),
                    ("z-index", None),
                    ("font-size", Some("16px")),
                ]),
            }]
        );
    }

    #[test]
    fn property_diff_ignores_declaration_order() {
        let lhs = vec![Declaration::new("a", "1"), Declaration::new("b", "2")];
        let rhs = vec![Declaration::new("b", "2"), Declaration::new("a", "1")];
        assert_eq!(diff_declarations(&lhs, &rhs, &[0]), None);
    }

    #[test]
    fn trailing_deletions_use_post_edit_positions() {
        let lhs = vec![rule("A"), rule("B"), rule("C")];
        let rhs = vec![rule("A")];
        assert_eq!(
            diff(&lhs, &rhs, &[]),
            vec![
                Edit::Node { path: vec![1], value: None },
                Edit::Node { path: vec![1], value: None },
            ]
        );
    }

    #[test]
    fn insertions_follow_in_ascending_order() {
        let lhs = vec![rule("A")];
        let rhs = vec![rule("A"), rule("X"), rule("Y")];
        assert_eq!(
            diff(&lhs, &rhs, &[]),
            vec![
                Edit::Raw { path: vec![1], value: serialize_node(&rule("X")) },
                Edit::Raw { path: vec![2], value: serialize_node(&rule("Y")) },
            ]
        );
    }

    #[test]
    fn matched_node_is_addressed_where_it_sits_after_deletions() {
        let lhs = vec![rule("gone"), Rule::new("kept").with("color", "red").into()];
        let rhs = vec![rule("new"), Rule::new("kept").with("color", "blue").into()];
        assert_eq!(
            diff(&lhs, &rhs, &[]),
            vec![
                Edit::Node { path: vec![0], value: None },
                Edit::Properties { path: vec![0], value: props(&[("color", Some("blue"))]) },
                Edit::Raw { path: vec![0], value: serialize_node(&rule("new")) },
            ]
        );
    }

    #[test]
    fn out_of_order_sibling_is_reinserted() {
        let lhs = vec![rule("A"), rule("B"), rule("C")];
        let rhs = vec![rule("C"), rule("A"), rule("B")];
        assert_eq!(
            diff(&lhs, &rhs, &[]),
            vec![
                Edit::Node { path: vec![2], value: None },
                Edit::Raw { path: vec![0], value: serialize_node(&rule("C")) },
            ]
        );
    }

    #[test]
    fn group_children_are_diffed_below_the_group() {
        let lhs = vec![rule("a"), media("print", vec![rule("x"), rule("y")])];
        let rhs = vec![rule("a"), media("print", vec![rule("y")])];
        assert_eq!(
            diff(&lhs, &rhs, &[]),
            vec![Edit::Node { path: vec![1, 0], value: None }]
        );
    }

    #[test]
    fn changed_condition_is_delete_plus_insert() {
        let lhs = vec![media("print", vec![rule("x")])];
        let rhs = vec![media("screen", vec![rule("x")])];
        let out = diff(&lhs, &rhs, &[]);
        assert_eq!(out.len(), 2);
        assert!(out[0].is_delete());
        assert_eq!(out[1].type_name(), "raw");
    }

    #[test]
    fn node_type_change_is_a_full_replace() {
        let lhs = rule("a");
        let rhs = media("print", vec![]);
        assert_eq!(
            diff_node(&lhs, &rhs, &[4]),
            vec![Edit::Node { path: vec![4], value: Some(serialize_node(&rhs)) }]
        );
    }

    #[test]
    fn renamed_group_is_a_full_replace_when_compared_directly() {
        let lhs = media("print", vec![]);
        let rhs: Node = Group::new("supports", "print").into();
        assert_eq!(diff_node(&lhs, &rhs, &[0])[0].type_name(), "node");
    }

    #[test]
    fn missing_previous_tree_inserts_everything() {
        let tree = Tree::from(vec![rule("a"), media("print", vec![rule("b")])]);
        let out = diff_trees(None, &tree);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].path(), &[1]);
    }

    #[test]
    fn duplicate_right_hand_keys_are_all_emitted() {
        let lhs = vec![rule("a")];
        let rhs = vec![rule("a"), rule("a")];
        assert_eq!(
            diff(&lhs, &rhs, &[]),
            vec![Edit::Raw { path: vec![1], value: serialize_node(&rule("a")) }]
        );
    }
}
