//! Tree mutations that report what they changed.
//!
//! Each operation resolves a [`Query`] against the tree, mutates the tree in
//! place and returns the [`Diff`] that brings a live collection, last synced
//! with the tree before the call, up to date.

pub mod insert;

use serde_json::Value;
use stylesheet_ast::{
    find, find_mut, walk, Declaration, Node, NodeKind, Query, Rule, StyleError, Target, TargetMut,
    Tree,
};

use crate::css_in_js::{self, nest};
use crate::css_text::serialize_node;
use crate::stylesheet_diff::{diff, diff_declarations, Diff, Edit, PropertyChanges};

pub use insert::{check_insertable, insert_node, insertion_index, GROUP_KINDS};

fn child_path(path: &[usize], idx: usize) -> Vec<usize> {
    let mut p = path.to_vec();
    p.push(idx);
    p
}

fn declaration_target() -> StyleError {
    StyleError::InvalidNodeType {
        expected: NodeKind::Rule,
        found: NodeKind::Declaration,
    }
}

/// Resolves `query`, creating the missing suffix from `values` if needed.
///
/// Returns the target, its index path, and the raw insertion of the created
/// fragment when creation happened.
fn resolve_or_create<'a>(
    tree: &'a mut Tree,
    query: &Query,
    values: &Value,
) -> Result<(TargetMut<'a>, Vec<usize>, Option<Edit>), StyleError> {
    let mut created: Option<Edit> = None;
    let resolved = walk(tree, query.tokens(), |container, step| {
        if let Some(idx) = step.found {
            return Ok(idx);
        }
        let fragment = css_in_js::parse(&nest(step.suffix, values.clone()))?;
        // Nothing is inserted unless the rest of the query resolves inside
        // the fragment.
        find(&fragment, step.suffix)?;
        let node = fragment
            .nodes
            .into_iter()
            .next()
            .ok_or_else(|| StyleError::NotFound(step.token.to_string()))?;
        let text = serialize_node(&node);
        let idx = insert_node(container, node, !step.parent_path.is_empty())?;
        let path = child_path(step.parent_path, idx);
        tracing::debug!(token = %step.token, path = ?path, "created missing node");
        created = Some(Edit::Raw { path, value: text });
        Ok(idx)
    })?;
    Ok((resolved.target, resolved.path, created))
}

/// Content addressed at a rule. Nested rules or groups are a type mismatch.
fn rule_content(values: &Value) -> Result<Vec<Declaration>, StyleError> {
    match css_in_js::parse_declarations(values) {
        Err(StyleError::UnsupportedConstruct(_)) => Err(StyleError::InvalidNodeType {
            expected: NodeKind::Declaration,
            found: NodeKind::Rule,
        }),
        other => other,
    }
}

/// Content addressed at a container: the root (`nested == false`) or a group.
fn container_content(values: &Value, nested: bool) -> Result<Vec<Node>, StyleError> {
    let nodes = css_in_js::parse(values)?.nodes;
    check_insertable(&nodes, nested)?;
    Ok(nodes)
}

// ── replace-children ──────────────────────────────────────────────────────

/// Replaces the content of the node at `query` with `values`.
///
/// A missing node is created and reported as a single raw insertion. An
/// existing node has its children replaced and the old and new children are
/// diffed, so declarations and rules absent from `values` are removed.
pub fn set_node(tree: &mut Tree, query: &Query, values: &Value) -> Result<Diff, StyleError> {
    let (target, path, created) = resolve_or_create(tree, query, values)?;
    if let Some(edit) = created {
        return Ok(vec![edit]);
    }
    let out: Diff = match target {
        TargetMut::Node(Node::Rule(rule)) => {
            let declarations = rule_content(values)?;
            let edit = diff_declarations(&rule.declarations, &declarations, &path);
            rule.declarations = declarations;
            edit.into_iter().collect()
        }
        TargetMut::Node(Node::Declaration(_)) => return Err(declaration_target()),
        target => {
            let nested = matches!(target, TargetMut::Node(_));
            let children = container_content(values, nested)?;
            let current = target.into_children()?;
            let out = diff(current, &children, &path);
            *current = children;
            out
        }
    };
    tracing::debug!(query = %query, edits = out.len(), "set node");
    Ok(out)
}

// ── force-replace ─────────────────────────────────────────────────────────

/// Like [`set_node`], but an existing node is swapped as a whole: the diff
/// is one node edit carrying its complete new text.
///
/// On the empty query every top-level node is deleted and the new ones are
/// inserted.
pub fn set_node_force(tree: &mut Tree, query: &Query, values: &Value) -> Result<Diff, StyleError> {
    let (target, path, created) = resolve_or_create(tree, query, values)?;
    if let Some(edit) = created {
        return Ok(vec![edit]);
    }
    let out = match target {
        TargetMut::Root(nodes) => {
            let children = container_content(values, false)?;
            let mut out: Diff = nodes
                .iter()
                .map(|_| Edit::Node {
                    path: vec![0],
                    value: None,
                })
                .collect();
            out.extend(children.iter().enumerate().map(|(i, node)| Edit::Raw {
                path: vec![i],
                value: serialize_node(node),
            }));
            *nodes = children;
            out
        }
        TargetMut::Node(node) => {
            match node {
                Node::Rule(rule) => rule.declarations = rule_content(values)?,
                Node::Group(group) => group.children = container_content(values, true)?,
                Node::Declaration(_) => return Err(declaration_target()),
            }
            vec![Edit::Node {
                path,
                value: Some(serialize_node(node)),
            }]
        }
    };
    tracing::debug!(query = %query, edits = out.len(), "force-set node");
    Ok(out)
}

// ── merge-add ─────────────────────────────────────────────────────────────

fn merge_declarations(rule: &mut Rule, incoming: Vec<Declaration>, path: &[usize], out: &mut Diff) {
    let mut changes = PropertyChanges::new();
    for d in incoming {
        if rule.declaration(&d.property) != Some(d.value.as_str()) {
            changes.insert(d.property.clone(), Some(d.value.clone()));
            rule.set_declaration(d.property, d.value);
        }
    }
    if !changes.is_empty() {
        out.push(Edit::Properties {
            path: path.to_vec(),
            value: changes,
        });
    }
}

fn merge_children(
    children: &mut Vec<Node>,
    incoming: Vec<Node>,
    path: &[usize],
    nested: bool,
    out: &mut Diff,
) -> Result<(), StyleError> {
    for node in incoming {
        let key = node.key();
        let Some(idx) = children.iter().position(|c| c.key() == key) else {
            let text = serialize_node(&node);
            let idx = insert_node(children, node, nested)?;
            out.push(Edit::Raw {
                path: child_path(path, idx),
                value: text,
            });
            continue;
        };
        let p = child_path(path, idx);
        match (&mut children[idx], node) {
            (Node::Rule(existing), Node::Rule(new)) => {
                merge_declarations(existing, new.declarations, &p, out);
            }
            (Node::Group(existing), Node::Group(new)) => {
                merge_children(&mut existing.children, new.children, &p, true, out)?;
            }
            (existing, new) => {
                return Err(StyleError::InvalidNodeType {
                    expected: existing.kind(),
                    found: new.kind(),
                })
            }
        }
    }
    Ok(())
}

/// Adds `values` to the node at `query` without removing anything.
///
/// Missing nodes are created; declarations are created or updated; rules
/// and groups present on both sides are merged recursively.
pub fn add_to_node(tree: &mut Tree, query: &Query, values: &Value) -> Result<Diff, StyleError> {
    let (target, path, created) = resolve_or_create(tree, query, values)?;
    if let Some(edit) = created {
        return Ok(vec![edit]);
    }
    let mut out = Vec::new();
    match target {
        TargetMut::Node(Node::Rule(rule)) => merge_declarations(rule, rule_content(values)?, &path, &mut out),
        TargetMut::Node(Node::Declaration(_)) => return Err(declaration_target()),
        target => {
            let nested = matches!(target, TargetMut::Node(_));
            let incoming = container_content(values, nested)?;
            merge_children(target.into_children()?, incoming, &path, nested, &mut out)?;
        }
    }
    tracing::debug!(query = %query, edits = out.len(), "added to node");
    Ok(out)
}

// ── remove ────────────────────────────────────────────────────────────────

/// Detaches the node at `query` from its parent.
pub fn remove_node(tree: &mut Tree, query: &Query) -> Result<Diff, StyleError> {
    let (last, init) = query.tokens().split_last().ok_or(StyleError::EmptyQuery)?;
    let parent = find_mut(tree, init)?;
    let siblings = parent.target.into_children()?;
    let idx = last
        .position_in(siblings)
        .ok_or_else(|| StyleError::NotFound(last.to_string()))?;
    siblings.remove(idx);
    let path = child_path(&parent.path, idx);
    tracing::debug!(query = %query, path = ?path, "removed node");
    Ok(vec![Edit::Node { path, value: None }])
}

// ── read ──────────────────────────────────────────────────────────────────

/// Read-only lookup; the empty query yields the root.
pub fn get_node<'a>(tree: &'a Tree, query: &Query) -> Result<Target<'a>, StyleError> {
    find(tree, query.tokens())
}
