//! Query resolution.
//!
//! Walks one tree level per query token, matching children by identity key.
//! [`walk`] hands every step to a caller-supplied resolver which may insert
//! a missing node into the current container and must return the index to
//! descend into; [`find`] and [`find_mut`] are the plain lookups.

use crate::error::StyleError;
use crate::query::QueryToken;
use crate::types::{Node, NodeKind, Tree};

/// Read-only resolution result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target<'a> {
    /// The empty query: the root container itself.
    Root(&'a Tree),
    Node(&'a Node),
}

/// Mutable resolution result.
#[derive(Debug)]
pub enum TargetMut<'a> {
    Root(&'a mut Vec<Node>),
    Node(&'a mut Node),
}

impl<'a> TargetMut<'a> {
    /// The child sequence of the target, if it is a container.
    pub fn into_children(self) -> Result<&'a mut Vec<Node>, StyleError> {
        match self {
            TargetMut::Root(nodes) => Ok(nodes),
            TargetMut::Node(Node::Group(group)) => Ok(&mut group.children),
            TargetMut::Node(other) => Err(StyleError::InvalidNodeType {
                expected: NodeKind::Group,
                found: other.kind(),
            }),
        }
    }
}

/// A resolved node together with its index path from the root.
#[derive(Debug)]
pub struct Resolved<'a> {
    pub path: Vec<usize>,
    pub target: TargetMut<'a>,
}

/// What the resolver sees at each step of [`walk`].
#[derive(Debug, Clone, Copy)]
pub struct Step<'q> {
    /// Position of `token` in the query.
    pub position: usize,
    pub token: &'q QueryToken,
    /// `token` and every token after it.
    pub suffix: &'q [QueryToken],
    /// Index path of the container being searched.
    pub parent_path: &'q [usize],
    /// Index of the matching child, if one exists.
    pub found: Option<usize>,
}

fn descend(node: &Node) -> Result<&[Node], StyleError> {
    match node {
        Node::Group(group) => Ok(&group.children),
        other => Err(StyleError::InvalidNodeType {
            expected: NodeKind::Group,
            found: other.kind(),
        }),
    }
}

/// Read-only lookup. Fails with [`StyleError::NotFound`] on the first
/// unmatched token.
pub fn find<'a>(tree: &'a Tree, tokens: &[QueryToken]) -> Result<Target<'a>, StyleError> {
    let Some((last, init)) = tokens.split_last() else {
        return Ok(Target::Root(tree));
    };
    let mut container: &'a [Node] = &tree.nodes;
    for token in init {
        let idx = token
            .position_in(container)
            .ok_or_else(|| StyleError::NotFound(token.to_string()))?;
        container = descend(&container[idx])?;
    }
    last.position_in(container)
        .map(|idx| Target::Node(&container[idx]))
        .ok_or_else(|| StyleError::NotFound(last.to_string()))
}

/// Walks `tokens` against `tree`, delegating every step to `resolve`.
///
/// `resolve` receives the container being searched and may mutate it. The
/// index it returns must point at a child matching the step's token.
pub fn walk<'a, F>(
    tree: &'a mut Tree,
    tokens: &[QueryToken],
    mut resolve: F,
) -> Result<Resolved<'a>, StyleError>
where
    F: FnMut(&mut Vec<Node>, &Step<'_>) -> Result<usize, StyleError>,
{
    let mut container: &'a mut Vec<Node> = &mut tree.nodes;
    let mut path = Vec::with_capacity(tokens.len());
    for (position, token) in tokens.iter().enumerate() {
        let found = token.position_in(container);
        let step = Step {
            position,
            token,
            suffix: &tokens[position..],
            parent_path: &path,
            found,
        };
        let idx = resolve(container, &step)?;
        if found.is_none() {
            tracing::trace!(token = %token, index = idx, "resolver supplied missing node");
        }
        match container.get(idx) {
            Some(node) if token.matches(node) => {}
            _ => return Err(StyleError::NotFound(token.to_string())),
        }
        path.push(idx);
        if position + 1 == tokens.len() {
            return Ok(Resolved {
                path,
                target: TargetMut::Node(&mut container[idx]),
            });
        }
        container = match &mut container[idx] {
            Node::Group(group) => &mut group.children,
            other => {
                return Err(StyleError::InvalidNodeType {
                    expected: NodeKind::Group,
                    found: other.kind(),
                })
            }
        };
    }
    Ok(Resolved {
        path,
        target: TargetMut::Root(container),
    })
}

/// Mutable lookup without creation.
pub fn find_mut<'a>(tree: &'a mut Tree, tokens: &[QueryToken]) -> Result<Resolved<'a>, StyleError> {
    walk(tree, tokens, |_, step| {
        step.found
            .ok_or_else(|| StyleError::NotFound(step.token.to_string()))
    })
}
