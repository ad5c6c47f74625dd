//! Where created nodes go, and which nodes may be created at all.

use stylesheet_ast::{Node, NodeKind, StyleError};

/// At-rule kinds that may be created as conditional groups.
pub const GROUP_KINDS: &[&str] = &["media"];

/// Checks that `nodes` may be placed in a container. `nested` is true for
/// the children of a group.
pub fn check_insertable(nodes: &[Node], nested: bool) -> Result<(), StyleError> {
    for node in nodes {
        match node {
            Node::Rule(_) => {}
            Node::Declaration(_) => {
                return Err(StyleError::InvalidNodeType {
                    expected: NodeKind::Rule,
                    found: NodeKind::Declaration,
                })
            }
            Node::Group(group) => {
                if nested {
                    return Err(StyleError::UnsupportedConstruct(format!(
                        "@{} nested inside a group",
                        group.name
                    )));
                }
                if !GROUP_KINDS.contains(&group.name.as_str()) {
                    return Err(StyleError::UnsupportedConstruct(format!(
                        "@{} groups",
                        group.name
                    )));
                }
                check_insertable(&group.children, true)?;
            }
        }
    }
    Ok(())
}

/// Index a new node takes in `container`.
///
/// Groups go last. Rules go right after the last non-group sibling, so they
/// stay ahead of the groups that may override them.
pub fn insertion_index(container: &[Node], node: &Node) -> usize {
    if node.is_group() {
        return container.len();
    }
    container
        .iter()
        .rposition(|n| !n.is_group())
        .map_or(0, |i| i + 1)
}

/// Validates and inserts `node`, returning its index.
pub fn insert_node(container: &mut Vec<Node>, node: Node, nested: bool) -> Result<usize, StyleError> {
    check_insertable(std::slice::from_ref(&node), nested)?;
    let idx = insertion_index(container, &node);
    container.insert(idx, node);
    Ok(idx)
}
