//! Diff batch types.

use indexmap::IndexMap;

/// Child indices from the root to a node.
///
/// Indices are positions in the live collection at the moment the edit is
/// replayed, i.e. after every earlier edit of the same batch.
pub type Path = Vec<usize>;

/// Property name to new value; `None` removes the declaration.
pub type PropertyChanges = IndexMap<String, Option<String>>;

/// One edit of a diff batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the node at `path` with `value`, or delete it when `None`.
    Node { path: Path, value: Option<String> },
    /// Create, update or remove declarations of the rule at `path`.
    Properties { path: Path, value: PropertyChanges },
    /// Insert brand-new structure at `path`.
    Raw { path: Path, value: String },
}

impl Edit {
    pub fn path(&self) -> &[usize] {
        match self {
            Edit::Node { path, .. } | Edit::Properties { path, .. } | Edit::Raw { path, .. } => path,
        }
    }

    /// Wire name of the edit type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Edit::Node { .. } => "node",
            Edit::Properties { .. } => "properties",
            Edit::Raw { .. } => "raw",
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Edit::Node { value: None, .. })
    }
}

/// An ordered batch of edits, replayed strictly in order.
pub type Diff = Vec<Edit>;
