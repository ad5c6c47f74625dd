//! Errors raised while resolving queries against, or building, a tree.

use thiserror::Error;

use crate::types::NodeKind;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StyleError {
    /// A query token matched no sibling and nothing created one.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("INVALID_NODE_TYPE: expected {expected}, found {found}")]
    InvalidNodeType { expected: NodeKind, found: NodeKind },
    #[error("UNSUPPORTED: {0}")]
    UnsupportedConstruct(String),
    #[error("INVALID_CONTENT: {0}")]
    InvalidContent(String),
    #[error("EMPTY_QUERY")]
    EmptyQuery,
}
