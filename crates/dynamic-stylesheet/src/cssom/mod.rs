//! Live, index-addressed rule collections and the patch applier.
//!
//! [`RuleList`] is the surface a diff batch is replayed against: inserting or
//! deleting a rule shifts every later sibling by exactly one index. The
//! in-memory [`StyleSheet`] implements it over CSS text, the same way a
//! browser stylesheet does.

pub mod apply;
pub mod sheet;

use thiserror::Error;

pub use apply::{apply_diff, apply_edit};
pub use sheet::{CssGroupingRule, CssRule, CssRuleList, CssStyleDeclaration, CssStyleRule, StyleSheet};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CssomError {
    #[error("INDEX_SIZE: index {index} out of range for {len} rules")]
    IndexSize { index: usize, len: usize },
    /// Rule text that does not describe exactly one rule.
    #[error("SYNTAX: {0}")]
    Syntax(String),
    /// A path that cannot be descended: empty, or crossing a style rule.
    #[error("INVALID_PATH: {0:?}")]
    InvalidPath(Vec<usize>),
    #[error("NOT_A_STYLE_RULE: {0:?}")]
    NotAStyleRule(Vec<usize>),
}

/// Settable property map of a style rule.
pub trait StyleDeclaration {
    /// Sets `property`. The empty string clears it.
    fn set_property(&mut self, property: &str, value: &str);
    fn remove_property(&mut self, property: &str) -> Option<String>;
    fn get_property_value(&self, property: &str) -> Option<String>;
}

/// Mutable view of one entry of a [`RuleList`].
pub enum LiveRuleMut<'a> {
    Style(&'a mut dyn StyleDeclaration),
    Group(&'a mut dyn RuleList),
}

/// An ordered rule collection addressed by index.
pub trait RuleList {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses `text` as one rule and inserts it at `index` (`<= len`).
    /// Returns the index it landed on.
    fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize, CssomError>;

    fn delete_rule(&mut self, index: usize) -> Result<(), CssomError>;

    fn get_mut(&mut self, index: usize) -> Option<LiveRuleMut<'_>>;
}
