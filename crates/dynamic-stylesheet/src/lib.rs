//! dynamic-stylesheet: keep a live rule collection in sync with a
//! stylesheet tree.
//!
//! Mutations address nodes by selector path, update the tree in place and
//! return an ordered, index-addressed diff batch. Replaying the batch onto a
//! live collection that matched the tree before the call brings it up to date
//! without rebuilding it.
//!
//! | Module              | Role                                              |
//! |---------------------|---------------------------------------------------|
//! | [`css_in_js`]       | literal content ↔ tree                            |
//! | [`css_text`]        | CSS text ↔ tree                                   |
//! | [`stylesheet_diff`] | key-matched tree diff                             |
//! | [`stylesheet_ops`]  | set / force-set / merge-add / remove              |
//! | [`cssom`]           | live rule collections and the patch applier       |
//! | [`codec`]           | JSON wire form of diff batches                    |
//! | [`session`]         | tree + live collection behind one handle          |
//! | [`cli`]             | logic for the `css-diff` and `css-patch` binaries |
//!
//! ```
//! use dynamic_stylesheet::session::{DynamicStylesheet, SessionOptions};
//! use serde_json::json;
//! use stylesheet_ast::Query;
//!
//! let options = SessionOptions::new("theme").with_initial_state(json!({
//!     "div": { "background": "red" },
//! }));
//! let mut sheet = DynamicStylesheet::new(options).unwrap();
//! sheet.set(&Query::root().media("(max-width: 300px)").selector("body"), &json!({ "margin": 0 })).unwrap();
//! assert_eq!(sheet.sheet().to_tree(), *sheet.tree());
//! ```

use thiserror::Error;

pub mod cli;
pub mod codec;
pub mod css_in_js;
pub mod css_text;
pub mod cssom;
pub mod session;
pub mod stylesheet_diff;
pub mod stylesheet_ops;

pub use codec::json::CodecError;
pub use cssom::{apply_diff, apply_edit, CssomError, RuleList, StyleSheet};
pub use session::{DynamicStylesheet, SessionOptions};
pub use stylesheet_diff::{diff, diff_trees, Diff, Edit};
pub use stylesheet_ops::{add_to_node, get_node, remove_node, set_node, set_node_force};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Style(#[from] stylesheet_ast::StyleError),
    #[error(transparent)]
    Cssom(#[from] CssomError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A session can only adopt a rule collection with no rules in it.
    #[error("SHEET_NOT_EMPTY: {0} rules")]
    SheetNotEmpty(usize),
}
