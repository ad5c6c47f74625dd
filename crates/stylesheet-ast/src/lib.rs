//! Ordered stylesheet tree and selector-path query resolution.
//!
//! A stylesheet is modelled as an ordered sequence of [`Node`]s: rules with
//! their declarations, and conditional groups (`@media ...`) holding nested
//! rules. Nodes are addressed by a [`Query`], a list of human-readable tokens
//! matched one level at a time against each node's identity key.
//!
//! # Example
//!
//! ```
//! use stylesheet_ast::{find, Group, Query, Rule, Target, Tree};
//!
//! let tree = Tree::from(vec![
//!     Rule::new("body").with("background", "black").into(),
//!     Group::new("media", "(max-width: 300px)")
//!         .with_child(Rule::new("body").with("background", "red"))
//!         .into(),
//! ]);
//!
//! let query = Query::root().media("(max-width: 300px)").selector("body");
//! let Ok(Target::Node(node)) = find(&tree, query.tokens()) else { unreachable!() };
//! assert_eq!(node.as_rule().unwrap().declaration("background"), Some("red"));
//! ```

pub mod error;
pub mod find;
pub mod query;
pub mod types;

pub use error::StyleError;
pub use find::{find, find_mut, walk, Resolved, Step, Target, TargetMut};
pub use query::{Query, QueryToken};
pub use types::{Declaration, Group, Node, NodeKey, NodeKind, Rule, Tree};
