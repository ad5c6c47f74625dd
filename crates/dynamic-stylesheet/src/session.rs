//! A tree kept in sync with a live rule collection.
//!
//! Every mutation runs against the tree first; the resulting diff is then
//! replayed onto the live collection. A replay failure leaves the two out of
//! sync and is returned to the caller.

use serde::Deserialize;
use serde_json::Value;
use stylesheet_ast::{Query, Tree};

use crate::css_in_js::{self, objectify_target};
use crate::cssom::{apply_diff, RuleList, StyleSheet};
use crate::stylesheet_diff::{diff_trees, Diff, Edit};
use crate::stylesheet_ops::{add_to_node, get_node, remove_node, set_node, set_node_force};
use crate::Error;

/// Session configuration, loadable from JSON.
///
/// ```
/// use dynamic_stylesheet::session::SessionOptions;
///
/// let options: SessionOptions = serde_json::from_str(
///     r#"{"id": "theme", "initialState": {"body": {"margin": 0}}}"#,
/// ).unwrap();
/// assert_eq!(options.id, "theme");
/// assert!(options.initial_state.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// Title of the rule collection the session creates.
    pub id: String,
    /// Literal content the tree and the live collection start from.
    pub initial_state: Option<Value>,
}

impl SessionOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial_state: None,
        }
    }

    pub fn with_initial_state(mut self, state: Value) -> Self {
        self.initial_state = Some(state);
        self
    }
}

pub struct DynamicStylesheet<S: RuleList = StyleSheet> {
    id: String,
    tree: Tree,
    sheet: S,
}

impl DynamicStylesheet<StyleSheet> {
    /// Creates a session over a fresh in-memory [`StyleSheet`].
    pub fn new(options: SessionOptions) -> Result<Self, Error> {
        let sheet = StyleSheet::new(options.id.clone());
        Self::with_sheet(options, sheet)
    }
}

impl<S: RuleList> DynamicStylesheet<S> {
    /// Adopts an external rule collection, which must be empty.
    pub fn with_sheet(options: SessionOptions, mut sheet: S) -> Result<Self, Error> {
        if !sheet.is_empty() {
            return Err(Error::SheetNotEmpty(sheet.len()));
        }
        let tree = match &options.initial_state {
            Some(state) => css_in_js::parse(state)?,
            None => Tree::new(),
        };
        let seed = diff_trees(None, &tree);
        apply_diff(&mut sheet, &seed)?;
        tracing::debug!(id = %options.id, rules = seed.len(), "seeded stylesheet");
        Ok(Self {
            id: options.id,
            tree,
            sheet,
        })
    }

    /// Replaces the content at `query`; see [`set_node`].
    pub fn set(&mut self, query: &Query, values: &Value) -> Result<Diff, Error> {
        let diff = set_node(&mut self.tree, query, values)?;
        self.process_diffs(&diff)?;
        Ok(diff)
    }

    /// Replaces the node at `query` as a whole; see [`set_node_force`].
    pub fn set_force(&mut self, query: &Query, values: &Value) -> Result<Diff, Error> {
        let diff = set_node_force(&mut self.tree, query, values)?;
        self.process_diffs(&diff)?;
        Ok(diff)
    }

    /// Merges `values` into the content at `query`; see [`add_to_node`].
    pub fn add(&mut self, query: &Query, values: &Value) -> Result<Diff, Error> {
        let diff = add_to_node(&mut self.tree, query, values)?;
        self.process_diffs(&diff)?;
        Ok(diff)
    }

    pub fn delete(&mut self, query: &Query) -> Result<Diff, Error> {
        let diff = remove_node(&mut self.tree, query)?;
        self.process_diffs(&diff)?;
        Ok(diff)
    }

    /// Literal content of the node at `query`.
    pub fn get(&self, query: &Query) -> Result<Value, Error> {
        Ok(objectify_target(get_node(&self.tree, query)?))
    }

    /// Literal content of the whole tree.
    pub fn to_json(&self) -> Value {
        css_in_js::objectify_tree(&self.tree)
    }

    /// Replays `diff` onto the live collection.
    pub fn process_diffs(&mut self, diff: &[Edit]) -> Result<(), Error> {
        apply_diff(&mut self.sheet, diff)?;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    pub fn into_parts(self) -> (Tree, S) {
        (self.tree, self.sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stylesheet_ast::StyleError;

    #[test]
    fn initial_state_seeds_both_sides() {
        let options = SessionOptions::new("theme").with_initial_state(json!({
            "div": {"background": "red"},
            "@media (max-width: 300px)": {"body": {"background": "blue"}}
        }));
        let session = DynamicStylesheet::new(options).unwrap();
        assert_eq!(session.sheet().title, "theme");
        assert_eq!(session.sheet().to_tree(), *session.tree());
        assert_eq!(session.sheet().len(), 2);
    }

    #[test]
    fn options_default_when_fields_are_missing() {
        let options: SessionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SessionOptions::default());
    }

    #[test]
    fn adopted_sheet_must_be_empty() {
        let sheet = StyleSheet::from_css("x", "a {}").unwrap();
        let err = DynamicStylesheet::with_sheet(SessionOptions::new("x"), sheet).err();
        assert_eq!(err, Some(Error::SheetNotEmpty(1)));
    }

    #[test]
    fn get_reads_back_literal_content() {
        let options = SessionOptions::new("t").with_initial_state(json!({"div": {"zIndex": 3}}));
        let session = DynamicStylesheet::new(options).unwrap();
        assert_eq!(session.get(&Query::root().selector("div")).unwrap(), json!({"zIndex": 3}));
        assert_eq!(session.to_json(), json!({"div": {"zIndex": 3}}));
    }

    #[test]
    fn failed_mutation_leaves_sheet_untouched() {
        let mut session = DynamicStylesheet::new(SessionOptions::new("t")).unwrap();
        let err = session.delete(&Query::root().selector("missing"));
        assert!(err.is_err());
        assert!(session.sheet().is_empty());
    }

    #[test]
    fn failed_group_creation_keeps_tree_and_sheet_in_sync() {
        let mut session = DynamicStylesheet::new(SessionOptions::new("t")).unwrap();
        let err = session.set(&Query::parse(&["@media  print", "a"]), &json!({"color": "red"}));
        assert_eq!(err, Err(Error::Style(StyleError::NotFound("@media  print".into()))));
        assert!(session.tree().is_empty());
        assert!(session.sheet().is_empty());
    }

    #[test]
    fn empty_string_values_are_dropped_on_both_sides() {
        let mut session = DynamicStylesheet::new(SessionOptions::new("t")).unwrap();
        let q = Query::root().selector("a");
        session.set(&q, &json!({"content": "", "color": "red"})).unwrap();
        assert_eq!(session.sheet().to_tree(), *session.tree());
        session.set(&q, &json!({"color": ""})).unwrap();
        assert_eq!(session.sheet().to_tree(), *session.tree());
        assert_eq!(session.get(&q).unwrap(), json!({}));
    }
}
