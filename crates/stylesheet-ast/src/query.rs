//! Query path tokens.
//!
//! A query is an ordered list of human-readable steps, one per tree level:
//! a plain string is a rule selector, a string starting with `@` is an
//! at-rule of the form `@<name> <condition>`.

use std::fmt;

use crate::types::{Node, NodeKey};

/// One step of a query path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryToken {
    Selector(String),
    AtRule { name: String, condition: String },
}

impl QueryToken {
    /// Parses a raw token.
    ///
    /// `@media screen and (x)` splits on the first space into name `media`
    /// and condition `screen and (x)`. Without a space the condition is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use stylesheet_ast::QueryToken;
    ///
    /// assert_eq!(
    ///     QueryToken::parse("@media (max-width: 300px)"),
    ///     QueryToken::AtRule { name: "media".into(), condition: "(max-width: 300px)".into() },
    /// );
    /// assert_eq!(QueryToken::parse("div"), QueryToken::Selector("div".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('@') {
            Some(rest) => {
                let (name, condition) = rest.split_once(' ').unwrap_or((rest, ""));
                QueryToken::AtRule {
                    name: name.to_string(),
                    condition: condition.to_string(),
                }
            }
            None => QueryToken::Selector(raw.to_string()),
        }
    }

    pub fn media(condition: impl Into<String>) -> Self {
        QueryToken::AtRule {
            name: "media".to_string(),
            condition: condition.into(),
        }
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        QueryToken::Selector(selector.into())
    }

    /// True if `node` carries the identity key this token names.
    pub fn matches(&self, node: &Node) -> bool {
        match (self, node) {
            (QueryToken::Selector(s), Node::Rule(r)) => *s == r.selector,
            (QueryToken::AtRule { name, condition }, Node::Group(g)) => {
                *name == g.name && *condition == g.condition
            }
            _ => false,
        }
    }

    /// Index of the child this token resolves to. Selectors take the first
    /// match; at-rules take the last, since a later block with the same
    /// condition wins in the cascade.
    pub fn position_in(&self, nodes: &[Node]) -> Option<usize> {
        match self {
            QueryToken::Selector(_) => nodes.iter().position(|n| self.matches(n)),
            QueryToken::AtRule { .. } => nodes.iter().rposition(|n| self.matches(n)),
        }
    }

    pub fn key(&self) -> NodeKey {
        match self {
            QueryToken::Selector(s) => NodeKey::Selector(s.clone()),
            QueryToken::AtRule { name, condition } => NodeKey::AtRule {
                name: name.clone(),
                condition: condition.clone(),
            },
        }
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key(), f)
    }
}

impl From<&str> for QueryToken {
    fn from(raw: &str) -> Self {
        QueryToken::parse(raw)
    }
}

/// An immutable query path.
///
/// Built fresh for every call; the builder methods consume and return the
/// value so no state is shared between calls.
///
/// ```
/// use stylesheet_ast::Query;
///
/// let q = Query::root().media("(max-width: 300px)").selector("body");
/// assert_eq!(q.len(), 2);
/// assert_eq!(q.to_string(), "@media (max-width: 300px) > body");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    tokens: Vec<QueryToken>,
}

impl Query {
    /// The empty query, addressing the root container.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &[&str]) -> Self {
        raw.iter().copied().map(QueryToken::parse).collect()
    }

    pub fn media(self, condition: impl Into<String>) -> Self {
        self.push(QueryToken::media(condition))
    }

    pub fn selector(self, selector: impl Into<String>) -> Self {
        self.push(QueryToken::selector(selector))
    }

    pub fn at_rule(self, name: impl Into<String>, condition: impl Into<String>) -> Self {
        self.push(QueryToken::AtRule {
            name: name.into(),
            condition: condition.into(),
        })
    }

    pub fn push(mut self, token: QueryToken) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn tokens(&self) -> &[QueryToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<QueryToken> for Query {
    fn from_iter<I: IntoIterator<Item = QueryToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
