//! Tree model: ordered nodes of a stylesheet.

use std::fmt;

/// A single `property: value` pair inside a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A selector paired with its declarations.
///
/// Property names are unique within one rule; [`Rule::set_declaration`]
/// keeps the position of the first occurrence and overwrites its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    /// Builder form of [`Rule::set_declaration`].
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_declaration(property, value);
        self
    }

    /// Creates or updates a declaration. Returns the previous value, if any.
    pub fn set_declaration(
        &mut self,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|d| d.property == property) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.declarations.push(Declaration { property, value });
                None
            }
        }
    }

    pub fn remove_declaration(&mut self, property: &str) -> Option<String> {
        let idx = self.declarations.iter().position(|d| d.property == property)?;
        Some(self.declarations.remove(idx).value)
    }

    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

/// A conditional at-rule (`@media (max-width: 300px)`) holding nested nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub condition: String,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(name: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: condition.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }
}

/// Any node of the tree.
///
/// The model is recursive and does not restrict nesting depth; the query
/// resolver and mutation operations are the layers that do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Group(Group),
    Rule(Rule),
    Declaration(Declaration),
}

/// Coarse node type, used for error reporting and type comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Group,
    Rule,
    Declaration,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Rule => "rule",
            NodeKind::Declaration => "declaration",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value used to match a node across two versions of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Selector(String),
    AtRule { name: String, condition: String },
    Property(String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Selector(s) => f.write_str(s),
            NodeKey::AtRule { name, condition } if condition.is_empty() => write!(f, "@{name}"),
            NodeKey::AtRule { name, condition } => write!(f, "@{name} {condition}"),
            NodeKey::Property(p) => f.write_str(p),
        }
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group(_) => NodeKind::Group,
            Node::Rule(_) => NodeKind::Rule,
            Node::Declaration(_) => NodeKind::Declaration,
        }
    }

    pub fn key(&self) -> NodeKey {
        match self {
            Node::Group(g) => NodeKey::AtRule {
                name: g.name.clone(),
                condition: g.condition.clone(),
            },
            Node::Rule(r) => NodeKey::Selector(r.selector.clone()),
            Node::Declaration(d) => NodeKey::Property(d.property.clone()),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Node::Rule(rule)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Node::Group(group)
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}

/// The implicit root container: an ordered sequence of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl From<Vec<Node>> for Tree {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<Node> for Tree {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
