//! In-memory rule collection.

use indexmap::IndexMap;
use stylesheet_ast::{Declaration, Group, Node, Rule, Tree};

use super::{CssomError, LiveRuleMut, RuleList, StyleDeclaration};
use crate::css_text::{parse_css, serialize_node, serialize_nodes};

// ── Declarations ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    properties: IndexMap<String, String>,
}

impl CssStyleDeclaration {
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn to_declarations(&self) -> Vec<Declaration> {
        self.iter().map(|(k, v)| Declaration::new(k, v)).collect()
    }
}

impl StyleDeclaration for CssStyleDeclaration {
    fn set_property(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.properties.shift_remove(property);
        } else {
            self.properties.insert(property.to_string(), value.to_string());
        }
    }

    fn remove_property(&mut self, property: &str) -> Option<String> {
        self.properties.shift_remove(property)
    }

    fn get_property_value(&self, property: &str) -> Option<String> {
        self.properties.get(property).cloned()
    }
}

impl FromIterator<Declaration> for CssStyleDeclaration {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        let mut style = Self::default();
        for d in iter {
            style.set_property(&d.property, &d.value);
        }
        style
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssStyleRule {
    pub selector_text: String,
    pub style: CssStyleDeclaration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssGroupingRule {
    pub name: String,
    pub condition_text: String,
    pub css_rules: CssRuleList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    Style(CssStyleRule),
    Group(CssGroupingRule),
}

impl CssRule {
    fn from_node(node: Node) -> Result<Self, CssomError> {
        match node {
            Node::Rule(rule) => Ok(CssRule::Style(CssStyleRule {
                selector_text: rule.selector,
                style: rule.declarations.into_iter().collect(),
            })),
            Node::Group(group) => {
                let rules = group
                    .children
                    .into_iter()
                    .map(CssRule::from_node)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CssRule::Group(CssGroupingRule {
                    name: group.name,
                    condition_text: group.condition,
                    css_rules: CssRuleList { rules },
                }))
            }
            Node::Declaration(d) => Err(CssomError::Syntax(format!(
                "declaration `{}` outside a rule",
                d.property
            ))),
        }
    }

    pub fn to_node(&self) -> Node {
        match self {
            CssRule::Style(rule) => {
                let mut out = Rule::new(rule.selector_text.clone());
                out.declarations = rule.style.to_declarations();
                out.into()
            }
            CssRule::Group(group) => {
                let mut out = Group::new(group.name.clone(), group.condition_text.clone());
                out.children = group.css_rules.to_nodes();
                out.into()
            }
        }
    }

    pub fn css_text(&self) -> String {
        serialize_node(&self.to_node())
    }
}

// ── Rule lists ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssRuleList {
    rules: Vec<CssRule>,
}

impl CssRuleList {
    pub fn get(&self, index: usize) -> Option<&CssRule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CssRule> {
        self.rules.iter()
    }

    fn to_nodes(&self) -> Vec<Node> {
        self.rules.iter().map(CssRule::to_node).collect()
    }
}

impl RuleList for CssRuleList {
    fn len(&self) -> usize {
        self.rules.len()
    }

    fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize, CssomError> {
        let len = self.rules.len();
        if index > len {
            return Err(CssomError::IndexSize { index, len });
        }
        let tree = parse_css(text).map_err(|e| CssomError::Syntax(e.to_string()))?;
        let mut nodes = tree.nodes.into_iter();
        let (Some(node), None) = (nodes.next(), nodes.next()) else {
            return Err(CssomError::Syntax(format!("expected exactly one rule in `{text}`")));
        };
        self.rules.insert(index, CssRule::from_node(node)?);
        Ok(index)
    }

    fn delete_rule(&mut self, index: usize) -> Result<(), CssomError> {
        let len = self.rules.len();
        if index >= len {
            return Err(CssomError::IndexSize { index, len });
        }
        self.rules.remove(index);
        Ok(())
    }

    fn get_mut(&mut self, index: usize) -> Option<LiveRuleMut<'_>> {
        Some(match self.rules.get_mut(index)? {
            CssRule::Style(rule) => LiveRuleMut::Style(&mut rule.style),
            CssRule::Group(group) => LiveRuleMut::Group(&mut group.css_rules),
        })
    }
}

// ── Stylesheet ────────────────────────────────────────────────────────────

/// A titled, top-level rule collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub title: String,
    pub css_rules: CssRuleList,
}

impl StyleSheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            css_rules: CssRuleList::default(),
        }
    }

    /// Builds a sheet from stylesheet text.
    pub fn from_css(title: impl Into<String>, css: &str) -> Result<Self, CssomError> {
        let tree = parse_css(css).map_err(|e| CssomError::Syntax(e.to_string()))?;
        let rules = tree
            .nodes
            .into_iter()
            .map(CssRule::from_node)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title: title.into(),
            css_rules: CssRuleList { rules },
        })
    }

    pub fn css_text(&self) -> String {
        serialize_nodes(&self.css_rules.to_nodes())
    }

    /// Snapshot of the current rules as a tree.
    pub fn to_tree(&self) -> Tree {
        Tree::from(self.css_rules.to_nodes())
    }
}

impl RuleList for StyleSheet {
    fn len(&self) -> usize {
        self.css_rules.len()
    }

    fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize, CssomError> {
        self.css_rules.insert_rule(text, index)
    }

    fn delete_rule(&mut self, index: usize) -> Result<(), CssomError> {
        self.css_rules.delete_rule(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<LiveRuleMut<'_>> {
        self.css_rules.get_mut(index)
    }
}
