#![allow(dead_code)]

use proptest::prelude::*;
use stylesheet_ast::{Declaration, Group, Node, Rule, Tree};

// ── Strategies ────────────────────────────────────────────────────────────

fn declarations() -> impl Strategy<Value = Vec<Declaration>> {
    prop::collection::btree_map("[a-e]", "[a-z]{1,3}", 0..4)
        .prop_map(|m| m.into_iter().map(|(k, v)| Declaration::new(k, v)).collect())
}

fn rules(max: usize) -> impl Strategy<Value = Vec<Node>> {
    prop::collection::btree_map("[a-d]|\\.c[0-3]", declarations(), 0..max)
        .prop_map(|m| {
            m.into_iter()
                .map(|(selector, declarations)| {
                    let mut rule = Rule::new(selector);
                    rule.declarations = declarations;
                    Node::Rule(rule)
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn groups() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::btree_map("\\(max-width: [1-3]00px\\)|print", rules(4), 0..3).prop_map(|m| {
        m.into_iter()
            .map(|(condition, children)| {
                let mut group = Group::new("media", condition);
                group.children = children;
                Node::Group(group)
            })
            .collect()
    })
}

/// Trees with unique sibling keys: rules and media groups in any order.
pub fn tree() -> impl Strategy<Value = Tree> {
    (rules(6), groups())
        .prop_flat_map(|(rules, groups)| Just(rules.into_iter().chain(groups).collect::<Vec<_>>()).prop_shuffle())
        .prop_map(Tree::from)
}

// ── Comparison ────────────────────────────────────────────────────────────

fn normalize_nodes(nodes: &mut [Node]) {
    for node in nodes {
        match node {
            Node::Rule(rule) => rule
                .declarations
                .sort_by(|a, b| a.property.cmp(&b.property)),
            Node::Group(group) => normalize_nodes(&mut group.children),
            Node::Declaration(_) => {}
        }
    }
}

/// `tree` with every rule's declarations sorted by property name.
pub fn normalized(tree: &Tree) -> Tree {
    let mut out = tree.clone();
    normalize_nodes(&mut out.nodes);
    out
}
