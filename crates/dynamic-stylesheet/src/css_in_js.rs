//! Literal (CSS-in-JS) content ↔ tree conversion.
//!
//! Content is a JSON object whose keys, in insertion order, are selectors,
//! at-rule tokens (`@media <condition>`) or property names:
//!
//! ```
//! use dynamic_stylesheet::css_in_js::{objectify_tree, parse};
//! use serde_json::json;
//!
//! let content = json!({
//!     "div": { "background": "red", "zIndex": 10, "marginTop": 4 },
//!     "@media (max-width: 300px)": { "body": { "color": "blue" } }
//! });
//! let tree = parse(&content).unwrap();
//! let div = tree.nodes[0].as_rule().unwrap();
//! assert_eq!(div.declaration("z-index"), Some("10"));
//! assert_eq!(div.declaration("margin-top"), Some("4px"));
//! assert_eq!(objectify_tree(&tree)["div"]["zIndex"], json!(10));
//! ```

use serde_json::{Map, Number, Value};
use stylesheet_ast::{Declaration, Group, Node, QueryToken, Rule, StyleError, Target, Tree};

/// Properties whose bare numbers are not given a `px` unit.
const UNITLESS: &[&str] = &[
    "box-flex",
    "box-flex-group",
    "column-count",
    "fill-opacity",
    "flex",
    "flex-grow",
    "flex-negative",
    "flex-positive",
    "flex-shrink",
    "font-weight",
    "line-clamp",
    "line-height",
    "opacity",
    "order",
    "orphans",
    "stroke-dashoffset",
    "stroke-opacity",
    "stroke-width",
    "tab-size",
    "widows",
    "z-index",
    "zoom",
];

fn is_unitless(property: &str) -> bool {
    UNITLESS.contains(&property)
}

// ── Names ─────────────────────────────────────────────────────────────────

/// `zIndex` → `z-index`, `msFlex` → `-ms-flex`. Custom properties are kept.
pub fn dashify(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    if out == "css-float" {
        return "float".to_string();
    }
    out
}

/// `z-index` → `zIndex`, `-ms-flex` → `msFlex`, `-webkit-x` → `WebkitX`.
pub fn camelize(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let name = match name.strip_prefix("-ms-") {
        Some(rest) => format!("ms-{rest}"),
        None => name.to_string(),
    };
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Splits an `@name condition` key on its first whitespace.
pub(crate) fn split_at_rule(key: &str) -> (String, String) {
    let body = key.trim_start_matches('@');
    match body.split_once(char::is_whitespace) {
        Some((name, condition)) => (name.to_string(), condition.trim().to_string()),
        None => (body.trim().to_string(), String::new()),
    }
}

// ── Parse ─────────────────────────────────────────────────────────────────

fn as_object(content: &Value) -> Result<&Map<String, Value>, StyleError> {
    content
        .as_object()
        .ok_or_else(|| StyleError::InvalidContent(format!("expected an object, got {content}")))
}

/// Items of a value that may be given as a list of alternatives.
fn items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(arr) => arr.iter().collect(),
        other => vec![other],
    }
}

fn declaration_value(property: &str, value: &Value) -> Result<Option<String>, StyleError> {
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        // A live declaration drops a property set to "".
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => {
            let zero = n.as_f64() == Some(0.0);
            if zero || is_unitless(property) {
                Ok(Some(n.to_string()))
            } else {
                Ok(Some(format!("{n}px")))
            }
        }
        other => Err(StyleError::InvalidContent(format!(
            "`{property}` cannot take {other}"
        ))),
    }
}

fn push_declaration(out: &mut Vec<Node>, decl: Declaration) {
    let existing = out.iter_mut().find_map(|n| match n {
        Node::Declaration(d) if d.property == decl.property => Some(d),
        _ => None,
    });
    match existing {
        Some(d) => d.value = decl.value,
        None => out.push(Node::Declaration(decl)),
    }
}

fn parse_entries(map: &Map<String, Value>, out: &mut Vec<Node>) -> Result<(), StyleError> {
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        if key.starts_with('@') {
            let (name, condition) = split_at_rule(key);
            for item in items(value) {
                let Value::Object(body) = item else {
                    return Err(StyleError::UnsupportedConstruct(format!(
                        "at-rule `{key}` without a block"
                    )));
                };
                let mut group = Group::new(name.clone(), condition.clone());
                parse_entries(body, &mut group.children)?;
                out.push(Node::Group(group));
            }
        } else if let Value::Object(body) = value {
            let mut rule = Rule::new(key.clone());
            rule.declarations = declarations_from(body)?;
            out.push(Node::Rule(rule));
        } else {
            let property = dashify(key);
            for item in items(value) {
                if let Some(v) = declaration_value(&property, item)? {
                    push_declaration(out, Declaration::new(property.clone(), v));
                }
            }
        }
    }
    Ok(())
}

fn declarations_from(map: &Map<String, Value>) -> Result<Vec<Declaration>, StyleError> {
    let mut rule = Rule::new("");
    for (key, value) in map {
        if value.is_object() || key.starts_with('@') {
            return Err(StyleError::UnsupportedConstruct(format!(
                "`{key}` nested inside a rule"
            )));
        }
        let property = dashify(key);
        for item in items(value) {
            if let Some(v) = declaration_value(&property, item)? {
                rule.set_declaration(property.clone(), v);
            }
        }
    }
    Ok(rule.declarations)
}

/// Parses literal content into a tree.
pub fn parse(content: &Value) -> Result<Tree, StyleError> {
    let mut nodes = Vec::new();
    parse_entries(as_object(content)?, &mut nodes)?;
    Ok(Tree::from(nodes))
}

/// Parses content addressed at a rule: property names to values only.
pub fn parse_declarations(content: &Value) -> Result<Vec<Declaration>, StyleError> {
    declarations_from(as_object(content)?)
}

/// Wraps `value` under one nested key per token, outermost first.
///
/// ```
/// use dynamic_stylesheet::css_in_js::nest;
/// use serde_json::json;
/// use stylesheet_ast::Query;
///
/// let q = Query::root().media("print").selector("a");
/// assert_eq!(
///     nest(q.tokens(), json!({"color": "red"})),
///     json!({"@media print": {"a": {"color": "red"}}}),
/// );
/// ```
pub fn nest(tokens: &[QueryToken], value: Value) -> Value {
    tokens.iter().rev().fold(value, |inner, token| {
        let mut map = Map::new();
        map.insert(token.to_string(), inner);
        Value::Object(map)
    })
}

// ── Objectify ─────────────────────────────────────────────────────────────

fn objectify_value(property: &str, value: &str) -> Value {
    if is_unitless(property) {
        if let Ok(i) = value.parse::<i64>() {
            return Value::from(i);
        }
        if let Some(n) = value.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(value.to_string())
}

fn insert_merged(map: &mut Map<String, Value>, key: String, value: Value) {
    match value {
        Value::Object(extra) => match map.get_mut(&key) {
            Some(Value::Object(existing)) => existing.extend(extra),
            _ => {
                map.insert(key, Value::Object(extra));
            }
        },
        other => {
            map.insert(key, other);
        }
    }
}

fn objectify_declarations(decls: &[Declaration]) -> Map<String, Value> {
    decls
        .iter()
        .map(|d| (camelize(&d.property), objectify_value(&d.property, &d.value)))
        .collect()
}

fn objectify_nodes(nodes: &[Node]) -> Map<String, Value> {
    let mut map = Map::new();
    for node in nodes {
        match node {
            Node::Rule(rule) => insert_merged(
                &mut map,
                rule.selector.clone(),
                Value::Object(objectify_declarations(&rule.declarations)),
            ),
            Node::Group(group) => insert_merged(
                &mut map,
                node.key().to_string(),
                Value::Object(objectify_nodes(&group.children)),
            ),
            Node::Declaration(d) => {
                map.insert(camelize(&d.property), objectify_value(&d.property, &d.value));
            }
        }
    }
    map
}

/// Inverse of [`parse`] for one node: the node's body.
pub fn objectify(node: &Node) -> Value {
    match node {
        Node::Rule(rule) => Value::Object(objectify_declarations(&rule.declarations)),
        Node::Group(group) => Value::Object(objectify_nodes(&group.children)),
        Node::Declaration(d) => objectify_value(&d.property, &d.value),
    }
}

pub fn objectify_tree(tree: &Tree) -> Value {
    Value::Object(objectify_nodes(&tree.nodes))
}

pub fn objectify_target(target: Target<'_>) -> Value {
    match target {
        Target::Root(tree) => objectify_tree(tree),
        Target::Node(node) => objectify(node),
    }
}
