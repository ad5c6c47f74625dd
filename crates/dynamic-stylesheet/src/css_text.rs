//! CSS text for tree nodes.
//!
//! [`serialize_node`] renders the text carried by diff edits; [`parse_css`]
//! reads that text back. The reader accepts rules, conditional groups,
//! comments, and quoted strings or parentheses inside values. It is not a
//! general CSS parser.

use stylesheet_ast::{Declaration, Group, Node, Rule, StyleError, Tree};

use crate::css_in_js::split_at_rule;

const INDENT: &str = "    ";

// ── Serialize ─────────────────────────────────────────────────────────────

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let pad = INDENT.repeat(depth);
    match node {
        Node::Declaration(d) => {
            out.push_str(&pad);
            write_declaration(out, d);
        }
        Node::Rule(rule) => {
            out.push_str(&pad);
            out.push_str(&rule.selector);
            if rule.declarations.is_empty() {
                out.push_str(" {}");
                return;
            }
            out.push_str(" {\n");
            for d in &rule.declarations {
                out.push_str(&pad);
                out.push_str(INDENT);
                write_declaration(out, d);
                out.push('\n');
            }
            out.push_str(&pad);
            out.push('}');
        }
        Node::Group(group) => {
            out.push_str(&pad);
            out.push('@');
            out.push_str(&group.name);
            if !group.condition.is_empty() {
                out.push(' ');
                out.push_str(&group.condition);
            }
            if group.children.is_empty() {
                out.push_str(" {}");
                return;
            }
            out.push_str(" {\n");
            for child in &group.children {
                write_node(out, child, depth + 1);
                out.push('\n');
            }
            out.push_str(&pad);
            out.push('}');
        }
    }
}

fn write_declaration(out: &mut String, d: &Declaration) {
    out.push_str(&d.property);
    out.push_str(": ");
    out.push_str(&d.value);
    out.push(';');
}

/// Text of one node.
///
/// ```
/// use dynamic_stylesheet::css_text::serialize_node;
/// use stylesheet_ast::{Group, Rule};
///
/// let node = Group::new("media", "print")
///     .with_child(Rule::new("a").with("color", "red"))
///     .into();
/// assert_eq!(serialize_node(&node), "@media print {\n    a {\n        color: red;\n    }\n}");
/// ```
pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

/// Text of a node sequence, one top-level node per line group.
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_node(&mut out, node, 0);
    }
    out
}

pub fn serialize_tree(tree: &Tree) -> String {
    serialize_nodes(&tree.nodes)
}

// ── Parse ─────────────────────────────────────────────────────────────────

fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;
    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                out.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == q {
                    quote = None;
                }
            }
            None if ch == '/' && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            None => {
                if ch == '"' || ch == '\'' {
                    quote = Some(ch);
                }
                out.push(ch);
            }
        }
    }
    out
}

fn syntax(msg: impl Into<String>) -> StyleError {
    StyleError::InvalidContent(msg.into())
}

struct Reader {
    chars: Vec<char>,
    pos: usize,
}

impl Reader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Reads up to the first of `stops` outside quotes and parentheses and
    /// consumes it. Returns the text read and the stop found, if any.
    fn read_until(&mut self, stops: &[char]) -> (String, Option<char>) {
        let mut buf = String::new();
        let mut quote: Option<char> = None;
        let mut depth = 0usize;
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if let Some(q) = quote {
                buf.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = self.peek() {
                        buf.push(escaped);
                        self.pos += 1;
                    }
                } else if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if depth == 0 && stops.contains(&c) => return (buf, Some(c)),
                _ => {}
            }
            buf.push(ch);
        }
        (buf, None)
    }

    fn read_nodes(&mut self, nested: bool) -> Result<Vec<Node>, StyleError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None if nested => return Err(syntax("unclosed block")),
                None => return Ok(nodes),
                Some('}') if nested => {
                    self.pos += 1;
                    return Ok(nodes);
                }
                Some('}') => return Err(syntax("unexpected `}`")),
                Some(_) => {}
            }
            let (prelude, stop) = self.read_until(&['{', ';', '}']);
            let prelude = prelude.trim();
            match stop {
                Some('{') if prelude.starts_with('@') => {
                    let (name, condition) = split_at_rule(prelude);
                    let mut group = Group::new(name, condition);
                    group.children = self.read_nodes(true)?;
                    nodes.push(Node::Group(group));
                }
                Some('{') => {
                    let (body, end) = self.read_until(&['}']);
                    if end.is_none() {
                        return Err(syntax(format!("unclosed rule `{prelude}`")));
                    }
                    let mut rule = Rule::new(prelude);
                    rule.declarations = parse_declaration_list(&body)?;
                    nodes.push(Node::Rule(rule));
                }
                _ => {
                    if stop == Some('}') {
                        self.pos -= 1;
                    }
                    if prelude.is_empty() {
                        continue;
                    }
                    if prelude.starts_with('@') {
                        return Err(StyleError::UnsupportedConstruct(format!(
                            "statement at-rule `{prelude}`"
                        )));
                    }
                    nodes.push(Node::Declaration(parse_declaration(prelude)?));
                }
            }
        }
    }
}

fn parse_declaration(text: &str) -> Result<Declaration, StyleError> {
    let (property, value) = text
        .split_once(':')
        .ok_or_else(|| syntax(format!("expected `property: value`, got `{text}`")))?;
    let property = property.trim();
    if property.is_empty() {
        return Err(syntax(format!("missing property name in `{text}`")));
    }
    Ok(Declaration::new(property, value.trim()))
}

/// Parses the inside of a rule block: `color: red; margin: 0`.
pub fn parse_declaration_list(text: &str) -> Result<Vec<Declaration>, StyleError> {
    let mut reader = Reader {
        chars: text.chars().collect(),
        pos: 0,
    };
    let mut rule = Rule::new("");
    loop {
        let (item, stop) = reader.read_until(&[';']);
        let item = item.trim();
        if !item.is_empty() {
            let d = parse_declaration(item)?;
            rule.set_declaration(d.property, d.value);
        }
        if stop.is_none() {
            break;
        }
    }
    Ok(rule.declarations)
}

/// Reads stylesheet text into a tree.
///
/// ```
/// use dynamic_stylesheet::css_text::parse_css;
///
/// let tree = parse_css("div { background: red } @media (max-width: 300px) { body { color: blue; } }").unwrap();
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.nodes[0].as_rule().unwrap().declaration("background"), Some("red"));
/// ```
pub fn parse_css(input: &str) -> Result<Tree, StyleError> {
    let mut reader = Reader {
        chars: strip_comments(input).chars().collect(),
        pos: 0,
    };
    Ok(Tree::from(reader.read_nodes(false)?))
}
