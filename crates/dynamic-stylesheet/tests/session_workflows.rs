mod common;

use common::normalized;
use dynamic_stylesheet::codec::json::from_json_diff;
use dynamic_stylesheet::cssom::{
    apply_diff, CssRule, CssomError, LiveRuleMut, RuleList, StyleDeclaration, StyleSheet,
};
use dynamic_stylesheet::session::{DynamicStylesheet, SessionOptions};
use dynamic_stylesheet::Error;
use serde_json::json;
use stylesheet_ast::{Query, StyleError};

fn assert_in_sync<S: RuleList>(session: &DynamicStylesheet<S>, sheet: &StyleSheet) {
    assert_eq!(normalized(&sheet.to_tree()), normalized(session.tree()));
}

fn session() -> DynamicStylesheet {
    let options = SessionOptions::new("theme").with_initial_state(json!({
        "div": {"background": "red", "zIndex": 10},
        "@media (max-width: 300px)": {"body": {"background": "red"}}
    }));
    DynamicStylesheet::new(options).unwrap()
}

// ── Session ───────────────────────────────────────────────────────────────

#[test]
fn mutations_keep_sheet_in_sync() {
    let mut s = session();
    let body = Query::root().media("(max-width: 300px)").selector("body");

    s.set(&Query::root().selector(".card"), &json!({"padding": 4})).unwrap();
    assert_in_sync(&s, s.sheet());

    s.add(&body, &json!({"color": "white"})).unwrap();
    assert_in_sync(&s, s.sheet());

    s.set(&body, &json!({"color": "black"})).unwrap();
    assert_in_sync(&s, s.sheet());
    assert_eq!(s.get(&body).unwrap(), json!({"color": "black"}));

    s.set_force(&Query::root().media("(max-width: 300px)"), &json!({"p": {"margin": 0}}))
        .unwrap();
    assert_in_sync(&s, s.sheet());

    s.delete(&Query::root().selector("div")).unwrap();
    assert_in_sync(&s, s.sheet());

    assert_eq!(
        s.to_json(),
        json!({
            ".card": {"padding": "4px"},
            "@media (max-width: 300px)": {"p": {"margin": "0"}}
        })
    );
}

#[test]
fn created_rules_stay_ahead_of_media_groups() {
    let mut s = session();
    s.set(&Query::root().selector("a"), &json!({"color": "blue"})).unwrap();
    let selectors: Vec<String> = s
        .sheet()
        .css_rules
        .iter()
        .map(|r| match r {
            CssRule::Style(rule) => rule.selector_text.clone(),
            CssRule::Group(group) => format!("@{} {}", group.name, group.condition_text),
        })
        .collect();
    assert_eq!(selectors, vec!["div", "a", "@media (max-width: 300px)"]);
}

#[test]
fn errors_surface_without_touching_the_sheet() {
    let mut s = session();
    let before = s.sheet().css_text();

    let err = s
        .set(&Query::root().selector("div").selector("span"), &json!({"color": "red"}))
        .unwrap_err();
    assert!(matches!(err, Error::Style(StyleError::InvalidNodeType { .. })));

    let err = s.delete(&Query::root()).unwrap_err();
    assert_eq!(err, Error::Style(StyleError::EmptyQuery));

    assert_eq!(s.sheet().css_text(), before);
}

// ── Adopted collections ───────────────────────────────────────────────────

/// Records every structural call before forwarding it.
#[derive(Default)]
struct Recording {
    inner: StyleSheet,
    calls: Vec<String>,
}

impl RuleList for Recording {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn insert_rule(&mut self, text: &str, index: usize) -> Result<usize, CssomError> {
        self.calls.push(format!("insert {index}"));
        self.inner.insert_rule(text, index)
    }

    fn delete_rule(&mut self, index: usize) -> Result<(), CssomError> {
        self.calls.push(format!("delete {index}"));
        self.inner.delete_rule(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<LiveRuleMut<'_>> {
        self.inner.get_mut(index)
    }
}

#[test]
fn adopted_collection_receives_positional_calls() {
    let options = SessionOptions::new("x").with_initial_state(json!({
        "a": {"color": "red"}, "b": {"color": "red"}, "c": {"color": "red"}
    }));
    let mut s = DynamicStylesheet::with_sheet(options, Recording::default()).unwrap();
    s.set(&Query::root(), &json!({"a": {"color": "red"}, "x": {"color": "red"}}))
        .unwrap();
    assert_eq!(
        s.sheet().calls,
        vec!["insert 0", "insert 1", "insert 2", "delete 1", "delete 1", "insert 1"]
    );
    let (tree, sheet) = s.into_parts();
    assert_eq!(sheet.inner.to_tree(), tree);
}

// ── Wire-form replay ──────────────────────────────────────────────────────

fn base_sheet() -> StyleSheet {
    StyleSheet::from_css(
        "id",
        "div {background: red; color: red;} @media (max-width: 300px) {}",
    )
    .unwrap()
}

fn style_of(sheet: &mut StyleSheet, index: usize) -> &mut dyn StyleDeclaration {
    match sheet.get_mut(index) {
        Some(LiveRuleMut::Style(style)) => style,
        _ => panic!("rule {index} is not a style rule"),
    }
}

#[test]
fn raw_insert_into_empty_sheet() {
    let mut sheet = StyleSheet::new("id");
    let diff = from_json_diff(&json!([{"type": "raw", "path": [0], "value": "div{background: red}"}]))
        .unwrap();
    apply_diff(&mut sheet, &diff).unwrap();
    assert_eq!(style_of(&mut sheet, 0).get_property_value("background").as_deref(), Some("red"));
}

#[test]
fn node_edits_delete_and_replace() {
    let mut sheet = base_sheet();
    let delete = from_json_diff(&json!([{"type": "node", "path": [0], "value": null}])).unwrap();
    apply_diff(&mut sheet, &delete).unwrap();
    assert_eq!(sheet.len(), 1);
    assert!(matches!(sheet.css_rules.get(0), Some(CssRule::Group(_))));

    let mut sheet = base_sheet();
    let replace = from_json_diff(&json!([
        {"type": "node", "path": [0], "value": "body {background: red;}"}
    ]))
    .unwrap();
    apply_diff(&mut sheet, &replace).unwrap();
    assert_eq!(sheet.len(), 2);
    assert!(matches!(
        sheet.css_rules.get(0),
        Some(CssRule::Style(rule)) if rule.selector_text == "body"
    ));
}

#[test]
fn properties_edit_sets_and_clears() {
    let mut sheet = base_sheet();
    let diff = from_json_diff(&json!([{
        "type": "properties",
        "path": [0],
        "value": {"background": null, "color": "blue", "margin": "10px"}
    }]))
    .unwrap();
    apply_diff(&mut sheet, &diff).unwrap();
    let style = style_of(&mut sheet, 0);
    assert_eq!(style.get_property_value("background"), None);
    assert_eq!(style.get_property_value("color").as_deref(), Some("blue"));
    assert_eq!(style.get_property_value("margin").as_deref(), Some("10px"));
}
