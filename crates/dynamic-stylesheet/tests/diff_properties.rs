mod common;

use common::{normalized, tree};
use dynamic_stylesheet::css_in_js::objectify_tree;
use dynamic_stylesheet::css_text::serialize_tree;
use dynamic_stylesheet::cssom::{apply_diff, StyleSheet};
use dynamic_stylesheet::session::{DynamicStylesheet, SessionOptions};
use dynamic_stylesheet::stylesheet_diff::diff_trees;
use proptest::prelude::*;
use stylesheet_ast::Query;

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn diff_of_identical_trees_is_empty(t in tree()) {
        prop_assert!(diff_trees(Some(&t), &t).is_empty());
    }

    #[test]
    fn replaying_diff_reaches_target(t1 in tree(), t2 in tree()) {
        let mut sheet = StyleSheet::from_css("t", &serialize_tree(&t1))
            .unwrap_or_else(|e| panic!("seed failed: {e}"));
        prop_assert_eq!(sheet.to_tree(), t1.clone());

        let diff = diff_trees(Some(&t1), &t2);
        apply_diff(&mut sheet, &diff).unwrap_or_else(|e| panic!("replay failed: {e}"));
        prop_assert_eq!(normalized(&sheet.to_tree()), normalized(&t2));
    }

    #[test]
    fn root_set_keeps_tree_and_sheet_in_sync(t1 in tree(), t2 in tree()) {
        let options = SessionOptions::new("t").with_initial_state(objectify_tree(&t1));
        let mut session = DynamicStylesheet::new(options)
            .unwrap_or_else(|e| panic!("seed failed: {e}"));
        session
            .set(&Query::root(), &objectify_tree(&t2))
            .unwrap_or_else(|e| panic!("set failed: {e}"));
        prop_assert_eq!(normalized(&session.sheet().to_tree()), normalized(session.tree()));
        prop_assert_eq!(normalized(session.tree()), normalized(&t2));
    }
}
