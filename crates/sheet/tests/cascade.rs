//! Integration tests for the cascade: matching, merging and at-rule gating.

mod support;

use sheet::{
    Declaration, Environment, RenderFlags, Style, StyleSheet, is_inherited_property,
};
use support::{Node, el};

fn resolve(sheets: &[&StyleSheet], node: &Node) -> Style {
    let mut resolved = Style::universal();
    for sheet in sheets {
        for style in sheet.matching(node) {
            resolved.cascade(style);
        }
    }
    resolved
}

fn target() -> Node {
    let doc = el(
        "div",
        &[("id", "wrap")],
        vec![el("p", &[("id", "a"), ("class", "a")], vec![])],
    );
    doc.find("a").unwrap()
}

// ============================================================================
// SPECIFICITY
// ============================================================================

#[test]
fn test_id_beats_class_in_either_order() {
    let node = target();
    for css in ["#a{color:red} .a{color:blue}", ".a{color:blue} #a{color:red}"] {
        let sheet = StyleSheet::parse(css).unwrap();
        assert_eq!(resolve(&[&sheet], &node).value("color"), Some("red"), "{css}");
    }
}

#[test]
fn test_matching_keeps_registration_order() {
    let node = target();
    let sheet = StyleSheet::parse("#a { x: 1 } p { x: 2 } .a { x: 3 } span { x: 4 }").unwrap();
    let selectors: Vec<String> = sheet
        .matching(&node)
        .iter()
        .map(|s| s.selector.to_string())
        .collect();
    assert_eq!(selectors, vec!["#a", "p", ".a"]);
}

#[test]
fn test_equal_specificity_last_applied_wins() {
    let node = target();
    let first = StyleSheet::parse("p { color: red }").unwrap();
    let second = StyleSheet::parse("div p { color: green } p { color: blue }").unwrap();
    assert_eq!(resolve(&[&first, &second], &node).value("color"), Some("green"));

    let second = StyleSheet::parse("p { color: blue }").unwrap();
    assert_eq!(resolve(&[&first, &second], &node).value("color"), Some("blue"));
    assert_eq!(resolve(&[&second, &first], &node).value("color"), Some("red"));
}

// ============================================================================
// !IMPORTANT
// ============================================================================

#[test]
fn test_important_beats_higher_specificity() {
    let node = target();
    let pairs = [
        ("p { color: red !important } #wrap #a.a { color: blue }", "red"),
        ("#wrap #a.a { color: blue } p { color: red !important }", "red"),
        ("#a { color: blue !important } p { color: red !important }", "blue"),
    ];
    for (css, expected) in pairs {
        let sheet = StyleSheet::parse(css).unwrap();
        assert_eq!(resolve(&[&sheet], &node).value("color"), Some(expected), "{css}");
    }
}

#[test]
fn test_inline_beats_rules_but_not_important() {
    let node = target();
    let sheet = StyleSheet::parse("#a { color: red; margin: 1px !important }").unwrap();
    let mut resolved = resolve(&[&sheet], &node);

    let mut inline = Style::from_declarations("color: green; margin: 0").unwrap();
    inline.set_inline(true);
    resolved.cascade(&inline);

    assert_eq!(resolved.value("color"), Some("green"));
    assert_eq!(resolved.value("margin"), Some("1px"));
}

#[test]
fn test_styles_dedupe_on_the_whole_chain() {
    let sheet =
        StyleSheet::parse("p { color: red } div p { margin: 0 } p { padding: 0 } div p { margin: 1px }")
            .unwrap();
    let styles: Vec<_> = sheet.styles().collect();
    assert_eq!(styles.len(), 2);
    assert_eq!(styles[0].selector.to_string(), "p");
    assert_eq!(styles[0].value("padding"), Some("0"));
    assert_eq!(styles[1].selector.to_string(), "div p");
    assert_eq!(styles[1].value("margin"), Some("1px"));

    let doc = el(
        "body",
        &[],
        vec![
            el("section", &[], vec![el("p", &[("id", "lone")], vec![])]),
            el("div", &[], vec![el("p", &[("id", "nested")], vec![])]),
        ],
    );
    let lone = resolve(&[&sheet], &doc.find("lone").unwrap());
    assert_eq!(lone.value("color"), Some("red"));
    assert!(!lone.has_declaration("margin"));
    let nested = resolve(&[&sheet], &doc.find("nested").unwrap());
    assert_eq!(nested.value("margin"), Some("1px"));
}

// ============================================================================
// INHERITANCE
// ============================================================================

#[test]
fn test_direct_rules_beat_inherited_values() {
    let parent = Style::parse("#wrap", "color: red; font-size: 20px; border: 1px").unwrap();
    let mut child = Style::universal();
    child.cascade(&parent.inherited_copy());
    child.cascade(&Style::parse("p", "color: blue").unwrap());

    assert_eq!(child.value("color"), Some("blue"));
    assert_eq!(child.value("font-size"), Some("20px"));
    assert!(!child.has_declaration("border"));
    assert_eq!(child.render(RenderFlags::INLINE), "color:blue;");
    assert_eq!(
        child.render(RenderFlags::INLINE | RenderFlags::INHERITED),
        "color:blue;font-size:20px;"
    );
}

#[test]
fn test_inherited_copy_only_contains_allow_listed_names() {
    let style = Style::parse(
        "p",
        "margin: 0; color: red; display: block; line-height: 2; width: 3px; --gap: 4px",
    )
    .unwrap();
    let copy = style.inherited_copy();
    assert_eq!(copy.len(), 3);
    for d in copy.declarations() {
        assert!(is_inherited_property(&d.name), "{} leaked", d.name);
        assert!(d.inherited);
    }
}

#[test]
fn test_declaration_merge_gate() {
    let mut low = Declaration::new("color", "red").important();
    low.merge(&Declaration::new("color", "blue"));
    assert_eq!(low.value, "red");

    let mut normal = Declaration::new("color", "red");
    normal.merge(&Declaration::new("color", "blue").important());
    assert_eq!(normal.value, "blue");
    assert!(normal.important);
}

// ============================================================================
// AT-RULES
// ============================================================================

#[test]
fn test_hidden_at_rules_do_not_match_but_render() {
    let node = target();
    let mut sheet = StyleSheet::parse(
        "p { color: red } @media (max-width: 600px) { p { color: blue } }",
    )
    .unwrap();
    assert_eq!(sheet.matching(&node).len(), 1);
    assert!(sheet.render(RenderFlags::all_blocks()).unwrap().contains("color:blue"));

    sheet.evaluate(&Environment::new(480.0, 800.0));
    assert_eq!(sheet.matching(&node).len(), 2);
    assert_eq!(resolve(&[&sheet], &node).value("color"), Some("blue"));
}

#[test]
fn test_at_rule_matching_is_gated_on_its_own_visibility() {
    let node = target();
    let sheet = StyleSheet::parse("@media print { p { color: black } .b { color: red } }").unwrap();
    let mut rule = sheet.at_rules().next().unwrap().clone();
    assert!(rule.matching(&node).is_empty());
    assert_eq!(rule.rules().matching(&node).len(), 1);

    rule.evaluate(&Environment::default().with_device("print"));
    let found = rule.matching(&node);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value("color"), Some("black"));
}

#[test]
fn test_nested_at_rules_need_every_level_visible() {
    let node = target();
    let mut sheet = StyleSheet::parse(
        "@media screen { @media (orientation: portrait) { p { color: blue } } }",
    )
    .unwrap();
    assert!(sheet.matching(&node).is_empty());

    sheet.evaluate(&Environment::new(400.0, 800.0));
    assert_eq!(sheet.matching(&node).len(), 1);

    sheet.evaluate(&Environment::new(400.0, 800.0).with_device("print"));
    assert!(sheet.matching(&node).is_empty());
}

#[test]
fn test_supports_and_document() {
    let node = target();
    let sheet = StyleSheet::parse(
        "@supports (display: grid) { p { a: 1 } } @document url(x) { p { b: 2 } } \
         @font-face { font-family: X }",
    )
    .unwrap();
    let resolved = resolve(&[&sheet], &node);
    assert_eq!(resolved.value("a"), Some("1"));
    assert!(!resolved.has_declaration("b"));
    assert_eq!(resolved.len(), 1);
}
