//! Integration tests for the stylesheet parser.

use quickcheck_macros::quickcheck;
use wren_css::{CSSParser, Selector, parse_stylesheet};

#[test]
fn test_tag_rule() {
    let sheet = parse_stylesheet("p { color: red; }");
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.rules[0].selector, Selector::tag("p"));
    assert_eq!(sheet.rules[0].declarations["color"], "red");
}

#[test]
fn test_descendant_chain_nests_to_the_left() {
    let sheet = parse_stylesheet("div section p { font-size: 50%; }");
    let expected = Selector::descendant(
        Selector::descendant(Selector::tag("div"), Selector::tag("section")),
        Selector::tag("p"),
    );
    assert_eq!(sheet.rules[0].selector, expected);
    assert_eq!(sheet.rules[0].priority(), 3);
}

#[test]
fn test_names_are_casefolded_but_values_are_not() {
    let sheet = parse_stylesheet("DIV P { COLOR: Red; }");
    assert_eq!(sheet.rules[0].selector.to_string(), "div p");
    assert_eq!(sheet.rules[0].declarations["color"], "Red");
}

#[test]
fn test_rules_keep_source_order() {
    let sheet = parse_stylesheet("b { color: red; } i { color: blue; } b { color: green; }");
    let selectors: Vec<String> = sheet.rules.iter().map(|r| r.selector.to_string()).collect();
    assert_eq!(selectors, vec!["b", "i", "b"]);
}

#[test]
fn test_bad_declaration_is_skipped_rest_of_rule_kept() {
    let sheet = parse_stylesheet("p { color red; font-weight: bold; }");
    assert_eq!(sheet.len(), 1);
    assert!(!sheet.rules[0].declarations.contains_key("color"));
    assert_eq!(sheet.rules[0].declarations["font-weight"], "bold");
}

#[test]
fn test_bad_rule_resyncs_at_closing_brace() {
    let sheet = parse_stylesheet("p, div { color: red; } i { font-style: italic; }");
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.rules[0].selector, Selector::tag("i"));
}

#[test]
fn test_unclosed_rule_at_end() {
    let sheet = parse_stylesheet("i { font-style: italic; } b { font-weight: bold;");
    assert_eq!(sheet.len(), 1);
}

#[test]
fn test_comments_between_rules_and_declarations() {
    let sheet = parse_stylesheet(
        "/* header */ p /* sel */ { /* a */ color: red; /* b */ } /* trailer */",
    );
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.rules[0].declarations["color"], "red");
}

#[test]
fn test_empty_input() {
    assert!(parse_stylesheet("").is_empty());
    assert!(parse_stylesheet("   \n\t ").is_empty());
}

#[test]
fn test_inline_declarations() {
    let declarations = CSSParser::new("color: green; font-size: 20px").parse_declarations();
    assert_eq!(declarations["color"], "green");
    assert_eq!(declarations["font-size"], "20px");
}

#[test]
fn test_inline_declarations_survive_stray_brace() {
    let declarations = CSSParser::new("color: green; } font-weight: bold").parse_declarations();
    assert_eq!(declarations["color"], "green");
    assert_eq!(declarations["font-weight"], "bold");
}

#[quickcheck]
fn prop_parser_never_panics(text: String) -> bool {
    let _ = parse_stylesheet(&text);
    let _ = CSSParser::new(&text).parse_declarations();
    true
}

#[quickcheck]
fn prop_well_formed_rules_all_survive(tags: Vec<u8>) -> bool {
    let css: String = tags
        .iter()
        .map(|n| format!("t{n} {{ color: red; }}\n"))
        .collect();
    parse_stylesheet(&css).len() == tags.len()
}
