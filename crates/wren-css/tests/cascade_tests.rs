//! Integration tests for the cascade: matching, ordering, inheritance and
//! font-size resolution.

use wren_css::{apply_styles, parse_stylesheet, ua_stylesheet};
use wren_dom::{AttributesMap, DomTree, NodeId};
use wren_html::parse;

/// Parse `html` and style it with the UA sheet followed by `css`.
fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = parse(html);
    let mut rules = ua_stylesheet().rules.clone();
    rules.extend(parse_stylesheet(css).rules);
    apply_styles(&mut tree, &rules);
    tree
}

/// Elements with tag `tag`, in document order.
fn all(tree: &DomTree, tag: &str) -> Vec<NodeId> {
    tree.descendants(NodeId::ROOT)
        .filter(|&id| tree.tag_name(id) == Some(tag))
        .collect()
}

fn first(tree: &DomTree, tag: &str) -> NodeId {
    all(tree, tag)[0]
}

fn prop<'a>(tree: &'a DomTree, id: NodeId, property: &str) -> Option<&'a str> {
    tree.style(id)
        .and_then(|s| s.get(property))
        .map(String::as_str)
}

#[test]
fn test_root_gets_initial_values() {
    let tree = styled("<p>x</p>", "");
    assert_eq!(prop(&tree, NodeId::ROOT, "font-size"), Some("16px"));
    assert_eq!(prop(&tree, NodeId::ROOT, "font-style"), Some("normal"));
    assert_eq!(prop(&tree, NodeId::ROOT, "font-weight"), Some("normal"));
    assert_eq!(prop(&tree, NodeId::ROOT, "color"), Some("black"));
}

#[test]
fn test_every_attached_node_is_styled() {
    let tree = styled("<div><p>a <b>b</b></p></div>", "");
    assert!(tree.descendants(NodeId::ROOT).all(|id| tree.style(id).is_some()));
}

#[test]
fn test_descendant_selector_beats_tag_selector() {
    let tree = styled(
        "<div><p>inside</p></div><p>outside</p>",
        "div p { color: blue; } p { color: red; }",
    );
    let paragraphs = all(&tree, "p");
    assert_eq!(prop(&tree, paragraphs[0], "color"), Some("blue"));
    assert_eq!(prop(&tree, paragraphs[1], "color"), Some("red"));
}

#[test]
fn test_equal_specificity_later_rule_wins() {
    let tree = styled("<p>x</p>", "p { color: red; } p { color: green; }");
    assert_eq!(prop(&tree, first(&tree, "p"), "color"), Some("green"));
}

#[test]
fn test_author_rule_overrides_ua_rule() {
    let tree = styled("<h1>x</h1>", "h1 { font-size: 10px; }");
    let h1 = first(&tree, "h1");
    assert_eq!(prop(&tree, h1, "font-size"), Some("10px"));
    assert_eq!(prop(&tree, h1, "font-weight"), Some("bold"));
}

#[test]
fn test_text_inherits_from_parent() {
    let tree = styled("<p>words</p>", "p { color: red; font-style: italic; }");
    let p = first(&tree, "p");
    let text = tree.children(p)[0];
    assert_eq!(tree.as_text(text), Some("words"));
    assert_eq!(prop(&tree, text, "color"), Some("red"));
    assert_eq!(prop(&tree, text, "font-style"), Some("italic"));
}

#[test]
fn test_non_inherited_property_stays_put() {
    let tree = styled("<div><p>x</p></div>", "div { background-color: yellow; }");
    assert_eq!(prop(&tree, first(&tree, "div"), "background-color"), Some("yellow"));
    assert_eq!(prop(&tree, first(&tree, "p"), "background-color"), None);
}

#[test]
fn test_nested_percentages_resolve_level_by_level() {
    let tree = styled(
        "<div><div><div>deep</div></div></div>",
        "div { font-size: 50%; }",
    );
    let sizes: Vec<_> = all(&tree, "div")
        .into_iter()
        .map(|id| prop(&tree, id, "font-size"))
        .collect();
    assert_eq!(sizes, vec![Some("8px"), Some("4px"), Some("2px")]);

    let innermost = all(&tree, "div")[2];
    let text = tree.children(innermost)[0];
    assert_eq!(prop(&tree, text, "font-size"), Some("2px"));
}

#[test]
fn test_em_resolves_against_parent() {
    let tree = styled("<p>x</p>", "p { font-size: 1.5em; }");
    assert_eq!(prop(&tree, first(&tree, "p"), "font-size"), Some("24px"));
}

#[test]
fn test_ua_heading_sizes() {
    let tree = styled("<h1>a</h1><h2>b</h2><h3>c</h3>", "");
    assert_eq!(prop(&tree, first(&tree, "h1"), "font-size"), Some("32px"));
    assert_eq!(prop(&tree, first(&tree, "h2"), "font-size"), Some("24px"));
    assert_eq!(prop(&tree, first(&tree, "h3"), "font-weight"), Some("bold"));
}

#[test]
fn test_ua_phrasing_styles() {
    let tree = styled(r#"<p><a href="/">a</a> <i>i</i> <strong>s</strong></p>"#, "");
    assert_eq!(prop(&tree, first(&tree, "a"), "color"), Some("blue"));
    assert_eq!(prop(&tree, first(&tree, "i"), "font-style"), Some("italic"));
    assert_eq!(prop(&tree, first(&tree, "strong"), "font-weight"), Some("bold"));
}

#[test]
fn test_unsupported_font_size_keeps_inherited() {
    let tree = styled("<p>x</p>", "p { font-size: large; }");
    assert_eq!(prop(&tree, first(&tree, "p"), "font-size"), Some("16px"));
}

#[test]
fn test_style_attribute_beats_rules() {
    let tree = styled(
        r#"<div><p style="color: green; font-size: 50%">x</p></div>"#,
        "div p { color: blue; }",
    );
    let p = first(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("green"));
    assert_eq!(prop(&tree, p, "font-size"), Some("8px"));
}

#[test]
fn test_restyling_replaces_previous_styles() {
    let mut tree = styled("<p>x</p>", "p { color: red; }");
    apply_styles(&mut tree, &parse_stylesheet("p { font-weight: bold; }").rules);
    let p = first(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("black"));
    assert_eq!(prop(&tree, p, "font-weight"), Some("bold"));
}

#[test]
fn test_restyling_unstyles_detached_nodes() {
    let mut tree = styled("<p>x</p>", "p { color: red; }");
    let p = first(&tree, "p");
    assert_eq!(prop(&tree, p, "color"), Some("red"));

    let holder = tree.alloc_element("div", AttributesMap::new());
    tree.append_child(holder, p);
    apply_styles(&mut tree, &ua_stylesheet().rules);

    assert!(tree.style(p).is_none());
    assert!(tree.style(holder).is_none());
    assert_eq!(prop(&tree, NodeId::ROOT, "color"), Some("black"));
}
