//! Tests for tree construction, traversal and style storage.

use wren_dom::{AttributesMap, DomTree, NodeId, StyleMap};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc_element(tag, AttributesMap::new())
}

/// Builds `html > body > (p > "a", div > "b")`.
fn small_tree() -> (DomTree, [NodeId; 6]) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let body = alloc_element(&mut tree, "body");
    let p = alloc_element(&mut tree, "p");
    let a = tree.alloc_text("a");
    let div = alloc_element(&mut tree, "div");
    let b = tree.alloc_text("b");
    tree.append_child(html, body);
    tree.append_child(body, p);
    tree.append_child(p, a);
    tree.append_child(body, div);
    tree.append_child(div, b);
    (tree, [html, body, p, a, div, b])
}

#[test]
fn test_first_allocation_is_root() {
    let (tree, [html, ..]) = small_tree();
    assert_eq!(html, NodeId::ROOT);
    assert_eq!(tree.root(), html);
    assert_eq!(tree.parent(html), None);
}

#[test]
fn test_append_child_sets_both_links() {
    let (tree, [_, body, p, _, div, _]) = small_tree();
    assert_eq!(tree.children(body), &[p, div]);
    assert_eq!(tree.parent(p), Some(body));
    assert_eq!(tree.parent(div), Some(body));
}

#[test]
fn test_reappending_moves_the_node() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = tree.alloc_text("c");
    tree.append_child(a, b);
    tree.append_child(a, c);
    tree.append_child(b, c);

    assert_eq!(tree.children(a), &[b]);
    assert_eq!(tree.children(b), &[c]);
    assert_eq!(tree.parent(c), Some(b));
    assert_eq!(tree.text_content(a), "c");
}

#[test]
fn test_append_under_own_descendant_is_ignored() {
    let (mut tree, [html, body, p, a, _, _]) = small_tree();
    tree.append_child(p, body);
    tree.append_child(a, a);

    assert_eq!(tree.parent(body), Some(html));
    assert_eq!(tree.parent(p), Some(body));
    assert_eq!(tree.children(p), &[a]);
    assert_eq!(tree.ancestors(a).collect::<Vec<_>>(), vec![p, body, html]);
}

#[test]
fn test_every_child_points_back_to_parent() {
    let (tree, _) = small_tree();
    for id in tree.descendants(NodeId::ROOT) {
        for &child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
    }
}

#[test]
fn test_ancestors_walk_to_root() {
    let (tree, [html, body, p, a, _, _]) = small_tree();
    let chain: Vec<_> = tree.ancestors(a).collect();
    assert_eq!(chain, vec![p, body, html]);
    assert_eq!(tree.ancestors(html).count(), 0);
}

#[test]
fn test_descendants_are_document_order() {
    let (tree, ids) = small_tree();
    let order: Vec<_> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, ids.to_vec());
}

#[test]
fn test_descendants_of_missing_node_is_empty() {
    let tree = DomTree::new();
    assert_eq!(tree.descendants(NodeId::ROOT).count(), 0);
    assert!(tree.children(NodeId(5)).is_empty());
}

#[test]
fn test_text_content_concatenates_runs() {
    let (tree, [html, _, p, ..]) = small_tree();
    assert_eq!(tree.text_content(html), "ab");
    assert_eq!(tree.text_content(p), "a");
}

#[test]
fn test_element_and_text_accessors() {
    let (tree, [_, _, p, a, ..]) = small_tree();
    assert_eq!(tree.tag_name(p), Some("p"));
    assert_eq!(tree.as_text(a), Some("a"));
    assert!(tree.as_element(a).is_none());
    assert!(tree.as_text(p).is_none());
}

#[test]
fn test_style_absent_until_set() {
    let (mut tree, [_, _, p, ..]) = small_tree();
    assert!(tree.style(p).is_none());

    let mut style = StyleMap::new();
    let _ = style.insert("color".to_string(), "red".to_string());
    tree.set_style(p, style);
    assert_eq!(
        tree.style(p).and_then(|s| s.get("color")).map(String::as_str),
        Some("red")
    );

    tree.clear_styles();
    assert!(tree.style(p).is_none());
}

#[test]
fn test_attribute_lookup() {
    let mut tree = DomTree::new();
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("href".to_string(), "/next".to_string());
    let a = tree.alloc_element("a", attrs);
    let element = tree.as_element(a).expect("element");
    assert_eq!(element.attr("href"), Some("/next"));
    assert_eq!(element.attr("title"), None);
}
