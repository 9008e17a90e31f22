//! Integration tests for block and inline layout.

use wren_css::{
    BoxKind, FixedWidthFontMetrics, LayoutBox, LayoutConfig, LayoutError, apply_styles, layout,
    parse_stylesheet, ua_stylesheet,
};
use wren_dom::{DomTree, NodeId};
use wren_html::parse;

fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = parse(html);
    let mut rules = ua_stylesheet().rules.clone();
    rules.extend(parse_stylesheet(css).rules);
    apply_styles(&mut tree, &rules);
    tree
}

fn lay_out(tree: &DomTree, page_width: f32) -> LayoutBox {
    layout(
        tree,
        &LayoutConfig::with_width(page_width),
        &FixedWidthFontMetrics::new(),
    )
    .expect("styled tree lays out")
}

fn first(tree: &DomTree, tag: &str) -> NodeId {
    tree.descendants(NodeId::ROOT)
        .find(|&id| tree.tag_name(id) == Some(tag))
        .expect("element present")
}

fn block_for(document: &LayoutBox, node: NodeId) -> &LayoutBox {
    document
        .flatten()
        .into_iter()
        .find(|b| b.kind == BoxKind::Block && b.node == node)
        .expect("block present")
}

/// Text of every line, line by line.
fn line_texts(document: &LayoutBox) -> Vec<Vec<String>> {
    document
        .flatten()
        .into_iter()
        .filter(|b| b.kind == BoxKind::Line)
        .map(|line| {
            line.children
                .iter()
                .filter_map(|run| run.text().map(|f| f.text.clone()))
                .collect()
        })
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_document_box_sits_inside_margins() {
    let tree = styled("<p>hello</p>", "");
    let document = lay_out(&tree, 800.0);
    assert_eq!(document.kind, BoxKind::Document);
    assert_eq!(document.rect.x, 13.0);
    assert_eq!(document.rect.y, 18.0);
    assert_eq!(document.rect.width, 774.0);
    assert_eq!(document.children.len(), 1);
    assert_eq!(document.children[0].node, NodeId::ROOT);
    assert!(approx(document.rect.height, document.children[0].rect.height));
}

#[test]
fn test_block_height_is_sum_of_children() {
    let tree = styled(
        r#"<div><p style="font-size: 10px">a</p><p style="font-size: 20px">b</p><p style="font-size: 30px">c</p></div>"#,
        "",
    );
    let document = lay_out(&tree, 800.0);
    let div = block_for(&document, first(&tree, "div"));

    let heights: Vec<f32> = div.children.iter().map(|c| c.rect.height).collect();
    assert_eq!(heights.len(), 3);
    assert!(approx(heights[0], 10.0));
    assert!(approx(heights[1], 20.0));
    assert!(approx(heights[2], 30.0));
    assert!(approx(div.rect.height, 60.0));

    // Stacked with no gaps.
    assert!(approx(div.children[0].rect.y, div.rect.y));
    for pair in div.children.windows(2) {
        assert!(approx(pair[1].rect.y, pair[0].rect.bottom()));
    }
}

#[test]
fn test_words_wrap_onto_new_lines() {
    // 16px glyphs are 9.6px wide: 100px holds "aaaa bbbb" (86.4px).
    let tree = styled("<p>aaaa bbbb cccc</p>", "");
    let document = lay_out(&tree, 126.0);
    assert_eq!(line_texts(&document), vec![vec!["aaaa", "bbbb"], vec!["cccc"]]);
}

#[test]
fn test_over_wide_word_sits_alone() {
    let tree = styled("<p>a supercalifragilistic b</p>", "");
    let document = lay_out(&tree, 126.0);
    assert_eq!(
        line_texts(&document),
        vec![vec!["a"], vec!["supercalifragilistic"], vec!["b"]]
    );
    let word = document
        .flatten()
        .into_iter()
        .find(|b| b.text().is_some_and(|f| f.text == "supercalifragilistic"))
        .expect("word placed");
    assert_eq!(word.rect.x, 13.0);
    assert!(word.rect.width > 100.0);
}

#[test]
fn test_soft_hyphen_splits_word_across_lines() {
    let tree = styled("<p>xx in&shy;com&shy;pre&shy;hen&shy;si&shy;ble</p>", "");
    // 100px holds ten 16px glyphs.
    let document = lay_out(&tree, 126.0);
    assert_eq!(
        line_texts(&document),
        vec![vec!["xx", "incom-"], vec!["prehensi-"], vec!["ble"]]
    );
}

#[test]
fn test_mixed_sizes_share_a_baseline() {
    let tree = styled(
        r#"<p><span style="font-size: 16px">small</span><span style="font-size: 32px">big</span></p>"#,
        "",
    );
    let document = lay_out(&tree, 800.0);
    let line = document
        .flatten()
        .into_iter()
        .find(|b| b.kind == BoxKind::Line)
        .expect("one line");
    let small = &line.children[0];
    let big = &line.children[1];

    // Ascent is 0.8 of the size: the tops differ by 0.8 * (32 - 16).
    assert!(approx(small.rect.y - big.rect.y, 12.8));
    assert!(approx(small.rect.y + 12.8, big.rect.y + 25.6));
    assert!(approx(big.rect.y, line.rect.y));
    // Line height: tallest ascent plus deepest descent.
    assert!(approx(line.rect.height, 25.6 + 6.4));
}

#[test]
fn test_h1_line_is_centered() {
    let tree = styled("<h1>Hi</h1>", "");
    let document = lay_out(&tree, 800.0);
    let hi = document
        .flatten()
        .into_iter()
        .find(|b| b.text().is_some())
        .expect("text run");
    let center = hi.rect.x + hi.rect.width / 2.0;
    assert!(approx(center, 400.0), "center was {center}");
}

#[test]
fn test_paragraph_lines_are_not_centered() {
    let tree = styled("<p>Hi</p>", "");
    let document = lay_out(&tree, 800.0);
    let hi = document
        .flatten()
        .into_iter()
        .find(|b| b.text().is_some())
        .expect("text run");
    assert_eq!(hi.rect.x, 13.0);
}

#[test]
fn test_br_and_block_ends_break_lines() {
    let tree = styled("<p>one<br>two <b>three</b></p>", "");
    let document = lay_out(&tree, 800.0);
    assert_eq!(line_texts(&document), vec![vec!["one"], vec!["two", "three"]]);

    let tree = styled("<span>a <div>b</div> c</span>", "");
    let document = lay_out(&tree, 800.0);
    assert_eq!(line_texts(&document), vec![vec!["a", "b"], vec!["c"]]);
}

#[test]
fn test_hidden_elements_produce_no_boxes() {
    let tree = styled(
        "<head><title>Title</title><style>p { color: red; }</style></head><body><p>shown</p></body>",
        "",
    );
    let document = lay_out(&tree, 800.0);
    assert_eq!(line_texts(&document), vec![vec!["shown"]]);
    let head = first(&tree, "head");
    assert!(document.flatten().iter().all(|b| b.node != head));
}

#[test]
fn test_superscript_is_half_size() {
    let tree = styled("<p>x<sup>2</sup> y</p>", "");
    let document = lay_out(&tree, 800.0);
    let boxes: Vec<&LayoutBox> = document
        .flatten()
        .into_iter()
        .filter(|b| b.text().is_some())
        .collect();
    let runs: Vec<_> = boxes.iter().filter_map(|b| b.text()).collect();
    assert_eq!(runs.len(), 3);
    assert!(!runs[0].superscript);
    assert!(runs[1].superscript);
    assert!(approx(runs[1].font.size, 8.0));

    // Text after the closing tag is back to normal size and position.
    assert_eq!(runs[2].text, "y");
    assert!(!runs[2].superscript);
    assert!(approx(runs[2].font.size, 16.0));
    assert!(approx(boxes[2].rect.y, boxes[0].rect.y));
}

#[test]
fn test_empty_block_has_zero_height() {
    let tree = styled("<div></div><p>x</p>", "");
    let document = lay_out(&tree, 800.0);
    let div = block_for(&document, first(&tree, "div"));
    assert_eq!(div.rect.height, 0.0);
    assert!(div.children.is_empty());
}

#[test]
fn test_hit_test_finds_text_run() {
    let tree = styled("<p>alpha beta</p>", "");
    let document = lay_out(&tree, 800.0);
    let beta = document
        .flatten()
        .into_iter()
        .find(|b| b.text().is_some_and(|f| f.text == "beta"))
        .expect("beta placed");
    let hit = document
        .hit_test(beta.rect.x + 1.0, beta.rect.y + 1.0)
        .expect("something under the point");
    assert_eq!(hit, beta);
    assert!(document.hit_test(0.0, 0.0).is_none());
}

#[test]
fn test_layout_is_repeatable() {
    let tree = styled("<h1>Title</h1><p>some words here</p>", "");
    assert_eq!(lay_out(&tree, 640.0), lay_out(&tree, 640.0));
}

#[test]
fn test_unstyled_tree_is_rejected() {
    let tree = parse("<p>x</p>");
    let err = layout(&tree, &LayoutConfig::default(), &FixedWidthFontMetrics::new())
        .expect_err("cascade never ran");
    assert_eq!(err, LayoutError::Unstyled { node: NodeId::ROOT });
}

#[test]
fn test_unparsable_font_weight_is_reported() {
    let tree = styled("<p>x</p>", "p { font-weight: heavy; }");
    let err = layout(&tree, &LayoutConfig::default(), &FixedWidthFontMetrics::new())
        .expect_err("bad weight");
    assert!(
        matches!(&err, LayoutError::InvalidStyle { property, value, .. }
            if property == "font-weight" && value == "heavy"),
        "got {err}"
    );
}

#[test]
fn test_deeply_nested_blocks_lay_out() {
    let depth = 3000;
    let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let tree = styled(&html, "");
    let document = lay_out(&tree, 800.0);

    assert_eq!(line_texts(&document), vec![vec!["x"]]);
    let blocks: Vec<&LayoutBox> = document
        .flatten()
        .into_iter()
        .filter(|b| b.kind == BoxKind::Block)
        .collect();
    // html, body and every div.
    assert_eq!(blocks.len(), depth + 2);
    assert!(blocks.iter().all(|b| approx(b.rect.height, 16.0)));
    assert!(approx(document.rect.height, 16.0));
}

#[test]
fn test_deeply_nested_inline_elements_lay_out() {
    let depth = 3000;
    let html = format!(
        "<p>{}<sup>x</sup>{} y</p>",
        "<span>".repeat(depth),
        "</span>".repeat(depth)
    );
    let tree = styled(&html, "");
    let document = lay_out(&tree, 800.0);

    assert_eq!(line_texts(&document), vec![vec!["x", "y"]]);
    let runs: Vec<_> = document
        .flatten()
        .into_iter()
        .filter_map(LayoutBox::text)
        .collect();
    assert!(runs[0].superscript);
    assert!(!runs[1].superscript);
}
