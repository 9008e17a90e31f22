//! Integration tests for painting and display lists.

use wren_css::{
    DisplayCommand, DisplayList, FixedWidthFontMetrics, LayoutConfig, Painter, apply_styles,
    layout, parse_stylesheet, ua_stylesheet,
};
use wren_dom::DomTree;
use wren_html::parse;

fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = parse(html);
    let mut rules = ua_stylesheet().rules.clone();
    rules.extend(parse_stylesheet(css).rules);
    apply_styles(&mut tree, &rules);
    tree
}

fn paint(html: &str, css: &str, outlines: bool) -> DisplayList {
    let tree = styled(html, css);
    let document = layout(
        &tree,
        &LayoutConfig::with_width(800.0),
        &FixedWidthFontMetrics::new(),
    )
    .expect("styled tree lays out");
    Painter::new(&tree).with_outlines(outlines).paint(&document)
}

fn texts(list: &DisplayList) -> Vec<&str> {
    list.commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DisplayCommand::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_text_is_painted_in_document_order() {
    let list = paint("<p>one two</p><p>three</p>", "", false);
    assert_eq!(texts(&list), vec!["one", "two", "three"]);
}

#[test]
fn test_background_is_painted_before_content() {
    let list = paint("<pre>code</pre>", "", false);
    match list.commands() {
        [
            DisplayCommand::DrawRect { rect, color },
            DisplayCommand::DrawText { text, rect: text_rect, .. },
        ] => {
            assert_eq!(color, "gray");
            assert_eq!(text, "code");
            assert!(rect.contains_point(text_rect.x, text_rect.y));
        }
        other => panic!("unexpected commands: {other:?}"),
    }
}

#[test]
fn test_transparent_background_paints_nothing() {
    let list = paint("<div><p>x</p></div>", "div { background-color: transparent; }", false);
    assert!(
        list.commands()
            .iter()
            .all(|cmd| matches!(cmd, DisplayCommand::DrawText { .. }))
    );
}

#[test]
fn test_text_carries_computed_color_and_font() {
    let list = paint(r#"<p><a href="/x">link</a></p>"#, "", false);
    match &list.commands()[0] {
        DisplayCommand::DrawText { color, font, .. } => {
            assert_eq!(color, "blue");
            assert_eq!(font.size, 16.0);
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_hr_draws_a_rule_across_the_block() {
    let list = paint("<p>a</p><hr><p>b</p>", "", false);
    let line = list
        .commands()
        .iter()
        .find_map(|cmd| match cmd {
            DisplayCommand::DrawLine { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .expect("rule drawn");
    assert_eq!(line.0.0, 13.0);
    assert_eq!(line.1.0, 787.0);
    assert_eq!(line.0.1, line.1.1);
}

#[test]
fn test_outline_mode_adds_outlines_after_content() {
    let plain = paint("<p>x</p>", "", false);
    let outlined = paint("<p>x</p>", "", true);
    let outlines = outlined
        .commands()
        .iter()
        .filter(|cmd| matches!(cmd, DisplayCommand::DrawOutline { .. }))
        .count();
    // html, body, p blocks plus one line.
    assert_eq!(outlines, 4);
    assert_eq!(outlined.len(), plain.len() + outlines);
    assert!(matches!(
        outlined.commands().last(),
        Some(DisplayCommand::DrawOutline { color, .. }) if color == "red"
    ));
}

#[test]
fn test_viewport_culling_on_a_long_page() {
    let html: String = (0..100).map(|i| format!("<p>line{i}</p>")).collect();
    let list = paint(&html, "", false);
    assert_eq!(list.len(), 100);

    let visible: Vec<_> = list.visible(0.0, 100.0).collect();
    assert!(!visible.is_empty());
    assert!(visible.len() < 10);
    assert!(list.content_height() > 100.0 * 16.0);
}

#[test]
fn test_deeply_nested_blocks_paint_with_outlines() {
    let depth = 3000;
    let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let list = paint(&html, "", true);

    assert_eq!(texts(&list), vec!["x"]);
    let outlines: Vec<&str> = list
        .commands()
        .iter()
        .filter_map(|cmd| match cmd {
            DisplayCommand::DrawOutline { color, .. } => Some(color.as_str()),
            _ => None,
        })
        .collect();
    // One line, then every block from the innermost div out to html.
    assert_eq!(outlines.len(), depth + 3);
    assert_eq!(outlines[0], "blue");
    assert!(outlines[1..].iter().all(|&color| color == "red"));
}
