//! Stylesheet parsing, cascade, line layout and painting for the Wren renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser**: a small recursive-descent grammar of rules and
//!   single-word declarations, with per-rule and per-declaration recovery
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type selectors
//!   - Descendant combinators
//!   - Specificity as the count of type selectors
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Stable specificity ordering
//!   - Inheritance of `font-size`, `font-style`, `font-weight`, `color`
//!   - `%` and `em` font sizes resolved against the parent
//!   - `style` attributes
//!
//! - **Layout** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block stacking and inline line boxes
//!   - Word wrapping with soft-hyphen and hyphen breaks
//!   - Shared baselines, superscripts, centered `h1` lines
//!
//! - **Painting**: display lists with viewport culling
//!
//! # Not Implemented
//!
//! - Class, ID, attribute and pseudo selectors; selector lists
//! - Multi-token values and shorthands
//! - Margins, padding, borders, floats, positioning

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Geometry tree and layout algorithms per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Stylesheet parser.
pub mod parser;
/// Selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Typed views over computed styles.
pub mod style;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{INHERITED_PROPERTIES, apply_styles, cascade_priority, sort_rules};
pub use layout::{
    BoxKind, DEFAULT_PAGE_WIDTH, FixedWidthFontMetrics, Font, FontMetrics, LayoutBox,
    LayoutConfig, LayoutError, Metric, Rect, TextFragment, layout,
};
pub use paint::{DisplayCommand, DisplayList, Painter, Surface};
pub use parser::{CSSParser, CssSyntaxError, Declarations, Rule, Stylesheet, parse_stylesheet};
pub use selector::Selector;
pub use style::{DEFAULT_FONT_SIZE_PX, FontSlant, FontWeight, TextStyle};
pub use ua_stylesheet::ua_stylesheet;

use wren_dom::{DomTree, NodeId};

/// [HTML Standard § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Extract CSS text from all `<style>` elements in the DOM tree, in document
/// order, one element per line.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> String {
    let mut css = String::new();
    for id in elements_named(tree, "style") {
        for &child in tree.children(id) {
            if let Some(text) = tree.as_text(child) {
                css.push_str(text);
                css.push('\n');
            }
        }
    }
    css
}

/// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
///
/// `href`s of `<link rel="stylesheet">` elements, in document order.
/// Fetching them is up to the caller; a sheet that cannot be loaded acts
/// as an empty one.
#[must_use]
pub fn linked_stylesheets(tree: &DomTree) -> Vec<String> {
    elements_named(tree, "link")
        .filter_map(|id| tree.as_element(id))
        .filter(|link| {
            link.attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|kind| kind.eq_ignore_ascii_case("stylesheet"))
            })
        })
        .filter_map(|link| link.attr("href"))
        .map(ToString::to_string)
        .collect()
}

fn elements_named<'a>(tree: &'a DomTree, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
    tree.descendants(tree.root())
        .filter(move |&id| tree.tag_name(id) == Some(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_style_content_joins_in_document_order() {
        let tree = wren_html::parse(
            "<style>p { color: red; }</style><body><style>b { color: blue; }</style></body>",
        );
        assert_eq!(
            extract_style_content(&tree),
            "p { color: red; }\nb { color: blue; }\n"
        );
    }

    #[test]
    fn test_linked_stylesheets_filters_rel() {
        let tree = wren_html::parse(
            r#"<link rel="stylesheet" href="a.css"><link rel="icon" href="x.ico"><link rel="alternate stylesheet" href="b.css">"#,
        );
        assert_eq!(linked_stylesheets(&tree), vec!["a.css", "b.css"]);
    }
}
