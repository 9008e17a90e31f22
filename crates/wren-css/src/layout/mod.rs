//! Layout engine.
//!
//! Turns a styled node tree into a geometry tree:
//! document → block → line → text run.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 § 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//! - [CSS Text Module Level 3 § 5 Line Breaking](https://www.w3.org/TR/css-text-3/#line-breaking)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles
//! - [`font`] - Font handles and the metrics capability
//! - [`layout_box`] - The geometry tree and block layout
//! - [`inline`] - Word placement, wrapping and line boxes
//!
//! Every pass is a full recomputation: nothing is cached between calls to
//! [`layout`].

pub mod box_model;
pub mod font;
pub mod inline;
pub mod layout_box;

pub use box_model::Rect;
pub use font::{FixedWidthFontMetrics, Font, FontMetrics, Metric};
pub use layout_box::{BoxKind, LayoutBox, TextFragment};

use wren_dom::{DomTree, NodeId};

/// Horizontal page margin in pixels.
pub const HSTEP: f32 = 13.0;

/// Top page margin in pixels.
pub const VSTEP: f32 = 18.0;

/// Page width used when the caller does not pick one.
pub const DEFAULT_PAGE_WIDTH: f32 = 1280.0;

/// [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
///
/// Elements that put their parent into block mode.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "article", "section", "nav", "aside", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "header", "footer", "address", "p", "hr", "pre", "blockquote", "ol", "ul", "menu",
    "li", "dl", "dt", "dd", "figure", "figcaption", "main", "div", "table", "form", "fieldset",
    "legend", "details", "summary",
];

/// Elements whose end forces a line break when they appear inside inline
/// content.
pub const BREAK_AFTER_ELEMENTS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
];

/// Is `tag` in the block-level set?
#[must_use]
pub fn is_block_level(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

/// Contract violations detected while laying out.
///
/// These mean the cascade did not run, or ran with a stylesheet that left an
/// inherited property in a shape layout cannot read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A node reached layout without a computed style.
    #[error("node {} has no computed style; run the cascade first", node.0)]
    Unstyled {
        /// The unstyled node.
        node: NodeId,
    },

    /// An inherited property is missing or cannot be parsed.
    #[error("node {}: invalid {property} value {value:?}", node.0)]
    InvalidStyle {
        /// The node whose style is bad.
        node: NodeId,
        /// Property name.
        property: String,
        /// Offending value; empty when the property is missing.
        value: String,
    },

    /// The tree has no root node.
    #[error("cannot lay out an empty tree")]
    EmptyDocument,
}

impl LayoutError {
    /// Shorthand for [`LayoutError::InvalidStyle`].
    #[must_use]
    pub fn invalid(node: NodeId, property: &str, value: &str) -> Self {
        Self::InvalidStyle {
            node,
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// Page geometry for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Full page width in pixels.
    pub page_width: f32,
    /// Left and right margin in pixels.
    pub horizontal_margin: f32,
    /// Top margin in pixels.
    pub top_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::with_width(DEFAULT_PAGE_WIDTH)
    }
}

impl LayoutConfig {
    /// Default margins on a page of the given width.
    #[must_use]
    pub const fn with_width(page_width: f32) -> Self {
        Self {
            page_width,
            horizontal_margin: HSTEP,
            top_margin: VSTEP,
        }
    }

    /// Width available to content: the page minus both margins, never
    /// negative.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        (self.page_width - 2.0 * self.horizontal_margin).max(0.0)
    }
}

/// Lay out a styled tree.
///
/// The returned box is the [`BoxKind::Document`] box. It has a single block
/// child for the root element, positioned at the page margins and as wide
/// as [`LayoutConfig::content_width`].
///
/// # Errors
///
/// [`LayoutError::EmptyDocument`] when the tree has no nodes; otherwise the
/// first style contract violation met during the walk.
pub fn layout(
    tree: &DomTree,
    config: &LayoutConfig,
    metrics: &dyn FontMetrics,
) -> Result<LayoutBox, LayoutError> {
    let root = tree.root();
    if tree.get(root).is_none() {
        return Err(LayoutError::EmptyDocument);
    }

    let origin = Rect::new(
        config.horizontal_margin,
        config.top_margin,
        config.content_width(),
        0.0,
    );
    let mut block = LayoutBox::new(BoxKind::Block, root, origin);
    block.layout_block(tree, metrics)?;

    let rect = Rect::new(origin.x, origin.y, origin.width, block.rect.height);

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[LAYOUT] document width={} height={} top={}",
        rect.width, rect.height, rect.y
    );

    Ok(LayoutBox {
        kind: BoxKind::Document,
        node: root,
        rect,
        children: vec![block],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_width_subtracts_both_margins() {
        let config = LayoutConfig::with_width(800.0);
        assert_eq!(config.content_width(), 774.0);
        assert_eq!(LayoutConfig::default().content_width(), 1254.0);
    }

    #[test]
    fn test_narrow_page_clamps_to_zero() {
        assert_eq!(LayoutConfig::with_width(10.0).content_width(), 0.0);
    }

    #[test]
    fn test_block_level_set() {
        assert!(is_block_level("p"));
        assert!(is_block_level("summary"));
        assert!(!is_block_level("span"));
        assert!(!is_block_level("br"));
    }

    #[test]
    fn test_empty_tree_is_an_error() {
        let tree = DomTree::new();
        let err = layout(&tree, &LayoutConfig::default(), &FixedWidthFontMetrics::new())
            .expect_err("no root");
        assert_eq!(err, LayoutError::EmptyDocument);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LayoutError::Unstyled { node: NodeId(4) }.to_string(),
            "node 4 has no computed style; run the cascade first"
        );
        assert_eq!(
            LayoutError::invalid(NodeId(2), "font-size", "big").to_string(),
            "node 2: invalid font-size value \"big\""
        );
    }
}
