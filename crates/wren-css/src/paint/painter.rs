//! Painter - generates display list from layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! The painter walks the layout tree and generates drawing commands in the
//! correct painting order (back to front).

use wren_dom::DomTree;

use crate::layout::{BoxKind, LayoutBox};

use super::{DisplayCommand, DisplayList};

/// Color of the rule drawn for `<hr>`.
const RULE_COLOR: &str = "gray";

/// Pending work in the paint walk.
enum Visit<'b> {
    /// Paint the box, then its children.
    Open(&'b LayoutBox),
    /// Children are done; stroke the debug outline.
    Outline(&'b LayoutBox),
}

/// Painter that generates a display list from a layout tree.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
pub struct Painter<'a> {
    /// The styled tree the layout was built from, for background colors.
    tree: &'a DomTree,
    /// Also stroke the outline of every block and line box.
    outlines: bool,
}

impl<'a> Painter<'a> {
    /// Create a new painter with access to computed styles.
    #[must_use]
    pub const fn new(tree: &'a DomTree) -> Self {
        Self {
            tree,
            outlines: false,
        }
    }

    /// Debug mode: stroke block outlines in red and line outlines in blue.
    #[must_use]
    pub const fn with_outlines(mut self, outlines: bool) -> Self {
        self.outlines = outlines;
        self
    }

    /// Paint a layout tree and return the display list.
    ///
    /// Pre-order: a block's background is painted before anything inside
    /// it, text after the backgrounds of all its ancestors. Outlines, when
    /// enabled, follow a box's contents.
    #[must_use]
    pub fn paint(&self, layout: &LayoutBox) -> DisplayList {
        let mut display_list = DisplayList::new();
        let mut stack = vec![Visit::Open(layout)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Open(layout_box) => {
                    self.paint_box(layout_box, &mut display_list);
                    if self.outlines {
                        stack.push(Visit::Outline(layout_box));
                    }
                    stack.extend(layout_box.children.iter().rev().map(Visit::Open));
                }
                Visit::Outline(layout_box) => Self::paint_outline(layout_box, &mut display_list),
            }
        }
        display_list
    }

    /// Commands for the box itself, not its children.
    fn paint_box(&self, layout_box: &LayoutBox, display_list: &mut DisplayList) {
        let rect = layout_box.rect;
        match &layout_box.kind {
            // [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
            BoxKind::Block => {
                if let Some(color) = self.background_color(layout_box) {
                    display_list.push(DisplayCommand::DrawRect { rect, color });
                }
                if self.tree.tag_name(layout_box.node) == Some("hr") {
                    display_list.push(DisplayCommand::DrawLine {
                        from: (rect.left(), rect.top()),
                        to: (rect.right(), rect.top()),
                        color: RULE_COLOR.to_string(),
                        thickness: 1.0,
                    });
                }
            }
            BoxKind::Text(fragment) => display_list.push(DisplayCommand::DrawText {
                rect,
                text: fragment.text.clone(),
                color: fragment.color.clone(),
                font: fragment.font,
            }),
            BoxKind::Document | BoxKind::Line => {}
        }
    }

    /// Red for blocks, blue for lines; other boxes get none.
    fn paint_outline(layout_box: &LayoutBox, display_list: &mut DisplayList) {
        let color = match layout_box.kind {
            BoxKind::Block => "red",
            BoxKind::Line => "blue",
            BoxKind::Document | BoxKind::Text(_) => return,
        };
        display_list.push(DisplayCommand::DrawOutline {
            rect: layout_box.rect,
            color: color.to_string(),
            thickness: 1.0,
        });
    }

    /// `background-color` of the box's node, unless it is `transparent`.
    fn background_color(&self, layout_box: &LayoutBox) -> Option<String> {
        self.tree
            .style(layout_box.node)?
            .get("background-color")
            .filter(|color| !color.eq_ignore_ascii_case("transparent"))
            .cloned()
    }
}
