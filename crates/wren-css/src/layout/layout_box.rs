//! Layout box types and block layout.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)

use serde::Serialize;
use wren_dom::{DomTree, NodeId};

use super::box_model::Rect;
use super::font::{Font, FontMetrics};
use super::inline::InlineLayout;
use super::{LayoutError, is_block_level};

/// One word (or hyphenated piece of a word) placed on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFragment {
    /// Display text, soft hyphens removed.
    pub text: String,
    /// Font the text is set in.
    pub font: Font,
    /// Text color, as computed.
    pub color: String,
    /// Raised to the top of the line (`<sup>` content).
    pub superscript: bool,
}

/// What a layout box represents.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// The page. Exactly one per tree, at the root.
    Document,
    /// A block container for one node.
    Block,
    /// A line box inside a block in inline mode.
    Line,
    /// A text run inside a line.
    Text(TextFragment),
}

/// A node of the geometry tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// Kind of box.
    pub kind: BoxKind,
    /// Node this box was generated for. Line boxes point at their block's
    /// node; text runs at their text node.
    pub node: NodeId,
    /// Position and size in document space.
    pub rect: Rect,
    /// Child boxes, in painting order.
    pub children: Vec<LayoutBox>,
}

/// How a block lays out its contents.
///
/// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
///
/// "a block container box either contains only block-level boxes or
/// establishes an inline formatting context and thus contains only
/// inline-level boxes."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// One child block per child node, stacked vertically.
    Block,
    /// Children flow into line boxes.
    Inline,
    /// No children: an empty block.
    Empty,
}

impl LayoutMode {
    /// Pick the mode for node `id`.
    #[must_use]
    pub fn of(tree: &DomTree, id: NodeId) -> Self {
        if tree.as_text(id).is_some() {
            return Self::Inline;
        }
        let children = tree.children(id);
        if children
            .iter()
            .any(|&child| tree.tag_name(child).is_some_and(is_block_level))
        {
            Self::Block
        } else if children.is_empty() {
            Self::Empty
        } else {
            Self::Inline
        }
    }
}

/// Does the computed style of `id` say `display: none`?
pub(crate) fn is_hidden(tree: &DomTree, id: NodeId) -> bool {
    tree.style(id)
        .and_then(|style| style.get("display"))
        .is_some_and(|display| display.trim().eq_ignore_ascii_case("none"))
}

impl LayoutBox {
    /// A box with no children.
    #[must_use]
    pub const fn new(kind: BoxKind, node: NodeId, rect: Rect) -> Self {
        Self {
            kind,
            node,
            rect,
            children: Vec::new(),
        }
    }

    /// Text fragment, for text-run boxes.
    #[must_use]
    pub const fn text(&self) -> Option<&TextFragment> {
        match &self.kind {
            BoxKind::Text(fragment) => Some(fragment),
            _ => None,
        }
    }

    /// Every box in this subtree, pre-order (parents before children).
    #[must_use]
    pub fn flatten(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(current.children.iter().rev());
        }
        out
    }

    /// The last box in pre-order whose rectangle contains the point: the
    /// deepest (and latest painted) box under it.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Self> {
        self.flatten()
            .into_iter()
            .rev()
            .find(|b| b.rect.contains_point(x, y))
    }

    /// Lay out the node behind this block. `rect` must already hold the
    /// block's position and width; this fills in the height and children.
    ///
    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// Height is the sum of the children's heights. Margins do not exist
    /// here, so nothing collapses.
    ///
    /// Nested blocks are handled with an explicit stack of open blocks. A
    /// child is stacked below its previous sibling once it closes.
    pub(crate) fn layout_block(
        &mut self,
        tree: &DomTree,
        metrics: &dyn FontMetrics,
    ) -> Result<(), LayoutError> {
        let root = Self::new(BoxKind::Block, self.node, self.rect);
        let mut open = vec![OpenBlock::start(root, tree, metrics)?];

        while let Some(top) = open.last_mut() {
            if let Some(&child) = top.pending.find(|&&child| !is_hidden(tree, child)) {
                let rect = Rect::new(top.block.rect.x, top.cursor_y, top.block.rect.width, 0.0);
                let block = Self::new(BoxKind::Block, child, rect);
                open.push(OpenBlock::start(block, tree, metrics)?);
                continue;
            }

            let Some(done) = open.pop() else { break };
            let block = done.close();
            match open.last_mut() {
                Some(parent) => {
                    parent.cursor_y += block.rect.height;
                    parent.block.children.push(block);
                }
                None => *self = block,
            }
        }
        Ok(())
    }
}

impl Drop for LayoutBox {
    /// Unlinks descendants onto a flat list first, so freeing a deeply
    /// nested tree does not recurse once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

/// A block whose child blocks are still being laid out.
struct OpenBlock<'t> {
    block: LayoutBox,
    /// Child nodes not yet visited; empty outside block mode.
    pending: std::slice::Iter<'t, NodeId>,
    /// Top of the next child block.
    cursor_y: f32,
}

impl<'t> OpenBlock<'t> {
    /// Check the block's style and pick its mode. Inline content is laid
    /// out right away; block children are left in `pending`.
    fn start(
        mut block: LayoutBox,
        tree: &'t DomTree,
        metrics: &dyn FontMetrics,
    ) -> Result<Self, LayoutError> {
        if tree.style(block.node).is_none() {
            return Err(LayoutError::Unstyled { node: block.node });
        }

        let mode = LayoutMode::of(tree, block.node);

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT] block node={} tag={:?} mode={mode:?} x={} y={} width={}",
            block.node.0,
            tree.tag_name(block.node),
            block.rect.x,
            block.rect.y,
            block.rect.width
        );

        let pending: &'t [NodeId] = match mode {
            LayoutMode::Block => tree.children(block.node),
            LayoutMode::Inline => {
                let mut inline = InlineLayout::new(tree, metrics, block.rect);
                inline.feed(block.node)?;
                block.children = inline.finish(block.node);
                &[]
            }
            LayoutMode::Empty => &[],
        };

        Ok(Self {
            cursor_y: block.rect.y,
            block,
            pending: pending.iter(),
        })
    }

    /// Every child is placed: the height is now known.
    fn close(mut self) -> LayoutBox {
        self.block.rect.height = self.block.children.iter().map(|child| child.rect.height).sum();

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT] block node={} done height={} children={}",
            self.block.node.0,
            self.block.rect.height,
            self.block.children.len()
        );

        self.block
    }
}
