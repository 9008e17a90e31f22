//! Inline layout: word placement, wrapping and line boxes.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! Placement happens in two phases. [`InlineLayout::feed`] walks the
//! inline content and assigns every word a line and an x offset.
//! [`InlineLayout::finish`] then settles each line: centering, the shared
//! baseline, and the line height.

use wren_dom::{DomTree, NodeId};

use crate::style::TextStyle;

use super::box_model::Rect;
use super::font::{Font, FontMetrics, Metric};
use super::layout_box::{BoxKind, LayoutBox, TextFragment, is_hidden};
use super::{BREAK_AFTER_ELEMENTS, LayoutError};

/// U+00AD SOFT HYPHEN: an invisible hyphenation opportunity.
pub const SOFT_HYPHEN: char = '\u{ad}';

/// A word with its horizontal position decided.
#[derive(Debug)]
struct PlacedWord {
    node: NodeId,
    fragment: TextFragment,
    /// Offset from the block's left edge.
    x: f32,
    width: f32,
}

#[derive(Debug, Default)]
struct PendingLine {
    words: Vec<PlacedWord>,
    centered: bool,
}

impl PendingLine {
    /// Offset from the block's left edge just past the last word.
    fn right(&self) -> f32 {
        self.words.last().map_or(0.0, |w| w.x + w.width)
    }
}

/// Pending work in the inline walk.
enum Step<'a> {
    /// Visit a node and queue its children.
    Enter(NodeId),
    /// All children of an element with this tag have been placed.
    Leave(&'a str),
}

/// Line builder for one block in inline mode.
pub(crate) struct InlineLayout<'a> {
    tree: &'a DomTree,
    metrics: &'a dyn FontMetrics,
    /// The block's position and width. Height is ignored.
    bounds: Rect,
    lines: Vec<PendingLine>,
    current: PendingLine,
    /// Open `h1` elements around the content being placed.
    centering: usize,
    /// Open `sup` elements around the content being placed.
    raised: usize,
}

impl<'a> InlineLayout<'a> {
    pub(crate) fn new(tree: &'a DomTree, metrics: &'a dyn FontMetrics, bounds: Rect) -> Self {
        Self {
            tree,
            metrics,
            bounds,
            lines: Vec::new(),
            current: PendingLine::default(),
            centering: 0,
            raised: 0,
        }
    }

    /// Feed node `id` and everything under it into the lines.
    ///
    /// The walk keeps its own stack, so nesting depth is bounded by memory
    /// rather than by the thread's call stack.
    pub(crate) fn feed(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => self.enter(id, &mut stack)?,
                Step::Leave(tag) => self.leave(tag),
            }
        }
        Ok(())
    }

    /// Place a text node's words, or open an element and queue its
    /// children followed by its closing step.
    fn enter(&mut self, id: NodeId, stack: &mut Vec<Step<'a>>) -> Result<(), LayoutError> {
        let tree = self.tree;
        if let Some(text) = tree.as_text(id) {
            let style = TextStyle::of(tree, id)?;
            for word in text.split_ascii_whitespace() {
                self.word(id, &style, word);
            }
            return Ok(());
        }

        let Some(tag) = tree.tag_name(id) else {
            return Ok(());
        };
        if is_hidden(tree, id) {
            return Ok(());
        }
        if tag == "br" {
            self.new_line();
        }
        if tag == "h1" {
            self.centering += 1;
        }
        if tag == "sup" {
            self.raised += 1;
        }

        stack.push(Step::Leave(tag));
        stack.extend(tree.children(id).iter().rev().map(|&child| Step::Enter(child)));
        Ok(())
    }

    /// Close an element opened by [`Self::enter`].
    fn leave(&mut self, tag: &str) {
        if tag == "h1" {
            self.centering -= 1;
        }
        if tag == "sup" {
            self.raised -= 1;
        }
        if BREAK_AFTER_ELEMENTS.contains(&tag) {
            self.new_line();
        }
    }

    /// Close the current line. Empty lines are dropped.
    fn new_line(&mut self) {
        if !self.current.words.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    /// Where the next word on the current line would start: one space in the
    /// previous word's font past its end.
    fn next_x(&self) -> f32 {
        self.current.words.last().map_or(0.0, |prev| {
            prev.x + prev.width + self.metrics.measure(&prev.fragment.font, " ")
        })
    }

    fn place(&mut self, node: NodeId, fragment: TextFragment, x: f32, width: f32) {
        if self.centering > 0 {
            self.current.centered = true;
        }
        self.current.words.push(PlacedWord {
            node,
            fragment,
            x,
            width,
        });
    }

    /// [§ 5.2 Breaking Rules for Letters](https://www.w3.org/TR/css-text-3/#line-break-details)
    ///
    /// Place one whitespace-free word, wrapping or hyphenating as needed.
    fn word(&mut self, node: NodeId, style: &TextStyle, word: &str) {
        let superscript = self.raised > 0;
        let size = if superscript {
            style.font_size / 2.0
        } else {
            style.font_size
        };
        let font = self.metrics.font(size, style.weight, style.slant);
        let fragment = |text: String| TextFragment {
            text,
            font,
            color: style.color.clone(),
            superscript,
        };

        let mut remaining = word.to_string();
        loop {
            let text = strip_soft_hyphens(&remaining);
            let x = self.next_x();
            let width = self.metrics.measure(&font, &text);
            if x + width <= self.bounds.width {
                self.place(node, fragment(text), x, width);
                return;
            }

            if let Some((shown, rest)) = self.hyphenate(font, &remaining, x) {
                let width = self.metrics.measure(&font, &shown);
                self.place(node, fragment(shown), x, width);
                self.new_line();
                remaining = rest;
                continue;
            }

            if self.current.words.is_empty() {
                // Too wide even for an empty line.
                self.place(node, fragment(text), x, width);
                return;
            }
            self.new_line();
        }
    }

    /// The longest prefix of `word` that fits at `x` when broken at a
    /// hyphenation point, as `(displayed prefix, remainder)`.
    ///
    /// Break points are soft hyphens (shown as `-`) and existing hyphens
    /// (kept, no extra hyphen added). Both sides must be non-empty.
    fn hyphenate(&self, font: Font, word: &str, x: f32) -> Option<(String, String)> {
        word.char_indices()
            .rev()
            .filter_map(|(i, c)| match c {
                SOFT_HYPHEN => Some((
                    format!("{}-", strip_soft_hyphens(&word[..i])),
                    &word[i + c.len_utf8()..],
                    &word[..i],
                )),
                '-' => Some((
                    strip_soft_hyphens(&word[..=i]),
                    &word[i + 1..],
                    &word[..i],
                )),
                _ => None,
            })
            .filter(|(_, rest, head)| {
                !strip_soft_hyphens(head).is_empty() && !strip_soft_hyphens(rest).is_empty()
            })
            .find(|(shown, _, _)| x + self.metrics.measure(&font, shown) <= self.bounds.width)
            .map(|(shown, rest, _)| (shown, rest.to_string()))
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Settle every line and stack them from the block's top. `block` is the
    /// node line boxes are attributed to.
    pub(crate) fn finish(mut self, block: NodeId) -> Vec<LayoutBox> {
        self.new_line();
        let lines = std::mem::take(&mut self.lines);
        let mut top = self.bounds.y;
        let mut boxes = Vec::with_capacity(lines.len());
        for line in lines {
            let line_box = self.settle(line, block, top);
            top += line_box.rect.height;
            boxes.push(line_box);
        }
        boxes
    }

    /// All runs in a line share one baseline, set by the tallest ascent.
    /// Superscripts hang from the line's top instead.
    fn settle(&self, line: PendingLine, block: NodeId, top: f32) -> LayoutBox {
        let offset = if line.centered {
            ((self.bounds.width - line.right()) / 2.0).max(0.0)
        } else {
            0.0
        };

        let ascent = |font: &Font| self.metrics.metric(font, Metric::Ascent);
        let descent = |font: &Font| self.metrics.metric(font, Metric::Descent);
        let max_ascent = line
            .words
            .iter()
            .map(|w| ascent(&w.fragment.font))
            .fold(0.0, f32::max);
        let max_descent = line
            .words
            .iter()
            .map(|w| descent(&w.fragment.font))
            .fold(0.0, f32::max);
        let baseline = top + max_ascent;

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT] line block={} top={top} words={} baseline={baseline} centered={}",
            block.0,
            line.words.len(),
            line.centered
        );

        let children = line
            .words
            .into_iter()
            .map(|word| {
                let font = word.fragment.font;
                let y = if word.fragment.superscript {
                    baseline - max_ascent
                } else {
                    baseline - ascent(&font)
                };
                let rect = Rect::new(
                    self.bounds.x + offset + word.x,
                    y,
                    word.width,
                    self.metrics.metric(&font, Metric::LineSpacing),
                );
                LayoutBox::new(BoxKind::Text(word.fragment), word.node, rect)
            })
            .collect();

        LayoutBox {
            kind: BoxKind::Line,
            node: block,
            rect: Rect::new(
                self.bounds.x,
                top,
                self.bounds.width,
                max_ascent + max_descent,
            ),
            children,
        }
    }
}

/// Remove soft hyphens from display text.
#[must_use]
pub fn strip_soft_hyphens(text: &str) -> String {
    text.chars().filter(|&c| c != SOFT_HYPHEN).collect()
}
