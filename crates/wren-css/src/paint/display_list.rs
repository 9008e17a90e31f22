//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. It contains all the
//! drawing commands needed to render a page, in painting order.

use serde::Serialize;

use crate::layout::{Font, Rect};

/// A single drawing command, in document coordinates.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum DisplayCommand {
    /// Draw a run of text with its top-left corner at the rect's origin.
    DrawText {
        /// Text bounds: measured width by the font's line spacing.
        rect: Rect,
        /// The text.
        text: String,
        /// Fill color, as computed.
        color: String,
        /// Font to draw with.
        font: Font,
    },

    /// Fill a rectangle with a solid color.
    DrawRect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: String,
    },

    /// Draw a straight line.
    DrawLine {
        /// Start point `(x, y)`.
        from: (f32, f32),
        /// End point `(x, y)`.
        to: (f32, f32),
        /// Stroke color.
        color: String,
        /// Stroke width in pixels.
        thickness: f32,
    },

    /// Stroke a rectangle's border without filling it.
    DrawOutline {
        /// Rectangle to outline.
        rect: Rect,
        /// Stroke color.
        color: String,
        /// Stroke width in pixels.
        thickness: f32,
    },
}

/// Drawing backend a display list is replayed onto.
///
/// Coordinates are already shifted into surface space when these are
/// called.
pub trait Surface {
    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: &str, font: &Font);

    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: &str);

    /// Draw a line from `from` to `to`.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: &str, thickness: f32);

    /// Stroke the border of `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: &str, thickness: f32);
}

impl DisplayCommand {
    /// Bounding rectangle, used for culling.
    #[must_use]
    pub fn rect(&self) -> Rect {
        match self {
            Self::DrawText { rect, .. }
            | Self::DrawRect { rect, .. }
            | Self::DrawOutline { rect, .. } => *rect,
            Self::DrawLine { from, to, .. } => Rect::from_edges(
                from.0.min(to.0),
                from.1.min(to.1),
                from.0.max(to.0),
                from.1.max(to.1),
            ),
        }
    }

    /// Top edge of the bounding rectangle.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.rect().top()
    }

    /// Bottom edge of the bounding rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.rect().bottom()
    }

    /// Replay this command onto `surface`, scrolled down by
    /// `vertical_offset` pixels.
    pub fn apply(&self, vertical_offset: f32, surface: &mut dyn Surface) {
        match self {
            Self::DrawText {
                rect,
                text,
                color,
                font,
            } => surface.draw_text(rect.x, rect.y - vertical_offset, text, color, font),
            Self::DrawRect { rect, color } => {
                surface.fill_rect(rect.translated_y(-vertical_offset), color);
            }
            Self::DrawLine {
                from,
                to,
                color,
                thickness,
            } => surface.draw_line(
                (from.0, from.1 - vertical_offset),
                (to.0, to.1 - vertical_offset),
                color,
                *thickness,
            ),
            Self::DrawOutline {
                rect,
                color,
                thickness,
            } => surface.stroke_rect(rect.translated_y(-vertical_offset), color, *thickness),
        }
    }
}

/// A list of drawing commands in painting order.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are stored in back-to-front order, so the renderer can simply
/// iterate and execute each command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands that intersect the viewport `[scroll, scroll + height]`,
    /// in painting order. Nothing is copied.
    pub fn visible(&self, scroll: f32, height: f32) -> impl Iterator<Item = &DisplayCommand> {
        self.commands
            .iter()
            .filter(move |cmd| cmd.top() <= scroll + height && cmd.bottom() >= scroll)
    }

    /// Lowest bottom edge of any command; how far the page can scroll.
    #[must_use]
    pub fn content_height(&self) -> f32 {
        self.commands
            .iter()
            .map(DisplayCommand::bottom)
            .fold(0.0, f32::max)
    }

    /// Replay every visible command onto `surface`.
    pub fn render(&self, scroll: f32, height: f32, surface: &mut dyn Surface) {
        for command in self.visible(scroll, height) {
            command.apply(scroll, surface);
        }
    }
}
