//! Font metrics capability.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Layout never loads fonts itself. The caller passes a [`FontMetrics`]
//! implementation into [`layout`](super::layout); tests use
//! [`FixedWidthFontMetrics`] so positions are exact and predictable.

use serde::Serialize;
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::style::{FontSlant, FontWeight};

/// A font handle: everything a provider needs to pick a face and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    /// Size in pixels.
    pub size: f32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
}

/// Vertical font metrics a provider reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Metric {
    /// Distance from the baseline to the top of the tallest glyphs.
    Ascent,
    /// Distance from the baseline to the bottom of the lowest glyphs.
    Descent,
    /// Recommended distance between consecutive baselines.
    LineSpacing,
}

/// Text measurement used during layout.
///
/// Implementations are shared read-only across layout passes and may be
/// queried from several threads at once.
pub trait FontMetrics: Send + Sync {
    /// Resolve a font handle for the given size, weight and slant.
    fn font(&self, size: f32, weight: FontWeight, slant: FontSlant) -> Font {
        Font {
            size,
            weight,
            slant,
        }
    }

    /// Advance width of `text` set in `font`.
    fn measure(&self, font: &Font, text: &str) -> f32;

    /// A vertical metric of `font`, in the same units as [`measure`](Self::measure).
    fn metric(&self, font: &Font, metric: Metric) -> f32;
}

/// Deterministic metrics: every glyph has the same advance.
///
/// Glyph advance, ascent, descent and line spacing are fixed multiples of
/// the font size. The defaults (0.6, 0.8, 0.2, 1.2) approximate a
/// proportional sans-serif, and make ascent plus descent equal the size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthFontMetrics {
    /// Advance of every glyph, as a multiple of the font size.
    pub advance_ratio: f32,
    /// Ascent as a multiple of the font size.
    pub ascent_ratio: f32,
    /// Descent as a multiple of the font size.
    pub descent_ratio: f32,
    /// Line spacing as a multiple of the font size.
    pub line_spacing_ratio: f32,
}

impl FixedWidthFontMetrics {
    /// Metrics with the default ratios.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            advance_ratio: 0.6,
            ascent_ratio: 0.8,
            descent_ratio: 0.2,
            line_spacing_ratio: 1.2,
        }
    }
}

impl Default for FixedWidthFontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetrics for FixedWidthFontMetrics {
    fn measure(&self, font: &Font, text: &str) -> f32 {
        text.chars().count() as f32 * font.size * self.advance_ratio
    }

    fn metric(&self, font: &Font, metric: Metric) -> f32 {
        let ratio = match metric {
            Metric::Ascent => self.ascent_ratio,
            Metric::Descent => self.descent_ratio,
            Metric::LineSpacing => self.line_spacing_ratio,
        };
        font.size * ratio
    }
}
