//! Typed views over computed style strings.
//!
//! The cascade stores every property as a string. Layout only needs the
//! four inherited text properties, parsed once per text run into a
//! [`TextStyle`].

use serde::Serialize;
use strum_macros::{Display, EnumString, IntoStaticStr};
use wren_dom::{DomTree, NodeId, StyleMap};

use crate::layout::LayoutError;

/// Default `font-size` in pixels at the root.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// Collapsed to the two weights a font provider has to distinguish.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// `normal`, `lighter`, numeric weights below 600.
    #[default]
    Normal,
    /// `bold`, `bolder`, numeric weights of 600 and up.
    Bold,
}

impl FontWeight {
    /// Parse a computed `font-weight` value.
    #[must_use]
    pub fn from_css(value: &str) -> Option<Self> {
        if let Ok(weight) = value.parse::<Self>() {
            return Some(weight);
        }
        match value.to_ascii_lowercase().as_str() {
            "bolder" => Some(Self::Bold),
            "lighter" => Some(Self::Normal),
            numeric => numeric.parse::<u16>().ok().map(|w| {
                if w >= 600 { Self::Bold } else { Self::Normal }
            }),
        }
    }
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
///
/// Font providers call upright faces "roman"; CSS calls them `normal`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    /// Upright.
    #[default]
    #[strum(to_string = "roman", serialize = "normal")]
    Roman,
    /// `italic` or `oblique`.
    #[strum(to_string = "italic", serialize = "oblique")]
    Italic,
}

impl FontSlant {
    /// Parse a computed `font-style` value.
    #[must_use]
    pub fn from_css(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

/// Parse an absolute `px` length such as `"16px"` or `"12.5px"`.
#[must_use]
pub fn parse_px(value: &str) -> Option<f32> {
    value
        .trim()
        .strip_suffix("px")?
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Format a pixel length the way computed styles store it: `16px`, `12.8px`.
#[must_use]
pub fn format_px(value: f32) -> String {
    format!("{value}px")
}

/// The inherited text properties of one node, parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Upright or italic.
    pub slant: FontSlant,
    /// Color, passed through to the painter unparsed.
    pub color: String,
}

impl TextStyle {
    /// Read the text properties of a styled node.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Unstyled`] when the cascade has not run on `id`;
    /// [`LayoutError::InvalidStyle`] when an inherited property is missing or
    /// unparsable.
    pub fn of(tree: &DomTree, id: NodeId) -> Result<Self, LayoutError> {
        let style = tree.style(id).ok_or(LayoutError::Unstyled { node: id })?;
        Self::from_style(id, style)
    }

    /// Parse a computed style map belonging to node `id`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidStyle`] naming the first bad property.
    pub fn from_style(id: NodeId, style: &StyleMap) -> Result<Self, LayoutError> {
        let get = |property: &str| {
            style
                .get(property)
                .map(String::as_str)
                .ok_or_else(|| LayoutError::invalid(id, property, ""))
        };

        let size = get("font-size")?;
        let font_size =
            parse_px(size).ok_or_else(|| LayoutError::invalid(id, "font-size", size))?;
        let weight = get("font-weight")?;
        let weight = FontWeight::from_css(weight)
            .ok_or_else(|| LayoutError::invalid(id, "font-weight", weight))?;
        let slant = get("font-style")?;
        let slant =
            FontSlant::from_css(slant).ok_or_else(|| LayoutError::invalid(id, "font-style", slant))?;
        let color = get("color")?.to_string();

        Ok(Self {
            font_size,
            weight,
            slant,
            color,
        })
    }
}
