//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use anyhow::{Context, Result, anyhow};
use fontdue::FontSettings;
use wren_css::{Font, FontMetrics, FontSlant, FontWeight, Metric};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Queries fontdue for exact per-character advance widths. It uses
/// `Font::metrics()` (not `Font::rasterize()`) to avoid the cost of
/// bitmap generation when only measurements are needed.
///
/// Missing bold and italic faces fall back to the closest face that was
/// found, ending at the regular one.
pub struct FontdueFontMetrics {
    regular: fontdue::Font,
    bold: Option<fontdue::Font>,
    italic: Option<fontdue::Font>,
    bold_italic: Option<fontdue::Font>,
}

impl FontdueFontMetrics {
    /// Use a single face for every weight and slant.
    ///
    /// # Errors
    ///
    /// Fails when `data` is not a font fontdue can read.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let regular = fontdue::Font::from_bytes(data, FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font: {e}"))?;
        Ok(Self {
            regular,
            bold: None,
            italic: None,
            bold_italic: None,
        })
    }

    /// Load the first regular face found in the usual system locations,
    /// plus bold and italic variants where present.
    ///
    /// # Errors
    ///
    /// Fails when no regular face can be found.
    pub fn load_system() -> Result<Self> {
        let regular = load_font_from_paths(FONT_SEARCH_PATHS).with_context(|| {
            format!(
                "no system font found; searched:\n  {}",
                FONT_SEARCH_PATHS.join("\n  ")
            )
        })?;
        Ok(Self {
            regular,
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS).ok(),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS).ok(),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS).ok(),
        })
    }

    fn face(&self, font: Font) -> &fontdue::Font {
        let face = match (font.weight, font.slant) {
            (FontWeight::Normal, FontSlant::Roman) => None,
            (FontWeight::Bold, FontSlant::Roman) => self.bold.as_ref(),
            (FontWeight::Normal, FontSlant::Italic) => self.italic.as_ref(),
            (FontWeight::Bold, FontSlant::Italic) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref()),
        };
        face.unwrap_or(&self.regular)
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str]) -> Result<fontdue::Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = fontdue::Font::from_bytes(data, FontSettings::default())
        {
            return Ok(font);
        }
    }
    Err(anyhow!("none of {} candidate paths held a readable font", paths.len()))
}

impl FontMetrics for FontdueFontMetrics {
    fn measure(&self, font: &Font, text: &str) -> f32 {
        let face = self.face(*font);
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, font.size).advance_width)
            .sum()
    }

    fn metric(&self, font: &Font, metric: Metric) -> f32 {
        // [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
        //
        // "We recommend a used value for 'normal' between 1.0 and 1.2."
        let Some(lines) = self.face(*font).horizontal_line_metrics(font.size) else {
            return match metric {
                Metric::Ascent => font.size * 0.8,
                Metric::Descent => font.size * 0.2,
                Metric::LineSpacing => font.size * 1.2,
            };
        };
        match metric {
            Metric::Ascent => lines.ascent,
            // fontdue reports descent below the baseline as negative.
            Metric::Descent => -lines.descent,
            Metric::LineSpacing => lines.new_line_size,
        }
    }
}
