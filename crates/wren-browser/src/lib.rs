//! High-level page API for the Wren renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Page Loading** - parse markup from a string or a file
//! - **Style Computation** - UA, document and caller stylesheets through the cascade
//! - **Layout and Painting** - geometry tree and display list, rebuilt on resize
//! - **Hit Testing** - from a point back to the node and enclosing link
//! - **Font Metrics** - system fonts measured with fontdue
//!
//! # Not Implemented
//!
//! - Network fetching; linked stylesheets are read from disk only
//! - Script execution

pub mod font_metrics;

pub use font_metrics::FontdueFontMetrics;
pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wren_common::warning::{clear_warnings, warn_once};
use wren_css::{
    DisplayList, FontMetrics, LayoutBox, LayoutConfig, LayoutError, Painter, Rule, apply_styles,
    extract_style_content, layout, linked_stylesheets, parse_stylesheet, ua_stylesheet,
};
use wren_dom::{DomTree, NodeId};
use wren_html::{HTMLParser, ParseIssue};

/// Error type for page loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read the page source.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The styled tree could not be laid out.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// A parsed, styled and laid-out page.
///
/// Holds everything needed to paint and hit-test: the node tree, the rules
/// it was styled with, the geometry tree and the display list.
pub struct Page {
    /// Parsed node tree with computed styles.
    pub tree: DomTree,

    /// Every rule applied, in cascade input order: UA, then `<style>`
    /// elements and linked sheets, then caller sheets.
    pub rules: Vec<Rule>,

    /// Problems the markup parser recovered from.
    pub issues: Vec<ParseIssue>,

    /// Page geometry of the last layout pass.
    pub config: LayoutConfig,

    /// Geometry tree from the last layout pass.
    pub document: LayoutBox,

    /// Drawing commands from the last layout pass.
    pub display_list: DisplayList,

    metrics: Arc<dyn FontMetrics>,
}

impl Page {
    /// Run the full pipeline over `html`.
    ///
    /// `extra_sheets` are appended after the document's own stylesheets, so
    /// at equal specificity they win.
    ///
    /// # Errors
    ///
    /// [`LoadError::Layout`] when layout rejects the styled tree, which only
    /// happens when a stylesheet sets an inherited property to something
    /// layout cannot read.
    pub fn load(
        html: &str,
        extra_sheets: &[&str],
        page_width: f32,
        metrics: Arc<dyn FontMetrics>,
    ) -> Result<Self, LoadError> {
        clear_warnings();
        let (tree, issues) = HTMLParser::new(html).run_with_issues();
        Self::build(tree, issues, &[], extra_sheets, page_width, metrics)
    }

    /// Read a page from disk and run the full pipeline.
    ///
    /// `<link rel="stylesheet">` hrefs are resolved against the page's
    /// directory and read from disk. A linked sheet that cannot be read is
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] when the page itself cannot be read; otherwise as
    /// [`Page::load`].
    pub fn open(
        path: &Path,
        extra_sheets: &[&str],
        page_width: f32,
        metrics: Arc<dyn FontMetrics>,
    ) -> Result<Self, LoadError> {
        let html = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        clear_warnings();
        let (tree, issues) = HTMLParser::new(&html).run_with_issues();

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let linked: Vec<String> = linked_stylesheets(&tree)
            .into_iter()
            .filter_map(|href| match std::fs::read_to_string(base.join(&href)) {
                Ok(css) => Some(css),
                Err(e) => {
                    warn_once("Page", &format!("failed to load stylesheet '{href}': {e}"));
                    None
                }
            })
            .collect();
        Self::build(tree, issues, &linked, extra_sheets, page_width, metrics)
    }

    /// Style, lay out and paint a freshly parsed tree.
    fn build(
        mut tree: DomTree,
        issues: Vec<ParseIssue>,
        linked: &[String],
        extra_sheets: &[&str],
        page_width: f32,
        metrics: Arc<dyn FontMetrics>,
    ) -> Result<Self, LoadError> {
        let mut rules = ua_stylesheet().rules.clone();
        rules.extend(parse_stylesheet(&extract_style_content(&tree)).rules);
        for css in linked {
            rules.extend(parse_stylesheet(css).rules);
        }
        for css in extra_sheets {
            rules.extend(parse_stylesheet(css).rules);
        }
        apply_styles(&mut tree, &rules);

        let config = LayoutConfig::with_width(page_width);
        let document = layout(&tree, &config, metrics.as_ref())?;
        let display_list = Painter::new(&tree).paint(&document);

        Ok(Self {
            tree,
            rules,
            issues,
            config,
            document,
            display_list,
            metrics,
        })
    }

    /// Lay out and paint again for a new page width. The tree and its
    /// styles are reused.
    ///
    /// # Errors
    ///
    /// As [`Page::load`]; the page is left unchanged on error.
    pub fn relayout(&mut self, page_width: f32) -> Result<(), LayoutError> {
        let config = LayoutConfig::with_width(page_width);
        let document = layout(&self.tree, &config, self.metrics.as_ref())?;
        self.display_list = Painter::new(&self.tree).paint(&document);
        self.document = document;
        self.config = config;
        Ok(())
    }

    /// Display list with debug outlines around every block and line.
    #[must_use]
    pub fn outlined_display_list(&self) -> DisplayList {
        Painter::new(&self.tree)
            .with_outlines(true)
            .paint(&self.document)
    }

    /// Node whose box is deepest under the point, in document coordinates.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        self.document.hit_test(x, y).map(|b| b.node)
    }

    /// `href` of the nearest `<a>` at or above the node under the point.
    #[must_use]
    pub fn link_at(&self, x: f32, y: f32) -> Option<&str> {
        let hit = self.hit_test(x, y)?;
        std::iter::once(hit)
            .chain(self.tree.ancestors(hit))
            .filter_map(|id| self.tree.as_element(id))
            .find(|element| element.tag_name == "a" && element.attr("href").is_some())
            .and_then(|a| a.attr("href"))
    }

    /// Total height of the painted content, for scroll limits.
    #[must_use]
    pub fn content_height(&self) -> f32 {
        self.display_list.content_height()
    }
}
