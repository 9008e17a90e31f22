//! Wren CLI
//!
//! A headless inspector: parses, styles and lays out a page, then prints
//! whichever stages were asked for.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use wren_browser::{FontdueFontMetrics, Page};
use wren_common::warning::warn_once;
use wren_css::{
    BoxKind, DEFAULT_PAGE_WIDTH, FixedWidthFontMetrics, Font, FontMetrics, LayoutBox, Rect,
    Surface,
};
use wren_html::dump_tree;

/// Wren - parse, style and lay out an HTML page in the terminal
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the node tree and rule count
    wren ./index.html

    # Print the layout tree at a narrow width
    wren --boxes --width 400 ./index.html

    # Replay the first screen of drawing commands
    wren --paint --height 720 ./index.html

    # Display list as JSON, with debug outlines
    wren --json --outline --html '<h1>Test</h1>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse an HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Extra stylesheet applied after the page's own (repeatable)
    #[arg(long = "css", value_name = "FILE")]
    stylesheets: Vec<PathBuf>,

    /// Page width in pixels
    #[arg(long, default_value_t = DEFAULT_PAGE_WIDTH)]
    width: f32,

    /// Measure text with fixed-width metrics instead of a system font
    #[arg(long)]
    fixed_metrics: bool,

    /// Print the layout tree with box geometry
    #[arg(long)]
    boxes: bool,

    /// Replay the visible drawing commands as text
    #[arg(long)]
    paint: bool,

    /// Print the display list as JSON
    #[arg(long)]
    json: bool,

    /// Add debug outlines around blocks and lines
    #[arg(long)]
    outline: bool,

    /// Vertical scroll offset for --paint
    #[arg(long, default_value_t = 0.0)]
    scroll: f32,

    /// Viewport height for --paint
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let sheets = cli
        .stylesheets
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read stylesheet '{}'", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let sheets: Vec<&str> = sheets.iter().map(String::as_str).collect();
    let metrics = font_metrics(cli.fixed_metrics);

    let page = if let Some(ref html) = cli.html {
        Page::load(html, &sheets, cli.width, metrics)?
    } else if let Some(ref path) = cli.path {
        Page::open(path, &sheets, cli.width, metrics)?
    } else {
        anyhow::bail!("a file path or --html is required")
    };

    let display_list = if cli.outline {
        page.outlined_display_list()
    } else {
        page.display_list.clone()
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&display_list)?);
        return Ok(());
    }

    if cli.boxes {
        println!(
            "{}",
            format!("=== Layout Tree (width: {}) ===", page.config.page_width).bold()
        );
        print!("{}", dump_boxes(&page, &page.document, 0));
    } else if !cli.paint {
        print_document(&page);
    }

    if cli.paint {
        println!(
            "{}",
            format!(
                "=== Display List (scroll: {}, height: {}) ===",
                cli.scroll, cli.height
            )
            .bold()
        );
        let mut surface = TextSurface::default();
        display_list.render(cli.scroll, cli.height, &mut surface);
        for line in &surface.lines {
            println!("{line}");
        }
    }

    Ok(())
}

/// System font metrics, or fixed-width ones when asked for or when no
/// system font can be found.
fn font_metrics(fixed: bool) -> Arc<dyn FontMetrics> {
    if fixed {
        return Arc::new(FixedWidthFontMetrics::new());
    }
    match FontdueFontMetrics::load_system() {
        Ok(metrics) => Arc::new(metrics),
        Err(e) => {
            warn_once("Fonts", &format!("{e:#}; using fixed-width metrics"));
            Arc::new(FixedWidthFontMetrics::new())
        }
    }
}

/// Print the node tree, rule count and parse issues.
fn print_document(page: &Page) {
    println!("{}", "=== DOM Tree ===".bold());
    print!("{}", dump_tree(&page.tree, page.tree.root(), 0));

    println!("\n{}", "=== Stylesheet ===".bold());
    println!("{} rules", page.rules.len());

    println!("\n{}", "=== Layout ===".bold());
    println!(
        "{} boxes, {} drawing commands, content height {:.1}",
        page.document.flatten().len(),
        page.display_list.len(),
        page.content_height()
    );

    if !page.issues.is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold());
        for issue in &page.issues {
            println!("  - {} (at byte {})", issue.message.yellow(), issue.offset);
        }
    }
}

/// Render a layout box and its descendants, one per line.
fn dump_boxes(page: &Page, layout_box: &LayoutBox, depth: usize) -> String {
    let mut out = String::new();
    let mut stack = vec![(layout_box, depth)];
    while let Some((layout_box, depth)) = stack.pop() {
        out.push_str(&describe_box(page, layout_box, depth));
        stack.extend(layout_box.children.iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

/// One indented line for a single box.
fn describe_box(page: &Page, layout_box: &LayoutBox, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let name = match &layout_box.kind {
        BoxKind::Document => "Document".to_string(),
        BoxKind::Block => page.tree.tag_name(layout_box.node).map_or_else(
            || format!("Block ({:?})", layout_box.node),
            |tag| format!("<{tag}> ({:?})", layout_box.node),
        ),
        BoxKind::Line => "Line".to_string(),
        BoxKind::Text(fragment) => {
            let sup = if fragment.superscript { " sup" } else { "" };
            format!(
                "Text(\"{}\") {}px {}{sup}",
                fragment.text, fragment.font.size, fragment.color
            )
        }
    };
    let Rect {
        x,
        y,
        width,
        height,
    } = layout_box.rect;

    format!("{indent}[{name}] x={x:.1} y={y:.1} w={width:.1} h={height:.1}\n")
}

/// A surface that writes each drawing call as a line of text.
#[derive(Default)]
struct TextSurface {
    lines: Vec<String>,
}

impl TextSurface {
    fn record(&mut self, args: std::fmt::Arguments<'_>) {
        self.lines.push(args.to_string());
    }
}

impl Surface for TextSurface {
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: &str, font: &Font) {
        self.record(format_args!(
            "text    ({x:.1}, {y:.1}) {text:?} {color} {}px {} {}",
            font.size, font.weight, font.slant
        ));
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.record(format_args!(
            "rect    ({:.1}, {:.1}) {:.1}x{:.1} {color}",
            rect.x, rect.y, rect.width, rect.height
        ));
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: &str, thickness: f32) {
        self.record(format_args!(
            "line    ({:.1}, {:.1}) -> ({:.1}, {:.1}) {color} {thickness}px",
            from.0, from.1, to.0, to.1
        ));
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, thickness: f32) {
        self.record(format_args!(
            "outline ({:.1}, {:.1}) {:.1}x{:.1} {color} {thickness}px",
            rect.x, rect.y, rect.width, rect.height
        ));
    }
}
