//! Markup parser for the Wren renderer.
//!
//! # Scope
//!
//! A single left-to-right scan over HTML-like text that keeps a stack of
//! unfinished elements and never fails:
//! - tags with quoted or bare attributes, self-closing void elements
//! - implicit `html`/`head`/`body` insertion
//! - named and numeric character references
//! - whitespace collapsing, comments, raw-text `script`/`style` content
//!
//! Malformed input is repaired and reported as [`ParseIssue`]s.
//!
//! # Not Implemented
//!
//! - Insertion modes beyond the implicit document skeleton
//! - Mis-nested formatting elements (a closing tag always closes the
//!   innermost open element)
//! - Tables, forms, foreign content

/// Character reference table and decoding.
pub mod entities;
/// Tree construction.
pub mod parser;

pub use parser::{HEAD_TAGS, HTMLParser, ParseIssue, SELF_CLOSING_TAGS, dump_tree, parse};
