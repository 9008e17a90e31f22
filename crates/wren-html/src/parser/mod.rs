//! Markup parser module for tree construction.

/// Tag attribute scanning.
mod attributes;
/// Markup parser implementation.
mod tree_builder;

pub use self::tree_builder::{HEAD_TAGS, HTMLParser, ParseIssue, SELF_CLOSING_TAGS, dump_tree, parse};
