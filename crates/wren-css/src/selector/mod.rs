//! Tag and descendant selectors.
//!
//! [Selectors Level 4 § 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
//! and [§ 15.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators).

use std::fmt;

use wren_dom::{DomTree, NodeId};

/// A selector over the node tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Matches elements with this (lowercase) tag name.
    Tag(String),
    /// Matches nodes matching `descendant` that have a strict ancestor
    /// matching `ancestor`.
    Descendant {
        /// Selector some ancestor must match.
        ancestor: Box<Selector>,
        /// Selector the node itself must match.
        descendant: Box<Selector>,
    },
}

impl Selector {
    /// Shorthand for a tag selector.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::Tag(name.to_lowercase())
    }

    /// Shorthand for a descendant selector.
    #[must_use]
    pub fn descendant(ancestor: Self, descendant: Self) -> Self {
        Self::Descendant {
            ancestor: Box::new(ancestor),
            descendant: Box::new(descendant),
        }
    }

    /// Specificity: each tag component weighs 1, descendant chains add up.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Self::Tag(_) => 1,
            Self::Descendant {
                ancestor,
                descendant,
            } => ancestor.priority() + descendant.priority(),
        }
    }

    /// Does this selector match node `id`? Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.tag_name(id) == Some(tag.as_str()),
            Self::Descendant {
                ancestor,
                descendant,
            } => {
                descendant.matches(tree, id)
                    && tree.ancestors(id).any(|up| ancestor.matches(tree, up))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Descendant {
                ancestor,
                descendant,
            } => write!(f, "{ancestor} {descendant}"),
        }
    }
}
