//! Stylesheet parser.
//!
//! A character-level recursive-descent parser for a deliberately small
//! grammar:
//!
//! ```text
//! stylesheet  := rule*
//! rule        := selector '{' declaration* '}'
//! selector    := word (word)*            (descendant chain)
//! declaration := word ':' word (';' | before '}')
//! word        := [alphanumeric #-.%]+
//! ```
//!
//! Errors never escape: a malformed declaration is skipped up to the next
//! `;` or `}`, a malformed rule up to the next `}`. `/* ... */` comments are
//! allowed anywhere whitespace is.

use std::collections::HashMap;

use wren_common::warning::warn_once;

use crate::selector::Selector;

/// Property name (lowercase) to raw value, as written in one rule body.
pub type Declarations = HashMap<String, String>;

/// How far past an error position to quote in warnings.
const CONTEXT_CHARS: usize = 20;

/// A parsed style rule: a selector plus its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Which nodes the rule applies to.
    pub selector: Selector,
    /// The declarations to apply, property to raw value.
    pub declarations: Declarations,
}

impl Rule {
    /// Build a rule from a selector and `(property, value)` pairs.
    #[must_use]
    pub fn new<'a>(selector: Selector, declarations: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            selector,
            declarations: declarations
                .into_iter()
                .map(|(p, v)| (p.to_ascii_lowercase(), v.to_string()))
                .collect(),
        }
    }

    /// Cascade priority of this rule (its selector's specificity).
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.selector.priority()
    }
}

/// An ordered list of rules, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// The rules in the order they were written.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the sheet has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Reason a rule or declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} at offset {position}")]
pub struct CssSyntaxError {
    /// What the parser was looking for.
    pub expected: &'static str,
    /// Character offset where it gave up.
    pub position: usize,
}

/// Stylesheet parser over one piece of text.
pub struct CSSParser {
    chars: Vec<char>,
    pos: usize,
}

impl CSSParser {
    /// Create a parser over `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    /// Parse the whole input as a stylesheet.
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let mut rules = Vec::new();
        loop {
            self.whitespace();
            if self.at_end() {
                break;
            }
            let start = self.pos;
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    warn_once(
                        "CSS",
                        &format!("skipped rule near '{}': {err}", self.context(start)),
                    );
                    if self.ignore_until(&['}']).is_none() {
                        break;
                    }
                    self.pos += 1;
                }
            }
        }
        Stylesheet { rules }
    }

    /// Parse the whole input as a bare declaration list, as found in a
    /// `style="..."` attribute.
    pub fn parse_declarations(&mut self) -> Declarations {
        let mut declarations = Declarations::new();
        loop {
            self.body(&mut declarations);
            // A stray '}' ends a rule body but not an attribute.
            if self.ignore_until(&['}']).is_none() {
                break;
            }
            self.pos += 1;
        }
        declarations
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn context(&self, start: usize) -> String {
        self.chars[start..]
            .iter()
            .take(CONTEXT_CHARS)
            .collect::<String>()
            .replace('\n', " ")
    }

    /// Skip whitespace and comments.
    fn whitespace(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.pos += 1;
            }
            if self.peek() == Some('/') && self.chars.get(self.pos + 1) == Some(&'*') {
                let body_start = self.pos + 2;
                let close = self.chars[body_start..]
                    .windows(2)
                    .position(|w| *w == ['*', '/']);
                self.pos = close.map_or(self.chars.len(), |offset| body_start + offset + 2);
            } else {
                return;
            }
        }
    }

    fn word(&mut self) -> Result<String, CssSyntaxError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%'))
        {
            self.pos += 1;
        }
        if self.pos > start {
            Ok(self.chars[start..self.pos].iter().collect())
        } else {
            Err(CssSyntaxError {
                expected: "a word",
                position: self.pos,
            })
        }
    }

    fn literal(&mut self, expected: char, description: &'static str) -> Result<(), CssSyntaxError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(CssSyntaxError {
                expected: description,
                position: self.pos,
            })
        }
    }

    /// Advance to the next of `stops` without consuming it.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.pos += 1;
        }
        None
    }

    fn selector(&mut self) -> Result<Selector, CssSyntaxError> {
        let mut selector = Selector::Tag(self.word()?.to_lowercase());
        self.whitespace();
        while !self.at_end() && self.peek() != Some('{') {
            let descendant = Selector::Tag(self.word()?.to_lowercase());
            selector = Selector::Descendant {
                ancestor: Box::new(selector),
                descendant: Box::new(descendant),
            };
            self.whitespace();
        }
        Ok(selector)
    }

    fn rule(&mut self) -> Result<Rule, CssSyntaxError> {
        let selector = self.selector()?;
        self.literal('{', "'{'")?;
        let mut declarations = Declarations::new();
        self.body(&mut declarations);
        self.literal('}', "'}'")?;
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// Parse declarations up to (not including) a `}` or end of input.
    fn body(&mut self, declarations: &mut Declarations) {
        loop {
            self.whitespace();
            if self.at_end() || self.peek() == Some('}') {
                return;
            }
            let start = self.pos;
            match self.declaration() {
                Ok((property, value)) => {
                    let _ = declarations.insert(property, value);
                }
                Err(err) => {
                    warn_once(
                        "CSS",
                        &format!("skipped declaration '{}': {err}", self.context(start)),
                    );
                    match self.ignore_until(&[';', '}']) {
                        Some(';') => self.pos += 1,
                        _ => return,
                    }
                }
            }
        }
    }

    /// `property : value` followed by `;`, or directly by the closing `}`.
    fn declaration(&mut self) -> Result<(String, String), CssSyntaxError> {
        let property = self.word()?.to_lowercase();
        self.whitespace();
        self.literal(':', "':'")?;
        self.whitespace();
        let value = self.word()?;
        self.whitespace();
        if self.at_end() || self.peek() == Some('}') {
            return Ok((property, value));
        }
        self.literal(';', "';'")?;
        Ok((property, value))
    }
}

/// Parse stylesheet text into rules, skipping anything malformed.
#[must_use]
pub fn parse_stylesheet(text: &str) -> Stylesheet {
    CSSParser::new(text).parse_stylesheet()
}
