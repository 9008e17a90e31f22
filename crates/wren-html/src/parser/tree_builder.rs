use std::fmt::Write as _;

use wren_common::warning::warn_once;
use wren_dom::{AttributesMap, DomTree, NodeId, NodeType};

use super::attributes::parse_tag;
use crate::entities::decode_reference;

/// Void elements: they never get children and need no closing tag.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags that open an implicit `head` when they appear before any body content.
pub const HEAD_TAGS: &[&str] = &[
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// Elements whose content is taken verbatim up to the matching close tag.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Something malformed that the parser repaired instead of failing on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was wrong and how it was handled.
    pub message: String,
    /// Byte offset into the input where the problem was noticed.
    pub offset: usize,
}

/// Single-pass tree builder.
///
/// Scans the input once, left to right, keeping a stack of unfinished
/// elements. New nodes are attached to the innermost unfinished element as
/// soon as they are created; a closing tag simply pops the stack. Missing
/// `html`, `head` and `body` elements are inserted on demand.
///
/// # Example
///
/// ```
/// use wren_dom::NodeId;
/// use wren_html::HTMLParser;
///
/// let tree = HTMLParser::new("<p>Hello &amp; world</p>").run();
/// assert_eq!(tree.tag_name(NodeId::ROOT), Some("html"));
/// assert_eq!(tree.text_content(NodeId::ROOT), "Hello & world");
/// ```
pub struct HTMLParser<'a> {
    /// The full markup being parsed.
    input: &'a str,

    /// Byte offset of the next unread character.
    pos: usize,

    /// The tree being built. The root `html` element is its first node.
    tree: DomTree,

    /// Stack of open elements, outermost first.
    unfinished: Vec<NodeId>,

    /// Issues recovered from so far.
    issues: Vec<ParseIssue>,
}

impl<'a> HTMLParser<'a> {
    /// Create a parser over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tree: DomTree::new(),
            unfinished: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the finished tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return the tree plus every issue it recovered from.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.scan();
        self.finish();
        (self.tree, self.issues)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn record_issue(&mut self, message: String) {
        warn_once("HTML", &message);
        self.issues.push(ParseIssue {
            message,
            offset: self.pos,
        });
    }

    fn scan(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '<' => {
                    self.flush_text(&mut text);
                    self.consume_markup();
                }
                '&' => match decode_reference(&self.input[self.pos..]) {
                    Some((replacement, consumed)) => {
                        text.push_str(&replacement);
                        self.pos += consumed;
                    }
                    None => {
                        text.push('&');
                        self.pos += 1;
                    }
                },
                c if c.is_ascii_whitespace() => {
                    // Collapse runs; drop whitespace that opens a text run.
                    if !text.is_empty() && !text.ends_with(' ') {
                        text.push(' ');
                    }
                    self.pos += 1;
                }
                c => {
                    text.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.flush_text(&mut text);
    }

    /// Consume everything from a `<` up to and including its `>`.
    fn consume_markup(&mut self) {
        let input = self.input;
        let rest = &input[self.pos..];
        if rest.starts_with("<!--") {
            match rest[4..].find("-->") {
                Some(end) => self.pos += 4 + end + 3,
                None => {
                    self.record_issue("unterminated comment runs to end of input".to_string());
                    self.pos = self.input.len();
                }
            }
            return;
        }

        self.pos += 1;
        let mut start = self.pos;
        let mut quote: Option<char> = None;
        let mut prev: Option<char> = None;
        loop {
            let Some(c) = self.peek() else {
                let partial = input[start..].trim();
                self.record_issue(format!("unterminated tag '<{partial}' dropped at end of input"));
                return;
            };
            self.pos += c.len_utf8();
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') if prev == Some('=') => quote = Some(c),
                (None, '>') => break,
                (None, '<') => {
                    let abandoned = input[start..self.pos - 1].trim();
                    self.record_issue(format!("'<' inside tag '<{abandoned}'; restarting tag"));
                    start = self.pos;
                }
                _ => {}
            }
            if !c.is_ascii_whitespace() {
                prev = Some(c);
            }
        }

        let raw = &input[start..self.pos - 1];
        if let Some(raw_text_tag) = self.add_tag(raw) {
            self.consume_raw_text(raw_text_tag);
        }
    }

    /// Capture `script`/`style` content verbatim, stopping before the
    /// matching close tag (which is then parsed normally).
    fn consume_raw_text(&mut self, tag: &str) {
        let input = self.input;
        let rest = &input[self.pos..];
        let close = format!("</{tag}");
        let (content, consumed) = match rest.to_ascii_lowercase().find(&close) {
            Some(end) => (&rest[..end], end),
            None => {
                self.record_issue(format!("<{tag}> is never closed"));
                (rest, rest.len())
            }
        };
        if !content.chars().all(|c| c.is_ascii_whitespace())
            && let Some(&parent) = self.unfinished.last()
        {
            let text = self.tree.alloc_text(content);
            self.tree.append_child(parent, text);
        }
        self.pos += consumed;
    }

    fn flush_text(&mut self, buffer: &mut String) {
        let text = std::mem::take(buffer);
        if text.chars().all(|c| c.is_ascii_whitespace()) {
            return;
        }
        self.implicit_tags(None);
        if let Some(&parent) = self.unfinished.last() {
            let id = self.tree.alloc_text(text);
            self.tree.append_child(parent, id);
        }
    }

    /// Handle the text between `<` and `>`. Returns the tag name when it
    /// opened a raw-text element.
    fn add_tag(&mut self, raw: &str) -> Option<&'static str> {
        let Some((name, attrs)) = parse_tag(raw) else {
            self.record_issue("empty tag '<>' ignored".to_string());
            return None;
        };
        if name.starts_with(['!', '?']) {
            return None;
        }
        if name == "/" {
            self.record_issue("closing tag without a name ignored".to_string());
            return None;
        }
        self.insert_tag(name, attrs)
    }

    fn insert_tag(&mut self, name: String, attrs: AttributesMap) -> Option<&'static str> {
        self.implicit_tags(Some(&name));

        if let Some(closing) = name.strip_prefix('/') {
            if self.unfinished.len() <= 1 {
                let closes_root = self
                    .unfinished
                    .first()
                    .is_some_and(|&root| self.tree.tag_name(root) == Some(closing));
                if !closes_root {
                    self.record_issue(format!(
                        "closing tag </{closing}> with nothing left to close"
                    ));
                }
                return None;
            }
            if let Some(popped) = self.unfinished.pop()
                && self.tree.tag_name(popped) != Some(closing)
            {
                let open = self.tree.tag_name(popped).unwrap_or_default().to_string();
                self.record_issue(format!("closing tag </{closing}> closed <{open}>"));
            }
            return None;
        }

        let parent = self.unfinished.last().copied();
        let raw_text = RAW_TEXT_TAGS.iter().copied().find(|&t| t == name);
        let is_void = SELF_CLOSING_TAGS.contains(&name.as_str());
        let id = self.tree.alloc_element(name, attrs);
        if let Some(parent) = parent {
            self.tree.append_child(parent, id);
        }
        if !is_void {
            self.unfinished.push(id);
        }
        raw_text
    }

    /// Does the open-element stack hold exactly these tags?
    fn open_tags_are(&self, expected: &[&str]) -> bool {
        self.unfinished.len() == expected.len()
            && self
                .unfinished
                .iter()
                .zip(expected)
                .all(|(&id, &tag)| self.tree.tag_name(id) == Some(tag))
    }

    /// Insert the `html`/`head`/`body` skeleton the incoming tag (or text,
    /// when `tag` is `None`) needs.
    fn implicit_tags(&mut self, tag: Option<&str>) {
        loop {
            if self.unfinished.is_empty() && tag != Some("html") {
                let _ = self.insert_tag("html".to_string(), AttributesMap::new());
            } else if self.open_tags_are(&["html"])
                && !matches!(tag, Some("head" | "body" | "/html"))
            {
                let implied = if tag.is_some_and(|t| HEAD_TAGS.contains(&t)) {
                    "head"
                } else {
                    "body"
                };
                let _ = self.insert_tag(implied.to_string(), AttributesMap::new());
            } else if self.open_tags_are(&["html", "head"])
                && !tag.is_some_and(|t| t == "/head" || HEAD_TAGS.contains(&t))
            {
                let _ = self.insert_tag("/head".to_string(), AttributesMap::new());
            } else {
                break;
            }
        }
    }

    /// Close everything still open. An empty document still gets its
    /// `html`/`body` skeleton.
    fn finish(&mut self) {
        if self.tree.is_empty() {
            self.implicit_tags(None);
        }
        self.unfinished.clear();
    }
}

/// Parse `html` into a tree whose root element is at [`NodeId::ROOT`].
#[must_use]
pub fn parse(html: &str) -> DomTree {
    HTMLParser::new(html).run()
}

/// Render a subtree as indented text, one node per line.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId, indent: usize) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, indent)];
    while let Some((id, depth)) = stack.pop() {
        write_node(tree, id, depth, &mut out);
        stack.extend(tree.children(id).iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| {
                    if v.is_empty() {
                        k.clone()
                    } else {
                        format!("{k}=\"{v}\"")
                    }
                })
                .collect();
            attrs.sort();
            if attrs.is_empty() {
                let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
            } else {
                let _ = writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
}
