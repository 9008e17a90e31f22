//! Node tree for the Wren renderer.
//!
//! The markup parser builds a [`DomTree`] once per page load; the cascade then
//! fills in each node's computed style in place, and layout reads it without
//! further mutation.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! A parent link is a plain index, so walking up to ancestors (which descendant
//! selectors and link hit-testing need) costs nothing in ownership terms.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// Computed style of a node: property name to resolved string value.
pub type StyleMap = HashMap<String, String>;

/// A type-safe index into the node tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root element is always the first node allocated.
    pub const ROOT: Self = Self(0);
}

/// A node in the tree: its payload plus its position.
#[derive(Debug, Clone)]
pub struct Node {
    /// Element or text payload.
    pub node_type: NodeType,

    /// The node whose child list contains this node. `None` for the root and
    /// for nodes not yet attached.
    pub parent: Option<NodeId>,

    /// Children in document order. Always empty for text nodes.
    pub children: Vec<NodeId>,

    /// Computed style. `None` until the cascade has visited this node.
    pub style: Option<StyleMap>,
}

/// The two kinds of node the parser produces.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// A tagged element with attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag_name: String,
    /// Attribute list with lowercase keys.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Look up an attribute value by (lowercase) name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Arena-based node tree with O(1) node access and parent traversal.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create an empty tree. The first node allocated becomes the root.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena, attached or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True before the first allocation.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            style: None,
        });
        id
    }

    /// Allocate an element with the given tag and attributes.
    pub fn alloc_element(&mut self, tag_name: impl Into<String>, attrs: AttributesMap) -> NodeId {
        self.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.into(),
            attrs,
        }))
    }

    /// Allocate a text node.
    pub fn alloc_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(text.into()))
    }

    /// Appends `child` as the last child of `parent`, setting the child's
    /// parent link in the same step.
    ///
    /// An attached `child` is first removed from its old parent's children,
    /// so every node sits in at most one child list. Appending a node under
    /// itself or under one of its own descendants is ignored.
    ///
    /// Both ids must come from this tree's `alloc`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child == parent
            || (!self.nodes[child.0].children.is_empty()
                && self.ancestors(parent).any(|ancestor| ancestor == child))
        {
            return;
        }
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and all its descendants in pre-order
    /// (document order).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> PreOrderIterator<'_> {
        let stack = if self.get(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        PreOrderIterator { tree: self, stack }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// Concatenation of all text nodes under `id`, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.as_text(n))
            .collect()
    }

    /// Computed style of a node, if the cascade has reached it.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&StyleMap> {
        self.get(id).and_then(|n| n.style.as_ref())
    }

    /// Replace the computed style of a node. Out-of-range ids are ignored.
    pub fn set_style(&mut self, id: NodeId, style: StyleMap) {
        if let Some(node) = self.get_mut(id) {
            node.style = Some(style);
        }
    }

    /// Drop every computed style so the cascade can run again.
    pub fn clear_styles(&mut self) {
        for node in &mut self.nodes {
            node.style = None;
        }
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Depth-first, parents-before-children iterator over a subtree.
pub struct PreOrderIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrderIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
