//! Arena-backed document tree.
//!
//! Nodes are addressed by [`NodeId`] and never freed; detached nodes simply
//! become unreachable from the root. Every mutation the page controller needs
//! (class flips, wrapping and unwrapping markers, splitting text) lives here
//! so handlers never touch the arena directly.

use std::fmt;

use super::selector::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A rendered page: `html` root with `head` and `body` children.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // --- Construction ---

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            classes: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` before `reference`. Appends when `reference` is not a
    /// child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let idx = self.child_index(parent, reference);
        self.nodes[child.0].parent = Some(parent);
        match idx {
            Some(i) => self.nodes[parent.0].children.insert(i, child),
            None => self.nodes[parent.0].children.push(child),
        }
    }

    /// Remove a node from its parent. The node keeps its own subtree.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    /// Put `node` inside `wrapper`, with `wrapper` taking its old place.
    pub fn wrap(&mut self, node: NodeId, wrapper: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.insert_before(parent, wrapper, node);
        }
        self.append_child(wrapper, node);
    }

    /// Replace `node` with its own children.
    pub fn unwrap(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for &child in &children {
            self.nodes[child.0].parent = None;
        }
        for child in children {
            self.insert_before(parent, child, node);
        }
        self.detach(node);
    }

    /// Split a text node at a byte offset. The original keeps `[..offset]`,
    /// the returned sibling holds `[offset..]`.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Option<NodeId> {
        let tail = match &mut self.nodes[node.0].data {
            NodeData::Text(text) if text.is_char_boundary(offset) && offset <= text.len() => {
                text.split_off(offset)
            }
            _ => return None,
        };
        let sibling = self.create_text(&tail);
        if let Some(parent) = self.parent(node) {
            let idx = self.child_index(parent, node).map(|i| i + 1);
            self.nodes[sibling.0].parent = Some(parent);
            match idx {
                Some(i) => self.nodes[parent.0].children.insert(i, sibling),
                None => self.nodes[parent.0].children.push(sibling),
            }
        }
        Some(sibling)
    }

    /// Merge adjacent text nodes and drop empty ones beneath `node`.
    pub fn normalize(&mut self, node: NodeId) {
        let children = self.nodes[node.0].children.clone();
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            let text = match &self.nodes[child.0].data {
                NodeData::Text(t) => Some(t.clone()),
                NodeData::Element(_) => None,
            };
            match text {
                Some(t) if t.is_empty() => {
                    self.nodes[child.0].parent = None;
                }
                Some(t) => {
                    if let Some(&prev) = kept.last()
                        && let NodeData::Text(prev_text) = &mut self.nodes[prev.0].data
                    {
                        prev_text.push_str(&t);
                        self.nodes[child.0].parent = None;
                        continue;
                    }
                    kept.push(child);
                }
                None => {
                    self.normalize(child);
                    kept.push(child);
                }
            }
        }
        self.nodes[node.0].children = kept;
    }

    /// Drop every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    // --- Inspection ---

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0].data
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes[node.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[node.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => Some(t.as_str()),
            NodeData::Element(_) => None,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Text(_))
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Element(_) => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Text nodes beneath `node` in document order.
    pub fn text_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.is_text(node) {
            out.push(node);
        }
        out.extend(self.descendants(node).into_iter().filter(|&n| self.is_text(n)));
        out
    }

    /// Pre-order walk of everything beneath `node`, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// `node` followed by each of its ancestors up to the root.
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    /// True when `other` is `node` or sits somewhere beneath it.
    pub fn contains(&self, node: NodeId, other: NodeId) -> bool {
        self.ancestors_inclusive(other).contains(&node)
    }

    /// True when `node` belongs to this arena and is reachable from the
    /// document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len() && self.contains(self.root, node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let idx = self.child_index(parent, node)?;
        self.nodes[parent.0].children.get(idx + 1).copied()
    }

    // --- Attributes and classes ---

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        let el = self.element(node)?;
        if name == "class" {
            return None;
        }
        el.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "class" {
            let classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            if let Some(el) = self.element_mut(node) {
                el.classes = classes;
            }
            return;
        }
        if let Some(el) = self.element_mut(node) {
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => el.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node).map(|el| el.classes.as_slice()).unwrap_or(&[])
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node)
            && !el.classes.iter().any(|c| c == class)
        {
            el.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Flip a class. Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    // --- Lookup ---

    /// First attached element carrying the given `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.id(n) == Some(id))
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }
}
