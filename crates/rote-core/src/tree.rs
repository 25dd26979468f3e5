//! Immutable snapshot of the page's UI tree.
//!
//! Adapters ship the tree as a flat list of [`WireNode`]s, each naming its parent,
//! so no wire message nests as deep as the page does. It is rebuilt into an arena
//! so routines can walk to parents and siblings through [`NodeRef`]. Tests build
//! trees from the nested [`UiNode`] form instead.

use std::collections::HashMap;

use rote_types::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;

fn default_visible() -> bool {
    true
}

/// One node of the flat wire form.
///
/// The first node is the root and has no parent. Every other node must come after its
/// parent; siblings keep their relative order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// Tag name, lower-case
    #[serde(default)]
    pub tag: String,

    #[serde(default)]
    pub classes: Vec<String>,

    /// Direct text only, not from children
    #[serde(default)]
    pub text: String,

    /// Whether the element takes part in layout (has an offset parent)
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Nested form of a node
#[derive(Debug, Clone, PartialEq)]
pub struct UiNode {
    pub id: NodeId,
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
    pub visible: bool,
    pub children: Vec<UiNode>,
}

#[derive(Debug, Clone)]
struct NodeData {
    id: NodeId,
    tag: String,
    classes: Vec<String>,
    text: String,
    visible: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Flattened snapshot. Index 0 is the root and arena order is document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<WireNode>", into = "Vec<WireNode>")]
pub struct UiTree {
    nodes: Vec<NodeData>,
    index: HashMap<NodeId, usize>,
}

impl UiTree {
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { tree: self, idx: 0 }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.index.get(&id).map(|&idx| NodeRef { tree: self, idx })
    }

    /// Whether a node is still attached to the document
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node in document order matching `selector`, root included
    pub fn find(&self, selector: &Selector) -> Option<NodeRef<'_>> {
        self.all().find(|node| selector.matches(*node))
    }

    /// Every node in document order matching `selector`, root included
    pub fn find_all<'a, 's>(
        &'a self,
        selector: &'s Selector,
    ) -> impl Iterator<Item = NodeRef<'a>> + use<'a, 's> {
        self.all().filter(move |node| selector.matches(*node))
    }

    /// Whether any node's own text contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.nodes.iter().any(|node| node.text.contains(needle))
    }

    fn all(&self) -> impl Iterator<Item = NodeRef<'_>> + use<'_> {
        (0..self.nodes.len()).map(move |idx| NodeRef { tree: self, idx })
    }

    fn push(&mut self, node: UiNode, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.index.insert(node.id, idx);
        self.nodes.push(NodeData {
            id: node.id,
            tag: node.tag.to_ascii_lowercase(),
            classes: node.classes,
            text: node.text,
            visible: node.visible,
            parent,
            children: Vec::with_capacity(node.children.len()),
        });

        for child in node.children {
            let child_idx = self.push(child, Some(idx));
            self.nodes[idx].children.push(child_idx);
        }

        idx
    }
}

impl From<UiNode> for UiTree {
    fn from(root: UiNode) -> Self {
        let mut tree = UiTree {
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        tree.push(root, None);
        tree
    }
}

impl TryFrom<Vec<WireNode>> for UiTree {
    type Error = TreeError;

    fn try_from(wire: Vec<WireNode>) -> Result<Self, Self::Error> {
        // Link nodes in arrival order first.
        let mut linked: Vec<NodeData> = Vec::with_capacity(wire.len());
        let mut arrival: HashMap<NodeId, usize> = HashMap::with_capacity(wire.len());

        for (pos, node) in wire.into_iter().enumerate() {
            let parent = match (pos, node.parent) {
                (0, None) => None,
                (0, Some(_)) => return Err(TreeError::RootHasParent(node.id)),
                (_, None) => return Err(TreeError::SecondRoot(node.id)),
                (_, Some(parent)) => match arrival.get(&parent) {
                    Some(&idx) => Some(idx),
                    None => {
                        return Err(TreeError::UnknownParent {
                            node: node.id,
                            parent,
                        });
                    }
                },
            };
            if arrival.insert(node.id, pos).is_some() {
                return Err(TreeError::DuplicateId(node.id));
            }
            if let Some(parent) = parent {
                linked[parent].children.push(pos);
            }
            linked.push(NodeData {
                id: node.id,
                tag: node.tag.to_ascii_lowercase(),
                classes: node.classes,
                text: node.text,
                visible: node.visible,
                parent,
                children: Vec::new(),
            });
        }

        if linked.is_empty() {
            return Err(TreeError::Empty);
        }

        // Renumber in document order; parents may have been listed breadth-first.
        let mut order = Vec::with_capacity(linked.len());
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(linked[idx].children.iter().rev().copied());
        }
        let mut renumber = vec![0usize; linked.len()];
        for (new, &old) in order.iter().enumerate() {
            renumber[old] = new;
        }

        let mut slots: Vec<Option<NodeData>> = linked.into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(slots.len());
        let mut index = HashMap::with_capacity(slots.len());
        for old in order {
            if let Some(mut data) = slots[old].take() {
                data.parent = data.parent.map(|p| renumber[p]);
                for child in &mut data.children {
                    *child = renumber[*child];
                }
                index.insert(data.id, nodes.len());
                nodes.push(data);
            }
        }

        Ok(UiTree { nodes, index })
    }
}

impl From<UiTree> for Vec<WireNode> {
    fn from(tree: UiTree) -> Self {
        let ids: Vec<NodeId> = tree.nodes.iter().map(|data| data.id).collect();
        tree.nodes
            .into_iter()
            .map(|data| WireNode {
                id: data.id,
                parent: data.parent.map(|p| ids[p]),
                tag: data.tag,
                classes: data.classes,
                text: data.text,
                visible: data.visible,
            })
            .collect()
    }
}

/// Borrowed handle to one node of a [`UiTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a UiTree,
    idx: usize,
}

impl<'a> NodeRef<'a> {
    fn data(self) -> &'a NodeData {
        &self.tree.nodes[self.idx]
    }

    fn at(self, idx: usize) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            idx,
        }
    }

    pub fn id(self) -> NodeId {
        self.data().id
    }

    pub fn tag(self) -> &'a str {
        &self.data().tag
    }

    pub fn has_class(self, class: &str) -> bool {
        self.data().classes.iter().any(|c| c == class)
    }

    pub fn is_disabled(self) -> bool {
        self.has_class("disabled")
    }

    /// `offsetParent` semantics: hidden when the node or any ancestor is hidden
    pub fn is_visible(self) -> bool {
        let mut current = Some(self);
        while let Some(node) = current {
            if !node.data().visible {
                return false;
            }
            current = node.parent();
        }
        true
    }

    pub fn own_text(self) -> &'a str {
        &self.data().text
    }

    /// Own text followed by all descendant text, in document order
    pub fn text_content(self) -> String {
        let mut out = self.own_text().to_string();
        for node in self.descendants() {
            out.push_str(node.own_text());
        }
        out
    }

    /// `text_content` with surrounding whitespace removed
    pub fn text(self) -> String {
        self.text_content().trim().to_string()
    }

    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.data().parent.map(|idx| self.at(idx))
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&idx| NodeRef { tree, idx })
    }

    pub fn next_sibling(self) -> Option<NodeRef<'a>> {
        let parent = self.parent()?;
        let siblings = &parent.data().children;
        let pos = siblings.iter().position(|&idx| idx == self.idx)?;
        siblings.get(pos + 1).map(|&idx| self.at(idx))
    }

    /// Descendants in document order, excluding `self`
    pub fn descendants(self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let mut stack: Vec<usize> = self.data().children.iter().rev().copied().collect();
        let tree = self.tree;
        std::iter::from_fn(move || {
            let idx = stack.pop()?;
            stack.extend(tree.nodes[idx].children.iter().rev().copied());
            Some(NodeRef { tree, idx })
        })
    }

    /// First matching descendant (`element.querySelector`)
    pub fn find(self, selector: &Selector) -> Option<NodeRef<'a>> {
        self.descendants().find(|node| selector.matches(*node))
    }

    /// Every matching descendant (`element.querySelectorAll`)
    pub fn find_all<'s>(
        self,
        selector: &'s Selector,
    ) -> impl Iterator<Item = NodeRef<'a>> + use<'a, 's> {
        self.descendants().filter(move |node| selector.matches(*node))
    }

    /// Nearest ancestor-or-self matching `selector`
    pub fn closest(self, selector: &Selector) -> Option<NodeRef<'a>> {
        let mut current = Some(self);
        while let Some(node) = current {
            if selector.matches(node) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    pub fn contains(self, other: NodeRef<'_>) -> bool {
        other.closest_idx(self.idx)
    }

    fn closest_idx(self, ancestor: usize) -> bool {
        let mut current = Some(self);
        while let Some(node) = current {
            if node.idx == ancestor {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data();
        f.debug_struct("NodeRef")
            .field("id", &data.id)
            .field("tag", &data.tag)
            .field("classes", &data.classes)
            .finish()
    }
}

/// Compound selector: optional tag, required classes, excluded classes.
///
/// Covers `a.next:not(.disabled)`; descendant relations are expressed by chaining `find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    excluded: Vec<String>,
}

impl Selector {
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    pub fn class(class: &str) -> Self {
        Self::default().and_class(class)
    }

    pub fn and_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn not(mut self, class: &str) -> Self {
        self.excluded.push(class.to_string());
        self
    }

    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        if let Some(tag) = &self.tag
            && node.tag() != tag
        {
            return false;
        }

        self.classes.iter().all(|c| node.has_class(c))
            && !self.excluded.iter().any(|c| node.has_class(c))
    }
}
