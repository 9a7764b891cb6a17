//! Scene-graph capability consumed by the reconciler.
//!
//! The reconciler never touches a concrete rendering surface. It only needs to select
//! direct children, append elements and text, remove subtrees and set classes and styles.

use std::collections::{BTreeMap, BTreeSet};

use generational_arena::Index;

use crate::domain::error::DomainResult;

/// Handle to a node owned by a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text { text: String },
}

/// A visual node: an element container or a text label.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    pub fn element(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_string(),
            },
            classes: BTreeSet::new(),
            styles: BTreeMap::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn text(text: &str, parent: NodeId) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_string(),
            },
            classes: BTreeSet::new(),
            styles: BTreeMap::new(),
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { text } => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }
}

/// Matches direct children by kind, tag and class, e.g. `div.child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    tag: Option<&'a str>,
    text: bool,
    class: Option<&'a str>,
}

impl<'a> Selector<'a> {
    pub fn element(tag: &'a str) -> Self {
        Self {
            tag: Some(tag),
            text: false,
            class: None,
        }
    }

    pub fn text() -> Self {
        Self {
            tag: None,
            text: true,
            class: None,
        }
    }

    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn matches(&self, node: &SceneNode) -> bool {
        let kind_ok = match (&node.kind, self.text) {
            (NodeKind::Text { .. }, true) => true,
            (NodeKind::Element { tag }, false) => self.tag.map_or(true, |t| t == tag),
            _ => false,
        };
        kind_ok && self.class.map_or(true, |c| node.has_class(c))
    }
}

/// Mutable scene graph owning the rendered tree.
///
/// Implementations own a single container node; everything the reconciler renders lives
/// beneath it.
pub trait SceneGraph {
    /// The host container the visual renders into.
    fn container(&self) -> NodeId;

    fn node(&self, id: NodeId) -> Option<&SceneNode>;

    /// Direct children of `parent` matching `selector`, in document order.
    fn select_children(&self, parent: NodeId, selector: Selector<'_>) -> DomainResult<Vec<NodeId>>;

    fn append_element(&mut self, parent: NodeId, tag: &str) -> DomainResult<NodeId>;

    fn append_text(&mut self, parent: NodeId, text: &str) -> DomainResult<NodeId>;

    /// Insert a text node as the first child of `parent`.
    fn prepend_text(&mut self, parent: NodeId, text: &str) -> DomainResult<NodeId>;

    /// Remove `id` and its whole subtree.
    fn remove(&mut self, id: NodeId) -> DomainResult<()>;

    fn set_class(&mut self, id: NodeId, class: &str, enabled: bool) -> DomainResult<()>;

    fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> DomainResult<()>;
}
