use std::collections::{BTreeMap, BTreeSet};

use generational_arena::Arena;
use serde::Serialize;
use termtree::Tree;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::reconciler::{ROW_CLASS, ROW_TAG};
use crate::domain::scene::{NodeId, SceneGraph, SceneNode, Selector};

/// Tag of the container node every [`ArenaScene`] starts with.
pub const CONTAINER_TAG: &str = "visual";

/// Arena-backed scene graph.
///
/// Uses a generational arena so that handles to removed nodes are detected instead of
/// silently aliasing freshly created ones.
#[derive(Debug)]
pub struct ArenaScene {
    arena: Arena<SceneNode>,
    container: NodeId,
}

impl Default for ArenaScene {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaScene {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let container = NodeId(arena.insert(SceneNode::element(CONTAINER_TAG, None)));
        Self { arena, container }
    }

    /// Number of live nodes, container included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    fn get(&self, id: NodeId) -> DomainResult<&SceneNode> {
        self.arena.get(id.0).ok_or(DomainError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> DomainResult<&mut SceneNode> {
        self.arena.get_mut(id.0).ok_or(DomainError::UnknownNode(id))
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        node: SceneNode,
        index: Option<usize>,
    ) -> DomainResult<NodeId> {
        if !self.get(parent)?.is_element() {
            return Err(DomainError::NotAnElement(parent));
        }
        let id = NodeId(self.arena.insert(node));
        let children = &mut self.get_mut(parent)?.children;
        match index {
            Some(index) => children.insert(index.min(children.len()), id),
            None => children.push(id),
        }
        Ok(id)
    }

    /// Text of the direct text children of `id`, joined by a single space.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.arena.get(id.0) else {
            return String::new();
        };
        node.children
            .iter()
            .filter_map(|c| self.arena.get(c.0))
            .filter_map(SceneNode::text_value)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pre-order traversal of the subtree below `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.arena.get(id.0) {
            stack.extend(node.children.iter().rev().copied());
        }
        Descendants { scene: self, stack }
    }

    /// Count nodes anywhere below the container matching `selector`.
    pub fn count(&self, selector: Selector<'_>) -> usize {
        self.descendants(self.container)
            .filter(|(_, node)| selector.matches(node))
            .count()
    }

    /// Tree rows directly under `parent`, in sibling order.
    pub fn rows(&self, parent: NodeId) -> Vec<NodeId> {
        self.select_children(parent, Selector::element(ROW_TAG).class(ROW_CLASS))
            .unwrap_or_default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.container)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        match self.arena.get(id.0) {
            Some(node) if node.is_element() => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Serializable copy of the whole scene.
    pub fn snapshot(&self) -> SceneSnapshot {
        self.snapshot_node(self.container)
    }

    fn snapshot_node(&self, id: NodeId) -> SceneSnapshot {
        let Some(node) = self.arena.get(id.0) else {
            return SceneSnapshot::default();
        };
        SceneSnapshot {
            tag: node.tag().map(str::to_string),
            text: node.text_value().map(str::to_string),
            classes: node.classes.clone(),
            styles: node.styles.clone(),
            children: node
                .children
                .iter()
                .map(|&c| self.snapshot_node(c))
                .collect(),
        }
    }

    /// Element structure as a printable tree; each line is the element's text content.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn build(scene: &ArenaScene, id: NodeId, tree: &mut Tree<String>) {
            let Some(node) = scene.arena.get(id.0) else {
                return;
            };
            for &child in &node.children {
                if let Some(child_node) = scene.arena.get(child.0) {
                    if child_node.is_element() {
                        let mut child_tree = Tree::new(scene.element_label(child, child_node));
                        build(scene, child, &mut child_tree);
                        tree.push(child_tree);
                    }
                }
            }
        }

        let mut tree = Tree::new(CONTAINER_TAG.to_string());
        build(self, self.container, &mut tree);
        tree
    }

    fn element_label(&self, id: NodeId, node: &SceneNode) -> String {
        let text = self.text_content(id);
        if text.is_empty() {
            format!(".{}", node.classes.iter().cloned().collect::<Vec<_>>().join("."))
        } else {
            text
        }
    }
}

impl SceneGraph for ArenaScene {
    fn container(&self) -> NodeId {
        self.container
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.arena.get(id.0)
    }

    fn select_children(&self, parent: NodeId, selector: Selector<'_>) -> DomainResult<Vec<NodeId>> {
        let node = self.get(parent)?;
        Ok(node
            .children
            .iter()
            .copied()
            .filter(|c| self.arena.get(c.0).is_some_and(|n| selector.matches(n)))
            .collect())
    }

    #[instrument(level = "trace", skip(self))]
    fn append_element(&mut self, parent: NodeId, tag: &str) -> DomainResult<NodeId> {
        self.insert_child(parent, SceneNode::element(tag, Some(parent)), None)
    }

    #[instrument(level = "trace", skip(self))]
    fn append_text(&mut self, parent: NodeId, text: &str) -> DomainResult<NodeId> {
        self.insert_child(parent, SceneNode::text(text, parent), None)
    }

    #[instrument(level = "trace", skip(self))]
    fn prepend_text(&mut self, parent: NodeId, text: &str) -> DomainResult<NodeId> {
        self.insert_child(parent, SceneNode::text(text, parent), Some(0))
    }

    #[instrument(level = "trace", skip(self))]
    fn remove(&mut self, id: NodeId) -> DomainResult<()> {
        if id == self.container {
            return Err(DomainError::ContainerRemoval);
        }
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.arena.get_mut(p.0)) {
            parent.children.retain(|&c| c != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current.0) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    fn set_class(&mut self, id: NodeId, class: &str, enabled: bool) -> DomainResult<()> {
        let node = self.get_mut(id)?;
        if enabled {
            node.classes.insert(class.to_string());
        } else {
            node.classes.remove(class);
        }
        Ok(())
    }

    fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> DomainResult<()> {
        self.get_mut(id)?
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }
}

pub struct Descendants<'a> {
    scene: &'a ArenaScene,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.scene.arena.get(current.0) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

/// Owned, serializable view of a scene subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SceneSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneSnapshot>,
}
