//! Focus tree registry.
//!
//! Owns every registered node and the single focused-leaf pointer. The tree is
//! purely structural: callback dispatch happens in [`super::Navigator`].
//!
//! # Invariants
//!
//! 1. Every node except [`NodeId::ROOT`] has exactly one parent, and appears in
//!    that parent's `children` exactly once.
//! 2. At most one node has `active == true`, and it is always the leaf stored
//!    in `focused`.
//! 3. Ids are never reused, so registration order equals id order.

use super::node::{FocusNode, NodeId, NodeKind, NodeSpec};
use super::FocusError;
use std::collections::HashMap;

/// Outcome of registering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    /// A new node was created
    Created(NodeId),
    /// An existing node with the same key was updated in place
    Updated(NodeId),
}

impl Insertion {
    pub(crate) fn id(self) -> NodeId {
        match self {
            Insertion::Created(id) | Insertion::Updated(id) => id,
        }
    }
}

/// Hierarchy of focusable nodes rooted at an implicit container.
#[derive(Debug)]
pub struct FocusTree {
    nodes: HashMap<NodeId, FocusNode>,
    keys: HashMap<String, NodeId>,
    next_id: u64,
    focused: Option<NodeId>,
}

impl Default for FocusTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTree {
    /// Create a tree holding only the implicit root container.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, FocusNode::root());
        Self {
            nodes,
            keys: HashMap::new(),
            next_id: 1,
            focused: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of registered nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&FocusNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut FocusNode> {
        self.nodes.get_mut(&id)
    }

    /// Look up a node by its focus key.
    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    /// All nodes, including the root, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &FocusNode> + '_ {
        self.nodes.values()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Children of a node in registration order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The currently focused leaf.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Whether `id` is `ancestor` or lies somewhere below it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether the focused leaf is a strict descendant of `id`.
    pub fn has_focused_child(&self, id: NodeId) -> bool {
        self.focused
            .is_some_and(|focused| focused != id && self.is_within(focused, id))
    }

    /// Path from the root down to the focused leaf; empty without focus.
    pub fn focus_path(&self) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.focused;
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent(current);
        }
        path.reverse();
        path
    }

    /// A node can take focus only if it and all of its ancestors are focusable.
    pub fn is_eligible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(&current) {
                Some(node) if node.focusable => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Resolve a node to the leaf that should receive focus when it is targeted.
    ///
    /// Leaves resolve to themselves. Containers try their preferred child, then
    /// the remembered last-focused child, then each child in registration order.
    pub fn default_leaf(&self, id: NodeId) -> Option<NodeId> {
        self.default_leaf_excluding(id, None)
    }

    pub(crate) fn default_leaf_excluding(
        &self,
        id: NodeId,
        excluded: Option<NodeId>,
    ) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        if !node.focusable || excluded.is_some_and(|ex| self.is_within(id, ex)) {
            return None;
        }

        match node.kind {
            NodeKind::Leaf => Some(id),
            NodeKind::Container => {
                let remembered = node
                    .options
                    .remember_last_focused
                    .then_some(node.last_focused_child)
                    .flatten();

                node.options
                    .preferred_child
                    .into_iter()
                    .chain(remembered)
                    .filter(|child| self.parent(*child) == Some(id))
                    .chain(node.children.iter().copied())
                    .find_map(|child| self.default_leaf_excluding(child, excluded))
            }
        }
    }

    /// Register a node as the last child of `parent` (the root when `None`).
    ///
    /// The parent is validated even when the key is already registered; a
    /// keyed node is updated in place and stays under its original parent.
    pub(crate) fn insert(
        &mut self,
        parent: Option<NodeId>,
        spec: NodeSpec,
    ) -> Result<Insertion, FocusError> {
        let parent = parent.unwrap_or(NodeId::ROOT);
        match self.nodes.get(&parent) {
            None => return Err(FocusError::UnknownParent(parent)),
            Some(node) if node.is_leaf() => return Err(FocusError::ParentIsLeaf(parent)),
            Some(_) => {}
        }

        if let Some(existing) = spec.key().and_then(|key| self.node_by_key(key)) {
            if let Some(node) = self.nodes.get_mut(&existing) {
                if node.parent != Some(parent) {
                    tracing::warn!(
                        node = %existing,
                        requested = %parent,
                        "Re-registration cannot move a node; keeping parent {:?}",
                        node.parent
                    );
                }
                node.apply_spec(spec);
                return Ok(Insertion::Updated(existing));
            }
        }

        let id = NodeId::from_raw(self.next_id);
        self.next_id += 1;

        if let Some(key) = spec.key() {
            self.keys.insert(key.to_string(), id);
        }
        self.nodes.insert(id, FocusNode::from_spec(id, parent, spec));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        Ok(Insertion::Created(id))
    }

    /// Detach and drop `id` with all of its descendants.
    ///
    /// Returns the removed ids, parents before children. Clears the focus
    /// pointer if the focused leaf was inside the subtree.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == NodeId::ROOT || !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        if let Some(parent) = self.parent(id).and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                if let Some(key) = &node.key {
                    self.keys.remove(key);
                }
                stack.extend(node.children.iter().rev().copied());
                removed.push(current);
            }
        }

        if self.focused.is_some_and(|f| removed.contains(&f)) {
            self.focused = None;
        }

        removed
    }

    /// Where focus should go if the subtree at `lost` disappears.
    ///
    /// Nearest remaining sibling first (following, then preceding, widening
    /// outwards), then the same search one level up for each ancestor, then
    /// the first registered leaf anywhere in the tree.
    pub(crate) fn fallback_target(&self, lost: NodeId) -> Option<NodeId> {
        let mut unit = lost;
        while let Some(parent) = self.parent(unit) {
            if let Some(leaf) = self.nearest_sibling_leaf(parent, unit, lost) {
                return Some(leaf);
            }
            unit = parent;
        }

        self.first_registered_leaf(Some(lost))
    }

    fn nearest_sibling_leaf(&self, parent: NodeId, unit: NodeId, lost: NodeId) -> Option<NodeId> {
        if !self.is_eligible(parent) {
            return None;
        }
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|s| *s == unit)?;

        (1..siblings.len()).find_map(|offset| {
            let after = siblings.get(pos + offset);
            let before = pos.checked_sub(offset).and_then(|i| siblings.get(i));
            after
                .into_iter()
                .chain(before)
                .find_map(|sibling| self.default_leaf_excluding(*sibling, Some(lost)))
        })
    }

    /// The eligible leaf with the lowest id.
    pub(crate) fn first_registered_leaf(&self, excluded: Option<NodeId>) -> Option<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.is_leaf())
            .filter(|n| !excluded.is_some_and(|ex| self.is_within(n.id, ex)))
            .filter(|n| self.is_eligible(n.id))
            .map(|n| n.id)
            .min()
    }

    /// Drop focus entirely; used when no eligible leaf remains.
    pub(crate) fn clear_focus(&mut self) {
        if let Some(prev) = self.focused.take() {
            if let Some(node) = self.nodes.get_mut(&prev) {
                node.active = false;
            }
        }
    }

    /// Point focus at `leaf`, keeping the `active` flags and remembered
    /// children in step.
    pub(crate) fn set_active(&mut self, leaf: NodeId) {
        self.clear_focus();

        let Some(node) = self.nodes.get_mut(&leaf) else {
            return;
        };
        node.active = true;
        self.focused = Some(leaf);

        let mut child = leaf;
        while let Some(parent) = self.parent(child) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.last_focused_child = Some(child);
            }
            child = parent;
        }
    }
}
