//! The navigator: focus tree, announcer and input entry points in one owned value.

use super::callbacks::{Dispatch, FocusRequest, NodeCallbacks};
use super::node::{FocusNode, NodeId, NodeSpec, Rect};
use super::tree::{FocusTree, Insertion};
use super::{spatial, Direction, FocusError, NavigationSettings};
use crate::input::InputAction;
use crate::speech::Announcer;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy)]
enum Hook {
    Focus,
    Blur,
    Enter,
}

/// Owns the focus tree and turns input into focus changes and callbacks.
///
/// Every operation takes `&mut self`. Callbacks only ever see a [`Dispatch`],
/// so focus changes they request are queued and run once the triggering
/// operation has finished dispatching.
pub struct Navigator {
    tree: FocusTree,
    announcer: Announcer,
    pending: VecDeque<FocusRequest>,
    settings: NavigationSettings,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("nodes", &self.tree.len())
            .field("focused", &self.tree.focused())
            .field("announcer", &self.announcer)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Announcer::disabled())
    }
}

impl Navigator {
    pub fn new(announcer: Announcer) -> Self {
        Self::with_settings(announcer, NavigationSettings::default())
    }

    pub fn with_settings(announcer: Announcer, settings: NavigationSettings) -> Self {
        Self {
            tree: FocusTree::new(),
            announcer,
            pending: VecDeque::new(),
            settings,
        }
    }

    /// Read-only view of the focus tree.
    pub fn tree(&self) -> &FocusTree {
        &self.tree
    }

    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// The currently focused leaf.
    pub fn focused(&self) -> Option<NodeId> {
        self.tree.focused()
    }

    pub fn node(&self, id: NodeId) -> Option<&FocusNode> {
        self.tree.node(id)
    }

    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        self.tree.node_by_key(key)
    }

    /// Label of the focused leaf, if it has one.
    pub fn focused_label(&self) -> Option<&str> {
        self.tree
            .focused()
            .and_then(|id| self.tree.node(id))
            .and_then(FocusNode::label)
    }

    // ---- Registration ----

    /// Register a node as the last child of `parent` (the root when `None`).
    ///
    /// A spec whose key is already registered updates that node in place and
    /// returns its existing id. When nothing is focused yet, the first eligible
    /// leaf to appear takes focus.
    pub fn register(
        &mut self,
        parent: Option<NodeId>,
        spec: NodeSpec,
    ) -> Result<NodeId, FocusError> {
        let id = match self.tree.insert(parent, spec)? {
            Insertion::Created(id) => {
                tracing::debug!(node = %id, parent = ?parent, "Registered node");
                id
            }
            Insertion::Updated(id) => {
                tracing::debug!(node = %id, "Updated node in place");
                self.repair_focus(id);
                id
            }
        };

        self.adopt_focus(id);
        self.drain_requests();
        Ok(id)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Unknown ids and the root are ignored. If focus was inside the subtree it
    /// moves to the nearest remaining sibling, widening scope by scope, and
    /// finally to the first registered leaf.
    pub fn unregister(&mut self, id: NodeId) {
        if id == NodeId::ROOT || !self.tree.contains(id) {
            tracing::debug!(node = %id, "Ignoring unregister of unknown node");
            return;
        }

        let had_focus = self
            .tree
            .focused()
            .is_some_and(|focused| self.tree.is_within(focused, id));
        let fallback = had_focus.then(|| self.tree.fallback_target(id)).flatten();

        let removed = self.tree.remove_subtree(id);
        self.pending.retain(|request| match request {
            FocusRequest::Focus(target) => !removed.contains(target),
            FocusRequest::Move(_) => true,
        });
        tracing::debug!(node = %id, removed = removed.len(), "Unregistered subtree");

        if had_focus {
            match fallback {
                Some(next) => self.transition(next),
                None => tracing::debug!("No focusable leaf left after unregister"),
            }
        }
        self.drain_requests();
    }

    /// Replace a node's geometry. Returns `false` for unknown ids.
    pub fn update_geometry(&mut self, id: NodeId, rect: Rect) -> bool {
        match self.tree.node_mut(id) {
            Some(node) => {
                node.geometry = Some(rect);
                true
            }
            None => {
                tracing::debug!(node = %id, "Geometry update for unknown node");
                false
            }
        }
    }

    /// Replace a node's callbacks. Returns `false` for unknown ids.
    pub fn update_callbacks(&mut self, id: NodeId, callbacks: NodeCallbacks) -> bool {
        match self.tree.node_mut(id) {
            Some(node) => {
                node.callbacks = callbacks;
                true
            }
            None => {
                tracing::debug!(node = %id, "Callback update for unknown node");
                false
            }
        }
    }

    /// Replace a node's explicit neighbor hints. Returns `false` for unknown ids.
    pub fn update_neighbors(&mut self, id: NodeId, neighbors: HashMap<Direction, NodeId>) -> bool {
        match self.tree.node_mut(id) {
            Some(node) => {
                node.neighbors = neighbors;
                true
            }
            None => {
                tracing::debug!(node = %id, "Neighbor update for unknown node");
                false
            }
        }
    }

    /// Enable or disable a node and with it the whole subtree.
    ///
    /// Disabling the subtree that holds focus reassigns focus as if it had
    /// been unregistered.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) -> bool {
        let Some(node) = self.tree.node_mut(id) else {
            tracing::debug!(node = %id, "Focusable update for unknown node");
            return false;
        };
        if id == NodeId::ROOT {
            return false;
        }
        node.focusable = focusable;

        if focusable {
            self.adopt_focus(id);
        } else {
            self.repair_focus(id);
        }
        self.drain_requests();
        true
    }

    // ---- Focus ----

    /// Move focus to `id`, resolving containers to their default leaf.
    ///
    /// Returns the leaf that received focus, or `None` if `id` is unknown or
    /// has no eligible leaf. Re-focusing the focused leaf fires nothing.
    pub fn set_focus(&mut self, id: NodeId) -> Option<NodeId> {
        let target = self.resolve_target(id)?;
        self.transition(target);
        self.drain_requests();
        Some(target)
    }

    /// Move focus one step in `direction`.
    ///
    /// The focused leaf's arrow hook may veto the move. Returns the newly
    /// focused leaf, or `None` when nothing lies in that direction.
    pub fn move_focus(&mut self, direction: Direction) -> Option<NodeId> {
        let current = self.tree.focused()?;

        if !self.fire_arrow_hook(current, direction) {
            tracing::debug!(node = %current, %direction, "Move cancelled by arrow hook");
            self.drain_requests();
            return None;
        }

        let moved = self.step(current, direction);
        self.drain_requests();
        moved
    }

    /// Fire the focused leaf's enter hook. Focus does not change.
    pub fn enter(&mut self) -> bool {
        let Some(current) = self.tree.focused() else {
            return false;
        };
        let handled = self.fire(current, Hook::Enter);
        self.drain_requests();
        handled
    }

    /// Offer a back press to the focused leaf, then to each ancestor in turn.
    ///
    /// Returns `true` once a back hook consumes it.
    pub fn back(&mut self) -> bool {
        let mut cursor = self.tree.focused();
        let mut consumed = false;

        while let Some(id) = cursor {
            let Some(node) = self.tree.node(id) else {
                break;
            };
            cursor = node.parent();

            let Some(hook) = node.callbacks().on_back_press.clone() else {
                continue;
            };
            let label = node.label().map(str::to_owned);
            let mut dispatch =
                Dispatch::new(id, label.as_deref(), &self.announcer, &mut self.pending);
            if hook(&mut dispatch) {
                tracing::debug!(node = %id, "Back press consumed");
                consumed = true;
                break;
            }
        }

        self.drain_requests();
        consumed
    }

    /// Route a decoded input action. Returns whether it had any effect.
    pub fn handle(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::Move(direction) => self.move_focus(direction).is_some(),
            InputAction::Enter => self.enter(),
            InputAction::Back => self.back(),
        }
    }

    // ---- Internals ----

    fn resolve_target(&self, id: NodeId) -> Option<NodeId> {
        if !self.tree.is_eligible(id) {
            tracing::debug!(node = %id, "Focus target is unknown or not focusable");
            return None;
        }
        let target = self.tree.default_leaf(id);
        if target.is_none() {
            tracing::debug!(node = %id, "Focus target has no focusable leaf");
        }
        target
    }

    fn step(&mut self, from: NodeId, direction: Direction) -> Option<NodeId> {
        match spatial::resolve(&self.tree, from, direction) {
            Some(target) => {
                self.transition(target);
                Some(target)
            }
            None => {
                tracing::debug!(node = %from, %direction, "No candidate in direction");
                None
            }
        }
    }

    /// Focus the default leaf of `id` if nothing is focused yet.
    fn adopt_focus(&mut self, id: NodeId) {
        if self.tree.focused().is_some() || !self.tree.is_eligible(id) {
            return;
        }
        if let Some(leaf) = self.tree.default_leaf(id) {
            self.transition(leaf);
        }
    }

    /// Move focus away from `id`'s subtree if it just became ineligible.
    fn repair_focus(&mut self, id: NodeId) {
        let Some(focused) = self.tree.focused() else {
            return;
        };
        if self.tree.is_eligible(focused) || !self.tree.is_within(focused, id) {
            return;
        }

        match self.tree.fallback_target(id) {
            Some(next) => self.transition(next),
            None => {
                tracing::debug!(node = %focused, "Focused node disabled; no replacement");
                self.fire(focused, Hook::Blur);
                self.tree.clear_focus();
            }
        }
    }

    /// Blur the previous leaf, move the active pointer, focus the next leaf.
    fn transition(&mut self, next: NodeId) {
        let prev = self.tree.focused();
        if prev == Some(next) {
            return;
        }

        if let Some(prev) = prev {
            self.fire(prev, Hook::Blur);
        }
        self.tree.set_active(next);
        tracing::debug!(from = ?prev, to = %next, "Focus changed");
        self.fire(next, Hook::Focus);
    }

    fn fire(&mut self, id: NodeId, hook: Hook) -> bool {
        let Some(node) = self.tree.node(id) else {
            return false;
        };
        let callbacks = node.callbacks();
        let slot = match hook {
            Hook::Focus => &callbacks.on_focus,
            Hook::Blur => &callbacks.on_blur,
            Hook::Enter => &callbacks.on_enter_press,
        };
        let Some(callback) = slot.clone() else {
            return false;
        };
        let label = node.label().map(str::to_owned);

        let mut dispatch = Dispatch::new(id, label.as_deref(), &self.announcer, &mut self.pending);
        callback(&mut dispatch);
        true
    }

    fn fire_arrow_hook(&mut self, id: NodeId, direction: Direction) -> bool {
        let Some(node) = self.tree.node(id) else {
            return true;
        };
        let Some(callback) = node.callbacks().on_arrow_press.clone() else {
            return true;
        };
        let label = node.label().map(str::to_owned);

        let mut dispatch = Dispatch::new(id, label.as_deref(), &self.announcer, &mut self.pending);
        callback(&mut dispatch, direction)
    }

    /// Run queued requests in FIFO order, up to the configured step limit.
    fn drain_requests(&mut self) {
        let mut steps = 0;

        while let Some(request) = self.pending.pop_front() {
            if steps >= self.settings.max_deferred_steps {
                tracing::warn!(
                    dropped = self.pending.len() + 1,
                    limit = self.settings.max_deferred_steps,
                    "Deferred focus request limit reached; dropping the rest"
                );
                self.pending.clear();
                return;
            }
            steps += 1;

            match request {
                FocusRequest::Focus(id) => {
                    if let Some(target) = self.resolve_target(id) {
                        self.transition(target);
                    }
                }
                FocusRequest::Move(direction) => {
                    if let Some(current) = self.tree.focused() {
                        self.step(current, direction);
                    }
                }
            }
        }
    }
}
