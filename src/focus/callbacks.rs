//! Node callback record and the dispatch context handed to callbacks.
//!
//! Callbacks never see the navigator itself. Anything that would change focus
//! is queued as a [`FocusRequest`] and processed after the current dispatch
//! has completed, so the tree is never mutated mid-traversal.

use super::{Direction, NodeId};
use crate::speech::Announcer;
use std::collections::VecDeque;
use std::sync::Arc;

/// Hook fired on focus, blur and enter press.
pub type FocusHook = Arc<dyn Fn(&mut Dispatch<'_>) + Send + Sync>;

/// Hook fired before a directional move. Returning `false` cancels the move.
pub type ArrowHook = Arc<dyn Fn(&mut Dispatch<'_>, Direction) -> bool + Send + Sync>;

/// Hook fired on back press. Returning `true` consumes the event.
pub type BackHook = Arc<dyn Fn(&mut Dispatch<'_>) -> bool + Send + Sync>;

/// Fixed capability record of optional callback slots.
#[derive(Clone, Default)]
pub struct NodeCallbacks {
    pub on_focus: Option<FocusHook>,
    pub on_blur: Option<FocusHook>,
    pub on_enter_press: Option<FocusHook>,
    pub on_arrow_press: Option<ArrowHook>,
    pub on_back_press: Option<BackHook>,
}

impl NodeCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no slot is filled.
    pub fn is_empty(&self) -> bool {
        self.on_focus.is_none()
            && self.on_blur.is_none()
            && self.on_enter_press.is_none()
            && self.on_arrow_press.is_none()
            && self.on_back_press.is_none()
    }
}

impl std::fmt::Debug for NodeCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCallbacks")
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_enter_press", &self.on_enter_press.is_some())
            .field("on_arrow_press", &self.on_arrow_press.is_some())
            .field("on_back_press", &self.on_back_press.is_some())
            .finish()
    }
}

/// Focus change requested from inside a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    /// Focus a node (containers resolve to a descendant leaf)
    Focus(NodeId),
    /// Move focus in a direction from wherever it is when the request runs
    Move(Direction),
}

/// Context passed to every callback invocation.
pub struct Dispatch<'a> {
    node: NodeId,
    label: Option<&'a str>,
    announcer: &'a Announcer,
    requests: &'a mut VecDeque<FocusRequest>,
}

impl<'a> Dispatch<'a> {
    pub(crate) fn new(
        node: NodeId,
        label: Option<&'a str>,
        announcer: &'a Announcer,
        requests: &'a mut VecDeque<FocusRequest>,
    ) -> Self {
        Self {
            node,
            label,
            announcer,
            requests,
        }
    }

    /// The node whose callback is running.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node's registered label.
    pub fn label(&self) -> Option<&str> {
        self.label
    }

    /// Speak text, superseding whatever is currently being announced.
    pub fn announce(&self, text: impl AsRef<str>) {
        self.announcer.announce(text.as_ref());
    }

    pub fn announcer(&self) -> &Announcer {
        self.announcer
    }

    /// Ask for focus to move to `id` once the current dispatch completes.
    pub fn request_focus(&mut self, id: NodeId) {
        self.requests.push_back(FocusRequest::Focus(id));
    }

    /// Ask for a directional move once the current dispatch completes.
    pub fn request_move(&mut self, direction: Direction) {
        self.requests.push_back(FocusRequest::Move(direction));
    }
}
