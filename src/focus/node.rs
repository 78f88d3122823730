//! Focusable node model: identifiers, geometry and registration descriptors.

use super::callbacks::{Dispatch, NodeCallbacks};
use super::Direction;
use std::collections::HashMap;
use std::sync::Arc;

/// Unique identifier of a registered node.
///
/// Identifiers are allocated monotonically and never reused, so comparing two
/// ids compares their registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// The implicit root container every tree starts with.
    pub const ROOT: NodeId = NodeId(0);

    /// Wrap a raw identifier.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangle in screen coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// A zero-sized rectangle at a point.
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Centre point as `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Whether a node groups children or receives input focus itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Terminal node that receives actual input focus
    Leaf,
    /// Groups children; focus landing here resolves to a descendant leaf
    Container,
}

/// Focus behaviour options that only apply to containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerOptions {
    /// Child that receives focus when the container itself is targeted
    pub preferred_child: Option<NodeId>,
    /// Restore the most recently focused child when focus comes back
    pub remember_last_focused: bool,
    /// Directional movement never ascends past this container
    pub focus_boundary: bool,
}

/// A node in the focus tree.
#[derive(Debug, Clone)]
pub struct FocusNode {
    pub(crate) id: NodeId,
    pub(crate) key: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) geometry: Option<Rect>,
    pub(crate) neighbors: HashMap<Direction, NodeId>,
    pub(crate) callbacks: NodeCallbacks,
    pub(crate) active: bool,
    pub(crate) focusable: bool,
    pub(crate) options: ContainerOptions,
    pub(crate) last_focused_child: Option<NodeId>,
}

impl FocusNode {
    pub(crate) fn root() -> Self {
        Self {
            id: NodeId::ROOT,
            key: None,
            label: None,
            kind: NodeKind::Container,
            parent: None,
            children: Vec::new(),
            geometry: None,
            neighbors: HashMap::new(),
            callbacks: NodeCallbacks::default(),
            active: false,
            focusable: true,
            options: ContainerOptions::default(),
            last_focused_child: None,
        }
    }

    pub(crate) fn from_spec(id: NodeId, parent: NodeId, spec: NodeSpec) -> Self {
        Self {
            id,
            key: spec.key,
            label: spec.label,
            kind: spec.kind,
            parent: Some(parent),
            children: Vec::new(),
            geometry: spec.geometry,
            neighbors: spec.neighbors,
            callbacks: spec.callbacks,
            active: false,
            focusable: spec.focusable,
            options: spec.options,
            last_focused_child: None,
        }
    }

    /// Apply a re-registration in place. Structure (parent, children, kind) is kept.
    pub(crate) fn apply_spec(&mut self, spec: NodeSpec) {
        if spec.kind != self.kind {
            tracing::warn!(
                node = %self.id,
                "Re-registration cannot change node kind; keeping {:?}",
                self.kind
            );
        }
        self.label = spec.label;
        self.geometry = spec.geometry;
        self.neighbors = spec.neighbors;
        self.callbacks = spec.callbacks;
        self.focusable = spec.focusable;
        self.options = spec.options;
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Stable focus key supplied by the registering component.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in registration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn geometry(&self) -> Option<Rect> {
        self.geometry
    }

    /// Explicit neighbor hint for a direction.
    pub fn neighbor(&self, direction: Direction) -> Option<NodeId> {
        self.neighbors.get(&direction).copied()
    }

    pub fn callbacks(&self) -> &NodeCallbacks {
        &self.callbacks
    }

    /// True only for the single focused leaf.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }
}

/// Registration descriptor supplied by a mounting component.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub(crate) kind: NodeKind,
    pub(crate) key: Option<String>,
    pub(crate) label: Option<String>,
    pub(crate) geometry: Option<Rect>,
    pub(crate) neighbors: HashMap<Direction, NodeId>,
    pub(crate) callbacks: NodeCallbacks,
    pub(crate) focusable: bool,
    pub(crate) options: ContainerOptions,
}

impl NodeSpec {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            key: None,
            label: None,
            geometry: None,
            neighbors: HashMap::new(),
            callbacks: NodeCallbacks::default(),
            focusable: true,
            options: ContainerOptions::default(),
        }
    }

    /// Describe a leaf node.
    pub fn leaf() -> Self {
        Self::new(NodeKind::Leaf)
    }

    /// Describe a container node.
    pub fn container() -> Self {
        Self::new(NodeKind::Container)
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Set a stable focus key. Registering the same key again updates that node in place.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_geometry(mut self, rect: Rect) -> Self {
        self.geometry = Some(rect);
        self
    }

    /// Explicit neighbor hint; always wins over geometric and order-based resolution.
    pub fn with_neighbor(mut self, direction: Direction, target: NodeId) -> Self {
        self.neighbors.insert(direction, target);
        self
    }

    /// Set whether the node can receive focus.
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Replace the whole callback record.
    pub fn with_callbacks(mut self, callbacks: NodeCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn on_focus(mut self, hook: impl Fn(&mut Dispatch<'_>) + Send + Sync + 'static) -> Self {
        self.callbacks.on_focus = Some(Arc::new(hook));
        self
    }

    pub fn on_blur(mut self, hook: impl Fn(&mut Dispatch<'_>) + Send + Sync + 'static) -> Self {
        self.callbacks.on_blur = Some(Arc::new(hook));
        self
    }

    pub fn on_enter_press(
        mut self,
        hook: impl Fn(&mut Dispatch<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_enter_press = Some(Arc::new(hook));
        self
    }

    /// Hook run before a directional move; returning `false` cancels the move.
    pub fn on_arrow_press(
        mut self,
        hook: impl Fn(&mut Dispatch<'_>, Direction) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_arrow_press = Some(Arc::new(hook));
        self
    }

    /// Hook for back presses; returning `true` consumes the event.
    pub fn on_back_press(
        mut self,
        hook: impl Fn(&mut Dispatch<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_back_press = Some(Arc::new(hook));
        self
    }

    /// Child that receives focus when this container is targeted.
    pub fn with_preferred_child(mut self, child: NodeId) -> Self {
        self.options.preferred_child = Some(child);
        self
    }

    /// Restore the last focused child when focus returns to this container.
    pub fn remember_last_focused(mut self) -> Self {
        self.options.remember_last_focused = true;
        self
    }

    /// Keep directional movement from escaping this container.
    pub fn focus_boundary(mut self) -> Self {
        self.options.focus_boundary = true;
        self
    }
}
