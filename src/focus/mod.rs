//! Focus tree and directional navigation for remote-control driven interfaces.
//!
//! This module provides:
//! - A tree of focusable nodes (containers and leaves) with registration by mounting components
//! - Directional resolution between siblings across nested containers
//! - Lifecycle callback dispatch (focus, blur, enter, arrow, back)
//! - A deferred request queue for focus changes issued from inside callbacks

pub mod callbacks;
pub mod navigator;
pub mod node;
pub mod spatial;
pub mod tree;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export primary types
pub use callbacks::{ArrowHook, BackHook, Dispatch, FocusHook, FocusRequest, NodeCallbacks};
pub use navigator::Navigator;
pub use node::{ContainerOptions, FocusNode, NodeId, NodeKind, NodeSpec, Rect};
pub use tree::FocusTree;

/// Errors reported by structural focus tree operations.
///
/// Operations on ids that are no longer registered are not errors: unmount
/// races are expected, so those calls are silent no-ops.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FocusError {
    #[error("Unknown parent node: {0}")]
    UnknownParent(NodeId),

    #[error("Parent node {0} is a leaf and cannot hold children")]
    ParentIsLeaf(NodeId),
}

/// Directional input from a remote control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Whether the direction moves along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Whether the direction maps to the next sibling in registration order.
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Navigation engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Maximum number of deferred focus requests drained per input event.
    /// Anything beyond this is dropped to stop callbacks from ping-ponging focus forever.
    pub max_deferred_steps: usize,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            max_deferred_steps: 32,
        }
    }
}
