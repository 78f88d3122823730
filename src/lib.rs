//! RemoteFocus - Spatial Navigation and Spoken Feedback for TV Interfaces
//!
//! A focus-management engine for remote-control-driven interfaces without
//! pointer input. Focusable leaves and containers form a tree; arrow keys move
//! focus between siblings using geometry or registration order, and a
//! single-slot speech channel announces every focus change without ever
//! letting stale announcements overlap.

pub mod config;
pub mod focus;
pub mod input;
pub mod speech;
pub mod widgets;

// Re-export commonly used types
pub use config::AppConfig;
pub use focus::{Direction, FocusError, Navigator, NodeId, NodeSpec, Rect};
pub use input::{InputAction, InputQueue, KeyMap};
pub use speech::{Announcer, SpeechBackend, SpeechSettings};
