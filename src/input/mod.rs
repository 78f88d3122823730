//! Remote-control input.
//!
//! Raw key codes from a remote, keyboard or gamepad are decoded through a
//! [`KeyMap`] into [`InputAction`]s, and funnelled to the navigator's thread
//! through an [`InputQueue`].

pub mod keymap;
pub mod queue;

use crate::focus::Direction;
use std::str::FromStr;
use thiserror::Error;

// Re-export types
pub use keymap::{KeyBindings, KeyMap};
pub use queue::{InputEvent, InputQueue, InputSender};

/// The three kinds of remote input the navigator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Move(Direction),
    Enter,
    Back,
}

impl InputAction {
    /// All actions, arrows first.
    pub const ALL: [InputAction; 6] = [
        InputAction::Move(Direction::Left),
        InputAction::Move(Direction::Up),
        InputAction::Move(Direction::Right),
        InputAction::Move(Direction::Down),
        InputAction::Enter,
        InputAction::Back,
    ];

    /// Get the description for this action.
    pub fn description(&self) -> &'static str {
        match self {
            InputAction::Move(Direction::Left) => "Move focus left",
            InputAction::Move(Direction::Up) => "Move focus up",
            InputAction::Move(Direction::Right) => "Move focus right",
            InputAction::Move(Direction::Down) => "Move focus down",
            InputAction::Enter => "Activate focused element",
            InputAction::Back => "Go back",
        }
    }

    /// Short lowercase name, as accepted by [`str::parse`].
    pub fn name(&self) -> &'static str {
        match self {
            InputAction::Move(Direction::Left) => "left",
            InputAction::Move(Direction::Up) => "up",
            InputAction::Move(Direction::Right) => "right",
            InputAction::Move(Direction::Down) => "down",
            InputAction::Enter => "enter",
            InputAction::Back => "back",
        }
    }
}

impl std::fmt::Display for InputAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Input decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown input action: {0}")]
    UnknownAction(String),
}

impl FromStr for InputAction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        InputAction::ALL
            .into_iter()
            .find(|action| action.name() == name)
            .or(match name.as_str() {
                "ok" | "select" => Some(InputAction::Enter),
                "escape" | "esc" => Some(InputAction::Back),
                _ => None,
            })
            .ok_or_else(|| InputError::UnknownAction(s.trim().to_string()))
    }
}
