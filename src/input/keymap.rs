//! Key code bindings.
//!
//! Defaults cover the codes browsers and Android TV remotes report, plus the
//! back keys of common smart-TV platforms.

use super::InputAction;
use crate::focus::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key codes bound to each action, as stored in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<u32>,
    pub up: Vec<u32>,
    pub right: Vec<u32>,
    pub down: Vec<u32>,
    pub enter: Vec<u32>,
    pub back: Vec<u32>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            // Browser arrow codes, then Android DPAD codes
            left: vec![37, 21],
            up: vec![38, 19],
            right: vec![39, 22],
            down: vec![40, 20],
            // Enter, DPAD centre, Android enter
            enter: vec![13, 23, 66],
            // Backspace, Escape, webOS back, Tizen back
            back: vec![8, 27, 461, 10009],
        }
    }
}

impl KeyBindings {
    fn codes(&self, action: InputAction) -> &[u32] {
        match action {
            InputAction::Move(Direction::Left) => &self.left,
            InputAction::Move(Direction::Up) => &self.up,
            InputAction::Move(Direction::Right) => &self.right,
            InputAction::Move(Direction::Down) => &self.down,
            InputAction::Enter => &self.enter,
            InputAction::Back => &self.back,
        }
    }
}

/// Lookup table from raw key code to action.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<u32, InputAction>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(&KeyBindings::default())
    }
}

impl KeyMap {
    /// Build a key map from configured bindings.
    ///
    /// A code listed under more than one action keeps the last one, in
    /// `InputAction::ALL` order.
    pub fn new(bindings: &KeyBindings) -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
        };
        for action in InputAction::ALL {
            for &code in bindings.codes(action) {
                if let Some(previous) = map.bind(code, action) {
                    tracing::warn!(code, %previous, %action, "Key code bound twice");
                }
            }
        }
        map
    }

    /// Get the action for a key code.
    pub fn action_for(&self, code: u32) -> Option<InputAction> {
        self.bindings.get(&code).copied()
    }

    /// Bind a code, returning the action it was bound to before.
    pub fn bind(&mut self, code: u32, action: InputAction) -> Option<InputAction> {
        self.bindings.insert(code, action)
    }

    pub fn unbind(&mut self, code: u32) -> Option<InputAction> {
        self.bindings.remove(&code)
    }

    /// All codes bound to an action, ascending.
    pub fn codes_for(&self, action: InputAction) -> Vec<u32> {
        let mut codes: Vec<u32> = self
            .bindings
            .iter()
            .filter(|(_, &bound)| bound == action)
            .map(|(&code, _)| code)
            .collect();
        codes.sort_unstable();
        codes
    }
}
