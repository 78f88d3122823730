//! Input funnel.
//!
//! Device threads push events through cloneable [`InputSender`]s; the thread
//! that owns the [`Navigator`] drains them in arrival order. This is the only
//! way input from several threads reaches the focus tree.

use super::{InputAction, KeyMap};
use crate::focus::Navigator;
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// A raw or already decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Raw key code, decoded through the queue's key map
    Key(u32),
    Action(InputAction),
}

impl From<InputAction> for InputEvent {
    fn from(action: InputAction) -> Self {
        InputEvent::Action(action)
    }
}

/// Producer handle for an [`InputQueue`].
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue a raw key code. Returns `false` once the queue is gone.
    pub fn send_key(&self, code: u32) -> bool {
        self.send(InputEvent::Key(code))
    }

    /// Queue a decoded action. Returns `false` once the queue is gone.
    pub fn send_action(&self, action: InputAction) -> bool {
        self.send(InputEvent::Action(action))
    }

    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Multi-producer, single-consumer queue of remote input.
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
    keymap: KeyMap,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(KeyMap::default())
    }
}

impl InputQueue {
    pub fn new(keymap: KeyMap) -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx, keymap }
    }

    /// Get a sender for a device thread.
    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut KeyMap {
        &mut self.keymap
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Decode an event; unbound key codes decode to `None`.
    pub fn decode(&self, event: InputEvent) -> Option<InputAction> {
        match event {
            InputEvent::Action(action) => Some(action),
            InputEvent::Key(code) => {
                let action = self.keymap.action_for(code);
                if action.is_none() {
                    tracing::trace!(code, "Ignoring unbound key code");
                }
                action
            }
        }
    }

    /// Hand every queued action to `handler`. Returns how many were handled.
    pub fn drain_with(&self, mut handler: impl FnMut(InputAction)) -> usize {
        let mut handled = 0;
        for action in self.rx.try_iter().filter_map(|event| self.decode(event)) {
            tracing::debug!(%action, "Input");
            handler(action);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for input, then hand everything queued to `handler`.
    ///
    /// Returns 0 when the wait timed out.
    pub fn wait_with(&self, timeout: Duration, mut handler: impl FnMut(InputAction)) -> usize {
        let first = match self.rx.recv_timeout(timeout) {
            Ok(event) => event,
            // The queue holds a sender of its own, so only a timeout ends the wait.
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return 0,
        };

        let mut handled = 0;
        if let Some(action) = self.decode(first) {
            tracing::debug!(%action, "Input");
            handler(action);
            handled += 1;
        }
        handled + self.drain_with(handler)
    }

    /// Apply every queued event to the navigator.
    pub fn drain(&self, navigator: &mut Navigator) -> usize {
        self.drain_with(|action| {
            navigator.handle(action);
        })
    }

    /// Wait up to `timeout` for input, then apply everything queued.
    pub fn wait_and_drain(&self, navigator: &mut Navigator, timeout: Duration) -> usize {
        self.wait_with(timeout, |action| {
            navigator.handle(action);
        })
    }
}
