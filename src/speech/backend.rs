//! Speech backends.
//!
//! A backend is the host platform's speech engine seen through two
//! capabilities: start speaking some text, and cancel whatever is playing.
//! `speak` is expected to return once synthesis has been started, not when
//! playback finishes.

use super::SpeechError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Trait for speech engines
pub trait SpeechBackend: Send + Sync {
    /// Start speaking text
    fn speak(&self, text: &str) -> Result<(), SpeechError>;

    /// Stop current speech, including anything queued inside the engine
    fn cancel(&self) -> Result<(), SpeechError>;

    /// Check if currently speaking
    fn is_speaking(&self) -> bool {
        false
    }
}

impl<T: SpeechBackend + ?Sized> SpeechBackend for Box<T> {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        (**self).speak(text)
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        (**self).cancel()
    }

    fn is_speaking(&self) -> bool {
        (**self).is_speaking()
    }
}

impl<T: SpeechBackend + ?Sized> SpeechBackend for Arc<T> {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        (**self).speak(text)
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        (**self).cancel()
    }

    fn is_speaking(&self) -> bool {
        (**self).is_speaking()
    }
}

/// Event recorded by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Speech started
    Spoke(String),
    /// Speech cancelled
    Cancelled,
}

#[derive(Debug, Default)]
struct MemoryState {
    transcript: Vec<SpeechEvent>,
    current: Option<String>,
    failing: bool,
}

/// In-memory backend keeping a transcript of everything it was asked to do.
///
/// Clones share the same transcript, so a host can hand one clone to an
/// [`super::Announcer`] and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails, as an unavailable voice engine would.
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.lock().failing = true;
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every speak/cancel event in order.
    pub fn transcript(&self) -> Vec<SpeechEvent> {
        self.lock().transcript.clone()
    }

    /// Texts that were spoken, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.lock()
            .transcript
            .iter()
            .filter_map(|event| match event {
                SpeechEvent::Spoke(text) => Some(text.clone()),
                SpeechEvent::Cancelled => None,
            })
            .collect()
    }

    /// The utterance that is audible right now, if any.
    pub fn current(&self) -> Option<String> {
        self.lock().current.clone()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.transcript.clear();
        state.current = None;
    }
}

impl SpeechBackend for MemoryBackend {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let mut state = self.lock();
        if state.failing {
            return Err(SpeechError::Unavailable("no voice installed".to_string()));
        }
        state.transcript.push(SpeechEvent::Spoke(text.to_string()));
        state.current = Some(text.to_string());
        Ok(())
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        let mut state = self.lock();
        if state.failing {
            return Err(SpeechError::Unavailable("no voice installed".to_string()));
        }
        if state.current.take().is_some() {
            state.transcript.push(SpeechEvent::Cancelled);
        }
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.lock().current.is_some()
    }
}

/// Backend that only logs what would be spoken.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl SpeechBackend for TracingBackend {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        tracing::info!(target: "remotefocus::speech", "Speaking: {}", text);
        Ok(())
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        tracing::trace!(target: "remotefocus::speech", "Speech cancelled");
        Ok(())
    }
}
