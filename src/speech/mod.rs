//! Spoken feedback for focus changes and state transitions.
//!
//! The [`Announcer`] is a single-slot speech channel: every announcement
//! cancels whatever is being spoken and replaces it, so only the most recent
//! focus change is ever audible. Backend failures are logged and swallowed.

pub mod backend;
pub mod coordinator;
#[cfg(feature = "native-tts")]
pub mod native;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types
pub use backend::{MemoryBackend, SpeechBackend, SpeechEvent, TracingBackend};
pub use coordinator::Announcer;
#[cfg(feature = "native-tts")]
pub use native::NativeTtsBackend;

/// Errors raised by speech backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech engine not available: {0}")]
    Unavailable(String),

    #[error("Speech backend failed: {0}")]
    Backend(String),
}

/// Speech configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Master enable for announcements
    pub enabled: bool,
    /// Speech rate multiplier (0.5 - 2.0)
    pub rate: f32,
    /// Pitch multiplier (0.5 - 2.0)
    pub pitch: f32,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
    /// Preferred language tag
    pub language: String,
    /// Quiet window before speaking; announcements arriving inside it replace the pending one
    pub debounce_ms: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            language: "en-US".to_string(),
            debounce_ms: 0,
        }
    }
}

impl SpeechSettings {
    /// Rate clamped to the supported range.
    pub fn clamped_rate(&self) -> f32 {
        self.rate.clamp(0.5, 2.0)
    }

    /// Pitch clamped to the supported range.
    pub fn clamped_pitch(&self) -> f32 {
        self.pitch.clamp(0.5, 2.0)
    }

    /// Volume clamped to the supported range.
    pub fn clamped_volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}

/// Collapse runs of whitespace so backends get clean phrasing.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
