//! Platform speech engine via the `tts` crate.
//!
//! The engine handle is not `Send` on every platform, so it lives on a
//! dedicated thread and receives commands over a channel.

use super::backend::SpeechBackend;
use super::{SpeechError, SpeechSettings};
use crossbeam::channel::{bounded, unbounded, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

enum Command {
    Speak(String),
    Cancel,
}

/// Speech backend driving the operating system's voice.
pub struct NativeTtsBackend {
    commands: Sender<Command>,
    speaking: Arc<AtomicBool>,
}

impl NativeTtsBackend {
    /// Start the engine thread and wait until the engine is ready.
    pub fn new(settings: &SpeechSettings) -> Result<Self, SpeechError> {
        let (tx, rx) = unbounded::<Command>();
        let (ready_tx, ready_rx) = bounded::<Result<(), SpeechError>>(1);
        let speaking = Arc::new(AtomicBool::new(false));
        let speaking_flag = Arc::clone(&speaking);
        let settings = settings.clone();

        thread::Builder::new()
            .name("tts-engine".to_string())
            .spawn(move || {
                let mut engine = match tts::Tts::default() {
                    Ok(engine) => engine,
                    Err(e) => {
                        let _ = ready_tx.send(Err(SpeechError::Unavailable(e.to_string())));
                        return;
                    }
                };
                apply_settings(&mut engine, &settings);
                let _ = ready_tx.send(Ok(()));

                for command in rx {
                    let result = match command {
                        Command::Speak(text) => engine.speak(text, true).map(|_| ()),
                        Command::Cancel => engine.stop().map(|_| ()),
                    };
                    if let Err(e) = result {
                        tracing::warn!(error = %e, "TTS engine command failed");
                    }
                    speaking_flag.store(engine.is_speaking().unwrap_or(false), Ordering::Relaxed);
                }
                tracing::debug!("TTS engine thread stopped");
            })
            .map_err(|e| SpeechError::Unavailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| SpeechError::Unavailable("engine thread exited".to_string()))??;

        tracing::info!("Native TTS engine initialized");
        Ok(Self {
            commands: tx,
            speaking,
        })
    }

    fn send(&self, command: Command) -> Result<(), SpeechError> {
        self.commands
            .send(command)
            .map_err(|_| SpeechError::Backend("engine thread stopped".to_string()))
    }
}

fn apply_settings(engine: &mut tts::Tts, settings: &SpeechSettings) {
    let features = engine.supported_features();

    if features.rate {
        let rate = (engine.normal_rate() * settings.clamped_rate())
            .clamp(engine.min_rate(), engine.max_rate());
        if let Err(e) = engine.set_rate(rate) {
            tracing::warn!(error = %e, "Failed to set speech rate");
        }
    }
    if features.pitch {
        let pitch = (engine.normal_pitch() * settings.clamped_pitch())
            .clamp(engine.min_pitch(), engine.max_pitch());
        if let Err(e) = engine.set_pitch(pitch) {
            tracing::warn!(error = %e, "Failed to set speech pitch");
        }
    }
    if features.volume {
        let volume = (engine.max_volume() * settings.clamped_volume())
            .clamp(engine.min_volume(), engine.max_volume());
        if let Err(e) = engine.set_volume(volume) {
            tracing::warn!(error = %e, "Failed to set speech volume");
        }
    }
}

impl SpeechBackend for NativeTtsBackend {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        self.speaking.store(true, Ordering::Relaxed);
        self.send(Command::Speak(text.to_string()))
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        self.speaking.store(false, Ordering::Relaxed);
        self.send(Command::Cancel)
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Relaxed)
    }
}
