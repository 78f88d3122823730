//! Announcement coordinator.
//!
//! At most one utterance is ever active. Every [`Announcer::announce`] call
//! first cancels whatever is playing or pending, then starts the new text.
//! Announcing never blocks and never fails from the caller's point of view.

use super::backend::SpeechBackend;
use super::{normalize_text, SpeechSettings};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Latest request held in the single slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Utterance {
    sequence: u64,
    text: String,
}

impl Utterance {
    /// Replace the slot unless it already holds a newer request.
    ///
    /// Handles on different threads take sequence numbers and store them in
    /// separate steps, so an older request may arrive second.
    fn supersede(&mut self, sequence: u64, text: &str) -> bool {
        if sequence <= self.sequence {
            return false;
        }
        self.sequence = sequence;
        self.text = text.to_string();
        true
    }
}

/// Backend used inline, with the sequence of the last request it handled.
struct InlineSpeech {
    backend: Box<dyn SpeechBackend>,
    handled: u64,
}

enum Channel {
    /// Nothing is spoken; the latest request is only recorded
    Disabled,
    /// Cancel and speak inline on the caller's thread
    Immediate(Mutex<InlineSpeech>),
    /// Hand requests to the worker task through a single-slot channel
    Worker(watch::Sender<Utterance>),
}

struct Inner {
    channel: Channel,
    settings: SpeechSettings,
    sequence: AtomicU64,
    last: Mutex<Utterance>,
}

/// Cheaply cloneable handle to the single speech slot.
#[derive(Clone)]
pub struct Announcer {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Announcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.inner.channel {
            Channel::Disabled => "disabled",
            Channel::Immediate(_) => "immediate",
            Channel::Worker(_) => "worker",
        };
        f.debug_struct("Announcer")
            .field("mode", &mode)
            .field("settings", &self.inner.settings)
            .finish()
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Announcer {
    fn with_channel(channel: Channel, settings: SpeechSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                channel,
                settings,
                sequence: AtomicU64::new(0),
                last: Mutex::new(Utterance::default()),
            }),
        }
    }

    /// An announcer that records requests but never speaks.
    pub fn disabled() -> Self {
        Self::with_channel(Channel::Disabled, SpeechSettings::default())
    }

    /// Cancel and speak inline on the calling thread.
    ///
    /// Suitable for hosts without an async runtime whose backend returns as
    /// soon as synthesis has started.
    pub fn immediate(backend: impl SpeechBackend + 'static, settings: SpeechSettings) -> Self {
        let inline = InlineSpeech {
            backend: Box::new(backend),
            handled: 0,
        };
        Self::with_channel(Channel::Immediate(Mutex::new(inline)), settings)
    }

    /// Move the backend onto a worker task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime; use [`Announcer::spawn_on`]
    /// with an explicit handle in that case.
    pub fn spawn(backend: impl SpeechBackend + 'static, settings: SpeechSettings) -> Self {
        Self::spawn_on(&tokio::runtime::Handle::current(), backend, settings)
    }

    /// Move the backend onto a worker task on the given runtime.
    pub fn spawn_on(
        handle: &tokio::runtime::Handle,
        backend: impl SpeechBackend + 'static,
        settings: SpeechSettings,
    ) -> Self {
        let (tx, rx) = watch::channel(Utterance::default());
        let debounce = Duration::from_millis(settings.debounce_ms);
        handle.spawn(run_worker(Box::new(backend), rx, debounce));
        tracing::info!(debounce_ms = settings.debounce_ms, "Announcement worker started");
        Self::with_channel(Channel::Worker(tx), settings)
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.inner.settings
    }

    /// Speak `text`, superseding any utterance in progress or pending.
    ///
    /// Empty text only cancels.
    pub fn announce(&self, text: &str) {
        if !self.inner.settings.enabled {
            tracing::debug!("Announcements disabled; dropping {:?}", text);
            return;
        }

        let text = normalize_text(text);
        let sequence = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(sequence, "Announce: {}", text);

        self.inner
            .last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .supersede(sequence, &text);

        match &self.inner.channel {
            Channel::Disabled => {}
            Channel::Immediate(inline) => {
                let mut inline = inline.lock().unwrap_or_else(PoisonError::into_inner);
                if sequence <= inline.handled {
                    tracing::debug!(sequence, "Skipping superseded announcement");
                    return;
                }
                inline.handled = sequence;
                speak_latest(&*inline.backend, &text);
            }
            Channel::Worker(tx) => {
                tx.send_if_modified(|slot| slot.supersede(sequence, &text));
            }
        }
    }

    /// Silence the channel without starting anything new.
    pub fn cancel(&self) {
        self.announce("");
    }

    /// The most recent non-empty announcement requested (not necessarily finished).
    pub fn last_announcement(&self) -> Option<String> {
        let last = self.inner.last.lock().unwrap_or_else(PoisonError::into_inner);
        (!last.text.is_empty()).then(|| last.text.clone())
    }
}

/// Cancel whatever is playing, then start `text`. Failures are logged only.
fn speak_latest(backend: &dyn SpeechBackend, text: &str) {
    if let Err(e) = backend.cancel() {
        tracing::warn!(error = %e, "Failed to cancel speech");
    }
    if text.is_empty() {
        return;
    }
    if let Err(e) = backend.speak(text) {
        tracing::warn!(error = %e, "Speech backend failed; announcement dropped");
    }
}

async fn run_worker(
    backend: Box<dyn SpeechBackend>,
    mut rx: watch::Receiver<Utterance>,
    debounce: Duration,
) {
    let mut last_spoken = 0;

    while rx.changed().await.is_ok() {
        if !debounce.is_zero() {
            // Stop the old utterance straight away, then let the burst settle.
            if let Err(e) = backend.cancel() {
                tracing::warn!(error = %e, "Failed to cancel speech");
            }
            tokio::time::sleep(debounce).await;
        }

        let utterance = rx.borrow_and_update().clone();
        if utterance.sequence <= last_spoken {
            continue;
        }
        last_spoken = utterance.sequence;
        speak_latest(backend.as_ref(), &utterance.text);
    }

    if let Err(e) = backend.cancel() {
        tracing::warn!(error = %e, "Failed to cancel speech on shutdown");
    }
    tracing::debug!("Announcement worker stopped");
}
