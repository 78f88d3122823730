//! Unit tests for the single-slot announcement channel.

use remotefocus::focus::{Direction, Navigator, NodeSpec};
use remotefocus::speech::{Announcer, MemoryBackend, SpeechEvent, SpeechSettings};
use remotefocus::widgets::text_item;
use std::time::Duration;

/// Index of the last `Spoke(text)` event, if any.
fn last_spoken_at(transcript: &[SpeechEvent], text: &str) -> Option<usize> {
    transcript
        .iter()
        .rposition(|event| *event == SpeechEvent::Spoke(text.to_string()))
}

#[test]
fn test_a_then_b_immediate() {
    let backend = MemoryBackend::new();
    let announcer = Announcer::immediate(backend.clone(), SpeechSettings::default());

    announcer.announce("A");
    announcer.announce("B");

    let transcript = backend.transcript();
    let a = last_spoken_at(&transcript, "A").unwrap();
    let b = last_spoken_at(&transcript, "B").unwrap();
    assert!(a < b);
    // A was cancelled before B started.
    assert!(transcript[a..b].contains(&SpeechEvent::Cancelled));
    assert_eq!(backend.current().as_deref(), Some("B"));
}

#[tokio::test]
async fn test_a_then_b_worker_never_speaks_stale() {
    let backend = MemoryBackend::new();
    let announcer = Announcer::spawn(backend.clone(), SpeechSettings::default());

    announcer.announce("A");
    announcer.announce("B");
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The worker only ever sees the latest request in the slot.
    assert_eq!(backend.spoken(), vec!["B"]);
    assert_eq!(backend.current().as_deref(), Some("B"));
}

#[tokio::test]
async fn test_worker_speaks_each_settled_announcement() {
    let backend = MemoryBackend::new();
    let announcer = Announcer::spawn(backend.clone(), SpeechSettings::default());

    announcer.announce("Home");
    tokio::time::sleep(Duration::from_millis(50)).await;
    announcer.announce("Settings");
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(
        backend.transcript(),
        vec![
            SpeechEvent::Spoke("Home".to_string()),
            SpeechEvent::Cancelled,
            SpeechEvent::Spoke("Settings".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_fast_sweep_with_debounce_speaks_where_focus_settles() {
    let backend = MemoryBackend::new();
    let settings = SpeechSettings {
        debounce_ms: 40,
        ..Default::default()
    };
    let mut nav = Navigator::new(Announcer::spawn(backend.clone(), settings));

    for label in ["Home", "Settings", "Profile", "Logout"] {
        nav.register(None, text_item(label)).unwrap();
    }
    for _ in 0..3 {
        nav.move_focus(Direction::Down);
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(backend.spoken(), vec!["Logout"]);
    assert_eq!(nav.announcer().last_announcement().as_deref(), Some("Logout"));
}

#[test]
fn test_broken_backend_does_not_block_navigation() {
    let announcer = Announcer::immediate(MemoryBackend::failing(), SpeechSettings::default());
    let mut nav = Navigator::new(announcer);
    nav.register(None, text_item("Home")).unwrap();
    let settings = nav.register(None, text_item("Settings")).unwrap();

    assert_eq!(nav.move_focus(Direction::Down), Some(settings));
    assert_eq!(
        nav.announcer().last_announcement().as_deref(),
        Some("Settings")
    );
}

#[test]
fn test_blank_text_cancels_only() {
    let backend = MemoryBackend::new();
    let announcer = Announcer::immediate(backend.clone(), SpeechSettings::default());
    let other_handle = announcer.clone();

    announcer.announce("Good night");
    other_handle.announce(" \n\t ");

    assert_eq!(backend.current(), None);
    assert_eq!(
        backend.transcript(),
        vec![
            SpeechEvent::Spoke("Good night".to_string()),
            SpeechEvent::Cancelled,
        ]
    );
}

#[test]
fn test_focus_without_hooks_is_silent() {
    let backend = MemoryBackend::new();
    let mut nav = Navigator::new(Announcer::immediate(
        backend.clone(),
        SpeechSettings::default(),
    ));
    nav.register(None, NodeSpec::leaf().with_label("Quiet")).unwrap();
    nav.register(None, NodeSpec::leaf()).unwrap();
    nav.move_focus(Direction::Down);

    assert!(backend.transcript().is_empty());
}

/// Announce from several handles on several threads at once.
fn announce_from_threads(announcer: &Announcer) {
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let announcer = announcer.clone();
            std::thread::spawn(move || {
                for step in 0..50 {
                    announcer.announce(&format!("Item {worker}-{step}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_handles_end_on_latest_immediate() {
    let backend = MemoryBackend::new();
    let announcer = Announcer::immediate(backend.clone(), SpeechSettings::default());

    announce_from_threads(&announcer);

    let last = announcer.last_announcement();
    assert!(last.is_some());
    assert_eq!(backend.current(), last);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_handles_end_on_latest_worker() {
    let backend = MemoryBackend::new();
    let announcer = Announcer::spawn(backend.clone(), SpeechSettings::default());

    let sender = announcer.clone();
    tokio::task::spawn_blocking(move || announce_from_threads(&sender))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let last = announcer.last_announcement();
    assert!(last.is_some());
    assert_eq!(backend.current(), last);
}
