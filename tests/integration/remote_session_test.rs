//! Integration tests for a full remote-control session.
//!
//! Builds a side menu and a content grid, feeds raw key codes from another
//! thread through the input queue, and checks focus and what was spoken.

use remotefocus::focus::{Navigator, NodeId, NodeSpec, Rect};
use remotefocus::input::{InputQueue, KeyMap};
use remotefocus::speech::{Announcer, MemoryBackend, SpeechSettings};
use remotefocus::widgets::{button, checkbox, menu_button, text_item, CheckboxState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const LEFT: u32 = 37;
const UP: u32 = 38;
const RIGHT: u32 = 39;
const DOWN: u32 = 40;
const ENTER: u32 = 13;
const BACK: u32 = 10009;

struct Session {
    nav: Navigator,
    backend: MemoryBackend,
    selections: Arc<AtomicUsize>,
    checkbox: CheckboxState,
}

/// Menu on the left, two buttons above a text card on the right.
fn session(announcer_for: impl FnOnce(MemoryBackend) -> Announcer) -> Session {
    let backend = MemoryBackend::new();
    let mut nav = Navigator::new(announcer_for(backend.clone()));
    let selections = Arc::new(AtomicUsize::new(0));

    let menu = nav
        .register(
            None,
            NodeSpec::container()
                .with_geometry(Rect::new(0.0, 0.0, 200.0, 720.0))
                .remember_last_focused(),
        )
        .unwrap();
    for (row, label) in ["Home", "Settings"].into_iter().enumerate() {
        let selections = Arc::clone(&selections);
        nav.register(
            Some(menu),
            menu_button(label, move |_| {
                selections.fetch_add(1, Ordering::SeqCst);
            })
            .with_geometry(Rect::new(20.0, 20.0 + row as f32 * 60.0, 160.0, 50.0)),
        )
        .unwrap();
    }

    let content = nav
        .register(
            None,
            NodeSpec::container()
                .with_geometry(Rect::new(220.0, 0.0, 1060.0, 720.0))
                .on_back_press(move |d| {
                    d.request_focus(menu);
                    true
                }),
        )
        .unwrap();
    nav.register(
        Some(content),
        button("Button 1").with_geometry(Rect::new(240.0, 100.0, 150.0, 50.0)),
    )
    .unwrap();
    nav.register(
        Some(content),
        button("Button 2").with_geometry(Rect::new(460.0, 100.0, 150.0, 50.0)),
    )
    .unwrap();

    let card = nav
        .register(
            Some(content),
            NodeSpec::container().with_geometry(Rect::new(240.0, 180.0, 200.0, 110.0)),
        )
        .unwrap();
    nav.register(
        Some(card),
        text_item("Hello world").with_geometry(Rect::new(250.0, 190.0, 180.0, 40.0)),
    )
    .unwrap();
    let (spec, state) = checkbox("Select");
    nav.register(
        Some(card),
        spec.with_geometry(Rect::new(250.0, 240.0, 180.0, 40.0)),
    )
    .unwrap();

    Session {
        nav,
        backend,
        selections,
        checkbox: state,
    }
}

fn immediate(backend: MemoryBackend) -> Announcer {
    Announcer::immediate(backend, SpeechSettings::default())
}

fn press(queue: &InputQueue, nav: &mut Navigator, codes: &[u32]) {
    let sender = queue.sender();
    let codes = codes.to_vec();
    thread::spawn(move || {
        for code in codes {
            sender.send_key(code);
        }
    })
    .join()
    .unwrap();
    queue.drain(nav);
}

fn focused_label(nav: &Navigator) -> Option<String> {
    nav.focused_label().map(str::to_string)
}

#[test]
fn test_menu_to_grid_and_back() {
    let mut s = session(immediate);
    let queue = InputQueue::new(KeyMap::default());

    assert_eq!(focused_label(&s.nav).as_deref(), Some("Home"));

    press(&queue, &mut s.nav, &[DOWN, ENTER]);
    assert_eq!(s.selections.load(Ordering::SeqCst), 1);

    press(&queue, &mut s.nav, &[RIGHT]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Button 1"));

    press(&queue, &mut s.nav, &[DOWN, DOWN, ENTER]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Select"));
    assert!(s.checkbox.is_checked());

    press(&queue, &mut s.nav, &[BACK]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Settings"));

    assert_eq!(
        s.backend.spoken(),
        vec![
            "Home",
            "Settings",
            "Entered Settings page",
            "Button 1",
            "Hello world",
            "Select, Unchecked",
            "Select, Checked",
            "Settings",
        ]
    );
}

#[test]
fn test_edges_are_no_ops() {
    let mut s = session(immediate);
    let queue = InputQueue::new(KeyMap::default());

    press(&queue, &mut s.nav, &[UP, LEFT]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Home"));

    press(&queue, &mut s.nav, &[RIGHT, RIGHT, RIGHT]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Button 2"));

    // Back from the menu itself is not consumed by anything.
    press(&queue, &mut s.nav, &[BACK, BACK]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Home"));
    assert!(!s.nav.back());
}

#[test]
fn test_page_teardown_moves_focus_back_to_menu() {
    let mut s = session(immediate);
    let queue = InputQueue::new(KeyMap::default());
    press(&queue, &mut s.nav, &[RIGHT, DOWN]);
    assert_eq!(focused_label(&s.nav).as_deref(), Some("Hello world"));

    let content = s
        .nav
        .tree()
        .focus_path()
        .get(1)
        .copied()
        .unwrap_or(NodeId::ROOT);
    s.nav.unregister(content);

    assert_eq!(focused_label(&s.nav).as_deref(), Some("Home"));
    assert_eq!(s.backend.current().as_deref(), Some("Home"));
}

#[test]
fn test_session_with_speech_worker() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();
    let settings = SpeechSettings {
        debounce_ms: 30,
        ..Default::default()
    };

    let mut s = session(|backend| Announcer::spawn_on(runtime.handle(), backend, settings));
    let queue = InputQueue::new(KeyMap::default());

    press(&queue, &mut s.nav, &[RIGHT, DOWN]);
    thread::sleep(Duration::from_millis(300));

    assert_eq!(s.backend.current().as_deref(), Some("Hello world"));
    assert_eq!(
        s.backend.spoken().last().map(String::as_str),
        Some("Hello world")
    );
    assert_eq!(
        s.nav.announcer().last_announcement().as_deref(),
        Some("Hello world")
    );
}
