//! Unit tests for directional navigation and focus reassignment.

use remotefocus::focus::{Direction, FocusError, Navigator, NodeId, NodeSpec, Rect};
use remotefocus::speech::{Announcer, MemoryBackend, SpeechSettings};
use remotefocus::widgets::{checkbox, menu_button};

fn spoken_navigator() -> (Navigator, MemoryBackend) {
    let backend = MemoryBackend::new();
    let announcer = Announcer::immediate(backend.clone(), SpeechSettings::default());
    (Navigator::new(announcer), backend)
}

fn label_of(nav: &Navigator) -> Option<&str> {
    nav.focused_label()
}

/// Container C with point leaves L1(0,0), L2(100,0), L3(0,100).
#[test]
fn test_point_grid_right_then_blocked_down() {
    let mut nav = Navigator::default();
    let c = nav.register(None, NodeSpec::container()).unwrap();
    let l1 = nav
        .register(Some(c), NodeSpec::leaf().with_geometry(Rect::at(0.0, 0.0)))
        .unwrap();
    let l2 = nav
        .register(Some(c), NodeSpec::leaf().with_geometry(Rect::at(100.0, 0.0)))
        .unwrap();
    nav.register(Some(c), NodeSpec::leaf().with_geometry(Rect::at(0.0, 100.0)))
        .unwrap();

    assert_eq!(nav.focused(), Some(l1));
    assert_eq!(nav.move_focus(Direction::Right), Some(l2));
    assert_eq!(nav.move_focus(Direction::Down), None);
    assert_eq!(nav.focused(), Some(l2));
}

#[test]
fn test_menu_without_geometry_walks_in_order() {
    let (mut nav, backend) = spoken_navigator();
    let menu = nav.register(None, NodeSpec::container()).unwrap();
    for label in ["Home", "Settings", "Profile", "Logout"] {
        nav.register(Some(menu), menu_button(label, |_| {})).unwrap();
    }

    assert_eq!(label_of(&nav), Some("Home"));
    for expected in ["Settings", "Profile", "Logout"] {
        assert!(nav.move_focus(Direction::Down).is_some());
        assert_eq!(label_of(&nav), Some(expected));
    }
    assert_eq!(nav.move_focus(Direction::Down), None);
    assert_eq!(label_of(&nav), Some("Logout"));

    assert_eq!(backend.spoken(), vec!["Home", "Settings", "Profile", "Logout"]);
}

#[test]
fn test_explicit_neighbor_beats_geometry() {
    let mut nav = Navigator::default();
    let near = NodeSpec::leaf()
        .with_label("near")
        .with_geometry(Rect::new(200.0, 0.0, 100.0, 50.0));
    let far = NodeSpec::leaf()
        .with_label("far")
        .with_geometry(Rect::new(800.0, 0.0, 100.0, 50.0));

    let start = nav
        .register(None, NodeSpec::leaf().with_geometry(Rect::new(0.0, 0.0, 100.0, 50.0)))
        .unwrap();
    nav.register(None, near).unwrap();
    let far = nav.register(None, far).unwrap();

    let mut hints = std::collections::HashMap::new();
    hints.insert(Direction::Right, far);
    assert!(nav.update_neighbors(start, hints));

    assert_eq!(nav.move_focus(Direction::Right), Some(far));
}

#[test]
fn test_explicit_neighbor_into_other_container() {
    let mut nav = Navigator::default();
    let menu = nav.register(None, NodeSpec::container()).unwrap();
    let home = nav.register(Some(menu), NodeSpec::leaf()).unwrap();
    let grid = nav.register(None, NodeSpec::container()).unwrap();
    nav.register(Some(grid), NodeSpec::leaf()).unwrap();
    let second = nav.register(Some(grid), NodeSpec::leaf()).unwrap();

    let mut hints = std::collections::HashMap::new();
    hints.insert(Direction::Right, second);
    nav.update_neighbors(home, hints);

    assert_eq!(nav.focused(), Some(home));
    assert_eq!(nav.move_focus(Direction::Right), Some(second));
}

#[test]
fn test_unknown_parent_after_unregister() {
    let mut nav = Navigator::default();
    let page = nav.register(None, NodeSpec::container()).unwrap();
    nav.register(Some(page), NodeSpec::leaf()).unwrap();
    nav.unregister(page);

    assert_eq!(
        nav.register(Some(page), NodeSpec::leaf()),
        Err(FocusError::UnknownParent(page))
    );
}

#[test]
fn test_leaf_parent_is_rejected() {
    let mut nav = Navigator::default();
    let leaf = nav.register(None, NodeSpec::leaf()).unwrap();
    assert_eq!(
        nav.register(Some(leaf), NodeSpec::leaf()),
        Err(FocusError::ParentIsLeaf(leaf))
    );
}

#[test]
fn test_unregister_focused_container_falls_back_to_parent_scope() {
    let mut nav = Navigator::default();
    let menu = nav.register(None, NodeSpec::container()).unwrap();
    let home = nav.register(Some(menu), NodeSpec::leaf()).unwrap();
    let content = nav.register(None, NodeSpec::container()).unwrap();
    let page = nav.register(Some(content), NodeSpec::container()).unwrap();
    let button = nav.register(Some(page), NodeSpec::leaf()).unwrap();

    nav.set_focus(button);
    nav.unregister(page);

    assert_eq!(nav.focused(), Some(home));
    assert!(nav.node(home).unwrap().is_active());

    // Second removal is silent.
    nav.unregister(page);
    assert_eq!(nav.focused(), Some(home));
}

#[test]
fn test_preferred_child_wins_on_entry() {
    let mut nav = Navigator::default();
    nav.register(None, NodeSpec::leaf()).unwrap();
    let grid = nav
        .register(None, NodeSpec::container().with_key("grid"))
        .unwrap();
    nav.register(Some(grid), NodeSpec::leaf()).unwrap();
    let second = nav.register(Some(grid), NodeSpec::leaf()).unwrap();

    // Re-registering by key updates the options in place.
    let same = nav
        .register(
            None,
            NodeSpec::container()
                .with_key("grid")
                .with_preferred_child(second),
        )
        .unwrap();
    assert_eq!(same, grid);
    assert_eq!(nav.tree().children(grid).len(), 2);

    assert_eq!(nav.move_focus(Direction::Down), Some(second));
}

#[test]
fn test_remembered_child_resumes() {
    let mut nav = Navigator::default();
    let menu = nav
        .register(None, NodeSpec::container().remember_last_focused())
        .unwrap();
    nav.register(Some(menu), NodeSpec::leaf()).unwrap();
    let settings = nav.register(Some(menu), NodeSpec::leaf()).unwrap();
    let content = nav.register(None, NodeSpec::container()).unwrap();
    nav.register(Some(content), NodeSpec::leaf()).unwrap();

    nav.move_focus(Direction::Down);
    assert_eq!(nav.focused(), Some(settings));

    nav.set_focus(content);
    assert_eq!(nav.set_focus(menu), Some(settings));
}

#[test]
fn test_focus_boundary_keeps_focus_inside() {
    let mut nav = Navigator::default();
    nav.register(None, NodeSpec::leaf()).unwrap();
    let dialog = nav
        .register(None, NodeSpec::container().focus_boundary())
        .unwrap();
    let ok = nav.register(Some(dialog), NodeSpec::leaf()).unwrap();
    let cancel = nav.register(Some(dialog), NodeSpec::leaf()).unwrap();

    nav.set_focus(ok);
    assert_eq!(nav.move_focus(Direction::Up), None);
    assert_eq!(nav.move_focus(Direction::Down), Some(cancel));
    assert_eq!(nav.move_focus(Direction::Down), None);
    assert_eq!(nav.focused(), Some(cancel));
}

#[test]
fn test_checkbox_enter_twice() {
    let (mut nav, backend) = spoken_navigator();
    let card = nav.register(None, NodeSpec::container()).unwrap();
    let (spec, state) = checkbox("Select");
    nav.register(Some(card), spec).unwrap();

    nav.enter();
    nav.enter();

    assert!(!state.is_checked());
    assert_eq!(
        backend.spoken(),
        vec!["Select, Unchecked", "Select, Checked", "Select, Unchecked"]
    );
}

#[test]
fn test_disabled_leaf_is_skipped() {
    let mut nav = Navigator::default();
    nav.register(None, NodeSpec::leaf()).unwrap();
    let hidden = nav
        .register(None, NodeSpec::leaf().with_focusable(false))
        .unwrap();
    let last = nav.register(None, NodeSpec::leaf()).unwrap();

    assert_eq!(nav.move_focus(Direction::Down), Some(last));
    assert_eq!(nav.set_focus(hidden), None);
    assert_eq!(nav.focused(), Some(last));
    assert_eq!(nav.tree().focus_path(), vec![NodeId::ROOT, last]);
}

#[test]
fn test_menu_entry_without_geometry_is_reachable() {
    let mut nav = Navigator::default();
    let menu = nav.register(None, NodeSpec::container()).unwrap();
    nav.register(
        Some(menu),
        menu_button("Home", |_| {}).with_geometry(Rect::new(20.0, 20.0, 160.0, 50.0)),
    )
    .unwrap();
    let settings = nav
        .register(
            Some(menu),
            menu_button("Settings", |_| {}).with_geometry(Rect::new(20.0, 80.0, 160.0, 50.0)),
        )
        .unwrap();
    // Geometry for this entry has not been reported yet.
    let profile = nav.register(Some(menu), menu_button("Profile", |_| {})).unwrap();

    nav.set_focus(settings);
    assert_eq!(nav.move_focus(Direction::Down), Some(profile));
    assert_eq!(label_of(&nav), Some("Profile"));
}

#[test]
fn test_keyed_register_under_removed_parent_fails() {
    let mut nav = Navigator::default();
    let page = nav.register(None, NodeSpec::container()).unwrap();
    let menu = nav.register(None, NodeSpec::container()).unwrap();
    let btn = nav
        .register(Some(menu), NodeSpec::leaf().with_key("btn"))
        .unwrap();
    nav.unregister(page);

    assert_eq!(
        nav.register(Some(page), NodeSpec::leaf().with_key("btn")),
        Err(FocusError::UnknownParent(page))
    );
    assert_eq!(nav.tree().parent(btn), Some(menu));
}

#[test]
fn test_keyed_register_does_not_move_node() {
    let mut nav = Navigator::default();
    let menu = nav.register(None, NodeSpec::container()).unwrap();
    let content = nav.register(None, NodeSpec::container()).unwrap();
    let btn = nav
        .register(Some(menu), NodeSpec::leaf().with_key("btn"))
        .unwrap();

    let same = nav
        .register(Some(content), NodeSpec::leaf().with_key("btn").with_label("Moved"))
        .unwrap();
    assert_eq!(same, btn);
    assert_eq!(nav.tree().parent(btn), Some(menu));
    assert!(nav.tree().children(content).is_empty());
    assert_eq!(nav.node(btn).and_then(|n| n.label()), Some("Moved"));
}

#[test]
fn test_hint_to_own_container_does_not_report_a_move() {
    let (mut nav, backend) = spoken_navigator();
    let card = nav.register(None, NodeSpec::container()).unwrap();
    let text = nav
        .register(
            Some(card),
            checkbox("Select").0.with_neighbor(Direction::Right, card),
        )
        .unwrap();

    assert_eq!(nav.focused(), Some(text));
    assert_eq!(nav.move_focus(Direction::Right), None);
    assert_eq!(nav.focused(), Some(text));
    assert_eq!(backend.spoken(), vec!["Select, Unchecked"]);
}
