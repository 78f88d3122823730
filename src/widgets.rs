//! Ready-made focusable items.
//!
//! Each helper returns a [`NodeSpec`] wired with the announcements a TV menu
//! needs. Callers add geometry, keys or extra hooks with the usual builder
//! methods before registering.

use crate::focus::{Dispatch, NodeSpec};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn announce_label(dispatch: &mut Dispatch<'_>) {
    if let Some(label) = dispatch.label() {
        dispatch.announce(label);
    }
}

/// Side-menu entry: announces its label, and on enter announces the page it
/// opens before calling `on_select`.
pub fn menu_button(
    label: impl Into<String>,
    on_select: impl Fn(&mut Dispatch<'_>) + Send + Sync + 'static,
) -> NodeSpec {
    let label = label.into();
    let entered = format!("Entered {label} page");

    NodeSpec::leaf()
        .with_label(label)
        .on_focus(announce_label)
        .on_enter_press(move |d| {
            d.announce(&entered);
            on_select(d);
        })
}

/// Plain button announcing "clicked <label>" on enter.
pub fn button(label: impl Into<String>) -> NodeSpec {
    let label = label.into();
    let clicked = format!("clicked {label}");

    NodeSpec::leaf()
        .with_label(label)
        .on_focus(announce_label)
        .on_enter_press(move |d| d.announce(&clicked))
}

/// Read-only text that only announces itself.
pub fn text_item(label: impl Into<String>) -> NodeSpec {
    NodeSpec::leaf().with_label(label).on_focus(announce_label)
}

/// Shared checked flag of a [`checkbox`].
#[derive(Debug, Clone, Default)]
pub struct CheckboxState(Arc<AtomicBool>);

impl CheckboxState {
    pub fn new(checked: bool) -> Self {
        Self(Arc::new(AtomicBool::new(checked)))
    }

    pub fn is_checked(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set_checked(&self, checked: bool) {
        self.0.store(checked, Ordering::SeqCst);
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::SeqCst)
    }
}

/// "<label>, Checked" or "<label>, Unchecked".
pub fn toggle_announcement(label: &str, checked: bool) -> String {
    let state = if checked { "Checked" } else { "Unchecked" };
    format!("{label}, {state}")
}

/// Checkbox announcing its label with its state; enter toggles it.
///
/// Starts unchecked. The returned handle shares the flag with the node's hooks.
pub fn checkbox(label: impl Into<String>) -> (NodeSpec, CheckboxState) {
    let state = CheckboxState::default();
    let label = label.into();

    let on_focus_state = state.clone();
    let on_focus_label = label.clone();
    let on_enter_state = state.clone();
    let on_enter_label = label.clone();

    let spec = NodeSpec::leaf()
        .with_label(label)
        .on_focus(move |d| {
            d.announce(toggle_announcement(&on_focus_label, on_focus_state.is_checked()));
        })
        .on_enter_press(move |d| {
            let checked = on_enter_state.toggle();
            d.announce(toggle_announcement(&on_enter_label, checked));
        });

    (spec, state)
}
