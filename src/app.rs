//! Demo TV menu: a side menu, and a content area showing one page at a time.
//!
//! Menu entries only record which page was chosen; the page itself is
//! remounted after the input action has been dispatched, since callbacks
//! cannot touch the focus tree.

use remotefocus::focus::{FocusError, NavigationSettings, Navigator, NodeId, NodeSpec, Rect};
use remotefocus::input::InputAction;
use remotefocus::speech::Announcer;
use remotefocus::widgets::{button, checkbox, menu_button, text_item, CheckboxState};
use std::sync::{Arc, Mutex, PoisonError};

const MENU_WIDTH: f32 = 200.0;
const SCREEN_HEIGHT: f32 = 720.0;
const CONTENT_X: f32 = 220.0;
const CONTENT_WIDTH: f32 = 1060.0;

/// Pages reachable from the side menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Settings,
    Profile,
    Logout,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Settings, Page::Profile, Page::Logout];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Settings => "Settings",
            Page::Profile => "Profile",
            Page::Logout => "Logout",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            Page::Home => "Welcome",
            Page::Settings => "Settings content here.",
            Page::Profile => "Profile info here.",
            Page::Logout => "Are you sure you want to logout?",
        }
    }
}

/// Demo application state.
pub struct TvMenuApp {
    navigator: Navigator,
    content: NodeId,
    /// Page chosen by the last menu selection
    selected: Arc<Mutex<Page>>,
    /// Page currently registered under the content container
    mounted: Option<(Page, NodeId)>,
    checkboxes: Vec<(String, CheckboxState)>,
}

impl TvMenuApp {
    pub fn new(announcer: Announcer, settings: NavigationSettings) -> Result<Self, FocusError> {
        let mut navigator = Navigator::with_settings(announcer, settings);
        let selected = Arc::new(Mutex::new(Page::default()));

        let menu = navigator.register(
            None,
            NodeSpec::container()
                .with_key("menu")
                .with_label("Menu")
                .with_geometry(Rect::new(0.0, 0.0, MENU_WIDTH, SCREEN_HEIGHT))
                .remember_last_focused(),
        )?;

        for (row, page) in Page::ALL.into_iter().enumerate() {
            let selected = Arc::clone(&selected);
            let spec = menu_button(page.label(), move |_| {
                *selected.lock().unwrap_or_else(PoisonError::into_inner) = page;
            })
            .with_key(format!("menu/{}", page.label().to_lowercase()))
            .with_geometry(Rect::new(20.0, 20.0 + row as f32 * 60.0, 160.0, 50.0));
            navigator.register(Some(menu), spec)?;
        }

        // Back anywhere in the content area returns to the menu.
        let content = navigator.register(
            None,
            NodeSpec::container()
                .with_key("content")
                .with_geometry(Rect::new(CONTENT_X, 0.0, CONTENT_WIDTH, SCREEN_HEIGHT))
                .remember_last_focused()
                .on_back_press(move |d| {
                    d.request_focus(menu);
                    true
                }),
        )?;

        let mut app = Self {
            navigator,
            content,
            selected,
            mounted: None,
            checkboxes: Vec::new(),
        };
        app.sync_page()?;

        tracing::info!(nodes = app.navigator.tree().len(), "Menu ready");
        Ok(app)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The page shown in the content area.
    pub fn page(&self) -> Page {
        self.mounted.map(|(page, _)| page).unwrap_or_default()
    }

    /// Checkbox states on the current page, by the text they belong to.
    pub fn checkbox(&self, text: &str) -> Option<&CheckboxState> {
        self.checkboxes
            .iter()
            .find(|(owner, _)| owner == text)
            .map(|(_, state)| state)
    }

    /// Apply one input action, then swap pages if a menu entry was chosen.
    pub fn handle(&mut self, action: InputAction) -> bool {
        let handled = self.navigator.handle(action);
        if let Err(e) = self.sync_page() {
            tracing::error!("Failed to mount page: {}", e);
        }
        handled
    }

    fn sync_page(&mut self) -> Result<(), FocusError> {
        let selected = *self.selected.lock().unwrap_or_else(PoisonError::into_inner);
        if self.mounted.is_some_and(|(page, _)| page == selected) {
            return Ok(());
        }

        if let Some((page, id)) = self.mounted.take() {
            tracing::debug!(page = page.label(), "Unmounting page");
            self.navigator.unregister(id);
        }
        self.checkboxes.clear();

        let page = self.navigator.register(
            Some(self.content),
            NodeSpec::container()
                .with_key("page")
                .with_label(selected.label())
                .remember_last_focused(),
        )?;
        match selected {
            Page::Home => self.mount_home(page)?,
            other => self.mount_text_page(page, other)?,
        }

        self.mounted = Some((selected, page));
        tracing::info!(page = selected.label(), "Showing page");
        Ok(())
    }

    fn mount_text_page(&mut self, page: NodeId, which: Page) -> Result<(), FocusError> {
        let heading = format!("{} Page", which.label());
        self.navigator.register(
            Some(page),
            text_item(heading).with_geometry(Rect::new(240.0, 20.0, 600.0, 50.0)),
        )?;
        self.navigator.register(
            Some(page),
            text_item(which.body()).with_geometry(Rect::new(240.0, 90.0, 600.0, 40.0)),
        )?;
        Ok(())
    }

    /// Two-column grid: three buttons, then three text cards with a checkbox each.
    fn mount_home(&mut self, page: NodeId) -> Result<(), FocusError> {
        let grid = self.navigator.register(
            Some(page),
            NodeSpec::container()
                .with_key("home/grid")
                .remember_last_focused(),
        )?;

        let buttons = [
            ("Button 1", 240.0, 100.0),
            ("Button 2", 460.0, 100.0),
            ("Button 3", 240.0, 180.0),
        ];
        for (label, x, y) in buttons {
            self.navigator.register(
                Some(grid),
                button(label).with_geometry(Rect::new(x, y, 150.0, 50.0)),
            )?;
        }

        let cards = [
            ("Hello world", 460.0, 180.0),
            ("Good morning", 240.0, 320.0),
            ("Good night", 460.0, 320.0),
        ];
        for (text, x, y) in cards {
            let card = self.navigator.register(
                Some(grid),
                NodeSpec::container()
                    .with_label(text)
                    .with_geometry(Rect::new(x, y, 200.0, 110.0)),
            )?;
            self.navigator.register(
                Some(card),
                text_item(text).with_geometry(Rect::new(x + 10.0, y + 10.0, 180.0, 40.0)),
            )?;

            let (spec, state) = checkbox("Select");
            self.navigator.register(
                Some(card),
                spec.with_geometry(Rect::new(x + 10.0, y + 60.0, 180.0, 40.0)),
            )?;
            self.checkboxes.push((text.to_string(), state));
        }
        Ok(())
    }
}
