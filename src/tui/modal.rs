// Modal overlays
//
// Self-contained overlays that handle their own input and return actions.
// App just holds Option<Modal>; input routing acts on the returned action.

use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    /// Close the modal
    Close,
    /// Leave the application
    Quit,
}

/// Available modal types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    /// Ingestion in progress; only quitting gets through
    Loading(String),
}

impl Modal {
    pub fn handle_input(&self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Char('q') => ModalAction::Quit,
                _ => ModalAction::Close,
            },
            Modal::Loading(_) => match key {
                KeyCode::Char('q') => ModalAction::Quit,
                _ => ModalAction::None,
            },
        }
    }
}

/// Rows of the help overlay: key, action
pub const HELP_ROWS: &[(&str, &str)] = &[
    ("Tab / Shift-Tab", "Move focus between panels"),
    ("↑ / ↓", "Select a bar in the focused histogram"),
    ("Space / Enter", "Toggle the selected bar as a filter"),
    ("c", "Colour the scatter by the focused histogram"),
    ("/", "Search threads (Enter keeps, Esc clears)"),
    ("h / l", "Move the lower edge of the focused brush"),
    ("H / L", "Move the upper edge of the focused brush"),
    ("← / →", "Shift the focused brush"),
    ("Esc", "Clear the focused brush or thread search"),
    ("arrows", "Move the scatter cursor"),
    ("r", "Reset every filter"),
    ("d", "Load the demo archive"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];
