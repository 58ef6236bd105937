//! TUI application state wrapped around a calculator session.

use crate::projection::params::Field;
use crate::sync::session::Session;

/// TUI application state.
pub struct App {
    /// Calculator session; the single source of truth for inputs and results.
    pub session: Session,
    /// Index into [`Field::ALL`] of the highlighted input.
    pub selected: usize,
    /// One-line message shown above the footer.
    pub status: Option<String>,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Starts on the first field; a locked session opens with a view-only hint.
    pub fn new(session: Session) -> Self {
        let status = session
            .is_locked()
            .then(|| "View-only: press v to switch annual/cumulative".to_string());
        Self {
            session,
            selected: 0,
            status,
            quit: false,
        }
    }

    /// The highlighted field.
    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected]
    }

    /// Moves the highlight down, wrapping at the end.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Field::ALL.len();
    }

    /// Moves the highlight up, wrapping at the start.
    pub fn select_prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(Field::ALL.len() - 1);
    }

    /// Nudges the highlighted field by `steps` increments.
    pub fn nudge_selected(&mut self, steps: i32) {
        let field = self.selected_field();
        self.status = match self.session.nudge(field, steps) {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    /// Flips the battery subscription.
    pub fn toggle_battery(&mut self) {
        self.status = match self.session.nudge(Field::IncludeBattery, 1) {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    /// Switches annual/cumulative. Always allowed.
    pub fn toggle_view(&mut self) {
        self.session.toggle_view();
        self.status = None;
    }

    /// Shows the sanitized share link in the status line.
    pub fn show_share_link(&mut self) {
        self.status = Some(format!("Share: {}", self.session.share_link()));
    }
}
