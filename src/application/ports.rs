// Ports the application layer renders and reports through
use crate::domain::dashboard::{ChartSnapshot, Dialog, DisplayField, RelayCard, Section};
use chrono::NaiveDateTime;

/// Where the dashboard is drawn. Implementations keep their own model of
/// the screen; `present` is called once after every handled event.
pub trait DisplaySurface: Send {
    fn set_text(&mut self, field: DisplayField, text: String);

    fn redraw_chart(&mut self, chart: &ChartSnapshot);

    /// Replace the whole relay list
    fn render_relays(&mut self, cards: &[RelayCard]);

    fn show_section(&mut self, section: Section);

    fn set_dialog(&mut self, dialog: Dialog, open: bool);

    fn present(&mut self) {}
}

/// Blocking user-facing notice
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
