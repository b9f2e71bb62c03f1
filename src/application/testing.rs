// Test doubles for the application ports
use crate::application::channel::{ChannelError, ConnectionState, Transport};
use crate::application::ports::{Clock, DisplaySurface, Notifier};
use crate::domain::dashboard::{ChartSnapshot, Dialog, DisplayField, RelayCard, Section};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct FakeTransport {
    state: Mutex<ConnectionState>,
    sent: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            state: Mutex::new(state),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    fn transmit(&self, payload: String) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(payload);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn at(h: u32, m: u32, s: u32) -> Self {
        Self {
            now: Mutex::new(Self::time(h, m, s)),
        }
    }

    pub fn set(&self, h: u32, m: u32, s: u32) {
        *self.now.lock().unwrap() = Self::time(h, m, s);
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub texts: HashMap<DisplayField, String>,
    pub charts: HashMap<crate::domain::telemetry::Metric, ChartSnapshot>,
    pub redraws: usize,
    pub relays: Vec<RelayCard>,
    pub relay_renders: usize,
    pub section: Option<Section>,
    pub dialogs: HashMap<Dialog, bool>,
    pub presents: usize,
}

impl RecordingSurface {
    pub fn text(&self, field: DisplayField) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    pub fn dialog_open(&self, dialog: Dialog) -> bool {
        self.dialogs.get(&dialog).copied().unwrap_or(false)
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_text(&mut self, field: DisplayField, text: String) {
        self.texts.insert(field, text);
    }

    fn redraw_chart(&mut self, chart: &ChartSnapshot) {
        self.redraws += 1;
        self.charts.insert(chart.metric, chart.clone());
    }

    fn render_relays(&mut self, cards: &[RelayCard]) {
        self.relay_renders += 1;
        self.relays = cards.to_vec();
    }

    fn show_section(&mut self, section: Section) {
        self.section = Some(section);
    }

    fn set_dialog(&mut self, dialog: Dialog, open: bool) {
        self.dialogs.insert(dialog, open);
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}
