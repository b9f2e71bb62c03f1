// Relay domain model
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelayId(pub u64);

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelayStatus {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl RelayStatus {
    pub fn from_state(state: bool) -> Self {
        if state { RelayStatus::On } else { RelayStatus::Off }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelayStatus::On => "ON",
            RelayStatus::Off => "OFF",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayDevice {
    pub id: RelayId,
    pub name: String,
    pub gpio: String,
    pub state: bool,
    pub last_changed: Option<String>,
}

impl RelayDevice {
    pub fn new(id: RelayId, name: String, gpio: String) -> Self {
        Self {
            id,
            name,
            gpio,
            state: false,
            last_changed: None,
        }
    }

    pub fn status(&self) -> RelayStatus {
        RelayStatus::from_state(self.state)
    }

    /// Flip the output and stamp the change time
    pub fn toggle(&mut self, changed_at: String) -> RelayStatus {
        self.state = !self.state;
        self.last_changed = Some(changed_at);
        self.status()
    }
}
