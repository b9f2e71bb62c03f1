// Outbound device commands
use super::relay::{RelayDevice, RelayStatus};
use serde::Serialize;

/// Envelope understood by the device firmware: `{"page": ..., "value": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", content = "value", rename_all = "lowercase")]
pub enum DeviceCommand {
    Device(RelayCommand),
    Setting(WifiSettings),
}

impl DeviceCommand {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayCommand {
    pub name: String,
    pub status: RelayStatus,
    pub gpio: String,
}

impl RelayCommand {
    pub fn for_relay(relay: &RelayDevice) -> Self {
        Self {
            name: relay.name.clone(),
            status: relay.status(),
            gpio: relay.gpio.clone(),
        }
    }
}

/// Wi-Fi and upstream server settings, sent as plain strings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WifiSettings {
    pub ssid: String,
    pub password: String,
    pub token: String,
    pub server: String,
    pub port: String,
}

impl WifiSettings {
    pub fn trimmed(&self) -> Self {
        Self {
            ssid: self.ssid.trim().to_string(),
            password: self.password.trim().to_string(),
            token: self.token.trim().to_string(),
            server: self.server.trim().to_string(),
            port: self.port.trim().to_string(),
        }
    }
}
