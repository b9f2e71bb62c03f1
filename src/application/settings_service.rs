// Settings service - Packages the Wi-Fi/server form into a device command
use crate::application::channel::Channel;
use crate::application::ports::Notifier;
use crate::domain::command::{DeviceCommand, WifiSettings};
use std::sync::Arc;
use tracing::debug;

pub const SETTINGS_SENT_ALERT: &str = "Configuration has been sent to the device!";

#[derive(Clone)]
pub struct SettingsService {
    channel: Channel,
    notifier: Arc<dyn Notifier>,
}

impl SettingsService {
    pub fn new(channel: Channel, notifier: Arc<dyn Notifier>) -> Self {
        Self { channel, notifier }
    }

    /// Trim every field and send the settings. The confirmation alert is
    /// shown whether or not the frame went out.
    pub fn submit(&self, form: &WifiSettings) -> WifiSettings {
        let settings = form.trimmed();
        let command = DeviceCommand::Setting(settings.clone());
        if let Err(e) = self.channel.send_command(&command) {
            debug!(error = %e, "Settings not delivered");
        }
        self.notifier.alert(SETTINGS_SENT_ALERT);
        settings
    }
}
