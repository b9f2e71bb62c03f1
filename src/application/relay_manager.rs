// Relay manager - Relay list, toggle commands and two-step deletion
use crate::application::channel::Channel;
use crate::application::ports::{Clock, DisplaySurface, Notifier};
use crate::domain::command::{DeviceCommand, RelayCommand};
use crate::domain::dashboard::{clock_time, relay_cards, Dialog};
use crate::domain::relay::{RelayDevice, RelayId, RelayStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

pub const MISSING_FIELDS_ALERT: &str = "Please fill all fields!";

#[derive(Debug, Error, PartialEq)]
pub enum RelayError {
    #[error("relay name and GPIO are required")]
    MissingFields,
    #[error("no relay with id {0}")]
    NotFound(RelayId),
    #[error("no relay is pending deletion")]
    NoPendingDelete,
}

pub struct RelayManager {
    relays: Vec<RelayDevice>,
    next_id: u64,
    pending_delete: Option<RelayId>,
    channel: Channel,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl RelayManager {
    pub fn new(channel: Channel, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            relays: Vec::new(),
            next_id: 1,
            pending_delete: None,
            channel,
            notifier,
            clock,
        }
    }

    #[cfg(test)]
    pub fn relays(&self) -> &[RelayDevice] {
        &self.relays
    }

    #[cfg(test)]
    pub fn pending_delete(&self) -> Option<RelayId> {
        self.pending_delete
    }

    pub fn open_add_dialog(&self, surface: &mut dyn DisplaySurface) {
        surface.set_dialog(Dialog::AddRelay, true);
    }

    pub fn close_add_dialog(&self, surface: &mut dyn DisplaySurface) {
        surface.set_dialog(Dialog::AddRelay, false);
    }

    /// Add a relay from the dialog fields. Empty fields alert the user and
    /// leave the list and the dialog as they were.
    pub fn save_relay(
        &mut self,
        name: &str,
        gpio: &str,
        surface: &mut dyn DisplaySurface,
    ) -> Result<RelayId, RelayError> {
        let name = name.trim();
        let gpio = gpio.trim();
        if name.is_empty() || gpio.is_empty() {
            self.notifier.alert(MISSING_FIELDS_ALERT);
            return Err(RelayError::MissingFields);
        }

        let id = RelayId(self.next_id);
        self.next_id += 1;
        self.relays
            .push(RelayDevice::new(id, name.to_string(), gpio.to_string()));
        info!(relay = %id, name, gpio, "Relay added");

        self.render(surface);
        self.close_add_dialog(surface);
        Ok(id)
    }

    /// Flip a relay and send its new state to the device. Unknown ids are
    /// ignored.
    pub fn toggle_relay(
        &mut self,
        id: RelayId,
        surface: &mut dyn DisplaySurface,
    ) -> Result<RelayStatus, RelayError> {
        let changed_at = clock_time(&self.clock.now());
        let Some(relay) = self.relays.iter_mut().find(|r| r.id == id) else {
            debug!(relay = %id, "Toggle ignored, relay not found");
            return Err(RelayError::NotFound(id));
        };

        let status = relay.toggle(changed_at);
        let command = DeviceCommand::Device(RelayCommand::for_relay(relay));
        if let Err(e) = self.channel.send_command(&command) {
            debug!(relay = %id, error = %e, "Relay command not delivered");
        }

        self.render(surface);
        Ok(status)
    }

    pub fn show_delete_dialog(&mut self, id: RelayId, surface: &mut dyn DisplaySurface) {
        self.pending_delete = Some(id);
        surface.set_dialog(Dialog::ConfirmDelete, true);
    }

    pub fn close_delete_dialog(&mut self, surface: &mut dyn DisplaySurface) {
        self.pending_delete = None;
        surface.set_dialog(Dialog::ConfirmDelete, false);
    }

    /// Remove the relay chosen in `show_delete_dialog`
    pub fn confirm_delete(
        &mut self,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Option<RelayDevice>, RelayError> {
        let id = self.pending_delete.take().ok_or(RelayError::NoPendingDelete)?;

        let removed = self
            .relays
            .iter()
            .position(|r| r.id == id)
            .map(|index| self.relays.remove(index));
        if removed.is_some() {
            info!(relay = %id, "Relay deleted");
        }

        self.render(surface);
        self.close_delete_dialog(surface);
        Ok(removed)
    }

    pub fn render(&self, surface: &mut dyn DisplaySurface) {
        surface.render_relays(&relay_cards(&self.relays));
    }
}
