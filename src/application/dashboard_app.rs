// Dashboard app - Single owner of all dashboard state, one event at a time
use crate::application::channel::{Channel, ChannelEvent};
use crate::application::gauge_simulator::GaugeSimulator;
use crate::application::navigation::Navigator;
use crate::application::ports::{Clock, DisplaySurface, Notifier};
use crate::application::relay_manager::RelayManager;
use crate::application::settings_service::SettingsService;
use crate::application::telemetry_display::TelemetryDisplay;
use crate::domain::command::WifiSettings;
use crate::domain::dashboard::Section;
use crate::domain::relay::RelayId;
use rand::RngCore;
use std::sync::Arc;
use tracing::debug;

/// What the user did on the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    ShowSection(Section),
    AddRelay { name: String, gpio: String },
    ToggleRelay(RelayId),
    DeleteRelay(RelayId),
    ConfirmDelete,
    CancelDelete,
    SubmitSettings(WifiSettings),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Channel(ChannelEvent),
    User(UserAction),
    GaugeTick,
}

pub struct DashboardApp<S: DisplaySurface> {
    surface: S,
    telemetry: TelemetryDisplay,
    relays: RelayManager,
    settings: SettingsService,
    navigator: Navigator,
    gauges: GaugeSimulator,
    rng: Box<dyn RngCore + Send>,
}

impl<S: DisplaySurface> DashboardApp<S> {
    pub fn new(
        surface: S,
        channel: Channel,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        max_points: usize,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            surface,
            telemetry: TelemetryDisplay::new(max_points, clock.clone()),
            relays: RelayManager::new(channel.clone(), notifier.clone(), clock),
            settings: SettingsService::new(channel, notifier),
            navigator: Navigator::default(),
            gauges: GaugeSimulator::default(),
            rng,
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub fn telemetry(&self) -> &TelemetryDisplay {
        &self.telemetry
    }

    #[cfg(test)]
    pub fn relays(&self) -> &RelayManager {
        &self.relays
    }

    #[cfg(test)]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// First paint: home section, empty charts, initial gauges, empty relay list
    pub fn start(&mut self) {
        self.navigator.show(Section::Home, &mut self.surface);
        self.telemetry.render_initial(&mut self.surface);
        self.gauges.render(&mut self.surface);
        self.relays.render(&mut self.surface);
        self.surface.present();
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Channel(event) => self.handle_channel(event),
            AppEvent::User(action) => self.handle_user(action),
            AppEvent::GaugeTick => self.gauges.refresh(&mut self.rng, &mut self.surface),
        }
        self.surface.present();
    }

    fn handle_channel(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Message(raw) => {
                if let Err(e) = self.telemetry.on_message(&raw, &mut self.surface) {
                    debug!(error = %e, "Telemetry frame dropped");
                }
            }
            ChannelEvent::Opened | ChannelEvent::Closed => {}
        }
    }

    fn handle_user(&mut self, action: UserAction) {
        let surface = &mut self.surface;
        match action {
            UserAction::ShowSection(section) => self.navigator.show(section, surface),
            UserAction::AddRelay { name, gpio } => {
                self.relays.open_add_dialog(surface);
                if let Err(e) = self.relays.save_relay(&name, &gpio, surface) {
                    debug!(error = %e, "Relay not added");
                }
            }
            UserAction::ToggleRelay(id) => {
                if let Err(e) = self.relays.toggle_relay(id, surface) {
                    debug!(error = %e, "Toggle ignored");
                }
            }
            UserAction::DeleteRelay(id) => self.relays.show_delete_dialog(id, surface),
            UserAction::ConfirmDelete => {
                if let Err(e) = self.relays.confirm_delete(surface) {
                    debug!(error = %e, "Nothing to delete");
                }
            }
            UserAction::CancelDelete => self.relays.close_delete_dialog(surface),
            UserAction::SubmitSettings(form) => {
                self.settings.submit(&form);
            }
        }
    }
}
