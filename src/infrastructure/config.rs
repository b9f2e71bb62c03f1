use anyhow::ensure;
use serde::Deserialize;
use std::time::Duration;

use crate::application::channel::ReconnectSchedule;
use crate::application::gauge_simulator::DEFAULT_REFRESH_INTERVAL;
use crate::application::telemetry_display::DEFAULT_MAX_POINTS;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub channel: ChannelSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub gauges: GaugeSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DeviceSettings {
    /// Host (and optional port) serving the `/ws` endpoint
    pub host: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChannelSettings {
    pub reconnect_delay_ms: u64,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: ReconnectSchedule::DEFAULT_DELAY.as_millis() as u64,
        }
    }
}

impl ChannelSettings {
    pub fn reconnect_schedule(&self) -> ReconnectSchedule {
        ReconnectSchedule::new(Duration::from_millis(self.reconnect_delay_ms))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetrySettings {
    pub max_points: usize,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GaugeSettings {
    pub refresh_interval_ms: u64,
}

impl Default for GaugeSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
        }
    }
}

impl DashboardConfig {
    /// Reject values that would stall the event loop or keep an empty window
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.gauges.refresh_interval_ms > 0,
            "gauges.refresh_interval_ms must be greater than 0"
        );
        ensure!(
            self.telemetry.max_points > 0,
            "telemetry.max_points must be greater than 0"
        );
        Ok(())
    }
}

impl GaugeSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

/// Load `config/dashboard.*` (optional) overridden by `DASHBOARD__*` env vars,
/// e.g. `DASHBOARD__DEVICE__HOST=192.168.4.1`
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
fn parse_dashboard_config(toml: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
