// Dashboard view models
use super::relay::{RelayDevice, RelayId};
use super::telemetry::{Metric, TelemetryWindow};
use chrono::{NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Home,
    Devices,
    Settings,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Home, Section::Devices, Section::Settings];

    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Devices => "devices",
            Section::Settings => "settings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown section '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialog {
    AddRelay,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeKind {
    Temperature,
    Humidity,
}

impl GaugeKind {
    pub const ALL: [GaugeKind; 2] = [GaugeKind::Temperature, GaugeKind::Humidity];

    pub fn spec(self) -> GaugeSpec {
        match self {
            GaugeKind::Temperature => GaugeSpec {
                min: -10,
                max: 50,
                initial: 26,
                unit: "°C",
            },
            GaugeKind::Humidity => GaugeSpec {
                min: 0,
                max: 100,
                initial: 60,
                unit: "%",
            },
        }
    }

    /// Inclusive range the simulated readings are drawn from
    pub fn simulated_range(self) -> (i32, i32) {
        match self {
            GaugeKind::Temperature => (20, 34),
            GaugeKind::Humidity => (40, 79),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeSpec {
    pub min: i32,
    pub max: i32,
    pub initial: i32,
    pub unit: &'static str,
}

/// Text slots on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayField {
    ConnectedClients,
    Value(Metric),
    Average(Metric),
    LastUpdate,
    Gauge(GaugeKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSnapshot {
    pub metric: Metric,
    pub title: &'static str,
    pub color: &'static str,
    pub labels: Vec<String>,
    pub points: Vec<Option<f64>>,
}

impl ChartSnapshot {
    pub fn from_window(window: &TelemetryWindow, metric: Metric) -> Self {
        Self {
            metric,
            title: metric.chart_label(),
            color: metric.chart_color(),
            labels: window.labels().map(str::to_string).collect(),
            points: window.series(metric).points().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayCard {
    pub id: RelayId,
    pub title: String,
    pub gpio: String,
    pub last_changed: String,
    pub button: &'static str,
    pub on: bool,
}

/// Project the relay list into cards, in list order
pub fn relay_cards(relays: &[RelayDevice]) -> Vec<RelayCard> {
    relays
        .iter()
        .map(|relay| RelayCard {
            id: relay.id,
            title: relay.name.clone(),
            gpio: format!("GPIO: {}", relay.gpio),
            last_changed: format!(
                "Last changed: {}",
                relay.last_changed.as_deref().unwrap_or("never")
            ),
            button: relay.status().as_str(),
            on: relay.state,
        })
        .collect()
}

/// Chart axis label, e.g. `9:05`
pub fn time_label(now: &NaiveDateTime) -> String {
    format!("{}:{:02}", now.hour(), now.minute())
}

/// Wall-clock text with seconds, e.g. `9:05:07`
pub fn clock_time(now: &NaiveDateTime) -> String {
    format!("{}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_time_formats() {
        assert_eq!(time_label(&at(9, 5, 7)), "9:05");
        assert_eq!(time_label(&at(23, 59, 0)), "23:59");
        assert_eq!(clock_time(&at(9, 5, 7)), "9:05:07");
        assert_eq!(clock_time(&at(0, 0, 0)), "0:00:00");
    }

    #[test]
    fn test_section_parse() {
        assert_eq!("devices".parse::<Section>(), Ok(Section::Devices));
        assert_eq!("Settings".parse::<Section>(), Ok(Section::Settings));
        assert!("garage".parse::<Section>().is_err());
    }

    #[test]
    fn test_relay_cards_projection() {
        let mut pump = RelayDevice::new(RelayId(1), "Pump".to_string(), "12".to_string());
        pump.toggle("8:00:00".to_string());
        let fan = RelayDevice::new(RelayId(2), "Fan".to_string(), "4".to_string());

        let cards = relay_cards(&[pump, fan]);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].button, "ON");
        assert!(cards[0].on);
        assert_eq!(cards[0].last_changed, "Last changed: 8:00:00");
        assert_eq!(cards[1].gpio, "GPIO: 4");
        assert_eq!(cards[1].last_changed, "Last changed: never");
        assert_eq!(cards[1].button, "OFF");
    }
}
