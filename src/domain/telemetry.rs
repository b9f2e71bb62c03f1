// Telemetry domain models
use serde_json::{Number, Value};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid telemetry JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("telemetry payload is null")]
    NullPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    No2,
    Pm10,
    Pm25,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::No2,
        Metric::Pm10,
        Metric::Pm25,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Key of this reading in the device's telemetry frame
    pub fn field(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::No2 => "no2",
            Metric::Pm10 => "pm10",
            Metric::Pm25 => "pm25",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::No2 => "ppm",
            Metric::Pm10 | Metric::Pm25 => "µg/m³",
        }
    }

    pub fn chart_label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Humidity => "Humidity (%)",
            Metric::No2 => "NO₂ (ppm)",
            Metric::Pm10 => "PM10 (µg/m³)",
            Metric::Pm25 => "PM2.5 (µg/m³)",
        }
    }

    pub fn chart_color(self) -> &'static str {
        match self {
            Metric::Temperature => "#ff7a1a",
            Metric::Humidity => "#07a0b5",
            Metric::No2 => "#8000ff",
            Metric::Pm10 => "#00b300",
            Metric::Pm25 => "#ff6600",
        }
    }
}

/// One inbound telemetry frame. Fields keep their raw JSON form so that
/// absent readings can still be shown as they arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    clients: Option<Value>,
    readings: [Option<Value>; 5],
}

impl TelemetrySample {
    pub fn parse(raw: &str) -> Result<Self, TelemetryError> {
        let value: Value = serde_json::from_str(raw)?;
        if value.is_null() {
            return Err(TelemetryError::NullPayload);
        }
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        Self {
            clients: value.get("clients").cloned(),
            readings: Metric::ALL.map(|metric| value.get(metric.field()).cloned()),
        }
    }

    pub fn clients(&self) -> Option<&Value> {
        self.clients.as_ref()
    }

    pub fn reading(&self, metric: Metric) -> Option<&Value> {
        self.readings[metric.index()].as_ref()
    }

    /// Numeric value of a reading, `None` when absent or not a number
    pub fn numeric(&self, metric: Metric) -> Option<f64> {
        self.reading(metric).and_then(Value::as_f64)
    }
}

/// Text shown for a raw field: strings as-is, absent fields as `undefined`,
/// whole numbers without a fractional part (`55.0` shows as `55`).
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(other) => other.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(v) if v == 0.0 => "0".to_string(),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e21 => format!("{:.0}", v),
        Some(v) => v.to_string(),
        None => n.to_string(),
    }
}

/// Numeric samples of one metric in arrival order. Gaps (`None`) keep the
/// series aligned with the label axis when a reading is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: VecDeque<Option<f64>>,
}

impl Series {
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.points.iter().copied()
    }

    /// Mean of the numeric points; 0 when there are none
    pub fn average(&self) -> f64 {
        let (sum, count) = self
            .points
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 { 0.0 } else { sum / count as f64 }
    }

    fn push(&mut self, value: Option<f64>) {
        self.points.push_back(value);
    }

    fn evict_oldest(&mut self) {
        self.points.pop_front();
    }
}

pub fn format_average(value: f64) -> String {
    format!("{:.2}", value)
}

/// Time labels plus one series per metric, all evicted in lockstep once the
/// label axis grows past `max_points`.
#[derive(Debug, Clone)]
pub struct TelemetryWindow {
    max_points: usize,
    labels: VecDeque<String>,
    series: [Series; 5],
}

impl TelemetryWindow {
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points,
            labels: VecDeque::with_capacity(max_points + 1),
            series: Default::default(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn series(&self, metric: Metric) -> &Series {
        &self.series[metric.index()]
    }

    pub fn append(&mut self, label: String, sample: &TelemetrySample) {
        self.labels.push_back(label);
        for metric in Metric::ALL {
            self.series[metric.index()].push(sample.numeric(metric));
        }

        if self.labels.len() > self.max_points {
            self.labels.pop_front();
            for series in &mut self.series {
                series.evict_oldest();
            }
        }
    }
}
