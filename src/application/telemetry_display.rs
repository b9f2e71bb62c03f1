// Telemetry display - Sliding-window charts, averages and live values
use crate::application::ports::{Clock, DisplaySurface};
use crate::domain::dashboard::{clock_time, time_label, ChartSnapshot, DisplayField};
use crate::domain::telemetry::{
    display_text, format_average, Metric, TelemetryError, TelemetrySample, TelemetryWindow,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_MAX_POINTS: usize = 10;

pub struct TelemetryDisplay {
    window: TelemetryWindow,
    clock: Arc<dyn Clock>,
}

impl TelemetryDisplay {
    pub fn new(max_points: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: TelemetryWindow::new(max_points),
            clock,
        }
    }

    #[cfg(test)]
    pub fn window(&self) -> &TelemetryWindow {
        &self.window
    }

    /// Draw empty charts and zero averages before the first frame arrives
    pub fn render_initial(&self, surface: &mut dyn DisplaySurface) {
        self.redraw(surface);
    }

    /// Handle one raw frame from the channel. A frame that does not parse
    /// is logged and leaves every series and text untouched.
    pub fn on_message(
        &mut self,
        raw: &str,
        surface: &mut dyn DisplaySurface,
    ) -> Result<(), TelemetryError> {
        debug!("Received: {}", raw);

        let sample = match TelemetrySample::parse(raw) {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "Invalid JSON: {}", raw);
                return Err(e);
            }
        };

        self.show_current(&sample, surface);
        self.append_sample(&sample, surface);
        Ok(())
    }

    fn show_current(&self, sample: &TelemetrySample, surface: &mut dyn DisplaySurface) {
        surface.set_text(
            DisplayField::ConnectedClients,
            format!("{} devices", display_text(sample.clients())),
        );
        for metric in Metric::ALL {
            surface.set_text(
                DisplayField::Value(metric),
                format!("{} {}", display_text(sample.reading(metric)), metric.unit()),
            );
        }
    }

    /// Push one point onto every series (evicting the oldest past capacity),
    /// then redraw charts, averages and the last-update stamp.
    pub fn append_sample(&mut self, sample: &TelemetrySample, surface: &mut dyn DisplaySurface) {
        let now = self.clock.now();
        self.window.append(time_label(&now), sample);

        self.redraw(surface);
        surface.set_text(DisplayField::LastUpdate, clock_time(&now));
    }

    fn redraw(&self, surface: &mut dyn DisplaySurface) {
        for metric in Metric::ALL {
            surface.redraw_chart(&ChartSnapshot::from_window(&self.window, metric));
        }
        for metric in Metric::ALL {
            let average = self.window.series(metric).average();
            surface.set_text(
                DisplayField::Average(metric),
                format!("{} {}", format_average(average), metric.unit()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FixedClock, RecordingSurface};

    fn display() -> (TelemetryDisplay, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at(14, 3, 9));
        (TelemetryDisplay::new(DEFAULT_MAX_POINTS, clock.clone()), clock)
    }

    fn frame(temperature: f64) -> String {
        format!(
            r#"{{"clients":2,"temperature":{},"humidity":40,"no2":0.03,"pm10":11,"pm25":6}}"#,
            temperature
        )
    }

    #[test]
    fn test_initial_render_shows_zero_averages() {
        let (display, _) = display();
        let mut surface = RecordingSurface::default();

        display.render_initial(&mut surface);

        assert_eq!(
            surface.text(DisplayField::Average(Metric::Temperature)),
            Some("0.00 °C")
        );
        assert_eq!(
            surface.text(DisplayField::Average(Metric::Pm25)),
            Some("0.00 µg/m³")
        );
        assert_eq!(surface.redraws, 5);
    }

    #[test]
    fn test_message_updates_values_charts_and_stamp() {
        let (mut display, _) = display();
        let mut surface = RecordingSurface::default();

        display
            .on_message(
                r#"{"clients":3,"temperature":21.5,"humidity":55,"no2":0.02,"pm10":12,"pm25":8}"#,
                &mut surface,
            )
            .unwrap();

        assert_eq!(surface.text(DisplayField::ConnectedClients), Some("3 devices"));
        assert_eq!(
            surface.text(DisplayField::Value(Metric::Temperature)),
            Some("21.5 °C")
        );
        assert_eq!(surface.text(DisplayField::Value(Metric::Humidity)), Some("55 %"));
        assert_eq!(surface.text(DisplayField::Value(Metric::No2)), Some("0.02 ppm"));
        assert_eq!(
            surface.text(DisplayField::Average(Metric::Pm10)),
            Some("12.00 µg/m³")
        );
        assert_eq!(surface.text(DisplayField::LastUpdate), Some("14:03:09"));
        assert_eq!(surface.redraws, 5);

        let chart = &surface.charts[&Metric::Temperature];
        assert_eq!(chart.labels, vec!["14:03".to_string()]);
        assert_eq!(chart.points, vec![Some(21.5)]);
        assert_eq!(chart.title, "Temperature (°C)");
    }

    #[test]
    fn test_whole_float_readings_render_without_fraction() {
        let (mut display, _) = display();
        let mut surface = RecordingSurface::default();

        display
            .on_message(
                r#"{"clients":1,"temperature":25.0,"humidity":55.0,"no2":0.5,"pm10":10.0,"pm25":4}"#,
                &mut surface,
            )
            .unwrap();

        assert_eq!(
            surface.text(DisplayField::Value(Metric::Temperature)),
            Some("25 °C")
        );
        assert_eq!(surface.text(DisplayField::Value(Metric::Humidity)), Some("55 %"));
        assert_eq!(surface.text(DisplayField::Value(Metric::No2)), Some("0.5 ppm"));
        assert_eq!(
            surface.text(DisplayField::Value(Metric::Pm10)),
            Some("10 µg/m³")
        );
    }

    #[test]
    fn test_missing_fields_render_undefined() {
        let (mut display, _) = display();
        let mut surface = RecordingSurface::default();

        display.on_message(r#"{"temperature":20}"#, &mut surface).unwrap();

        assert_eq!(
            surface.text(DisplayField::ConnectedClients),
            Some("undefined devices")
        );
        assert_eq!(
            surface.text(DisplayField::Value(Metric::Pm25)),
            Some("undefined µg/m³")
        );
        assert_eq!(display.window().series(Metric::Pm25).len(), 1);
    }

    #[test]
    fn test_malformed_message_changes_nothing() {
        let (mut display, _) = display();
        let mut surface = RecordingSurface::default();
        display.on_message(&frame(19.0), &mut surface).unwrap();
        let texts_before = surface.texts.clone();
        let redraws_before = surface.redraws;

        let result = display.on_message("not json", &mut surface);

        assert!(matches!(result, Err(TelemetryError::InvalidJson(_))));
        assert_eq!(surface.texts, texts_before);
        assert_eq!(surface.redraws, redraws_before);
        assert_eq!(display.window().len(), 1);
    }

    #[test]
    fn test_eleven_messages_keep_last_ten() {
        let (mut display, clock) = display();
        let mut surface = RecordingSurface::default();

        for t in 1..=11u32 {
            clock.set(10, t, 0);
            display.on_message(&frame(t as f64 * 2.0), &mut surface).unwrap();
        }

        let chart = &surface.charts[&Metric::Temperature];
        let expected: Vec<Option<f64>> = (2..=11).map(|t| Some(t as f64 * 2.0)).collect();
        assert_eq!(chart.points, expected);
        assert_eq!(chart.labels.first().map(String::as_str), Some("10:02"));
        assert_eq!(chart.labels.len(), 10);
        // mean of 4, 6, .., 22
        assert_eq!(
            surface.text(DisplayField::Average(Metric::Temperature)),
            Some("13.00 °C")
        );
        assert_eq!(surface.text(DisplayField::LastUpdate), Some("10:11:00"));
    }
}
