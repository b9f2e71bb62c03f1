// Terminal rendering of the dashboard sections
use crate::application::ports::{DisplaySurface, Notifier};
use crate::domain::dashboard::{
    ChartSnapshot, Dialog, DisplayField, GaugeKind, RelayCard, Section,
};
use crate::domain::telemetry::Metric;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::warn;

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Screen model redrawn to `out` whenever something changed
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    texts: HashMap<DisplayField, String>,
    charts: HashMap<Metric, ChartSnapshot>,
    relays: Vec<RelayCard>,
    section: Section,
    dialogs: HashSet<Dialog>,
    dirty: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            texts: HashMap::new(),
            charts: HashMap::new(),
            relays: Vec::new(),
            section: Section::Home,
            dialogs: HashSet::new(),
            dirty: true,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&self, field: DisplayField) -> &str {
        self.texts.get(&field).map(String::as_str).unwrap_or("--")
    }

    pub fn render_screen(&self) -> String {
        let mut screen = format!("=== {} ===\n", self.section.id().to_uppercase());
        match self.section {
            Section::Home => self.render_home(&mut screen),
            Section::Devices => self.render_devices(&mut screen),
            Section::Settings => render_settings(&mut screen),
        }
        screen
    }

    fn render_home(&self, screen: &mut String) {
        let _ = writeln!(
            screen,
            "Connected: {}    Last update: {}",
            self.text(DisplayField::ConnectedClients),
            self.text(DisplayField::LastUpdate)
        );
        let _ = writeln!(
            screen,
            "Gauges: temperature {} | humidity {}",
            self.text(DisplayField::Gauge(GaugeKind::Temperature)),
            self.text(DisplayField::Gauge(GaugeKind::Humidity))
        );
        for metric in Metric::ALL {
            let (title, chart) = match self.charts.get(&metric) {
                Some(chart) => (chart.title, paint(chart.color, &sparkline(&chart.points))),
                None => (metric.chart_label(), String::new()),
            };
            let _ = writeln!(
                screen,
                "{:<18} now {:<14} avg {:<14} {}",
                title,
                self.text(DisplayField::Value(metric)),
                self.text(DisplayField::Average(metric)),
                chart
            );
        }
        if let Some(chart) = self.charts.get(&Metric::Temperature) {
            if let (Some(first), Some(last)) = (chart.labels.first(), chart.labels.last()) {
                let _ = writeln!(screen, "Window: {} .. {}", first, last);
            }
        }
    }

    fn render_devices(&self, screen: &mut String) {
        if self.relays.is_empty() {
            screen.push_str("(no relays, use `add <name> <gpio>`)\n");
        }
        for card in &self.relays {
            let lamp = if card.on { '●' } else { '○' };
            let _ = writeln!(
                screen,
                "{} [{}] {:<16} {:<10} {:<24} [{}]",
                lamp, card.id, card.title, card.gpio, card.last_changed, card.button
            );
        }
        if self.dialogs.contains(&Dialog::AddRelay) {
            screen.push_str("Add relay: enter `add <name> <gpio>`\n");
        }
        if self.dialogs.contains(&Dialog::ConfirmDelete) {
            screen.push_str("Delete this relay? `confirm` or `cancel`\n");
        }
    }
}

fn render_settings(screen: &mut String) {
    screen.push_str(
        "settings ssid=<ssid> password=<password> token=<token> server=<server> port=<port>\n\
         quote values with spaces: ssid=\"My Home\"\n",
    );
}

/// Wrap `text` in a 24-bit foreground colour given as `#rrggbb`; unknown
/// colours leave the text plain
pub fn paint(color: &str, text: &str) -> String {
    let rgb = color
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6)
        .and_then(|hex| u32::from_str_radix(hex, 16).ok());
    match rgb {
        Some(rgb) if !text.is_empty() => format!(
            "\x1b[38;2;{};{};{}m{}\x1b[0m",
            (rgb >> 16) & 0xff,
            (rgb >> 8) & 0xff,
            rgb & 0xff,
            text
        ),
        _ => text.to_string(),
    }
}

/// One block character per point scaled to the series range; gaps are blank
pub fn sparkline(points: &[Option<f64>]) -> String {
    let values = points.iter().flatten();
    let min = values.clone().copied().fold(f64::INFINITY, f64::min);
    let max = values.copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    points
        .iter()
        .map(|point| match point {
            None => ' ',
            Some(_) if span.is_nan() || span <= 0.0 => SPARK[SPARK.len() / 2],
            Some(v) => {
                let level = ((v - min) / span * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[level.min(SPARK.len() - 1)]
            }
        })
        .collect()
}

impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    fn set_text(&mut self, field: DisplayField, text: String) {
        self.texts.insert(field, text);
        self.dirty = true;
    }

    fn redraw_chart(&mut self, chart: &ChartSnapshot) {
        self.charts.insert(chart.metric, chart.clone());
        self.dirty = true;
    }

    fn render_relays(&mut self, cards: &[RelayCard]) {
        self.relays = cards.to_vec();
        self.dirty = true;
    }

    fn show_section(&mut self, section: Section) {
        self.section = section;
        self.dirty = true;
    }

    fn set_dialog(&mut self, dialog: Dialog, open: bool) {
        if open {
            self.dialogs.insert(dialog);
        } else {
            self.dialogs.remove(&dialog);
        }
        self.dirty = true;
    }

    fn present(&mut self) {
        if !self.dirty {
            return;
        }
        let screen = self.render_screen();
        if let Err(e) = writeln!(self.out, "{}", screen).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to draw dashboard");
        }
        self.dirty = false;
    }
}

/// Alerts go to stderr so they stand apart from the redrawn screen
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("[alert] {}", message);
    }
}
