// Gauge simulator - Periodic random readings for the home gauges
use crate::application::ports::DisplaySurface;
use crate::domain::dashboard::{DisplayField, GaugeKind};
use rand::Rng;
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct GaugeSimulator {
    values: [i32; 2],
}

impl Default for GaugeSimulator {
    fn default() -> Self {
        Self {
            values: GaugeKind::ALL.map(|kind| kind.spec().initial),
        }
    }
}

impl GaugeSimulator {
    pub fn value(&self, kind: GaugeKind) -> i32 {
        self.values[kind as usize]
    }

    pub fn render(&self, surface: &mut dyn DisplaySurface) {
        for kind in GaugeKind::ALL {
            let spec = kind.spec();
            surface.set_text(
                DisplayField::Gauge(kind),
                format!("{} {}", self.value(kind), spec.unit),
            );
        }
    }

    /// Draw a new value for every gauge and redraw them
    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R, surface: &mut dyn DisplaySurface) {
        for kind in GaugeKind::ALL {
            let spec = kind.spec();
            let (low, high) = kind.simulated_range();
            self.values[kind as usize] = rng.gen_range(low..=high).clamp(spec.min, spec.max);
        }
        self.render(surface);
    }
}
