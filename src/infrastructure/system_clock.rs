// Local wall clock
use crate::application::ports::Clock;
use chrono::{Local, NaiveDateTime};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
