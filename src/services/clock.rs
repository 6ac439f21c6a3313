//! Time source for date-dependent rules

use chrono::{Datelike, Local};

/// Supplies the current calendar year
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Wall clock, local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// Clock pinned to a given year
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}
