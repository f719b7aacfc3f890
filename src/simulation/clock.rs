//! Simulated calendar time.
//!
//! Tracks signed elapsed simulated seconds since a start instant and maps that onto
//! a calendar date. Reverse play winds the calendar back.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use super::timescale::{Direction, Granularity};

/// Calendar start used when a scenario does not name one (2024-01-01 00:00)
pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct SimulationClock {
    start: NaiveDateTime,
    elapsed: f64, // simulated seconds since `start`, negative before it
}

impl SimulationClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { start, elapsed: 0.0 }
    }

    /// Account for one tick of `dt` granularity units
    pub fn advance(&mut self, dt: f64, scale: Granularity, direction: Direction) {
        self.elapsed += direction.sign() * dt * scale.seconds_per_unit();
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Current calendar instant, `None` if it falls outside chrono's range
    pub fn now(&self) -> Option<NaiveDateTime> {
        let ms = (self.elapsed * 1000.0).round();
        if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
            return None;
        }
        TimeDelta::try_milliseconds(ms as i64).and_then(|d| self.start.checked_add_signed(d))
    }

    /// `MM/DD/YYYY hh:mm AM`
    pub fn label(&self) -> String {
        match self.now() {
            Some(t) => t.format("%m/%d/%Y %I:%M %p").to_string(),
            None => String::from("--/--/---- --:--"),
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(default_start())
    }
}
