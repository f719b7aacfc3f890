//! Numerical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - fixed RK4 step size per granularity (`StepSizes`),
//! - distance scale shared by the force model and G

use serde::Deserialize;

use super::timescale::{Granularity, DISTANCE_SCALE};

/// Default tick length in granularity units
pub const DEFAULT_STEP: f64 = 0.016;
/// Year steps are shrunk so the moon and mercury stay bound
pub const DEFAULT_YEAR_STEP: f64 = 0.001;

/// Fixed step `dt` for each granularity, in units of that granularity
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StepSizes {
    pub second: f64,
    pub minute: f64,
    pub hour: f64,
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
}

impl StepSizes {
    pub fn get(&self, scale: Granularity) -> f64 {
        match scale {
            Granularity::Second => self.second,
            Granularity::Minute => self.minute,
            Granularity::Hour => self.hour,
            Granularity::Day => self.day,
            Granularity::Week => self.week,
            Granularity::Month => self.month,
            Granularity::Year => self.year,
        }
    }

    pub fn set(&mut self, scale: Granularity, dt: f64) {
        let slot = match scale {
            Granularity::Second => &mut self.second,
            Granularity::Minute => &mut self.minute,
            Granularity::Hour => &mut self.hour,
            Granularity::Day => &mut self.day,
            Granularity::Week => &mut self.week,
            Granularity::Month => &mut self.month,
            Granularity::Year => &mut self.year,
        };
        *slot = dt;
    }
}

impl Default for StepSizes {
    fn default() -> Self {
        Self {
            second: DEFAULT_STEP,
            minute: DEFAULT_STEP,
            hour: DEFAULT_STEP,
            day: DEFAULT_STEP,
            week: DEFAULT_STEP,
            month: DEFAULT_STEP,
            year: DEFAULT_YEAR_STEP,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameters {
    pub steps: StepSizes, // dt per granularity
    pub scale: f64, // simulation units per AU
}

impl Parameters {
    /// Step size for `scale`
    pub fn step(&self, scale: Granularity) -> f64 {
        self.steps.get(scale)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            steps: StepSizes::default(),
            scale: DISTANCE_SCALE,
        }
    }
}
