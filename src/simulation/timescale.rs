//! Time granularity, gravitational constant and unit conversion.
//!
//! Velocities and the gravitational constant are always expressed per unit of the
//! active [`Granularity`]. Switching granularity therefore needs a one-off conversion
//! pass over every body, which [`TimeScaleController::take_transition`] signals exactly once.
//!
//! The controller also owns playback: an integer speed multiplier (0 = paused)
//! and a [`Direction`] for rewinding.

use std::fmt;

use serde::Deserialize;

use super::states::NVec3;

/// G in m^3 / (kg s^2)
pub const BASE_G: f64 = 6.674484e-11;
/// Astronomical unit in metres
pub const AU_METERS: f64 = 149_597_870.7e3;
/// Earth mass in kg
pub const EARTH_MASS_KG: f64 = 5.9722e24;
/// Simulation units per AU
pub const DISTANCE_SCALE: f64 = 1500.0;
/// Upper bound of the playback speed multiplier
pub const MAX_SPEED: u32 = 100;

const DAY: f64 = 86_400.0;

/// Seconds per unit, indexed by `Granularity as usize`
const SECONDS_PER_UNIT: [f64; 7] = [
    1.0,
    60.0,
    3_600.0,
    DAY,
    7.0 * DAY,
    30.437 * DAY,
    365.25 * DAY,
];

/// Symbolic unit in which velocities and G are currently expressed
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 7] = [
        Granularity::Second,
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    pub fn seconds_per_unit(self) -> f64 {
        SECONDS_PER_UNIT[self as usize]
    }

    /// Next larger unit, saturating at `Year`
    pub fn coarser(self) -> Self {
        Self::ALL[(self as usize + 1).min(Self::ALL.len() - 1)]
    }

    /// Next smaller unit, saturating at `Second`
    pub fn finer(self) -> Self {
        Self::ALL[(self as usize).saturating_sub(1)]
    }

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Second => "Second",
            Granularity::Minute => "Minute",
            Granularity::Hour => "Hour",
            Granularity::Day => "Day",
            Granularity::Week => "Week",
            Granularity::Month => "Month",
            Granularity::Year => "Year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Forward or reverse play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// +1 forward, -1 reverse
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Gravitational constant in AU^3 / (Earth mass * unit^2), pre-multiplied by
/// [`DISTANCE_SCALE`] so accelerations come out in scaled distance units.
pub fn gravitational_constant(scale: Granularity) -> f64 {
    scaled_gravitational_constant(scale, DISTANCE_SCALE)
}

/// As [`gravitational_constant`] for a body set laid out at `units_per_au`.
/// Must match the distance scale the force model divides by.
pub fn scaled_gravitational_constant(scale: Granularity, units_per_au: f64) -> f64 {
    let g0 = BASE_G * (EARTH_MASS_KG / AU_METERS.powi(3)) * units_per_au;
    let s = scale.seconds_per_unit();
    g0 * s * s
}

/// Re-express a velocity given per `from` unit as per `to` unit
pub fn convert_velocity(v: NVec3, from: Granularity, to: Granularity) -> NVec3 {
    v / from.seconds_per_unit() * to.seconds_per_unit()
}

/// Scalar rate conversion (spin rates)
pub fn convert_rate(rate: f64, from: Granularity, to: Granularity) -> f64 {
    rate / from.seconds_per_unit() * to.seconds_per_unit()
}

/// Simulation time context: granularity, cached G and playback state.
///
/// Passed explicitly to the integrator; there is no ambient global time state.
#[derive(Debug, Clone)]
pub struct TimeScaleController {
    granularity: Granularity,
    applied: Granularity, // granularity the body velocities are currently expressed in
    g: f64, // cached constant for `applied`
    units_per_au: f64,
    direction: Direction,
    speed: u32,
}

impl TimeScaleController {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            applied: granularity,
            g: gravitational_constant(granularity),
            units_per_au: DISTANCE_SCALE,
            direction: Direction::Forward,
            speed: 1,
        }
    }

    /// Lay G out for a body set at `units_per_au` simulation units per AU
    pub fn with_distance_scale(mut self, units_per_au: f64) -> Self {
        self.units_per_au = units_per_au;
        self.g = scaled_gravitational_constant(self.applied, units_per_au);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed.min(MAX_SPEED);
        self
    }

    /// Requested granularity (may be ahead of the bodies until the next transition)
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Granularity the body set and cached G are expressed in
    pub fn applied(&self) -> Granularity {
        self.applied
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    pub fn distance_scale(&self) -> f64 {
        self.units_per_au
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.speed == 0
    }

    pub fn is_reversed(&self) -> bool {
        self.direction == Direction::Reverse
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        if granularity == self.granularity {
            return;
        }
        self.granularity = granularity;
        // a granularity switch resumes at 1x unless paused
        if self.speed != 0 {
            self.speed = 1;
        }
    }

    pub fn coarser(&mut self) {
        self.set_granularity(self.granularity.coarser());
    }

    pub fn finer(&mut self) {
        self.set_granularity(self.granularity.finer());
    }

    /// Returns `(from, to)` once per granularity change and refreshes the cached G.
    /// The caller must convert every body before integrating again.
    pub fn take_transition(&mut self) -> Option<(Granularity, Granularity)> {
        if self.applied == self.granularity {
            return None;
        }
        let from = self.applied;
        self.applied = self.granularity;
        self.g = scaled_gravitational_constant(self.granularity, self.units_per_au);
        Some((from, self.granularity))
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.min(MAX_SPEED);
    }

    pub fn pause(&mut self) {
        self.speed = 0;
    }

    /// Move the signed speed one step towards +MAX_SPEED
    pub fn faster(&mut self) {
        self.set_signed_speed(self.signed_speed() + 1);
    }

    /// Move the signed speed one step towards -MAX_SPEED
    pub fn slower(&mut self) {
        self.set_signed_speed(self.signed_speed() - 1);
    }

    /// Speed with the direction folded in; paused reads as 0 either way
    pub fn signed_speed(&self) -> i64 {
        i64::from(self.speed) * self.direction.sign() as i64
    }

    fn set_signed_speed(&mut self, signed: i64) {
        let max = i64::from(MAX_SPEED);
        let signed = signed.clamp(-max, max);
        if signed > 0 {
            self.direction = Direction::Forward;
        } else if signed < 0 {
            self.direction = Direction::Reverse;
        }
        self.speed = signed.unsigned_abs() as u32;
    }
}

impl Default for TimeScaleController {
    fn default() -> Self {
        Self::new(Granularity::Second)
    }
}

/// Playback label such as `1 Day` or `-3 Weeks`
impl fmt::Display for TimeScaleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reversed() && !self.is_paused() {
            f.write_str("-")?;
        }
        write!(f, "{} {}", self.speed, self.granularity)?;
        if self.speed != 1 {
            f.write_str("s")?;
        }
        Ok(())
    }
}
