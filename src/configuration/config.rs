//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`SimulationConfig`] – starting granularity, playback, calendar and step sizes
//! - [`OrbitTraceConfig`] – optional relative orbit sampling
//! - [`OrbitLineConfig`]  – pre-recorded orbit paths drawn around an anchor body
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! Initial velocities and spin rates are given **per second**; the engine converts them
//! to the starting granularity.
//!
//! ```yaml
//! simulation:
//!   granularity: day        # second | minute | hour | day | week | month | year
//!   reversed: false
//!   speed: 1                # 0..=100, 0 starts paused
//!   start_date: 2024-01-01T00:00:00
//!   distance_scale: 1500.0  # simulation units per AU
//!   step_sizes:
//!     year: 0.001           # others default to 0.016
//!
//! orbit_trace:
//!   target: 1
//!   anchor: 0
//!   interval: 5
//!
//! orbit_lines:              # paths relative to this file
//!   - file: orbits/earth.json
//!     anchor: 0
//!
//! bodies:
//!   - name: Sun
//!     x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, 0.0 ]
//!     m: 332946.0
//!     spin: 2.865e-6
//!     radius: 20.0
//!   - name: Earth
//!     x: [ 1500.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, -2.986e-4 ]
//!     m: 1.0
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::simulation::clock::default_start;
use crate::simulation::orbit_path::OrbitPathError;
use crate::simulation::params::StepSizes;
use crate::simulation::timescale::{Granularity, DISTANCE_SCALE, MAX_SPEED};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("scenario has no bodies")]
    NoBodies,

    #[error("body {body} ({name}): `{field}` needs 3 finite components, got {got:?}")]
    BadVector {
        body: usize,
        name: String,
        field: &'static str,
        got: Vec<f64>,
    },

    #[error("body {body} ({name}): mass must be positive and finite, got {mass}")]
    BadMass { body: usize, name: String, mass: f64 },

    #[error("body {body} ({name}): spin rate must be finite")]
    BadSpin { body: usize, name: String },

    #[error("step size for {granularity} must be positive and finite, got {dt}")]
    BadStep { granularity: Granularity, dt: f64 },

    #[error("speed {0} exceeds the maximum of 100")]
    BadSpeed(u32),

    #[error("distance scale must be positive and finite, got {0}")]
    BadScale(f64),

    #[error("orbit trace index {index} out of range for {bodies} bodies")]
    TraceIndex { index: usize, bodies: usize },

    #[error("orbit trace target and anchor must differ")]
    TraceSelf,

    #[error("orbit trace interval must be at least 1")]
    TraceInterval,

    #[error("orbit line {file}: anchor {index} out of range for {bodies} bodies")]
    LineAnchor { file: PathBuf, index: usize, bodies: usize },

    #[error("orbit line {file}: {source}")]
    OrbitLine {
        file: PathBuf,
        #[source]
        source: OrbitPathError,
    },
}

/// Starting time-scale and numerical settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub granularity: Granularity, // unit velocities are expressed in once running
    pub reversed: bool, // start in reverse
    pub speed: u32, // playback multiplier, 0 = paused
    pub start_date: NaiveDateTime, // calendar origin
    pub distance_scale: f64, // simulation units per AU
    pub step_sizes: StepSizes, // fixed dt per granularity
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            reversed: false,
            speed: 1,
            start_date: default_start(),
            distance_scale: DISTANCE_SCALE,
            step_sizes: StepSizes::default(),
        }
    }
}

/// Relative orbit sampling (target position minus anchor position)
#[derive(Deserialize, Debug, Clone)]
pub struct OrbitTraceConfig {
    pub target: usize,
    pub anchor: usize,
    #[serde(default = "default_interval")]
    pub interval: u32,
}

fn default_interval() -> u32 {
    5
}

/// Recorded orbit path (JSON written by `--orbit-out`) drawn around `anchor`
#[derive(Deserialize, Debug, Clone)]
pub struct OrbitLineConfig {
    pub file: PathBuf,
    pub anchor: usize,
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: String, // display name
    pub x: Vec<f64>, // initial position in scaled units (1 AU = 1500)
    pub v: Vec<f64>, // initial velocity in scaled units per second
    pub m: f64, // mass in Earth masses
    #[serde(default)]
    pub spin: f64, // spin rate in radians per second
    #[serde(default = "default_radius")]
    pub radius: f64, // visual radius only
}

fn default_radius() -> f64 {
    1.0
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub orbit_trace: Option<OrbitTraceConfig>,
    #[serde(default)]
    pub orbit_lines: Vec<OrbitLineConfig>,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    /// Read, parse and validate a scenario file
    /// Relative `orbit_lines` files are resolved against the scenario's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut cfg: ScenarioConfig = serde_yaml::from_reader(BufReader::new(file))?;
        if let Some(dir) = path.parent() {
            for line in cfg.orbit_lines.iter_mut().filter(|l| l.file.is_relative()) {
                line.file = dir.join(&line.file);
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a scenario from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: ScenarioConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bodies.is_empty() {
            return Err(ConfigError::NoBodies);
        }

        for (i, b) in self.bodies.iter().enumerate() {
            for (field, values) in [("x", &b.x), ("v", &b.v)] {
                if values.len() != 3 || values.iter().any(|c| !c.is_finite()) {
                    return Err(ConfigError::BadVector {
                        body: i,
                        name: b.name.clone(),
                        field,
                        got: values.clone(),
                    });
                }
            }
            if !(b.m.is_finite() && b.m > 0.0) {
                return Err(ConfigError::BadMass { body: i, name: b.name.clone(), mass: b.m });
            }
            if !b.spin.is_finite() {
                return Err(ConfigError::BadSpin { body: i, name: b.name.clone() });
            }
        }

        let sim = &self.simulation;
        for granularity in Granularity::ALL {
            let dt = sim.step_sizes.get(granularity);
            if !(dt.is_finite() && dt > 0.0) {
                return Err(ConfigError::BadStep { granularity, dt });
            }
        }
        if sim.speed > MAX_SPEED {
            return Err(ConfigError::BadSpeed(sim.speed));
        }
        if !(sim.distance_scale.is_finite() && sim.distance_scale > 0.0) {
            return Err(ConfigError::BadScale(sim.distance_scale));
        }

        if let Some(trace) = &self.orbit_trace {
            let bodies = self.bodies.len();
            for index in [trace.target, trace.anchor] {
                if index >= bodies {
                    return Err(ConfigError::TraceIndex { index, bodies });
                }
            }
            if trace.target == trace.anchor {
                return Err(ConfigError::TraceSelf);
            }
            if trace.interval == 0 {
                return Err(ConfigError::TraceInterval);
            }
        }

        for line in &self.orbit_lines {
            if line.anchor >= self.bodies.len() {
                return Err(ConfigError::LineAnchor {
                    file: line.file.clone(),
                    index: line.anchor,
                    bodies: self.bodies.len(),
                });
            }
        }

        Ok(())
    }
}
