//! Build fully-initialized simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario` containing:
//! - the runtime `Simulation` (bodies converted to the starting granularity,
//!   playback state, calendar, optional orbit recorder)
//! - per-body visual radii for viewers
//! - pre-recorded orbit lines with the body each is drawn around

use crate::configuration::config::{BodyConfig, ConfigError, ScenarioConfig};
use crate::simulation::clock::SimulationClock;
use crate::simulation::engine::Simulation;
use crate::simulation::orbit_path::{OrbitLine, OrbitPath, OrbitRecorder};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3, System};
use crate::simulation::timescale::{Direction, TimeScaleController};

pub struct Scenario {
    pub simulation: Simulation,
    pub radii: Vec<f64>, // visual radius per body index
    pub orbit_lines: Vec<OrbitLine>,
}

impl Scenario {
    /// Validates `cfg` first, so hand-built configs get the same checks as loaded ones
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies: Vec<Body> = cfg.bodies.iter().map(|bc: &BodyConfig| Body::new(
            NVec3::new(bc.x[0], bc.x[1], bc.x[2]),
            NVec3::new(bc.v[0], bc.v[1], bc.v[2]),
            bc.m,
            bc.spin,
        )).collect();

        let names = cfg.bodies.iter().enumerate().map(|(i, bc)| {
            if bc.name.is_empty() { format!("body-{i}") } else { bc.name.clone() }
        }).collect();
        let radii = cfg.bodies.iter().map(|bc| bc.radius).collect();

        let system = System { bodies, names };

        let orbit_lines = cfg.orbit_lines.iter().map(|line| {
            let path = OrbitPath::from_path(&line.file).map_err(|source| ConfigError::OrbitLine {
                file: line.file.clone(),
                source,
            })?;
            Ok(OrbitLine { anchor: line.anchor, path })
        }).collect::<Result<Vec<_>, ConfigError>>()?;

        // Parameters (runtime) from the step table and distance scale
        let s_cfg = cfg.simulation;
        let parameters = Parameters {
            steps: s_cfg.step_sizes,
            scale: s_cfg.distance_scale,
        };

        // Time-scale controller from the playback settings
        let direction = if s_cfg.reversed { Direction::Reverse } else { Direction::Forward };
        let time = TimeScaleController::new(s_cfg.granularity)
            .with_direction(direction)
            .with_speed(s_cfg.speed);

        let mut simulation = Simulation::new(system, parameters, time)
            .with_clock(SimulationClock::new(s_cfg.start_date));
        if let Some(trace) = cfg.orbit_trace {
            simulation = simulation.with_recorder(OrbitRecorder::new(trace.target, trace.anchor, trace.interval));
        }

        Ok(Self { simulation, radii, orbit_lines })
    }
}
