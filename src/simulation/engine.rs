//! Fixed-step simulation loop
//!
//! One [`Simulation::tick`] per scheduler step:
//! 1. skip when paused,
//! 2. convert velocities/spins once if the granularity changed,
//! 3. advance spin angles, then one RK4 step over the body set,
//! 4. advance the calendar and sample the orbit recorder.
//!
//! Readers (viewer, CLI) only see the body set between ticks.

use std::f64::consts::TAU;

use bevy::prelude::Resource;
use tracing::debug;

use super::clock::SimulationClock;
use super::forces::{AccelSet, NewtonianGravity};
use super::integrator::Rk4;
use super::orbit_path::OrbitRecorder;
use super::params::Parameters;
use super::states::{Body, System};
use super::timescale::{convert_rate, convert_velocity, Granularity, TimeScaleController};

#[derive(Resource)]
pub struct Simulation {
    pub system: System,
    pub parameters: Parameters,
    pub time: TimeScaleController,
    pub forces: AccelSet,
    pub clock: SimulationClock,
    pub recorder: Option<OrbitRecorder>,
    integrator: Rk4,
    ticks: u64, // completed ticks
}

impl Simulation {
    /// Build a simulation from bodies whose velocities and spin rates are given per second.
    ///
    /// They are converted once to the controller's starting granularity.
    pub fn new(mut system: System, parameters: Parameters, time: TimeScaleController) -> Self {
        let start = time.applied();
        if start != Granularity::Second {
            convert_bodies(&mut system.bodies, Granularity::Second, start);
        }

        // G and the force model must agree on the distance scale
        let time = time.with_distance_scale(parameters.scale);
        let forces = AccelSet::new().with(NewtonianGravity {
            scale: parameters.scale,
        });
        let integrator = Rk4::new(system.len());

        Self {
            system,
            parameters,
            time,
            forces,
            clock: SimulationClock::default(),
            recorder: None,
            integrator,
            ticks: 0,
        }
    }

    pub fn with_clock(mut self, clock: SimulationClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_recorder(mut self, recorder: OrbitRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Step length for the granularity the bodies are in
    pub fn step_size(&self) -> f64 {
        self.parameters.step(self.time.applied())
    }

    /// Apply a pending granularity change to every body. Returns whether one was pending.
    pub fn sync_granularity(&mut self) -> bool {
        let Some((from, to)) = self.time.take_transition() else {
            return false;
        };
        convert_bodies(&mut self.system.bodies, from, to);
        debug!(%from, %to, g = self.time.gravitational_constant(), "granularity changed");
        true
    }

    /// Run one fixed step. Returns `false` when paused and nothing ran.
    pub fn tick(&mut self) -> bool {
        if self.time.is_paused() {
            return false;
        }

        self.sync_granularity();

        let scale = self.time.applied();
        let direction = self.time.direction();
        let dt = self.parameters.step(scale);
        let g = self.time.gravitational_constant();

        // spin has no force dependency
        let turn = direction.sign() * dt;
        for b in self.system.bodies.iter_mut() {
            b.angle = (b.angle + b.spin * turn).rem_euclid(TAU);
        }

        self.integrator.step(&mut self.system.bodies, &self.forces, g, dt, direction);

        self.clock.advance(dt, scale, direction);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.sample(&self.system.bodies);
        }
        self.ticks += 1;
        true
    }

    /// Run up to `n` ticks, returning how many actually ran
    pub fn run(&mut self, n: u64) -> u64 {
        (0..n).filter(|_| self.tick()).count() as u64
    }
}

fn convert_bodies(bodies: &mut [Body], from: Granularity, to: Granularity) {
    for b in bodies.iter_mut() {
        b.v = convert_velocity(b.v, from, to);
        b.spin = convert_rate(b.spin, from, to);
    }
}
