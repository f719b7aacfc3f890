//! Fixed-step RK4 integrator for the body set
//!
//! Classical fourth-order Runge-Kutta over the whole system, driven by an
//! [`AccelSet`]. Stage values live in a per-body buffer that is sized once and
//! reused every step, so stepping does not allocate.

use super::forces::AccelSet;
use super::states::{Body, NVec3};
use super::timescale::Direction;

/// Derivative of one body's state: (dx/dt, dv/dt)
#[derive(Debug, Clone, Copy)]
pub struct Derivative {
    pub v: NVec3,
    pub a: NVec3,
}

impl Default for Derivative {
    fn default() -> Self {
        Self {
            v: NVec3::zeros(),
            a: NVec3::zeros(),
        }
    }
}

/// Per-body scratch for one RK4 step
#[derive(Debug, Clone, Copy, Default)]
pub struct StageState {
    pub x0: NVec3, // position at step start
    pub v0: NVec3, // velocity at step start
    pub k: [Derivative; 4],
}

/// RK4 stepper owning its stage buffer
#[derive(Debug, Clone, Default)]
pub struct Rk4 {
    stages: Vec<StageState>,
}

impl Rk4 {
    /// Pre-size the stage buffer for `n` bodies
    pub fn new(n: usize) -> Self {
        Self {
            stages: vec![StageState::default(); n],
        }
    }

    /// Advance every body by `dt` granularity units in `direction`.
    ///
    /// Each stage first moves all bodies to their trial state, then evaluates
    /// forces once for the whole set, so no body sees a partially updated neighbour.
    pub fn step(&mut self, bodies: &mut [Body], forces: &AccelSet, g: f64, dt: f64, direction: Direction) {
        let n = bodies.len();
        if n == 0 { // no bodies, return
            return;
        }
        if self.stages.len() != n {
            self.stages.resize(n, StageState::default());
        }

        let h = direction.sign() * dt; // signed step
        let half_h = 0.5 * h;

        // Snapshot x_n, v_n
        for (s, b) in self.stages.iter_mut().zip(bodies.iter()) {
            s.x0 = b.x;
            s.v0 = b.v;
        }

        // k1 at the snapshot
        self.evaluate(0, bodies, forces, g);

        // k2, k3 at the midpoint using the previous stage; k4 at the end point using k3
        for (stage, offset) in [(1, half_h), (2, half_h), (3, h)] {
            for (s, b) in self.stages.iter().zip(bodies.iter_mut()) {
                let prev = s.k[stage - 1];
                b.x = s.x0 + offset * prev.v;
                b.v = s.v0 + offset * prev.a;
            }
            self.evaluate(stage, bodies, forces, g);
        }

        // x_n+1 = x_n + h/6 (k1 + 2k2 + 2k3 + k4)
        let h6 = h / 6.0;
        for (s, b) in self.stages.iter().zip(bodies.iter_mut()) {
            let [k1, k2, k3, k4] = s.k;
            b.x = s.x0 + h6 * (k1.v + 2.0 * k2.v + 2.0 * k3.v + k4.v);
            b.v = s.v0 + h6 * (k1.a + 2.0 * k2.a + 2.0 * k3.a + k4.a);
        }
    }

    /// Force evaluation at the bodies' current trial state, recorded as stage `stage`
    fn evaluate(&mut self, stage: usize, bodies: &mut [Body], forces: &AccelSet, g: f64) {
        forces.accumulate_accels(g, bodies);
        for (s, b) in self.stages.iter_mut().zip(bodies.iter()) {
            s.k[stage] = Derivative { v: b.v, a: b.a };
        }
    }

    /// Bodies the stage buffer is currently sized for
    pub fn capacity(&self) -> usize {
        self.stages.len()
    }
}
