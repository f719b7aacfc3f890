//! Force / acceleration contributors for the simulation
//!
//! Defines the acceleration trait, the term collection that drives it,
//! and direct pairwise Newtonian gravity

use super::states::{Body, NVec3};
use super::timescale::DISTANCE_SCALE;

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into each body's `a`
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Recompute every body's acceleration for gravitational constant `g`
    /// - `bodies[i].a` is zeroed, then every term adds its contribution
    pub fn accumulate_accels(&self, g: f64, bodies: &mut [Body]) {
        // Zero scratch
        for b in bodies.iter_mut() {
            b.a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(g, bodies);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration source over the whole body set
/// Implementations add their contribution into `bodies[i].a`
pub trait Acceleration {
    fn acceleration(&self, g: f64, bodies: &mut [Body]);
}

/// Force exerted on `bi` by `bj`, or `None` when the pair is coincident.
///
/// Distances are divided by `scale` to get back to AU before applying the
/// inverse-square law; the returned vector points from `bi` towards `bj`.
pub fn pair_force(bi: &Body, bj: &Body, g: f64, scale: f64) -> Option<NVec3> {
    let r = bj.x - bi.x;
    let norm = r.norm();
    let distance = norm / scale;
    if distance == 0.0 {
        return None;
    }
    let magnitude = g * bi.m * bj.m / (distance * distance);
    Some(r / norm * magnitude)
}

/// Direct O(n^2) Newtonian gravity without softening
pub struct NewtonianGravity {
    pub scale: f64, // simulation units per AU
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self { scale: DISTANCE_SCALE }
    }
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, g: f64, bodies: &mut [Body]) {
        let n = bodies.len();

        // Each unordered pair (i, j), i < j, is visited once and the force
        // applied with opposite signs
        for i in 0..n {
            for j in (i + 1)..n {
                let Some(force) = pair_force(&bodies[i], &bodies[j], g, self.scale) else {
                    // coincident pair contributes nothing
                    continue;
                };
                let mi = bodies[i].m;
                let mj = bodies[j].m;
                bodies[i].a += force / mi;
                bodies[j].a -= force / mj;
            }
        }
    }
}
