//! Conserved quantities for checking integrator behaviour

use super::states::{Body, NVec3};

/// Total linear momentum, sum of m v
pub fn total_momentum(bodies: &[Body]) -> NVec3 {
    bodies.iter().fold(NVec3::zeros(), |p, b| p + b.m * b.v)
}

/// Kinetic plus potential energy in simulation units.
///
/// With distances in units and the force model working in AU, the pair potential
/// is `-g m_i m_j scale / d_au`.
pub fn total_energy(bodies: &[Body], g: f64, scale: f64) -> f64 {
    let kinetic: f64 = bodies.iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum();

    let mut potential = 0.0;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let d = (bodies[j].x - bodies[i].x).norm() / scale;
            if d > 0.0 {
                potential -= g * bodies[i].m * bodies[j].m * scale / d;
            }
        }
    }

    kinetic + potential
}
