use std::time::Instant;

use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::integrator::Rk4;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::timescale::{gravitational_constant, Direction, Granularity};

/// Helper to build a deterministic ring-ish body set of size `n`
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n).map(|i| {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5000.0,
            (i_f * 0.13).cos() * 500.0,
            (i_f * 0.07).sin() * 5000.0,
        );
        Body::new(x, NVec3::zeros(), 1.0, 0.0)
    }).collect()
}

/// Time one RK4 step (4 direct force passes) for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_rk4() {
    let g = gravitational_constant(Granularity::Day);
    let forces = AccelSet::new().with(NewtonianGravity::default());

    println!("N,rk4_step_ms");

    for n in [2, 4, 10, 25, 50, 100, 200, 400, 800] {
        // Small n: average over many steps to smooth noise
        let steps = if n <= 100 { 1000 } else { 10 };

        let mut bodies = make_bodies(n);
        let mut rk4 = Rk4::new(n);

        // Warm-up
        rk4.step(&mut bodies, &forces, g, 0.016, Direction::Forward);

        let t0 = Instant::now();
        for _ in 0..steps {
            rk4.step(&mut bodies, &forces, g, 0.016, Direction::Forward);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
}
