//! Core state types for the solar system simulation.
//!
//! Defines the body/system structs:
//! - `Body`   one celestial object (position, velocity, mass, spin)
//! - `System` the ordered, fixed body set; indices double as identity
//!
//! Positions are in scaled distance units (1 unit = 1/1500 AU), masses in Earth masses,
//! and velocities/spin rates in the currently active time granularity.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity, per active granularity unit
    pub a: NVec3, // acceleration scratch, rewritten by every force evaluation
    pub m: f64, // mass
    pub spin: f64, // spin rate (radians per granularity unit)
    pub angle: f64, // accumulated spin angle in [0, 2pi)
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64, spin: f64) -> Self {
        Self {
            x,
            v,
            a: NVec3::zeros(),
            m,
            spin,
            angle: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // body set, order stable for the whole run
    pub names: Vec<String>, // display name per body index
}

impl System {
    /// Build a system from bodies, naming them `body-<i>`
    pub fn from_bodies(bodies: Vec<Body>) -> Self {
        let names = (0..bodies.len()).map(|i| format!("body-{i}")).collect();
        Self { bodies, names }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Look a body up by its display name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
