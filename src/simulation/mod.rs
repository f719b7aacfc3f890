pub mod states;
pub mod params;
pub mod timescale;
pub mod forces;
pub mod integrator;
pub mod clock;
pub mod orbit_path;
pub mod diagnostics;
pub mod engine;
pub mod scenario;
