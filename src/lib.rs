pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3};
pub use simulation::forces::{pair_force, AccelSet, Acceleration, NewtonianGravity};
pub use simulation::integrator::Rk4;
pub use simulation::timescale::{convert_rate, convert_velocity, gravitational_constant, scaled_gravitational_constant, Direction, Granularity, TimeScaleController};
pub use simulation::params::{Parameters, StepSizes};
pub use simulation::engine::Simulation;
pub use simulation::clock::SimulationClock;
pub use simulation::orbit_path::{OrbitLine, OrbitPath, OrbitPathError, OrbitRecorder};
pub use simulation::diagnostics::{total_energy, total_momentum};
pub use simulation::scenario::Scenario;

pub use configuration::config::{BodyConfig, ConfigError, OrbitLineConfig, OrbitTraceConfig, ScenarioConfig, SimulationConfig};

pub use visualization::viewer::run_viewer;

pub use benchmark::benchmark::bench_rk4;
