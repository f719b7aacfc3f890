use solsim::{ScenarioConfig, Scenario, Simulation, Granularity, Direction};
use solsim::{run_viewer, bench_rk4, total_energy, total_momentum};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Solar system simulator with RK4 gravity and switchable time granularity")]
struct Args {
    /// Scenario file name under `scenarios/`, or a path to one
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Run without a window and log a summary
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Switch to this granularity before running (headless)
    #[arg(long, value_enum)]
    granularity: Option<GranularityArg>,

    /// Run in reverse (headless)
    #[arg(long)]
    reverse: bool,

    /// Write the recorded orbit trace as JSON (headless)
    #[arg(long)]
    orbit_out: Option<PathBuf>,

    /// Time RK4 steps for growing body counts and exit
    #[arg(long)]
    bench: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GranularityArg {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl From<GranularityArg> for Granularity {
    fn from(g: GranularityArg) -> Self {
        match g {
            GranularityArg::Second => Granularity::Second,
            GranularityArg::Minute => Granularity::Minute,
            GranularityArg::Hour => Granularity::Hour,
            GranularityArg::Day => Granularity::Day,
            GranularityArg::Week => Granularity::Week,
            GranularityArg::Month => Granularity::Month,
            GranularityArg::Year => Granularity::Year,
        }
    }
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(file_name);
    let config_path = if direct.is_file() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("loading scenario {}", config_path.display()))
}

fn run_headless(mut simulation: Simulation, args: &Args) -> Result<()> {
    if let Some(g) = args.granularity {
        simulation.time.set_granularity(g.into());
    }
    if args.reverse {
        simulation.time.set_direction(Direction::Reverse);
    }
    simulation.sync_granularity();
    info!(
        bodies = simulation.bodies().len(),
        granularity = %simulation.time.applied(),
        "simulation ready"
    );

    let g = simulation.time.gravitational_constant();
    let scale = simulation.parameters.scale;
    let e0 = total_energy(simulation.bodies(), g, scale);
    let p0 = total_momentum(simulation.bodies());

    let ran = simulation.run(args.ticks);

    let e1 = total_energy(simulation.bodies(), g, scale);
    let p1 = total_momentum(simulation.bodies());

    info!(
        ticks = ran,
        playback = %simulation.time,
        date = %simulation.clock.label(),
        "headless run finished"
    );
    info!(
        energy_drift = (e1 - e0) / e0.abs(),
        momentum_drift = (p1 - p0).norm(),
        "conserved quantities"
    );
    for (name, b) in simulation.system.names.iter().zip(simulation.bodies()) {
        info!(body = %name, x = b.x.x, y = b.x.y, z = b.x.z, speed = b.v.norm(), "position");
    }

    if let Some(path) = &args.orbit_out {
        let recorder = simulation
            .recorder
            .as_ref()
            .context("--orbit-out needs an `orbit_trace` section in the scenario")?;
        fs::write(path, recorder.to_json()?)
            .with_context(|| format!("writing orbit trace {}", path.display()))?;
        info!(
            samples = recorder.path().positions.len(),
            path = %path.display(),
            "orbit trace written"
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_rk4();
        return Ok(());
    }

    // the viewer installs bevy's own subscriber
    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg)
        .with_context(|| format!("building scenario {}", args.file_name))?;

    if args.headless {
        run_headless(scenario.simulation, &args)
    } else {
        run_viewer(scenario);
        Ok(())
    }
}
