use kepsim::{build_scenario, load_scenario, World};
use kepsim::run_2d;
use kepsim::bench_propagation;

use clap::Parser;
use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "earth_moon.yaml")]
    file_name: String,

    /// Step the world without a window
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Host seconds per tick in headless mode
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Print the analytic vs. numeric propagation benchmark and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_world(file_name: &str) -> Result<World> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let scenario_cfg = load_scenario(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;

    build_scenario(scenario_cfg).context("invalid scenario")
}

fn run_headless(mut world: World, ticks: u64, dt: f64) {
    let report_every = (ticks / 10).max(1);

    for i in 1..=ticks {
        world.tick(dt);

        if i % report_every == 0 {
            if let Some(craft) = world.current_craft() {
                let p = craft.position();
                info!(
                    t = world.time(),
                    x = p.x,
                    y = p.y,
                    phase = ?craft.phase(),
                    altitude = craft.altitude(),
                    "tick {i}"
                );
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_propagation();
        return Ok(());
    }

    let world = load_world(&args.file_name)?;

    if args.headless {
        run_headless(world, args.ticks, args.dt);
    } else {
        run_2d(world);
    }

    Ok(())
}
