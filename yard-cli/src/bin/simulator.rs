//! Runs the reactive executor: an initial A* plan followed by continuous
//! replanning as containers arrive, mirroring the original
//! `HotStorageSimulator::simulate`.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::{Duration, Instant};
use yard_core::config::YardConfig;
use yard_sim::entry_feeder::ArrivalProfile;
use yard_sim::Executor;

#[derive(Parser, Debug)]
#[command(about = "Runs the hot storage yard's reactive executor")]
struct App {
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: tracing::Level,

    /// Path to the yard's TOML configuration file
    #[arg(default_value = "ulaz.txt")]
    config_file: String,

    /// Maximum nodes to expand per (re)plan
    #[arg(long, default_value_t = 100_000)]
    max_nodes: usize,

    /// How long to run the simulation for, in seconds, before stopping
    #[arg(long, default_value_t = 120)]
    run_seconds: u64,

    /// Chance per entry-feeder tick that a new container arrives
    #[arg(long, default_value_t = 0.1)]
    arrival_chance: f64,

    /// How often the entry feeder checks for a new arrival, in seconds
    #[arg(long, default_value_t = 1)]
    entry_feed_period_s: u64,

    /// How often the outgoing drainer checks for departures, in seconds
    #[arg(long, default_value_t = 1)]
    outgoing_drain_period_s: u64,

    /// Scales simulated seconds to real sleep time (1.0 = real time)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Seed for the entry feeder's container generator
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Resume from a persisted plan-token file instead of computing an
    /// initial plan with A*
    #[arg(long)]
    resume_plan_file: Option<String>,
}

fn main() -> Result<()> {
    let args = App::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(Instant::now()))
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = YardConfig::from_file(&args.config_file)
        .with_context(|| format!("failed to load yard config from {}", args.config_file))?;
    let timing = config.timing();
    let initial = config.to_yard_state();

    let mut executor = Executor::new(initial, timing)
        .with_max_nodes(args.max_nodes)
        .with_time_scale(args.time_scale)
        .with_seed(args.seed)
        .with_drain_period_s(args.outgoing_drain_period_s as i64)
        .with_arrival_profile(ArrivalProfile {
            tick: Duration::from_secs_f64(args.entry_feed_period_s as f64 * args.time_scale.max(0.001)),
            arrival_chance: args.arrival_chance,
            ..ArrivalProfile::default()
        });
    if let Some(path) = &args.resume_plan_file {
        executor = executor.with_resume_plan_file(path.clone());
    }
    let handle = executor.run();

    std::thread::sleep(Duration::from_secs(args.run_seconds));
    handle.stop();
    handle.join().map_err(anyhow::Error::from)?;

    Ok(())
}
