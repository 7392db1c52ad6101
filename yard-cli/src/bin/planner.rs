//! Runs the A* planner once over a yard configuration and prints the
//! winning plan, mirroring the original `main.cpp`'s one-shot mode.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;
use yard_core::config::YardConfig;
use yard_core::encode::encode_plan;
use yard_core::generator::Generator;
use yard_core::heuristic::Heuristic;
use yard_core::render::Render;
use yard_core::search::Search;
use yard_core::trace;

#[derive(Parser, Debug)]
#[command(about = "Plans a single hot storage yard run with A* search")]
struct App {
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: tracing::Level,

    /// Path to the yard's TOML configuration file
    #[arg(default_value = "ulaz.txt")]
    config_file: String,

    /// Maximum nodes to expand before giving up
    #[arg(long, default_value_t = 100_000)]
    max_nodes: usize,

    /// Number of alternative solutions to collect before picking the best
    #[arg(long, default_value_t = 1)]
    max_solutions: usize,

    /// Where to write the winning plan's raw action trace
    #[arg(long, default_value = trace::BEST_SOLUTION_MOVES_FILE)]
    moves_file: String,

    /// Print periodic progress and a cost breakdown, and persist the
    /// search transcript to `--process-file`
    #[arg(long)]
    verbose: bool,

    /// Where to write the human-readable search transcript in verbose mode
    #[arg(long, default_value = trace::A_STAR_PROCESS_FILE)]
    process_file: String,
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

    tracing::info!(?timing, containers = initial.total_containers(), "starting A* search");
    println!("{}", Render(&initial));

    let search = Search::new(
        Generator::new(timing),
        Heuristic::new(timing),
        args.max_nodes,
        args.max_solutions,
    );
    let outcome = search.solve(initial);

    if args.verbose {
        trace::write_process_log(&args.process_file, &outcome.stats, outcome.termination, outcome.best.as_ref())
            .with_context(|| format!("failed to write {}", args.process_file))?;
        println!(
            "Search finished in {:.3}s: termination={:?} expanded={} generated={} duplicates={}",
            outcome.stats.search_elapsed.as_secs_f64(),
            outcome.termination,
            outcome.stats.nodes_expanded,
            outcome.stats.nodes_generated,
            outcome.stats.duplicates_detected,
        );
    }

    if !outcome.found {
        anyhow::bail!(
            "no plan found after expanding {} nodes (limit {}, termination={:?})",
            outcome.stats.nodes_expanded,
            args.max_nodes,
            outcome.termination,
        );
    }

    let best = outcome.best.expect("found implies a best solution");
    println!(
        "Found plan: cost={:.2} lateness={}s nodes_expanded={}",
        best.total_cost, best.total_lateness, best.nodes_expanded_when_found
    );
    println!("Key moves: {}", best.key_moves.join(" | "));
    if args.verbose {
        println!(
            "Cost breakdown: total_cost={:.3} (lateness={}s + {:.0}*time)",
            best.total_cost, best.total_lateness, 1.0 / yard_core::search::EPSILON
        );
    }

    trace::write_actions(&args.moves_file, &best.actions)
        .with_context(|| format!("failed to write {}", args.moves_file))?;
    println!("Plan tokens: {}", encode_plan(&best.actions));

    Ok(())
}
