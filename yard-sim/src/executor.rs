use crate::crane_runner::CraneRunner;
use crate::entry_feeder::{ArrivalProfile, EntryFeeder};
use crate::outgoing_drainer::OutgoingDrainer;
use crate::signals::arrival_channel;
use crate::yard::SharedYard;
use std::sync::Arc;
use std::time::Duration;
use yard_core::generator::{Generator, TimingConstants};
use yard_core::heuristic::Heuristic;
use yard_core::state::YardState;

/// Spawns the Entry Feeder, Crane Runner and Outgoing Drainer as the
/// reactive executor over a `YardState`: the planner's one-shot `Search`
/// wrapped in a continuously-replanning simulation.
pub struct Executor {
    pub yard: Arc<SharedYard>,
    timing: TimingConstants,
    max_nodes: usize,
    max_solutions: usize,
    time_scale: f64,
    arrival_profile: ArrivalProfile,
    seed: u64,
    /// How many simulated seconds the Outgoing Drainer checks for
    /// departures after; real sleep time is this scaled by `time_scale`,
    /// same convention as every other wait in the executor.
    drain_period_s: i64,
    resume_plan_file: Option<String>,
}

impl Executor {
    pub fn new(initial: YardState, timing: TimingConstants) -> Self {
        Executor {
            yard: Arc::new(SharedYard::new(initial)),
            timing,
            max_nodes: 100_000,
            max_solutions: 1,
            time_scale: 1.0,
            arrival_profile: ArrivalProfile::default(),
            seed: 0,
            drain_period_s: 1,
            resume_plan_file: None,
        }
    }

    /// Resume from a persisted plan-token file instead of computing an
    /// initial plan with A*.
    pub fn with_resume_plan_file(mut self, path: impl Into<String>) -> Self {
        self.resume_plan_file = Some(path.into());
        self
    }

    /// How many simulated seconds elapse between the Outgoing Drainer's
    /// departure checks.
    pub fn with_drain_period_s(mut self, seconds: i64) -> Self {
        self.drain_period_s = seconds;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn with_arrival_profile(mut self, profile: ArrivalProfile) -> Self {
        self.arrival_profile = profile;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs the three actors on dedicated threads until `stop()` is called
    /// on the returned handle's shared yard (or the plan runs dry with no
    /// further arrivals), then joins them.
    pub fn run(self) -> ExecutorHandle {
        let (arrival_tx, arrival_rx) = arrival_channel();

        let timing = self.timing;
        let resume_plan_file = self.resume_plan_file.clone();
        let crane_yard = Arc::clone(&self.yard);
        let crane_thread = std::thread::Builder::new()
            .name("crane-runner".into())
            .spawn(move || {
                let mut runner = CraneRunner::new(
                    crane_yard,
                    arrival_rx,
                    Generator::new(timing),
                    Box::new(move || Heuristic::new(timing)),
                    self.max_nodes,
                    self.max_solutions,
                    self.time_scale,
                );
                if let Some(path) = resume_plan_file {
                    runner = runner.with_resume_plan_file(path);
                }
                runner.run();
            })
            .expect("failed to spawn crane-runner thread");

        let feeder_yard = Arc::clone(&self.yard);
        let feeder_thread = std::thread::Builder::new()
            .name("entry-feeder".into())
            .spawn(move || {
                let feeder = EntryFeeder::new(feeder_yard, arrival_tx, self.arrival_profile, self.seed);
                feeder.run();
            })
            .expect("failed to spawn entry-feeder thread");

        let drainer_yard = Arc::clone(&self.yard);
        let drainer_tick =
            Duration::from_secs_f64(self.drain_period_s as f64 * self.time_scale.max(0.001));
        let drainer_thread = std::thread::Builder::new()
            .name("outgoing-drainer".into())
            .spawn(move || {
                let drainer = OutgoingDrainer::new(drainer_yard, drainer_tick, self.time_scale);
                drainer.run();
            })
            .expect("failed to spawn outgoing-drainer thread");

        ExecutorHandle {
            yard: self.yard,
            crane_thread,
            feeder_thread,
            drainer_thread,
        }
    }
}

pub struct ExecutorHandle {
    pub yard: Arc<SharedYard>,
    crane_thread: std::thread::JoinHandle<()>,
    feeder_thread: std::thread::JoinHandle<()>,
    drainer_thread: std::thread::JoinHandle<()>,
}

impl ExecutorHandle {
    pub fn stop(&self) {
        self.yard.stop();
    }

    pub fn join(self) -> Result<(), crate::error::ExecutorError> {
        self.crane_thread
            .join()
            .map_err(|_| crate::error::ExecutorError::CraneThreadPanicked)?;
        self.feeder_thread
            .join()
            .map_err(|_| crate::error::ExecutorError::EntryFeederThreadPanicked)?;
        self.drainer_thread
            .join()
            .map_err(|_| crate::error::ExecutorError::OutgoingDrainerThreadPanicked)?;
        Ok(())
    }
}
