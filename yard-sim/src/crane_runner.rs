use crate::error::ExecutorError;
use crate::signals::ArrivalReceiver;
use crate::yard::SharedYard;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use yard_core::encode::{encode_actions, parse_plan, PlanToken};
use yard_core::generator::Generator;
use yard_core::heuristic::Heuristic;
use yard_core::search::Search;

/// Scales simulated seconds to real sleep duration. `1.0` sleeps in real
/// time; tests use a much smaller value so a plan with minutes of transit
/// time runs in milliseconds.
pub struct CraneRunner {
    yard: Arc<SharedYard>,
    arrivals: ArrivalReceiver,
    generator: Generator,
    heuristic_factory: Box<dyn Fn() -> Heuristic + Send>,
    max_nodes: usize,
    max_solutions: usize,
    time_scale: f64,
    resume_plan_file: Option<String>,
}

impl CraneRunner {
    pub fn new(
        yard: Arc<SharedYard>,
        arrivals: ArrivalReceiver,
        generator: Generator,
        heuristic_factory: Box<dyn Fn() -> Heuristic + Send>,
        max_nodes: usize,
        max_solutions: usize,
        time_scale: f64,
    ) -> Self {
        CraneRunner {
            yard,
            arrivals,
            generator,
            heuristic_factory,
            max_nodes,
            max_solutions,
            time_scale,
            resume_plan_file: None,
        }
    }

    /// Resume from a persisted, `;;`-joined plan-token file instead of
    /// computing an initial plan with A*. Used to pick a simulation back up
    /// from a previously written plan rather than replanning from scratch.
    pub fn with_resume_plan_file(mut self, path: impl Into<String>) -> Self {
        self.resume_plan_file = Some(path.into());
        self
    }

    pub fn run(mut self) {
        match self.resume_plan_file.take() {
            Some(path) => {
                if let Err(err) = self.load_plan_from_file(&path) {
                    error!(%err, path, "failed to resume plan from file, stopping executor");
                    self.yard.stop();
                    return;
                }
            }
            None => self.replan("initial plan"),
        }
        while self.yard.is_running() {
            for signal in self.arrivals.drain() {
                info!(?signal, "crane runner observed arrival signal");
            }

            let exhausted = self.yard.plan.lock().unwrap().is_empty();
            if self.yard.needs_recalc.load(Ordering::SeqCst) || exhausted {
                self.replan("recalculation triggered");
                if self.yard.plan.lock().unwrap().is_empty() {
                    // Nothing left to do and no replan produced new work.
                    break;
                }
            }

            let token = { self.yard.plan.lock().unwrap().pop_front() };
            match token {
                Some(PlanToken::Move { from, to }) => self.execute_move(from, to),
                Some(PlanToken::WaitRun { seconds_each, count }) => {
                    for _ in 0..count {
                        self.execute_wait(seconds_each);
                    }
                }
                None => break,
            }
        }
    }

    fn sleep_for(&self, seconds: i64) {
        let scaled = (seconds.max(0) as f64) * self.time_scale;
        if scaled > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(scaled));
        }
    }

    fn execute_move(&self, from: usize, to: usize) {
        let before = self.yard.state.lock().unwrap().clone();
        let (after_pick, pick_cost, pick_desc) = self.generator.apply_pick_up(&before, from);
        self.sleep_for(pick_cost as i64);
        {
            let mut state = self.yard.state.lock().unwrap();
            *state = after_pick.clone();
        }
        self.yard.system_time.store(after_pick.current_time, Ordering::SeqCst);
        info!(%pick_desc, "executed pick up");

        let (after_put, put_cost, put_desc) = self.generator.apply_put_down(&after_pick, to);
        self.sleep_for(put_cost as i64);
        {
            let mut state = self.yard.state.lock().unwrap();
            *state = after_put.clone();
        }
        self.yard.system_time.store(after_put.current_time, Ordering::SeqCst);
        info!(%put_desc, "executed put down");
    }

    fn execute_wait(&self, seconds: i64) {
        let before = self.yard.state.lock().unwrap().clone();
        let (after, cost, desc) = self.generator.apply_wait(&before, seconds);
        self.sleep_for(cost as i64);
        {
            let mut state = self.yard.state.lock().unwrap();
            *state = after.clone();
        }
        self.yard.system_time.store(after.current_time, Ordering::SeqCst);
        info!(%desc, "executed wait");
    }

    /// Loads a persisted plan-token file, validating every token through
    /// `yard_core::encode::parse_plan` rather than trusting it the way a
    /// freshly A*-encoded plan is trusted. A malformed token or one naming
    /// an uninterpretable direction (moving a stack to itself) surfaces as
    /// an `ExecutorError` instead of silently corrupting the plan queue.
    fn load_plan_from_file(&mut self, path: &str) -> Result<(), ExecutorError> {
        info!(reason = "resume from file", "pausing system for plan load");
        self.yard.pause();

        let contents = std::fs::read_to_string(path).map_err(|source| ExecutorError::PlanFileIo {
            path: path.to_string(),
            source,
        })?;
        let tokens = parse_plan(&contents)?;

        let mut plan = self.yard.plan.lock().unwrap();
        plan.clear();
        plan.extend(tokens);
        drop(plan);

        self.yard.needs_recalc.store(false, Ordering::SeqCst);
        self.yard.resume();
        info!(path, "system resumed with plan loaded from file");
        Ok(())
    }

    fn replan(&mut self, reason: &'static str) {
        info!(reason, "pausing system for A* recalculation");
        self.yard.pause();

        let snapshot = self.yard.state.lock().unwrap().clone();
        let heuristic = (self.heuristic_factory)();
        let search = Search::new(
            Generator::new(self.generator.timing),
            heuristic,
            self.max_nodes,
            self.max_solutions,
        );
        let outcome = search.solve(snapshot);

        let mut plan = self.yard.plan.lock().unwrap();
        plan.clear();
        if let Some(best) = outcome.best {
            plan.extend(encode_actions(&best.actions));
        }
        drop(plan);

        self.yard.needs_recalc.store(false, Ordering::SeqCst);
        self.yard.resume();
        info!(found = outcome.found, "system resumed with new plan");
    }
}
