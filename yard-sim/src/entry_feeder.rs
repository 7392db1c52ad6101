use crate::signals::{ArrivalSender, ArrivalSignal};
use crate::yard::SharedYard;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use yard_core::container::Container;

/// Bounds for a synthetically generated container's due-in, in seconds.
pub struct ArrivalProfile {
    pub tick: Duration,
    pub arrival_chance: f64,
    pub min_due_in: i64,
    pub max_due_in: i64,
}

impl Default for ArrivalProfile {
    fn default() -> Self {
        ArrivalProfile {
            tick: Duration::from_secs(1),
            arrival_chance: 0.1,
            min_due_in: 60,
            max_due_in: 2100,
        }
    }
}

/// Periodically drops a new container onto the entry stack and raises
/// `needs_recalc`, modeling containers arriving at the yard gate outside
/// the planner's control.
pub struct EntryFeeder {
    yard: Arc<SharedYard>,
    arrivals: ArrivalSender,
    profile: ArrivalProfile,
    rng: SmallRng,
    next_id: u64,
}

impl EntryFeeder {
    pub fn new(yard: Arc<SharedYard>, arrivals: ArrivalSender, profile: ArrivalProfile, seed: u64) -> Self {
        EntryFeeder {
            yard,
            arrivals,
            profile,
            rng: SmallRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    pub fn run(mut self) {
        while self.yard.is_running() {
            self.yard.wait_until_resumed();
            self.tick();
            std::thread::sleep(self.profile.tick);
        }
    }

    fn tick(&mut self) {
        if !self.rng.gen_bool(self.profile.arrival_chance) {
            return;
        }
        let id = format!("C{}", self.next_id);
        self.next_id += 1;
        let due_in = self
            .rng
            .gen_range(self.profile.min_due_in..=self.profile.max_due_in);
        let arrival_time = self.yard.system_time.load(Ordering::SeqCst);

        {
            let mut state = self.yard.state.lock().unwrap();
            state.stacks[0].push(Container::new(id.clone(), arrival_time, due_in));
        }
        self.yard.needs_recalc.store(true, Ordering::SeqCst);
        info!(container = %id, due_in, "new container detected on entry stack");
        let _ = self.arrivals.sender.send(ArrivalSignal::ContainerArrived { id, due_in });
    }
}
