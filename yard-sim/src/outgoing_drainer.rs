use crate::yard::SharedYard;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Advances the shared clock as real time passes and pops containers off
/// the outgoing stack whose committed exit time has arrived, independent
/// of whatever the Crane Runner is doing.
pub struct OutgoingDrainer {
    yard: Arc<SharedYard>,
    tick: Duration,
    time_scale: f64,
}

impl OutgoingDrainer {
    pub fn new(yard: Arc<SharedYard>, tick: Duration, time_scale: f64) -> Self {
        OutgoingDrainer { yard, tick, time_scale }
    }

    pub fn run(self) {
        while self.yard.is_running() {
            self.yard.wait_until_resumed();
            self.tick_once();
            std::thread::sleep(self.tick);
        }
    }

    fn tick_once(&self) {
        let elapsed = (self.tick.as_secs_f64() / self.time_scale.max(f64::EPSILON)) as i64;
        let new_time = self.yard.system_time.fetch_add(elapsed, Ordering::SeqCst) + elapsed;

        let mut state = self.yard.state.lock().unwrap();
        if new_time > state.current_time {
            state.current_time = new_time;
        }
        let outgoing = state.outgoing_index();
        let mut drained = 0;
        while let Some(top) = state.stacks[outgoing].last() {
            match top.exit_time {
                Some(exit) if exit <= state.current_time => {
                    state.stacks[outgoing].pop();
                    drained += 1;
                }
                _ => break,
            }
        }
        if drained > 0 {
            info!(drained, time = state.current_time, "outgoing stack cleared departed containers");
        }
    }
}
