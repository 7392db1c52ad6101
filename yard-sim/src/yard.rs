use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Condvar, Mutex};
use yard_core::encode::PlanToken;
use yard_core::state::YardState;

/// State shared between the Entry Feeder, Crane Runner and Outgoing
/// Drainer threads. Mirrors the original simulator's mutex/condvar/atomic
/// bundle: a pause protocol the Crane Runner engages while replanning, a
/// `needs_recalc` flag the Entry Feeder raises, and the live yard and plan
/// behind their own locks.
pub struct SharedYard {
    pub state: Mutex<YardState>,
    pub plan: Mutex<VecDeque<PlanToken>>,
    pub paused: Mutex<bool>,
    pub pause_cv: Condvar,
    pub needs_recalc: AtomicBool,
    pub running: AtomicBool,
    /// Authoritative simulated clock, in seconds. The Outgoing Drainer
    /// advances it as real time passes; the Crane Runner advances it (and
    /// keeps it in sync) as it completes timed operations.
    pub system_time: AtomicI64,
}

impl SharedYard {
    pub fn new(state: YardState) -> Self {
        let system_time = state.current_time;
        SharedYard {
            state: Mutex::new(state),
            plan: Mutex::new(VecDeque::new()),
            paused: Mutex::new(false),
            pause_cv: Condvar::new(),
            needs_recalc: AtomicBool::new(false),
            running: AtomicBool::new(true),
            system_time: AtomicI64::new(system_time),
        }
    }

    pub fn pause(&self) {
        *self.paused.lock().unwrap() = true;
    }

    pub fn resume(&self) {
        *self.paused.lock().unwrap() = false;
        self.pause_cv.notify_all();
    }

    /// Blocks the calling thread until the yard is no longer paused.
    pub fn wait_until_resumed(&self) {
        let guard = self.paused.lock().unwrap();
        let _guard = self.pause_cv.wait_while(guard, |paused| *paused).unwrap();
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap()
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.resume();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn resume_wakes_a_waiting_thread() {
        let yard = Arc::new(SharedYard::new(YardState::new(vec![vec![], vec![], vec![]], 2)));
        yard.pause();
        let waiter = Arc::clone(&yard);
        let handle = thread::spawn(move || {
            waiter.wait_until_resumed();
        });
        thread::sleep(Duration::from_millis(20));
        yard.resume();
        handle.join().unwrap();
    }
}
