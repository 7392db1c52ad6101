use crate::container::Container;
use crate::state::YardState;
use env_param::EnvParam;
use tracing::debug;

/// Wait policy tuning constants, overridable via environment variables the
/// same way `PLACEMENT_EXIT_SLACK_S` is (see `state.rs`).
pub static MAX_CONSECUTIVE_WAITS: EnvParam<u32> = EnvParam::new("YARD_MAX_CONSECUTIVE_WAITS", "6");
pub static MAX_WAIT_RATIO: EnvParam<f64> = EnvParam::new("YARD_MAX_WAIT_RATIO", "1.0");
pub static MAX_WAIT_TIME_S: EnvParam<i64> = EnvParam::new("YARD_MAX_WAIT_TIME_S", "10");

/// Crane movement timings, in seconds.
#[derive(Clone, Copy, Debug)]
pub struct TimingConstants {
    pub t_move: i64,
    pub t_lower: i64,
    pub t_lift: i64,
    pub t_clear: i64,
}

/// A transition from one `YardState` to another, with its edge cost.
#[derive(Clone, Debug)]
pub struct Successor {
    pub state: YardState,
    pub cost: f64,
    pub description: String,
}

/// Produces the successors of a `YardState`: pick-up / put-down moves when
/// applicable, plus an optional wait move gated by the wait policy.
pub struct Generator {
    pub timing: TimingConstants,
}

impl Generator {
    pub fn new(timing: TimingConstants) -> Self {
        Generator { timing }
    }

    pub fn successors(&self, current: &YardState) -> Vec<Successor> {
        let mut out = Vec::new();
        if current.crane.is_empty() {
            for i in 0..current.stacks.len() {
                if current.can_pick_up_from(i) {
                    let (state, cost, desc) = self.apply_pick_up(current, i);
                    out.push(Successor {
                        state,
                        cost,
                        description: desc,
                    });
                }
            }
        } else {
            for i in 0..current.stacks.len() {
                if current.can_put_down_on(i) {
                    let (state, cost, desc) = self.apply_put_down(current, i);
                    out.push(Successor {
                        state,
                        cost,
                        description: desc,
                    });
                }
            }
        }

        if self.should_consider_waiting(current) {
            let wait_time = self.calculate_optimal_wait_time(current);
            if wait_time > 0 && wait_time <= MAX_WAIT_TIME_S.get() {
                let (state, cost, desc) = self.apply_wait(current, wait_time);
                out.push(Successor {
                    state,
                    cost,
                    description: desc,
                });
            }
        }

        debug!(count = out.len(), time = current.current_time, "expanded state");
        out
    }

    fn crane_move_time(&self, from: usize, to: usize) -> i64 {
        (to as i64 - from as i64).abs() * self.timing.t_move
    }

    pub fn apply_pick_up(&self, current: &YardState, stack_index: usize) -> (YardState, f64, String) {
        let mut next = current.clone();
        let mut cost = 0i64;
        next.consecutive_waits = 0;

        if current.crane.position != stack_index {
            let move_time = self.crane_move_time(current.crane.position, stack_index);
            cost += move_time;
            next.current_time += move_time;
            next.crane.position = stack_index;
            self.drain_outgoing(&mut next);
        }

        let pick_up_time = self.timing.t_lower + self.timing.t_lift;
        cost += pick_up_time;
        next.current_time += pick_up_time;

        let picked = next.stacks[stack_index]
            .pop()
            .expect("can_pick_up_from guarantees a top container");
        self.drain_outgoing(&mut next);

        let desc = format!("Picked up {} from stack {stack_index}", picked.id);
        next.crane.held = Some(picked);
        (next, cost as f64, desc)
    }

    pub fn apply_put_down(&self, current: &YardState, stack_index: usize) -> (YardState, f64, String) {
        let mut next = current.clone();
        let mut cost = 0i64;
        next.consecutive_waits = 0;

        if current.crane.position != stack_index {
            let move_time = self.crane_move_time(current.crane.position, stack_index);
            cost += move_time;
            next.current_time += move_time;
            next.crane.position = stack_index;
            self.drain_outgoing(&mut next);
        }

        cost += self.timing.t_lower;
        next.current_time += self.timing.t_lower;

        let mut placed: Container = next
            .crane
            .held
            .take()
            .expect("can_put_down_on guarantees a held container");

        let outgoing = next.outgoing_index();
        let mut is_exit = false;
        if stack_index == outgoing {
            is_exit = true;
            let next_boundary = ((next.current_time / 60) + 1) * 60;
            let existing = next.stacks[stack_index].len();

            if next.current_time > placed.due_time() {
                let delta = next.current_time - placed.due_time();
                next.total_accumulated_lateness += delta;
            }
            placed.exit_time = Some(next_boundary);

            for (i, container) in next.stacks[stack_index].iter_mut().enumerate() {
                container.exit_time = Some(next_boundary + ((existing - i) as i64) * 60);
            }
        }
        let placed_id = placed.id.clone();
        next.stacks[stack_index].push(placed);

        cost += self.timing.t_lift;
        next.current_time += self.timing.t_lift;
        self.drain_outgoing(&mut next);

        let desc = if is_exit {
            format!("Put down {placed_id} on stack {stack_index} (EXIT)")
        } else {
            format!("Put down {placed_id} on stack {stack_index}")
        };
        (next, cost as f64, desc)
    }

    pub fn apply_wait(&self, current: &YardState, wait_time: i64) -> (YardState, f64, String) {
        let mut next = current.clone();
        next.consecutive_waits = current.consecutive_waits + 1;
        next.total_wait_time = current.total_wait_time + wait_time;
        next.current_time += wait_time;
        self.drain_outgoing(&mut next);
        let desc = format!("Waited for {wait_time} seconds");
        (next, wait_time as f64, desc)
    }

    /// Pops containers off the back of the outgoing stack whose committed
    /// exit time has arrived.
    pub fn drain_outgoing(&self, state: &mut YardState) {
        let outgoing = state.outgoing_index();
        while let Some(top) = state.stacks[outgoing].last() {
            match top.exit_time {
                Some(exit) if exit <= state.current_time => {
                    state.stacks[outgoing].pop();
                }
                _ => break,
            }
        }
    }

    pub fn should_consider_waiting(&self, current: &YardState) -> bool {
        self.can_waiting_help(current) && !self.has_waited_too_much(current)
    }

    /// True if waiting could let an already-scheduled outgoing departure
    /// clear soon, or if nothing on entry/buffer stacks is already overdue
    /// (so there's no urgent work waiting would delay).
    fn can_waiting_help(&self, current: &YardState) -> bool {
        let outgoing = current.outgoing_index();
        if let Some(top) = current.stacks[outgoing].last() {
            if let Some(exit) = top.exit_time {
                let clear_time = exit + self.timing.t_clear;
                let time_until_clear = clear_time - current.current_time;
                if time_until_clear > 0 && time_until_clear <= MAX_WAIT_TIME_S.get() {
                    return true;
                }
            }
        }

        let has_urgent_work = (0..outgoing).any(|i| {
            current.stacks[i].last().is_some_and(|top| {
                !top.has_exited() && top.due_time() < current.current_time
            })
        });
        !has_urgent_work
    }

    fn has_waited_too_much(&self, current: &YardState) -> bool {
        if current.consecutive_waits >= MAX_CONSECUTIVE_WAITS.get() {
            return true;
        }
        if current.current_time > 0 {
            let wait_ratio = current.total_wait_time as f64 / current.current_time as f64;
            if wait_ratio > MAX_WAIT_RATIO.get() {
                return true;
            }
        }
        false
    }

    pub fn calculate_optimal_wait_time(&self, current: &YardState) -> i64 {
        let outgoing = current.outgoing_index();
        let mut min_wait = i64::MAX;
        if let Some(top) = current.stacks[outgoing].last() {
            if let Some(exit) = top.exit_time {
                let clear_time = exit + self.timing.t_clear;
                let time_until_clear = clear_time - current.current_time;
                if time_until_clear > 0 {
                    min_wait = time_until_clear;
                }
            }
        }
        min_wait.min(MAX_WAIT_TIME_S.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;

    fn timing() -> TimingConstants {
        TimingConstants {
            t_move: 10,
            t_lower: 5,
            t_lift: 5,
            t_clear: 30,
        }
    }

    #[test]
    fn pick_up_moves_container_to_crane() {
        let gen = Generator::new(timing());
        let s = YardState::new(vec![vec![Container::new("A", 0, 1000)], vec![], vec![]], 2);
        let succs = gen.successors(&s);
        assert_eq!(succs.len(), 1);
        let picked = &succs[0].state;
        assert!(picked.crane.held.is_some());
        assert_eq!(picked.crane.held.as_ref().unwrap().id, "A");
        assert!(picked.stacks[0].is_empty());
    }

    #[test]
    fn put_down_on_outgoing_sets_exit_time() {
        let gen = Generator::new(timing());
        let mut s = YardState::new(vec![vec![], vec![], vec![]], 2);
        s.crane.held = Some(Container::new("A", 0, 1000));
        let succs = gen.successors(&s);
        let outgoing = &succs.iter().find(|s| s.state.stacks[2].len() == 1).unwrap().state;
        assert!(outgoing.stacks[2][0].exit_time.is_some());
    }

    #[test]
    fn drain_outgoing_pops_cleared_containers() {
        let gen = Generator::new(timing());
        let mut c = Container::new("A", 0, 0);
        c.exit_time = Some(5);
        let mut s = YardState::new(vec![vec![], vec![], vec![c]], 2);
        s.current_time = 10;
        gen.drain_outgoing(&mut s);
        assert!(s.stacks[2].is_empty());
    }

    #[test]
    fn no_urgent_work_allows_waiting_consideration() {
        let gen = Generator::new(timing());
        let s = YardState::new(vec![vec![], vec![], vec![]], 2);
        assert!(gen.can_waiting_help(&s));
    }

    #[test]
    fn overdue_entry_container_blocks_waiting() {
        let gen = Generator::new(timing());
        let mut s = YardState::new(vec![vec![Container::new("A", 0, 5)], vec![], vec![]], 2);
        s.current_time = 100;
        assert!(!gen.can_waiting_help(&s));
    }

    #[test]
    fn too_many_consecutive_waits_blocks_further_waiting() {
        let gen = Generator::new(timing());
        let mut s = YardState::new(vec![vec![], vec![], vec![]], 2);
        s.consecutive_waits = MAX_CONSECUTIVE_WAITS.get();
        assert!(gen.has_waited_too_much(&s));
    }
}
