use crate::generator::TimingConstants;
use crate::state::YardState;

/// Admissible lower bound on total remaining lateness: for every container
/// still in the yard, the fastest physically possible delivery time to the
/// outgoing stack, compared against its due time.
pub struct Heuristic {
    pub timing: TimingConstants,
}

impl Heuristic {
    pub fn new(timing: TimingConstants) -> Self {
        Heuristic { timing }
    }

    pub fn evaluate(&self, state: &YardState) -> f64 {
        let mut total = 0.0;
        let outgoing = state.outgoing_index();

        if let Some(held) = &state.crane.held {
            let move_distance = (outgoing as i64 - state.crane.position as i64).abs();
            let time_to_exit = move_distance * self.timing.t_move + self.timing.t_lower;
            let exit_time = state.current_time + time_to_exit;
            total += (exit_time - held.due_time()).max(0) as f64;
        }

        // The time a held container, if any, must still be delivered before
        // the crane is free to work any other container.
        let held_prepend = state.crane.held.as_ref().map(|_| {
            let move_distance = (outgoing as i64 - state.crane.position as i64).abs();
            move_distance * self.timing.t_move + self.timing.t_lower
        });

        for stack_idx in 1..outgoing {
            let stack = &state.stacks[stack_idx];
            for (pos, container) in stack.iter().enumerate() {
                if container.has_exited() {
                    continue;
                }
                let mut min_time = self.min_time_to_exit(state, stack_idx, pos);
                if let Some(prepend) = held_prepend {
                    min_time += prepend;
                }
                let exit_time = state.current_time + min_time;
                total += (exit_time - container.due_time()).max(0) as f64;
            }
        }

        for (pos, container) in state.stacks[0].iter().enumerate() {
            if container.has_exited() {
                continue;
            }
            let mut min_time = self.min_time_to_exit(state, 0, pos);
            if let Some(prepend) = held_prepend {
                min_time += prepend;
            }
            let exit_time = state.current_time + min_time;
            total += (exit_time - container.due_time()).max(0) as f64;
        }

        total
    }

    fn min_time_to_exit(&self, state: &YardState, stack_index: usize, container_position: usize) -> i64 {
        let outgoing = state.outgoing_index();
        let mut total = 0i64;

        if state.crane.is_empty() && state.crane.position != stack_index {
            total += self.min_moves_between_stacks(state.crane.position, stack_index) * self.timing.t_move;
        }

        let containers_above = state.stacks[stack_index].len() as i64 - container_position as i64 - 1;
        if containers_above > 0 {
            let per_container = self.timing.t_lower
                + self.timing.t_lift
                + self.timing.t_move
                + self.timing.t_lower
                + self.timing.t_lift
                + self.timing.t_move;
            total += containers_above * per_container;
        }

        total += self.timing.t_lower + self.timing.t_lift;
        total += self.min_moves_between_stacks(stack_index, outgoing) * self.timing.t_move;
        total += self.timing.t_lower;

        total
    }

    fn min_moves_between_stacks(&self, from: usize, to: usize) -> i64 {
        (to as i64 - from as i64).abs()
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
    fn goal_state_has_zero_heuristic_when_not_late() {
        let h = Heuristic::new(timing());
        let s = YardState::new(vec![vec![], vec![], vec![]], 2);
        assert_eq!(h.evaluate(&s), 0.0);
    }

    #[test]
    fn single_entry_container_with_generous_due_in_is_not_late() {
        let h = Heuristic::new(timing());
        let s = YardState::new(vec![vec![Container::new("A", 0, 10_000)], vec![], vec![]], 2);
        assert_eq!(h.evaluate(&s), 0.0);
    }

    #[test]
    fn tight_deadline_yields_positive_heuristic() {
        let h = Heuristic::new(timing());
        let s = YardState::new(vec![vec![Container::new("A", 0, 1)], vec![], vec![]], 2);
        assert!(h.evaluate(&s) > 0.0);
    }

    #[test]
    fn buried_container_costs_more_than_top_container() {
        let h = Heuristic::new(timing());
        let shallow = YardState::new(
            vec![vec![], vec![Container::new("A", 0, 1)], vec![]],
            3,
        );
        let mut deep_stack = vec![
            Container::new("X", 0, 100_000),
            Container::new("Y", 0, 100_000),
        ];
        deep_stack.push(Container::new("A", 0, 1));
        let deep = YardState::new(vec![vec![], deep_stack, vec![]], 3);
        assert!(h.evaluate(&deep) >= h.evaluate(&shallow));
    }
}
