use crate::container::Container;
use crate::crane::Crane;
use env_param::EnvParam;
use serde::{Deserialize, Serialize};

/// How much slack (in seconds) an already-committed exit time on the
/// outgoing stack is allowed to shrink by when a new container is placed
/// on top of it. Overridable via `YARD_PLACEMENT_EXIT_SLACK_S`.
pub static PLACEMENT_EXIT_SLACK_S: EnvParam<i64> =
    EnvParam::new("YARD_PLACEMENT_EXIT_SLACK_S", "4000");

/// The structural key used for duplicate detection in search. Deliberately
/// excludes `current_time`, `consecutive_waits` and every container that has
/// already exited: two states that differ only in clock value or in which
/// already-departed containers they still remember are the same state for
/// planning purposes (see spec's closed-set invariant).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub crane_position: usize,
    pub held_id: Option<String>,
    pub stacks: Vec<Vec<String>>,
}

/// A snapshot of the yard: its stacks, crane, clock and lateness ledger.
///
/// `stacks[0]` is the entry stack, `stacks[stacks.len() - 1]` is the
/// outgoing stack, everything in between is a buffer of capacity
/// `buffer_capacity`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct YardState {
    pub stacks: Vec<Vec<Container>>,
    pub crane: Crane,
    pub current_time: i64,
    pub buffer_capacity: usize,
    pub total_accumulated_lateness: i64,
    pub consecutive_waits: u32,
    pub total_wait_time: i64,
}

impl YardState {
    pub fn new(stacks: Vec<Vec<Container>>, buffer_capacity: usize) -> Self {
        YardState {
            stacks,
            crane: Crane::new(0),
            current_time: 0,
            buffer_capacity,
            total_accumulated_lateness: 0,
            consecutive_waits: 0,
            total_wait_time: 0,
        }
    }

    pub fn entry_index(&self) -> usize {
        0
    }

    pub fn outgoing_index(&self) -> usize {
        self.stacks.len() - 1
    }

    pub fn is_buffer(&self, stack_index: usize) -> bool {
        stack_index != self.entry_index() && stack_index != self.outgoing_index()
    }

    pub fn top(&self, stack_index: usize) -> Option<&Container> {
        self.stacks.get(stack_index).and_then(|s| s.last())
    }

    pub fn top_mut(&mut self, stack_index: usize) -> Option<&mut Container> {
        self.stacks.get_mut(stack_index).and_then(|s| s.last_mut())
    }

    /// Every stack but the outgoing one is free of unexited containers, and
    /// the crane holds nothing.
    pub fn is_goal(&self) -> bool {
        if self.crane.held.is_some() {
            return false;
        }
        let outgoing = self.outgoing_index();
        self.stacks
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != outgoing)
            .all(|(_, stack)| stack.iter().all(|c| c.has_exited()))
    }

    pub fn can_pick_up_from(&self, stack_index: usize) -> bool {
        if stack_index >= self.stacks.len() {
            return false;
        }
        if stack_index == self.outgoing_index() {
            return false;
        }
        let Some(top) = self.stacks[stack_index].last() else {
            return false;
        };
        if top.has_exited() {
            return false;
        }
        self.crane.is_empty()
    }

    /// Mirrors the source's top-of-destination rule: placement is refused if
    /// it would bury a container that is due sooner than the one being
    /// placed, and (on the outgoing stack specifically) refused if it would
    /// push an already-committed exit time forward by more than
    /// `PLACEMENT_EXIT_SLACK_S`.
    pub fn can_put_down_on(&self, stack_index: usize) -> bool {
        if stack_index >= self.stacks.len() {
            return false;
        }
        if stack_index == self.entry_index() {
            return false;
        }
        let Some(held) = &self.crane.held else {
            return false;
        };
        let outgoing = self.outgoing_index();
        if stack_index != outgoing && self.stacks[stack_index].len() >= self.buffer_capacity {
            return false;
        }
        if self.crane.position == stack_index {
            return false;
        }
        if let Some(top) = self.stacks[stack_index].last() {
            let top_due = top.due_time();
            let held_due = held.due_time();
            if stack_index != outgoing && top_due < held_due {
                return false;
            }
            if stack_index == outgoing {
                if let Some(existing_exit) = top.exit_time {
                    let next_boundary = ((self.current_time / 60) + 1) * 60;
                    let new_exit_time = next_boundary + 60;
                    if new_exit_time > existing_exit + PLACEMENT_EXIT_SLACK_S.get() {
                        return false;
                    }
                }
                if top_due < held_due {
                    return false;
                }
            }
        }
        true
    }

    pub fn total_containers(&self) -> usize {
        self.stacks.iter().map(|s| s.len()).sum()
    }

    pub fn unexited_containers(&self) -> usize {
        self.stacks
            .iter()
            .flat_map(|s| s.iter())
            .filter(|c| !c.has_exited())
            .count()
    }

    pub fn find_container(&self, id: &str) -> Option<(usize, usize)> {
        for (stack_idx, stack) in self.stacks.iter().enumerate() {
            if let Some(pos) = stack.iter().position(|c| c.id == id) {
                return Some((stack_idx, pos));
            }
        }
        None
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            crane_position: self.crane.position,
            held_id: self.crane.held.as_ref().map(|c| c.id.clone()),
            stacks: self
                .stacks
                .iter()
                .map(|stack| {
                    stack
                        .iter()
                        .filter(|c| !c.has_exited())
                        .map(|c| c.id.clone())
                        .collect()
                })
                .collect(),
        }
    }
}

/// Equality over every field including `current_time`; used only by tests
/// and never for search-level duplicate detection (use `fingerprint()` for
/// that).
impl PartialEq for YardState {
    fn eq(&self, other: &Self) -> bool {
        self.current_time == other.current_time
            && self.crane.position == other.crane.position
            && self.crane.held.as_ref().map(|c| &c.id) == other.crane.held.as_ref().map(|c| &c.id)
            && self.stacks.len() == other.stacks.len()
            && self.stacks.iter().zip(other.stacks.iter()).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| {
                        if !x.has_exited() || !y.has_exited() {
                            x.id == y.id && x.due_in == y.due_in
                        } else {
                            true
                        }
                    })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_state() -> YardState {
        let entry = vec![Container::new("A", 0, 100)];
        let buffer = vec![];
        let outgoing = vec![];
        YardState::new(vec![entry, buffer, outgoing], 2)
    }

    #[test]
    fn fresh_state_with_entry_container_is_not_goal() {
        let s = simple_state();
        assert!(!s.is_goal());
    }

    #[test]
    fn empty_stacks_except_outgoing_is_goal() {
        let s = YardState::new(vec![vec![], vec![], vec![]], 2);
        assert!(s.is_goal());
    }

    #[test]
    fn cannot_pick_up_from_outgoing() {
        let s = simple_state();
        let outgoing = s.outgoing_index();
        assert!(!s.can_pick_up_from(outgoing));
    }

    #[test]
    fn can_pick_up_from_nonempty_entry_with_empty_crane() {
        let s = simple_state();
        assert!(s.can_pick_up_from(0));
    }

    #[test]
    fn cannot_put_down_on_entry() {
        let mut s = simple_state();
        s.crane.held = Some(Container::new("B", 0, 0));
        assert!(!s.can_put_down_on(0));
    }

    #[test]
    fn cannot_put_down_without_holding() {
        let s = simple_state();
        assert!(!s.can_put_down_on(1));
    }

    #[test]
    fn buffer_full_refuses_placement() {
        let mut s = YardState::new(
            vec![
                vec![],
                vec![Container::new("X", 0, 0), Container::new("Y", 0, 0)],
                vec![],
            ],
            2,
        );
        s.crane.held = Some(Container::new("Z", 0, 0));
        assert!(!s.can_put_down_on(1));
    }

    #[test]
    fn fingerprint_excludes_exited_containers() {
        let mut s = simple_state();
        let mut exited = Container::new("B", 0, 10);
        exited.exit_time = Some(5);
        s.stacks[0].push(exited);
        let fp = s.fingerprint();
        assert_eq!(fp.stacks[0], vec!["A".to_string()]);
    }

    #[test]
    fn fingerprint_ignores_current_time() {
        let mut a = simple_state();
        let mut b = simple_state();
        b.current_time = 999;
        assert_eq!(a.fingerprint(), b.fingerprint());
        a.current_time = 0;
    }
}
