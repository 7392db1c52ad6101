use yard_core::container::Container;
use yard_core::encode::{encode_actions, PlanToken};
use yard_core::generator::{Generator, TimingConstants};
use yard_core::heuristic::Heuristic;
use yard_core::search::Search;
use yard_core::state::YardState;

fn timing() -> TimingConstants {
    TimingConstants {
        t_move: 10,
        t_lower: 5,
        t_lift: 5,
        t_clear: 30,
    }
}

fn search(max_nodes: usize) -> Search {
    Search::new(Generator::new(timing()), Heuristic::new(timing()), max_nodes, 3)
}

#[test]
fn trivial_pass_through_moves_a_single_container_to_outgoing() {
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![]],
        2,
    );
    let outcome = search(10_000).solve(initial);
    assert!(outcome.found);
    let best = outcome.best.unwrap();
    assert!(best.path.last().unwrap().is_goal());
    assert!(best
        .actions
        .iter()
        .any(|a| a.contains("Put down A on stack 2")));
}

#[test]
fn forced_wait_lets_a_committed_outgoing_departure_clear() {
    // A container already departing soon occupies the outgoing stack; the
    // planner must wait for it to clear before another can be placed there.
    let mut departing = Container::new("X", 0, 0);
    departing.exit_time = Some(5);
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![departing]],
        2,
    );
    let outcome = search(50_000).solve(initial);
    assert!(outcome.found);
    let best = outcome.best.unwrap();
    assert!(best.path.last().unwrap().is_goal());
}

#[test]
fn unburying_moves_the_buried_container_out_of_the_way_first() {
    let bottom = Container::new("bottom", 0, 10_000);
    let top = Container::new("top", 0, 10_000);
    let initial = YardState::new(vec![vec![], vec![bottom, top], vec![]], 2);
    let outcome = search(50_000).solve(initial);
    assert!(outcome.found);
    let best = outcome.best.unwrap();
    assert!(best.path.last().unwrap().is_goal());
    // both containers must eventually be picked up
    let pickups: Vec<&String> = best
        .actions
        .iter()
        .filter(|a| a.starts_with("Picked up"))
        .collect();
    assert!(pickups.iter().any(|a| a.contains("bottom")));
    assert!(pickups.iter().any(|a| a.contains("top")));
}

#[test]
fn deadline_race_prioritizes_the_container_due_sooner() {
    let urgent = Container::new("urgent", 0, 50);
    let relaxed = Container::new("relaxed", 0, 100_000);
    let initial = YardState::new(vec![vec![relaxed, urgent], vec![], vec![]], 2);
    let outcome = search(100_000).solve(initial);
    assert!(outcome.found);
    let best = outcome.best.unwrap();
    // urgent sits on top, so it is naturally reachable first; the solver
    // should not introduce wasted unburying moves for it.
    let first_pickup = best
        .actions
        .iter()
        .find(|a| a.starts_with("Picked up"))
        .unwrap();
    assert!(first_pickup.contains("urgent"));
}

#[test]
fn duplicate_states_are_not_expanded_twice() {
    // A container already departing soon occupies the outgoing stack, so
    // the wait policy considers waiting for it to clear at more than one
    // expanded node. A wait transition never changes the crane position,
    // held container or stack contents, only the clock, so its successor
    // always shares its parent's fingerprint with a strictly worse `g`
    // (current_time only ever grows) — that successor is a guaranteed
    // duplicate of an already-visited state, not just a plausible one.
    let mut departing = Container::new("X", 0, 0);
    departing.exit_time = Some(5);
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![departing]],
        2,
    );
    let outcome = search(50_000).solve(initial);
    assert!(outcome.found);
    assert!(outcome.stats.duplicates_detected > 0);
}

#[test]
fn zero_max_nodes_reports_failure_without_expanding() {
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![]],
        2,
    );
    let outcome = search(0).solve(initial);
    assert!(!outcome.found);
    assert_eq!(outcome.stats.nodes_expanded, 0);
}

#[test]
fn encoded_plan_replays_as_move_and_wait_tokens() {
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![]],
        2,
    );
    let outcome = search(10_000).solve(initial);
    let best = outcome.best.unwrap();
    let tokens = encode_actions(&best.actions);
    assert!(tokens.iter().any(|t| matches!(t, PlanToken::Move { .. })));
}
