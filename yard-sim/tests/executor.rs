use std::time::Duration;
use yard_core::container::Container;
use yard_core::generator::TimingConstants;
use yard_core::state::YardState;
use yard_sim::entry_feeder::ArrivalProfile;
use yard_sim::Executor;

fn fast_timing() -> TimingConstants {
    TimingConstants {
        t_move: 1,
        t_lower: 1,
        t_lift: 1,
        t_clear: 1,
    }
}

#[test]
fn executor_drains_a_single_container_to_outgoing_and_stops() {
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![]],
        2,
    );
    let handle = Executor::new(initial, fast_timing())
        .with_max_nodes(10_000)
        .with_time_scale(0.01)
        .with_arrival_profile(ArrivalProfile {
            tick: Duration::from_millis(5),
            arrival_chance: 0.0,
            min_due_in: 60,
            max_due_in: 60,
        })
        .with_seed(1)
        .run();

    std::thread::sleep(Duration::from_millis(500));
    handle.stop();
    handle.join().expect("executor threads should not panic");
}

#[test]
fn executor_replans_when_new_containers_keep_arriving() {
    let initial = YardState::new(
        vec![vec![Container::new("A", 0, 10_000)], vec![], vec![]],
        2,
    );
    let handle = Executor::new(initial, fast_timing())
        .with_max_nodes(10_000)
        .with_time_scale(0.01)
        .with_arrival_profile(ArrivalProfile {
            tick: Duration::from_millis(5),
            arrival_chance: 1.0,
            min_due_in: 600,
            max_due_in: 2_000,
        })
        .with_seed(7)
        .run();

    // Arrivals keep raising needs_recalc while the crane is draining the
    // plan; the runner must keep pausing, replanning and resuming without
    // deadlocking or panicking.
    std::thread::sleep(Duration::from_millis(300));
    handle.stop();
    handle.join().expect("executor threads should not panic");
}
