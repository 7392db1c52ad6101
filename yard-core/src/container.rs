use serde::{Deserialize, Serialize};

/// A single container moving through the yard.
///
/// `exit_time` is `None` until the container is placed on the outgoing
/// stack and committed to a departure time; see `YardState::can_put_down`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub arrival_time: i64,
    pub due_in: i64,
    pub exit_time: Option<i64>,
}

impl Container {
    pub fn new(id: impl Into<String>, arrival_time: i64, due_in: i64) -> Self {
        Container {
            id: id.into(),
            arrival_time,
            due_in,
            exit_time: None,
        }
    }

    /// Absolute deadline: the instant by which the container should have exited.
    pub fn due_time(&self) -> i64 {
        self.arrival_time + self.due_in
    }

    /// Lateness if exited at `exit_time`, zero if not yet exited or on time.
    pub fn lateness(&self) -> i64 {
        match self.exit_time {
            Some(t) => (t - self.due_time()).max(0),
            None => 0,
        }
    }

    pub fn has_exited(&self) -> bool {
        self.exit_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_time_is_arrival_plus_due_in() {
        let c = Container::new("A", 100, 50);
        assert_eq!(c.due_time(), 150);
    }

    #[test]
    fn lateness_is_zero_before_exit() {
        let c = Container::new("A", 0, 100);
        assert_eq!(c.lateness(), 0);
    }

    #[test]
    fn lateness_is_zero_when_on_time_or_early() {
        let mut c = Container::new("A", 0, 100);
        c.exit_time = Some(90);
        assert_eq!(c.lateness(), 0);
        c.exit_time = Some(100);
        assert_eq!(c.lateness(), 0);
    }

    #[test]
    fn lateness_is_positive_when_late() {
        let mut c = Container::new("A", 0, 100);
        c.exit_time = Some(130);
        assert_eq!(c.lateness(), 30);
    }
}
