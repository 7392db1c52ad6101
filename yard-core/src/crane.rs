use crate::container::Container;
use serde::{Deserialize, Serialize};

/// The single crane operating over the yard's stacks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crane {
    pub position: usize,
    pub held: Option<Container>,
}

impl Crane {
    pub fn new(position: usize) -> Self {
        Crane {
            position,
            held: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_crane_is_empty() {
        let c = Crane::new(0);
        assert!(c.is_empty());
    }

    #[test]
    fn holding_container_is_not_empty() {
        let mut c = Crane::new(0);
        c.held = Some(Container::new("A", 0, 0));
        assert!(!c.is_empty());
    }
}
