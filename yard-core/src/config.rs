use crate::container::Container;
use crate::error::ConfigError;
use crate::generator::TimingConstants;
use crate::state::YardState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A due-in value expressed the way the original paperwork does: minutes
/// and seconds, rather than a single integer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TimeSpec {
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub seconds: i64,
}

impl TimeSpec {
    pub fn total_seconds(&self) -> i64 {
        self.minutes * 60 + self.seconds
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContainerSeed {
    pub id: String,
    #[serde(default)]
    pub arrival_time: i64,
    pub due_in: TimeSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StackSeed {
    pub name: String,
    #[serde(default)]
    pub containers: Vec<ContainerSeed>,
}

/// The on-disk description of a yard: its stacks, buffer capacity and the
/// crane's timing constants, parsed with `serde` from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct YardConfig {
    pub buffer_capacity: usize,
    pub crane_move: TimeSpec,
    pub crane_lower: TimeSpec,
    pub crane_lift: TimeSpec,
    pub clearing_time: TimeSpec,
    pub stacks: Vec<StackSeed>,
}

impl YardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: YardConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.stacks.is_empty() {
            return Err(ConfigError::NoStacks);
        }
        if self.stacks.len() < 3 {
            return Err(ConfigError::NoBuffers);
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::InvalidBufferCapacity(0));
        }
        let mut seen = HashSet::new();
        for stack in &self.stacks {
            for container in &stack.containers {
                if !seen.insert(container.id.clone()) {
                    return Err(ConfigError::DuplicateContainerId(container.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn timing(&self) -> TimingConstants {
        TimingConstants {
            t_move: self.crane_move.total_seconds(),
            t_lower: self.crane_lower.total_seconds(),
            t_lift: self.crane_lift.total_seconds(),
            t_clear: self.clearing_time.total_seconds(),
        }
    }

    /// Builds the initial `YardState` this configuration describes, with
    /// the clock at zero and an empty crane parked at the entry stack.
    pub fn to_yard_state(&self) -> YardState {
        let stacks = self
            .stacks
            .iter()
            .map(|stack| {
                stack
                    .containers
                    .iter()
                    .map(|seed| Container::new(seed.id.clone(), seed.arrival_time, seed.due_in.total_seconds()))
                    .collect()
            })
            .collect();
        YardState::new(stacks, self.buffer_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> &'static str {
        r#"
            buffer_capacity = 3

            [crane_move]
            seconds = 10

            [crane_lower]
            seconds = 5

            [crane_lift]
            seconds = 5

            [clearing_time]
            minutes = 1

            [[stacks]]
            name = "entry"

            [[stacks.containers]]
            id = "A"
            due_in = { minutes = 5 }

            [[stacks]]
            name = "buffer-1"

            [[stacks]]
            name = "outgoing"
        "#
    }

    #[test]
    fn parses_a_minimal_config() {
        let cfg = YardConfig::from_toml_str(sample()).unwrap();
        assert_eq!(cfg.stacks.len(), 3);
        assert_eq!(cfg.buffer_capacity, 3);
        assert_eq!(cfg.timing().t_move, 10);
    }

    #[test]
    fn rejects_config_with_no_buffer_stacks() {
        let toml = r#"
            buffer_capacity = 2
            [crane_move]
            seconds = 1
            [crane_lower]
            seconds = 1
            [crane_lift]
            seconds = 1
            [clearing_time]
            seconds = 1
            [[stacks]]
            name = "entry"
            [[stacks]]
            name = "outgoing"
        "#;
        let err = YardConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::NoBuffers));
    }

    #[test]
    fn rejects_duplicate_container_ids() {
        let toml = r#"
            buffer_capacity = 2
            [crane_move]
            seconds = 1
            [crane_lower]
            seconds = 1
            [crane_lift]
            seconds = 1
            [clearing_time]
            seconds = 1
            [[stacks]]
            name = "entry"
            [[stacks.containers]]
            id = "A"
            due_in = { seconds = 1 }
            [[stacks.containers]]
            id = "A"
            due_in = { seconds = 2 }
            [[stacks]]
            name = "buffer-1"
            [[stacks]]
            name = "outgoing"
        "#;
        let err = YardConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateContainerId(_)));
    }

    #[test]
    fn builds_yard_state_from_config() {
        let cfg = YardConfig::from_toml_str(sample()).unwrap();
        let state = cfg.to_yard_state();
        assert_eq!(state.stacks.len(), 3);
        assert_eq!(state.stacks[0].len(), 1);
        assert_eq!(state.stacks[0][0].id, "A");
    }
}
