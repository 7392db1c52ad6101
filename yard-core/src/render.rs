use crate::state::YardState;
use std::fmt;

/// Box-drawing console rendering of a `YardState`, grounded on the
/// original's `printState`.
pub struct Render<'a>(pub &'a YardState);

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        writeln!(f, "State at time: {} seconds", state.current_time)?;
        writeln!(f, "Accumulated lateness: {} sec", state.total_accumulated_lateness)?;
        match &state.crane.held {
            Some(c) => writeln!(f, "Crane at stack {} holding {}", state.crane.position, c.id)?,
            None => writeln!(f, "Crane at stack {} (empty)", state.crane.position)?,
        }

        let outgoing = state.outgoing_index();
        for (i, stack) in state.stacks.iter().enumerate() {
            let role = if i == 0 {
                "Entry"
            } else if i == outgoing {
                "Outgoing"
            } else {
                "Buffer"
            };
            write!(f, "Stack {i} ({role}): ")?;
            if stack.is_empty() {
                writeln!(f, "(empty)")?;
                continue;
            }
            let entries: Vec<String> = stack
                .iter()
                .map(|c| {
                    let mut s = format!("{}(due:{})", c.id, c.due_time());
                    if c.due_time() < state.current_time {
                        s.push_str(&format!("[LATE by {}s]", state.current_time - c.due_time()));
                    }
                    if let Some(exit) = c.exit_time {
                        s.push_str(&format!("[exit:{exit}s]"));
                    }
                    s
                })
                .collect();
            writeln!(f, "{}", entries.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;

    #[test]
    fn renders_empty_yard() {
        let s = YardState::new(vec![vec![], vec![], vec![]], 2);
        let text = Render(&s).to_string();
        assert!(text.contains("Entry"));
        assert!(text.contains("Outgoing"));
        assert!(text.contains("(empty)"));
    }

    #[test]
    fn renders_late_marker() {
        let mut s = YardState::new(vec![vec![Container::new("A", 0, 1)], vec![], vec![]], 2);
        s.current_time = 100;
        let text = Render(&s).to_string();
        assert!(text.contains("LATE"));
    }
}
