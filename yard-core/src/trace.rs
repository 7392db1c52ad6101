use crate::search::{SearchStats, Solution, TerminationReason};
use std::io;
use std::path::Path;

/// Default filename the solver writes its winning action trace to, and the
/// executor reads back before re-encoding it into plan tokens.
pub const BEST_SOLUTION_MOVES_FILE: &str = "BestSolutionMoves.txt";

/// Default filename for the human-readable search transcript, the portable
/// substitute for the source's stdout-redirection-to-file verbose mode.
pub const A_STAR_PROCESS_FILE: &str = "AStarProcess.txt";

/// Persists a solved path's action descriptions, one per transition
/// (skipping the initial state, which has none), joined by `;;`.
pub fn write_actions(path: impl AsRef<Path>, actions: &[String]) -> io::Result<()> {
    std::fs::write(path, actions.join(";;"))
}

/// Writes a human-readable transcript of one `solve()` call: search stats,
/// termination reason and (if found) the winning solution's cost breakdown
/// and key moves. Written only by verbose CLI runs; the core planner never
/// touches the filesystem on its own.
pub fn write_process_log(
    path: impl AsRef<Path>,
    stats: &SearchStats,
    termination: TerminationReason,
    best: Option<&Solution>,
) -> io::Result<()> {
    let mut out = String::new();
    out.push_str("=== A* search process ===\n");
    out.push_str(&format!("nodes expanded:      {}\n", stats.nodes_expanded));
    out.push_str(&format!("nodes generated:     {}\n", stats.nodes_generated));
    out.push_str(&format!("duplicates detected: {}\n", stats.duplicates_detected));
    out.push_str(&format!("solutions found:     {}\n", stats.solutions_found));
    out.push_str(&format!("elapsed:             {:.3}s\n", stats.search_elapsed.as_secs_f64()));
    out.push_str(&format!("termination:         {termination:?}\n"));

    match best {
        Some(solution) => {
            out.push_str("\n=== best solution ===\n");
            out.push_str(&format!("total cost:     {:.3}\n", solution.total_cost));
            out.push_str(&format!("total lateness: {}s\n", solution.total_lateness));
            out.push_str(&format!(
                "nodes expanded when found: {}\n",
                solution.nodes_expanded_when_found
            ));
            out.push_str("key moves:\n");
            for mv in &solution.key_moves {
                out.push_str(&format!("  - {mv}\n"));
            }
        }
        None => out.push_str("\nno solution found\n"),
    }

    std::fs::write(path, out)
}

/// Reads back a `;;`-joined action trace, dropping empty segments.
pub fn read_actions(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .split(";;")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_action_trace() {
        let dir = std::env::temp_dir().join(format!("yard-core-trace-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("moves.txt");

        let actions = vec![
            "Picked up A from stack 1".to_string(),
            "Put down A on stack 2".to_string(),
        ];
        write_actions(&path, &actions).unwrap();
        let read_back = read_actions(&path).unwrap();
        assert_eq!(read_back, actions);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_trace_round_trips_to_empty_vec() {
        let dir = std::env::temp_dir().join(format!("yard-core-trace-test-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("moves.txt");

        write_actions(&path, &[]).unwrap();
        let read_back = read_actions(&path).unwrap();
        assert!(read_back.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn process_log_mentions_termination_and_cost() {
        let dir = std::env::temp_dir().join(format!("yard-core-trace-test-process-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("AStarProcess.txt");

        let stats = SearchStats {
            nodes_expanded: 12,
            nodes_generated: 30,
            duplicates_detected: 4,
            solutions_found: 1,
            search_elapsed: std::time::Duration::from_millis(250),
        };
        let solution = Solution {
            path: vec![],
            actions: vec![],
            total_cost: 42.5,
            total_lateness: 10,
            nodes_expanded_when_found: 12,
            key_moves: vec!["Picked up A from stack 0".to_string()],
        };
        write_process_log(&path, &stats, TerminationReason::SolutionsCollected, Some(&solution)).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("nodes expanded:      12"));
        assert!(contents.contains("SolutionsCollected"));
        assert!(contents.contains("total cost:     42.500"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
