use crate::generator::Generator;
use crate::heuristic::Heuristic;
use crate::state::{Fingerprint, YardState};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Weight applied to elapsed time as a tie-breaker on top of accumulated
/// lateness when computing a node's cost-so-far.
pub const EPSILON: f64 = 1e-3;

/// A node in the search arena. Parent is an index into the same arena
/// rather than a shared pointer, so path reconstruction walks plain
/// indices instead of a reference-counted tree.
struct Node {
    state: YardState,
    g: f64,
    h: f64,
    parent: Option<usize>,
    last_action: String,
}

impl Node {
    fn f(&self) -> f64 {
        self.g + self.h
    }
}

struct QueueEntry {
    node_index: usize,
    f: f64,
    seq: u64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap; reverse the f-comparison (and the FIFO
// tie-break via seq) so the lowest f, earliest-generated entry pops first.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// One complete path from the initial state to a goal state.
pub struct Solution {
    pub path: Vec<YardState>,
    pub actions: Vec<String>,
    pub total_cost: f64,
    pub total_lateness: i64,
    pub nodes_expanded_when_found: usize,
    pub key_moves: Vec<String>,
}

#[derive(Default)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub nodes_generated: usize,
    pub duplicates_detected: usize,
    pub solutions_found: usize,
    pub search_elapsed: Duration,
}

/// Why the search loop stopped when it did not collect `max_solutions`
/// goals before the open set ran dry or the node budget ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// `max_solutions` goals were collected (or the initial state was
    /// already a goal).
    SolutionsCollected,
    /// `nodes_expanded` reached `max_nodes` before the open set emptied.
    NodesExhausted,
    /// The open set emptied with no goal ever reached.
    OpenSetEmpty,
}

pub struct SearchOutcome {
    pub found: bool,
    pub best: Option<Solution>,
    pub all_solutions: Vec<Solution>,
    pub stats: SearchStats,
    pub termination: TerminationReason,
}

pub struct Search {
    generator: Generator,
    heuristic: Heuristic,
    max_nodes: usize,
    max_solutions: usize,
}

impl Search {
    pub fn new(generator: Generator, heuristic: Heuristic, max_nodes: usize, max_solutions: usize) -> Self {
        Search {
            generator,
            heuristic,
            max_nodes,
            max_solutions,
        }
    }

    pub fn solve(&self, initial: YardState) -> SearchOutcome {
        let started = Instant::now();
        let mut stats = SearchStats::default();

        if initial.is_goal() {
            let sol = Solution {
                path: vec![initial],
                actions: vec![],
                total_cost: 0.0,
                total_lateness: 0,
                nodes_expanded_when_found: 0,
                key_moves: vec![],
            };
            stats.solutions_found = 1;
            stats.search_elapsed = started.elapsed();
            return SearchOutcome {
                found: true,
                best: Some(sol),
                all_solutions: vec![],
                stats,
                termination: TerminationReason::SolutionsCollected,
            };
        }

        let mut arena: Vec<Node> = Vec::new();
        let mut open: BinaryHeap<QueueEntry> = BinaryHeap::new();
        let mut closed: HashSet<Fingerprint> = HashSet::new();
        let mut best_g: HashMap<Fingerprint, f64> = HashMap::new();
        let mut seq: u64 = 0;
        let mut complete_solutions: Vec<Solution> = Vec::new();

        let g0 = initial.total_accumulated_lateness as f64;
        let h0 = self.heuristic.evaluate(&initial);
        let fp0 = initial.fingerprint();
        best_g.insert(fp0, g0);
        arena.push(Node {
            state: initial,
            g: g0,
            h: h0,
            parent: None,
            last_action: "Initial state".to_string(),
        });
        open.push(QueueEntry {
            node_index: 0,
            f: g0 + h0,
            seq,
        });
        seq += 1;
        stats.nodes_generated += 1;

        info!(max_nodes = self.max_nodes, max_solutions = self.max_solutions, "search started");

        let mut termination = TerminationReason::OpenSetEmpty;

        while let Some(entry) = open.pop() {
            if stats.nodes_expanded >= self.max_nodes {
                termination = TerminationReason::NodesExhausted;
                break;
            }

            let current_index = entry.node_index;
            if arena[current_index].state.is_goal() {
                let solution = self.build_solution(&arena, current_index, stats.nodes_expanded);
                stats.solutions_found += 1;
                complete_solutions.push(solution);
                if complete_solutions.len() >= self.max_solutions {
                    termination = TerminationReason::SolutionsCollected;
                    break;
                }
                continue;
            }

            let fp = arena[current_index].state.fingerprint();
            if closed.contains(&fp) {
                stats.duplicates_detected += 1;
                continue;
            }
            stats.nodes_expanded += 1;
            closed.insert(fp);

            let successors = self.generator.successors(&arena[current_index].state);
            for succ in successors {
                let g = succ.state.total_accumulated_lateness as f64
                    + EPSILON * succ.state.current_time as f64;
                let next_fp = succ.state.fingerprint();

                if let Some(&existing) = best_g.get(&next_fp) {
                    if existing <= g {
                        stats.duplicates_detected += 1;
                        continue;
                    }
                }
                best_g.insert(next_fp, g);

                let h = self.heuristic.evaluate(&succ.state);
                let f = g + h;

                let node_index = arena.len();
                arena.push(Node {
                    state: succ.state,
                    g,
                    h,
                    parent: Some(current_index),
                    last_action: succ.description,
                });
                open.push(QueueEntry { node_index, f, seq });
                seq += 1;
                stats.nodes_generated += 1;
            }
        }

        complete_solutions.sort_by(|a, b| {
            if (a.total_cost - b.total_cost).abs() < 0.01 {
                a.total_lateness.cmp(&b.total_lateness)
            } else {
                a.total_cost.partial_cmp(&b.total_cost).unwrap_or(Ordering::Equal)
            }
        });

        stats.search_elapsed = started.elapsed();
        debug!(
            expanded = stats.nodes_expanded,
            generated = stats.nodes_generated,
            duplicates = stats.duplicates_detected,
            solutions = complete_solutions.len(),
            elapsed_ms = stats.search_elapsed.as_millis(),
            ?termination,
            "search finished"
        );

        let found = !complete_solutions.is_empty();
        let best = complete_solutions.first().map(|s| Solution {
            path: s.path.clone(),
            actions: s.actions.clone(),
            total_cost: s.total_cost,
            total_lateness: s.total_lateness,
            nodes_expanded_when_found: s.nodes_expanded_when_found,
            key_moves: s.key_moves.clone(),
        });

        SearchOutcome {
            found,
            best,
            all_solutions: complete_solutions,
            stats,
            termination,
        }
    }

    fn build_solution(&self, arena: &[Node], goal_index: usize, nodes_expanded: usize) -> Solution {
        let mut path = Vec::new();
        let mut actions = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(i) = cursor {
            path.push(arena[i].state.clone());
            actions.push(arena[i].last_action.clone());
            cursor = arena[i].parent;
        }
        path.reverse();
        actions.reverse();

        let goal = &arena[goal_index];
        let key_moves = Self::key_moves(&actions);

        Solution {
            total_cost: goal.g,
            total_lateness: goal.state.total_accumulated_lateness,
            nodes_expanded_when_found: nodes_expanded,
            path,
            actions,
            key_moves,
        }
    }

    /// First 5 actions, then an ellipsis and the last 2, for long plans;
    /// the whole list otherwise.
    fn key_moves(actions: &[String]) -> Vec<String> {
        if actions.len() <= 7 {
            return actions.to_vec();
        }
        let mut out: Vec<String> = actions[..5].to_vec();
        out.push("...".to_string());
        out.extend(actions[actions.len() - 2..].iter().cloned());
        out
    }
}
