//! Time-bounded best-first search.
//!
//! The frontier is ordered by accumulated cost plus heuristic estimate.
//! Ties are broken by push order, so two runs over the same domain explore
//! states in exactly the same order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use craftplan_core::State;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::arena::{StateArena, StateId};
use crate::heuristic::Heuristic;
use crate::rules::SuccessorGenerator;

/// Why a search ended without a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The time budget ran out with states still on the frontier.
    Timeout,
    /// Every reachable state was expanded; the goal is unreachable.
    FrontierExhausted,
}

/// One plan step: the action taken and the state it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStep {
    pub state: State,
    pub action: Arc<str>,
}

/// Sequence of actions from the start state to a goal state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    pub total_cost: f64,
}

impl Plan {
    /// Number of actions in the plan.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// State reached by the last action, if the plan has any.
    pub fn final_state(&self) -> Option<&State> {
        self.steps.last().map(|step| &step.state)
    }

    /// Action names in order.
    pub fn actions(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|step| &*step.action)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Terminal state of a search run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(Plan),
    Failed(FailureKind),
}

/// Diagnostics gathered during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Wall-clock time spent searching.
    #[serde(rename = "elapsed_secs", serialize_with = "duration_secs")]
    pub elapsed: Duration,
    /// Entries left on the frontier when the search stopped.
    pub frontier_len: usize,
    /// Distinct states generated.
    pub states_visited: usize,
    /// States popped and expanded.
    pub expansions: usize,
}

fn duration_secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}

/// Outcome of a search together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SearchReport {
    /// The plan, if one was found.
    pub fn plan(&self) -> Option<&Plan> {
        match &self.outcome {
            SearchOutcome::Found(plan) => Some(plan),
            SearchOutcome::Failed(_) => None,
        }
    }

    /// The failure kind, if no plan was found.
    pub fn failure(&self) -> Option<FailureKind> {
        match self.outcome {
            SearchOutcome::Found(_) => None,
            SearchOutcome::Failed(kind) => Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Found(_))
    }
}

/// Frontier entry.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    priority: f64,
    /// Push order; breaks ties between equal priorities.
    seq: u64,
    state: StateId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and we pop the smallest
        // (priority, seq) first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Label of the pseudo-action that produces the start state.
pub const START_ACTION: &str = "start";

/// Run a best-first search from `start` until `is_goal` holds, the frontier
/// empties, or `time_limit` elapses.
///
/// The clock is checked once per frontier pop, so a run may overshoot the
/// limit by one expansion. Memory grows with the number of distinct states
/// generated and is not bounded.
pub fn search<S, G, H>(
    generator: &S,
    start: State,
    is_goal: G,
    time_limit: Duration,
    heuristic: &H,
) -> SearchReport
where
    S: SuccessorGenerator + ?Sized,
    G: Fn(&State) -> bool,
    H: Heuristic + ?Sized,
{
    let started = Instant::now();
    info!(
        time_limit_ms = time_limit.as_millis() as u64,
        start = %start,
        "Starting best-first search"
    );

    let mut arena = StateArena::new();
    let mut best_cost: Vec<f64> = Vec::new();
    let mut predecessor: Vec<Option<(StateId, Arc<str>)>> = Vec::new();
    let mut frontier = BinaryHeap::new();
    let mut seq = 0u64;
    let mut expansions = 0usize;

    let (start_id, _) = arena.intern(start);
    best_cost.push(0.0);
    predecessor.push(None);
    frontier.push(FrontierEntry {
        priority: 0.0,
        seq,
        state: start_id,
    });
    seq += 1;

    let failure = loop {
        if frontier.is_empty() {
            break FailureKind::FrontierExhausted;
        }
        if started.elapsed() >= time_limit {
            break FailureKind::Timeout;
        }
        let Some(entry) = frontier.pop() else {
            break FailureKind::FrontierExhausted;
        };

        let current = arena.share(entry.state);
        if is_goal(&*current) {
            let steps = reconstruct(&arena, &predecessor, entry.state);
            let plan = Plan {
                total_cost: best_cost[entry.state.index()],
                steps,
            };
            let stats = SearchStats {
                elapsed: started.elapsed(),
                frontier_len: frontier.len(),
                states_visited: arena.len(),
                expansions,
            };
            info!(
                steps = plan.step_count(),
                cost = plan.total_cost,
                states = stats.states_visited,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "Search found a plan"
            );
            return SearchReport {
                outcome: SearchOutcome::Found(plan),
                stats,
            };
        }

        expansions += 1;
        let current_cost = best_cost[entry.state.index()];

        for successor in generator.successors(&*current) {
            let candidate = current_cost + successor.cost;
            let (next, fresh) = arena.intern(successor.state);

            if fresh {
                best_cost.push(candidate);
                predecessor.push(Some((entry.state, Arc::clone(&successor.action))));
            } else if candidate < best_cost[next.index()] {
                best_cost[next.index()] = candidate;
                predecessor[next.index()] = Some((entry.state, Arc::clone(&successor.action)));
            } else {
                continue;
            }

            let priority = candidate + heuristic.estimate(arena.get(next), &successor.action);
            frontier.push(FrontierEntry {
                priority,
                seq,
                state: next,
            });
            seq += 1;
        }
    };

    let stats = SearchStats {
        elapsed: started.elapsed(),
        frontier_len: frontier.len(),
        states_visited: arena.len(),
        expansions,
    };
    warn!(
        reason = ?failure,
        states = stats.states_visited,
        frontier = stats.frontier_len,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Search failed to find a plan"
    );
    SearchReport {
        outcome: SearchOutcome::Failed(failure),
        stats,
    }
}

/// Walk predecessor links from `goal` back to the start and return the
/// steps in start-to-goal order.
fn reconstruct(
    arena: &StateArena,
    predecessor: &[Option<(StateId, Arc<str>)>],
    goal: StateId,
) -> Vec<PlanStep> {
    let mut steps = Vec::new();
    let mut cursor = goal;
    while let Some((prior, action)) = &predecessor[cursor.index()] {
        steps.push(PlanStep {
            state: arena.get(cursor).clone(),
            action: Arc::clone(action),
        });
        cursor = *prior;
    }
    steps.reverse();
    steps
}
