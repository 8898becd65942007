//! # Craftplan Planner
//!
//! Best-first search engine for crafting domains.
//!
//! - [`RuleSet`] - Recipes compiled into predicate/effect pairs
//! - [`GoalPredicate`] - Minimum quantities a goal state must hold
//! - [`Heuristic`] - Pluggable search guidance
//! - [`search()`] - Time-bounded best-first search
//! - [`Planner`] - Convenience facade tying the above together

pub mod arena;
pub mod goal;
pub mod heuristic;
pub mod planner;
pub mod rules;
pub mod search;

pub use arena::{StateArena, StateId};
pub use goal::GoalPredicate;
pub use heuristic::{ActionCostHeuristic, Heuristic, PenaltyConfig, PenaltyHeuristic, ZeroHeuristic};
pub use planner::{Planner, SearchConfig};
pub use rules::{CompiledRecipe, RuleSet, Successor, SuccessorGenerator, Successors};
pub use search::{
    search, FailureKind, Plan, PlanStep, SearchOutcome, SearchReport, SearchStats, START_ACTION,
};
