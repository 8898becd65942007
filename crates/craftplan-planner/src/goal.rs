//! Goal predicate.

use craftplan_core::{Domain, State};
use serde::Serialize;

/// Minimum item quantities a goal state must hold.
///
/// Goals are monotonic: if a state satisfies the goal, so does every state
/// that holds at least as much of every item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoalPredicate {
    thresholds: Vec<(String, u64)>,
}

impl GoalPredicate {
    /// Compile a goal from `(item, minimum)` pairs. Zero minimums are dropped.
    pub fn new<I, K>(goal: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let thresholds = goal
            .into_iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(item, amount)| (item.into(), amount))
            .collect();
        Self { thresholds }
    }

    /// Compile the goal of a domain.
    pub fn from_domain(domain: &Domain) -> Self {
        Self::new(domain.goal.iter().map(|(item, amount)| (item.as_str(), amount.get())))
    }

    /// True iff the state holds at least the required amount of every item.
    pub fn is_goal(&self, state: &State) -> bool {
        self.thresholds
            .iter()
            .all(|(item, amount)| state.get(item) >= *amount)
    }

    /// Total number of units still missing from `state`.
    pub fn shortfall(&self, state: &State) -> u64 {
        self.thresholds
            .iter()
            .map(|(item, amount)| amount.saturating_sub(state.get(item)))
            .sum()
    }

    /// Goal items and their minimum quantities.
    pub fn thresholds(&self) -> &[(String, u64)] {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_thresholds() {
        let goal = GoalPredicate::new([("plank", 1), ("bench", 1)]);
        assert!(!goal.is_goal(&State::from_pairs([("plank", 4)])));
        assert!(goal.is_goal(&State::from_pairs([("plank", 4), ("bench", 1)])));
        assert_eq!(goal.shortfall(&State::from_pairs([("plank", 4)])), 1);
    }

    #[test]
    fn test_empty_goal_always_holds() {
        let goal = GoalPredicate::new(Vec::<(String, u64)>::new());
        assert!(goal.is_goal(&State::new()));
    }

    #[test]
    fn test_from_domain() {
        let domain = Domain::from_json_str(r#"{"Items": ["rail"], "Goal": {"rail": 20}}"#).unwrap();
        let goal = GoalPredicate::from_domain(&domain);
        assert_eq!(goal.thresholds(), &[("rail".to_string(), 20)]);
        assert_eq!(goal.shortfall(&State::from_pairs([("rail", 5)])), 15);
    }
}
