//! Heuristic strategies that bias the search order.
//!
//! The search only sees the [`Heuristic`] trait. Domain knowledge such as
//! "never carry two axes" lives in configuration ([`PenaltyConfig`]), not in
//! the search loop. None of the provided strategies are admissible in
//! general.

use craftplan_core::State;
use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;

/// Estimates the remaining cost from a freshly generated state.
pub trait Heuristic {
    /// Non-negative estimate for `state`, reached by applying `last_action`.
    fn estimate(&self, state: &State, last_action: &str) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(&State, &str) -> f64,
{
    fn estimate(&self, state: &State, last_action: &str) -> f64 {
        self(state, last_action)
    }
}

/// Always zero; turns the search into uniform-cost search.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _state: &State, _last_action: &str) -> f64 {
        0.0
    }
}

/// Returns the cost of the recipe that produced the state, or zero for
/// labels that are not recipes.
#[derive(Debug, Clone, Copy)]
pub struct ActionCostHeuristic<'a> {
    rules: &'a RuleSet,
}

impl<'a> ActionCostHeuristic<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }
}

impl Heuristic for ActionCostHeuristic<'_> {
    fn estimate(&self, _state: &State, last_action: &str) -> f64 {
        self.rules.cost_of(last_action).unwrap_or(0.0)
    }
}

/// Item rules for [`PenaltyHeuristic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Estimate returned when any rule fires.
    pub penalty: f64,

    /// Any item whose name ends with one of these suffixes may be held at
    /// most once.
    pub tool_suffixes: Vec<String>,

    /// Items that may be held at most once.
    pub singletons: Vec<String>,

    /// Items that are never worth holding.
    pub useless: Vec<String>,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            penalty: 999.0,
            tool_suffixes: vec!["axe".to_string()],
            singletons: vec!["bench".to_string(), "cart".to_string(), "furnace".to_string()],
            useless: vec!["iron_axe".to_string()],
        }
    }
}

impl PenaltyConfig {
    /// True if `state` breaks any of the configured rules.
    pub fn is_penalized(&self, state: &State) -> bool {
        state.iter().any(|(item, quantity)| {
            let duplicate = quantity > 1
                && (self.singletons.iter().any(|s| s == item)
                    || self.tool_suffixes.iter().any(|s| item.ends_with(s.as_str())));
            duplicate || self.useless.iter().any(|u| u == item)
        })
    }
}

/// Penalises redundant tools and useless items, otherwise falls back to
/// [`ActionCostHeuristic`].
#[derive(Debug, Clone)]
pub struct PenaltyHeuristic<'a> {
    config: PenaltyConfig,
    fallback: ActionCostHeuristic<'a>,
}

impl<'a> PenaltyHeuristic<'a> {
    pub fn new(rules: &'a RuleSet, config: PenaltyConfig) -> Self {
        Self {
            config,
            fallback: ActionCostHeuristic::new(rules),
        }
    }
}

impl Heuristic for PenaltyHeuristic<'_> {
    fn estimate(&self, state: &State, last_action: &str) -> f64 {
        if self.config.is_penalized(state) {
            self.config.penalty
        } else {
            self.fallback.estimate(state, last_action)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::RecipeSpec;

    fn rules() -> RuleSet {
        let axe = RecipeSpec::new(2.0).consumes("plank", 3).produces("wooden_axe", 1);
        RuleSet::compile([("craft wooden_axe", &axe)]).unwrap()
    }

    #[test]
    fn test_action_cost_fallback() {
        let rules = rules();
        let h = ActionCostHeuristic::new(&rules);
        assert_eq!(h.estimate(&State::new(), "craft wooden_axe"), 2.0);
        assert_eq!(h.estimate(&State::new(), "start"), 0.0);
    }

    #[test]
    fn test_duplicate_tool_is_penalized() {
        let rules = rules();
        let h = PenaltyHeuristic::new(&rules, PenaltyConfig::default());
        let one = State::from_pairs([("wooden_axe", 1), ("plank", 2)]);
        let two = State::from_pairs([("wooden_axe", 2), ("plank", 2)]);

        assert_eq!(h.estimate(&one, "craft wooden_axe"), 2.0);
        assert_eq!(h.estimate(&two, "craft wooden_axe"), 999.0);
    }

    #[test]
    fn test_singletons_and_useless_items() {
        let config = PenaltyConfig::default();
        assert!(!config.is_penalized(&State::from_pairs([("bench", 1)])));
        assert!(config.is_penalized(&State::from_pairs([("bench", 2)])));
        assert!(config.is_penalized(&State::from_pairs([("iron_axe", 1)])));
        assert!(!config.is_penalized(&State::from_pairs([("plank", 40)])));
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: PenaltyConfig =
            serde_json::from_str(r#"{"penalty": 50, "useless": []}"#).unwrap();
        assert_eq!(config.penalty, 50.0);
        assert!(config.useless.is_empty());
        assert_eq!(config.tool_suffixes, ["axe"]);
    }

    #[test]
    fn test_closures_are_heuristics() {
        let h = |state: &State, _: &str| state.get("coal") as f64;
        assert_eq!(h.estimate(&State::from_pairs([("coal", 3)]), "mine"), 3.0);
        assert_eq!(ZeroHeuristic.estimate(&State::new(), "mine"), 0.0);
    }
}
