//! Planner facade and configuration.

use std::time::Duration;

use craftplan_core::{Result, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::goal::GoalPredicate;
use crate::heuristic::Heuristic;
use crate::rules::RuleSet;
use crate::search::{search, Plan, SearchReport};

/// Configuration for the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum planning time, kept at full `Duration` precision.
    #[serde(rename = "time_limit_secs", with = "secs")]
    time_limit: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    /// Set the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

/// `Duration` as fractional seconds.
mod secs {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

/// Plans over a borrowed rule set towards a fixed goal.
///
/// The rule set is never copied, so one set can back any number of planners
/// and runs.
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    rules: &'a RuleSet,
    goal: GoalPredicate,
    config: SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a planner with the default configuration.
    pub fn new(rules: &'a RuleSet, goal: GoalPredicate) -> Self {
        Self::with_config(rules, goal, SearchConfig::default())
    }

    /// Create a planner with a custom configuration.
    pub fn with_config(rules: &'a RuleSet, goal: GoalPredicate, config: SearchConfig) -> Self {
        Self { rules, goal, config }
    }

    /// Search for a plan from `start`.
    pub fn plan<H>(&self, start: State, heuristic: &H) -> SearchReport
    where
        H: Heuristic + ?Sized,
    {
        search(
            self.rules,
            start,
            |state| self.goal.is_goal(state),
            self.config.time_limit(),
            heuristic,
        )
    }

    /// Check that `plan` is executable from `start`, ends in the state it
    /// claims and satisfies the goal. Unknown or inapplicable steps are
    /// reported as errors.
    pub fn validate_plan(&self, start: &State, plan: &Plan) -> Result<bool> {
        let end = self.rules.replay(start, plan.actions())?;

        let expected = plan.final_state().unwrap_or(start);
        if &end != expected {
            debug!(replayed = %end, claimed = %expected, "Plan does not end where it claims");
            return Ok(false);
        }

        let cost: f64 = plan
            .actions()
            .filter_map(|action| self.rules.cost_of(action))
            .sum();
        if (cost - plan.total_cost).abs() > 1e-9 {
            debug!(replayed = cost, claimed = plan.total_cost, "Plan cost mismatch");
            return Ok(false);
        }

        Ok(self.goal.is_goal(&end))
    }
}
