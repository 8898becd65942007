//! Loads a domain and runs the planner over it.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use craftplan_core::Domain;
use craftplan_planner::{
    ActionCostHeuristic, GoalPredicate, PenaltyConfig, PenaltyHeuristic, Planner, RuleSet,
    SearchConfig, SearchReport, ZeroHeuristic,
};
use tracing::info;

use crate::HeuristicKind;

/// A loaded domain with its compiled rules and search settings.
pub struct Engine {
    domain: Domain,
    rules: RuleSet,
    config: SearchConfig,
    penalty: PenaltyConfig,
}

impl Engine {
    /// Read and compile the domain at `path`.
    pub fn load(path: &Path, time_limit_secs: f64, penalty_path: Option<&Path>) -> anyhow::Result<Self> {
        let limit = Duration::try_from_secs_f64(time_limit_secs)
            .with_context(|| format!("invalid time limit: {time_limit_secs}"))?;

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read domain {}", path.display()))?;
        let domain = Domain::from_json_str(&text)
            .with_context(|| format!("failed to parse domain {}", path.display()))?;
        let rules = RuleSet::compile(&domain.recipes)
            .with_context(|| format!("failed to compile recipes in {}", path.display()))?;

        let penalty = match penalty_path {
            Some(p) => {
                let text = fs::read_to_string(p)
                    .with_context(|| format!("failed to read penalty config {}", p.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse penalty config {}", p.display()))?
            }
            None => PenaltyConfig::default(),
        };

        info!(
            items = domain.items.len(),
            recipes = rules.len(),
            "Loaded domain from {}",
            path.display()
        );

        Ok(Self {
            domain,
            rules,
            config: SearchConfig::default().with_time_limit(limit),
            penalty,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Plan from the domain's initial inventory to its goal.
    pub fn run(&self, heuristic: HeuristicKind) -> SearchReport {
        let planner = Planner::with_config(
            &self.rules,
            GoalPredicate::from_domain(&self.domain),
            self.config.clone(),
        );
        let start = self.domain.initial_state();

        match heuristic {
            HeuristicKind::Penalty => {
                planner.plan(start, &PenaltyHeuristic::new(&self.rules, self.penalty.clone()))
            }
            HeuristicKind::ActionCost => planner.plan(start, &ActionCostHeuristic::new(&self.rules)),
            HeuristicKind::Zero => planner.plan(start, &ZeroHeuristic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_planner::FailureKind;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn demo_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/crafting.json")
    }

    #[test]
    fn test_load_demo() {
        let engine = Engine::load(&demo_path(), 5.0, None).unwrap();
        assert_eq!(engine.rules.len(), 25);
        assert_eq!(engine.config.time_limit(), Duration::from_secs(5));
        assert_eq!(engine.penalty, PenaltyConfig::default());
        assert_eq!(engine.domain().goal.len(), 1);
    }

    #[test]
    fn test_rejects_negative_time_limit() {
        let err = Engine::load(&demo_path(), -1.0, None).err().unwrap();
        assert!(err.to_string().contains("invalid time limit"));
    }

    #[test]
    fn test_missing_domain_file() {
        let err = Engine::load(Path::new("does/not/exist.json"), 1.0, None).err().unwrap();
        assert!(err.to_string().contains("failed to read domain"));
    }

    fn domain_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_domain_without_recipes() {
        let file = domain_file(r#"{"Items":["wood"],"Initial":{"wood":1},"Goal":{"wood":1},"Recipes":{}}"#);
        let engine = Engine::load(file.path(), 1.0, None).unwrap();
        let report = engine.run(HeuristicKind::Penalty);
        let plan = report.plan().unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_cost, 0.0);

        let file = domain_file(r#"{"Items":["wood"],"Goal":{"wood":1},"Recipes":{}}"#);
        let engine = Engine::load(file.path(), 1.0, None).unwrap();
        assert_eq!(engine.run(HeuristicKind::Zero).failure(), Some(FailureKind::FrontierExhausted));
    }

    #[test]
    fn test_sub_millisecond_time_limit_is_kept() {
        let engine = Engine::load(&demo_path(), 0.0005, None).unwrap();
        assert_eq!(engine.config.time_limit(), Duration::from_micros(500));
    }
}
