//! Recipe compilation and successor generation.
//!
//! Each [`RecipeSpec`] is compiled once into a [`CompiledRecipe`]: a plain
//! record of its requirement, consumption and production lists plus a fixed
//! cost. The precondition test and the effect are pure functions over that
//! record, so a [`RuleSet`] is immutable and can be shared by reference
//! across any number of searches.

use std::collections::HashMap;
use std::sync::Arc;

use craftplan_core::{CraftError, RecipeSpec, Result, State};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// A recipe compiled into predicate/effect form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledRecipe {
    name: Arc<str>,
    requires: Vec<(String, u64)>,
    consumes: Vec<(String, u64)>,
    produces: Vec<(String, u64)>,
    cost: f64,
}

impl CompiledRecipe {
    /// Compile a single recipe, validating its cost.
    pub fn compile(name: &str, spec: &RecipeSpec) -> Result<Self> {
        let cost = match spec.time {
            None => return Err(invalid(name, "missing Time")),
            Some(t) if !t.is_finite() => return Err(invalid(name, format!("Time must be finite, got {t}"))),
            Some(t) if t < 0.0 => return Err(invalid(name, format!("Time must be non-negative, got {t}"))),
            Some(t) => t,
        };

        Ok(Self {
            name: Arc::from(name),
            requires: flatten(&spec.requires),
            consumes: flatten(&spec.consumes),
            produces: flatten(&spec.produces),
            cost,
        })
    }

    /// Recipe name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the recipe name, used as an action label.
    pub fn label(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Fixed cost of applying the recipe.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// True iff every required and every consumed item is held in at least
    /// the listed amount.
    pub fn is_applicable(&self, state: &State) -> bool {
        self.requires
            .iter()
            .chain(&self.consumes)
            .all(|(item, amount)| state.get(item) >= *amount)
    }

    /// Apply the recipe, returning the resulting state.
    ///
    /// Must only be called when [`is_applicable`](Self::is_applicable) holds.
    pub fn apply(&self, state: &State) -> State {
        debug_assert!(
            self.is_applicable(state),
            "recipe '{}' applied to a state that does not satisfy it: {}",
            self.name,
            state
        );

        let consumed = self.consumes.iter().map(|(item, n)| (item.as_str(), *n));
        let produced = self.produces.iter().map(|(item, n)| (item.as_str(), *n));
        state.with_changes(consumed, produced)
    }
}

fn invalid(recipe: &str, reason: impl Into<String>) -> CraftError {
    CraftError::InvalidRecipe {
        recipe: recipe.to_string(),
        reason: reason.into(),
    }
}

fn flatten(amounts: &IndexMap<String, craftplan_core::Amount>) -> Vec<(String, u64)> {
    amounts
        .iter()
        .filter(|(_, amount)| amount.get() > 0)
        .map(|(item, amount)| (item.clone(), amount.get()))
        .collect()
}

/// One applicable transition out of a state.
#[derive(Debug, Clone, PartialEq)]
pub struct Successor {
    /// Name of the recipe that was applied.
    pub action: Arc<str>,
    /// State after applying it.
    pub state: State,
    /// Cost of the transition.
    pub cost: f64,
}

/// Source of successor transitions for the search.
pub trait SuccessorGenerator {
    /// Iterator over the successors of one state.
    type Iter<'a>: Iterator<Item = Successor>
    where
        Self: 'a;

    /// Lazily enumerate the transitions applicable in `state`, in a
    /// deterministic order.
    fn successors<'a>(&'a self, state: &'a State) -> Self::Iter<'a>;
}

/// Immutable, ordered collection of compiled recipes.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    recipes: Vec<CompiledRecipe>,
    by_name: HashMap<Arc<str>, usize>,
}

impl RuleSet {
    /// Compile every recipe, keeping the given order. Fails on the first
    /// malformed recipe.
    pub fn compile<'a, I, N>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, &'a RecipeSpec)>,
        N: AsRef<str>,
    {
        let mut rules = RuleSet::default();
        for (name, spec) in specs {
            let name = name.as_ref();
            if rules.by_name.contains_key(name) {
                return Err(invalid(name, "duplicate recipe name"));
            }
            let recipe = CompiledRecipe::compile(name, spec)?;
            rules.by_name.insert(recipe.label(), rules.recipes.len());
            rules.recipes.push(recipe);
        }

        debug!(recipes = rules.recipes.len(), "Compiled rule set");
        Ok(rules)
    }

    /// Look up a recipe by name.
    pub fn get(&self, name: &str) -> Option<&CompiledRecipe> {
        self.by_name.get(name).map(|&i| &self.recipes[i])
    }

    /// Cost of the named recipe.
    pub fn cost_of(&self, name: &str) -> Option<f64> {
        self.get(name).map(CompiledRecipe::cost)
    }

    /// Recipes in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Applicable transitions out of `state`, in declaration order.
    pub fn successors<'a>(&'a self, state: &'a State) -> Successors<'a> {
        Successors {
            recipes: self.recipes.iter(),
            state,
        }
    }

    /// Re-apply a sequence of recipe names from `start`, checking every
    /// precondition on the way, and return the final state.
    pub fn replay<I, A>(&self, start: &State, actions: I) -> Result<State>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let mut state = start.clone();
        for (step, action) in actions.into_iter().enumerate() {
            let action = action.as_ref();
            let recipe = self
                .get(action)
                .ok_or_else(|| CraftError::UnknownRecipe(action.to_string()))?;
            if !recipe.is_applicable(&state) {
                return Err(CraftError::PreconditionFailed {
                    step,
                    recipe: action.to_string(),
                });
            }
            state = recipe.apply(&state);
        }
        Ok(state)
    }
}

impl<'r> IntoIterator for &'r RuleSet {
    type Item = &'r CompiledRecipe;
    type IntoIter = std::slice::Iter<'r, CompiledRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl SuccessorGenerator for RuleSet {
    type Iter<'a> = Successors<'a>;

    fn successors<'a>(&'a self, state: &'a State) -> Successors<'a> {
        RuleSet::successors(self, state)
    }
}

/// Iterator returned by [`RuleSet::successors`].
#[derive(Debug, Clone)]
pub struct Successors<'a> {
    recipes: std::slice::Iter<'a, CompiledRecipe>,
    state: &'a State,
}

impl Iterator for Successors<'_> {
    type Item = Successor;

    fn next(&mut self) -> Option<Successor> {
        let state = self.state;
        self.recipes
            .by_ref()
            .find(|recipe| recipe.is_applicable(state))
            .map(|recipe| Successor {
                action: recipe.label(),
                state: recipe.apply(state),
                cost: recipe.cost,
            })
    }
}
