//! Declarative crafting domain: item universe, initial inventory, goal and
//! recipes, in the JSON shape crafting domains are distributed in.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::state::State;

/// A quantity in a recipe or goal.
///
/// Domains write tool requirements as booleans (`"bench": true`), so both
/// integers and booleans are accepted; `true` means one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "AmountRepr")]
pub struct Amount(pub u64);

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Count(u64),
    Flag(bool),
}

impl From<AmountRepr> for Amount {
    fn from(repr: AmountRepr) -> Self {
        match repr {
            AmountRepr::Count(n) => Amount(n),
            AmountRepr::Flag(flag) => Amount(u64::from(flag)),
        }
    }
}

impl From<u64> for Amount {
    fn from(n: u64) -> Self {
        Amount(n)
    }
}

impl Amount {
    /// The quantity as an integer.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Raw, uncompiled recipe definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeSpec {
    /// Items that must be held but are not consumed.
    #[serde(rename = "Requires", default, skip_serializing_if = "IndexMap::is_empty")]
    pub requires: IndexMap<String, Amount>,

    /// Items removed from the inventory.
    #[serde(rename = "Consumes", default, skip_serializing_if = "IndexMap::is_empty")]
    pub consumes: IndexMap<String, Amount>,

    /// Items added to the inventory.
    #[serde(rename = "Produces", default, skip_serializing_if = "IndexMap::is_empty")]
    pub produces: IndexMap<String, Amount>,

    /// Cost of applying the recipe. Left optional here so that a missing
    /// value is reported by the rule compiler together with the recipe name.
    #[serde(rename = "Time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl RecipeSpec {
    /// Create a recipe with the given cost and no requirements or effects.
    pub fn new(time: f64) -> Self {
        Self {
            time: Some(time),
            ..Self::default()
        }
    }

    /// Add a non-consumed requirement.
    pub fn requires(mut self, item: impl Into<String>, amount: u64) -> Self {
        self.requires.insert(item.into(), Amount(amount));
        self
    }

    /// Add a consumed input.
    pub fn consumes(mut self, item: impl Into<String>, amount: u64) -> Self {
        self.consumes.insert(item.into(), Amount(amount));
        self
    }

    /// Add a produced output.
    pub fn produces(mut self, item: impl Into<String>, amount: u64) -> Self {
        self.produces.insert(item.into(), Amount(amount));
        self
    }

    /// All item names this recipe mentions.
    pub fn items(&self) -> impl Iterator<Item = &str> + '_ {
        self.requires
            .keys()
            .chain(self.consumes.keys())
            .chain(self.produces.keys())
            .map(String::as_str)
    }
}

/// A complete crafting domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Universe of item names.
    #[serde(rename = "Items", default)]
    pub items: Vec<String>,

    /// Starting inventory; overrides the zero default of the universe.
    #[serde(rename = "Initial", default)]
    pub initial: IndexMap<String, u64>,

    /// Minimum quantities the final inventory must hold.
    #[serde(rename = "Goal", default)]
    pub goal: IndexMap<String, Amount>,

    /// Recipes in declaration order.
    #[serde(rename = "Recipes", default)]
    pub recipes: IndexMap<String, RecipeSpec>,
}

impl Domain {
    /// Parse a domain from its JSON text, warning about undeclared items.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let domain: Domain = serde_json::from_str(json)?;
        for item in domain.unknown_items() {
            warn!(item = %item, "Item is referenced but not declared in Items");
        }
        Ok(domain)
    }

    /// Build the start state: every declared item at zero, overridden by the
    /// initial inventory.
    pub fn initial_state(&self) -> State {
        self.items
            .iter()
            .map(|item| (item.as_str(), 0))
            .chain(self.initial.iter().map(|(item, qty)| (item.as_str(), *qty)))
            .collect()
    }

    /// Item names used by the initial inventory, goal or recipes that are
    /// missing from the declared universe, sorted.
    pub fn unknown_items(&self) -> Vec<String> {
        let declared: BTreeSet<&str> = self.items.iter().map(String::as_str).collect();
        let referenced = self
            .initial
            .keys()
            .chain(self.goal.keys())
            .map(String::as_str)
            .chain(self.recipes.values().flat_map(|spec| spec.items()));

        referenced
            .filter(|item| !declared.contains(item))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
