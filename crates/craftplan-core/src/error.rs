//! Error types for Craftplan.

use thiserror::Error;

/// Main error type for Craftplan operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CraftError {
    /// A recipe could not be compiled into a rule.
    #[error("Invalid recipe '{recipe}': {reason}")]
    InvalidRecipe { recipe: String, reason: String },

    /// A plan or lookup referenced a recipe that is not in the rule set.
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    /// A replayed plan step was not applicable in the state it was applied to.
    #[error("Step {step} ('{recipe}') is not applicable in the current state")]
    PreconditionFailed { step: usize, recipe: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CraftError {
    /// Returns the recipe name this error refers to, if any.
    pub fn recipe(&self) -> Option<&str> {
        match self {
            CraftError::InvalidRecipe { recipe, .. } => Some(recipe),
            CraftError::UnknownRecipe(recipe) => Some(recipe),
            CraftError::PreconditionFailed { recipe, .. } => Some(recipe),
            _ => None,
        }
    }

    /// Returns true if this error stems from the domain configuration
    /// rather than from a plan being checked against it.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CraftError::InvalidRecipe { .. } | CraftError::Serialization(_)
        )
    }
}

/// Convenience Result type for Craftplan operations.
pub type Result<T> = std::result::Result<T, CraftError>;

impl From<serde_json::Error> for CraftError {
    fn from(err: serde_json::Error) -> Self {
        CraftError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_recipe_names_recipe() {
        let err = CraftError::InvalidRecipe {
            recipe: "craft plank".to_string(),
            reason: "missing Time".to_string(),
        };
        assert_eq!(err.recipe(), Some("craft plank"));
        assert!(err.is_configuration());
        assert!(err.to_string().contains("craft plank"));
    }

    #[test]
    fn test_precondition_failure_is_not_configuration() {
        let err = CraftError::PreconditionFailed {
            step: 2,
            recipe: "smelt".to_string(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.recipe(), Some("smelt"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: CraftError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CraftError::Serialization(_)));
    }
}
