//! # Craftplan Core
//!
//! Core types for the Craftplan planner.
//!
//! This crate provides the fundamental building blocks:
//! - [`State`] - Canonical inventory of item quantities
//! - [`RecipeSpec`] - Declarative recipe before compilation
//! - [`Domain`] - Item universe, initial inventory, goal and recipes
//! - [`CraftError`] - Error types

pub mod domain;
pub mod error;
pub mod state;

// Re-exports for convenience
pub use domain::{Amount, Domain, RecipeSpec};
pub use error::{CraftError, Result};
pub use state::State;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::domain::{Amount, Domain, RecipeSpec};
    pub use crate::error::{CraftError, Result};
    pub use crate::state::State;
}
