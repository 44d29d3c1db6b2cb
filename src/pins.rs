//! The pin ledger: the user-curated set of bookmarked recipes, keyed by
//! recipe id and scoped to the current identity.
//!
//! Local mutation is optimistic and unconditional; remote mirroring is
//! the orchestrator's job and its failure never reverts local state.

use tracing::debug;

use crate::analyzer::Recipe;

/// What a toggle did, so the caller can mirror the matching remote
/// insert or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinToggle {
    Added,
    Removed,
}

/// Set of pinned recipes, keyed by id. Insertion order is preserved for
/// display.
#[derive(Debug, Default)]
pub struct PinLedger {
    recipes: Vec<Recipe>,
}

impl PinLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle membership for a recipe. Involutive per id: toggling twice
    /// restores the original state.
    pub fn toggle(&mut self, recipe: &Recipe) -> PinToggle {
        if let Some(pos) = self.recipes.iter().position(|r| r.id == recipe.id) {
            self.recipes.remove(pos);
            debug!("Unpinned recipe {}", recipe.id);
            PinToggle::Removed
        } else {
            self.recipes.push(recipe.clone());
            debug!("Pinned recipe {}", recipe.id);
            PinToggle::Added
        }
    }

    pub fn is_pinned(&self, recipe_id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == recipe_id)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Replace the whole set, e.g. with the remote collection at login.
    pub fn replace_all(&mut self, recipes: Vec<Recipe>) {
        self.recipes = recipes;
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }
}
