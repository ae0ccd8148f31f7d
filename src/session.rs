//! The current recipe and the edits that can be made to it
//!
//! A `Session` owns the one working recipe. It is loaded from the store when
//! opened, and every edit recomputes the derived costs and writes the result
//! back before returning.

use crate::calculator::recompute;
use crate::error::{SessionError, StoreError};
use crate::models::{EntryMode, Ingredient, IngredientUpdate, Recipe};
use crate::report;
use crate::store::RecipeStore;

pub struct Session {
    store: RecipeStore,
    recipe: Recipe,
}

impl Session {
    /// Load the stored recipe, or start a blank one
    ///
    /// An unreadable snapshot is logged and replaced by a blank recipe so the
    /// calculator stays usable.
    pub fn open(store: RecipeStore) -> Result<Self, StoreError> {
        let recipe = match store.load() {
            Ok(Some(recipe)) => {
                tracing::info!(recipe_id = %recipe.id, name = %recipe.name, "resumed stored recipe");
                recompute(&recipe)
            }
            Ok(None) => {
                tracing::info!("no stored recipe, starting blank");
                Recipe::new()
            }
            Err(err @ StoreError::Corrupt { .. }) => {
                tracing::warn!(error = %err, "discarding unreadable stored recipe");
                Recipe::new()
            }
            Err(err) => return Err(err),
        };
        Ok(Session { store, recipe })
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), SessionError> {
        let name = name.to_string();
        self.commit(|r| r.name = name)
    }

    pub fn set_total_units(&mut self, total_units: f64) -> Result<(), SessionError> {
        self.commit(|r| r.total_units = total_units)
    }

    /// Append a new ingredient (detailed mode unless `mode` says otherwise); returns its id
    pub fn add_ingredient(
        &mut self,
        mode: EntryMode,
        update: &IngredientUpdate,
    ) -> Result<String, SessionError> {
        let mut ingredient = Ingredient::new();
        ingredient.switch_mode(mode);
        ingredient.apply(update);
        let id = ingredient.id.clone();
        self.commit(|r| r.ingredients.push(ingredient))?;
        Ok(id)
    }

    pub fn update_ingredient(
        &mut self,
        reference: &str,
        update: &IngredientUpdate,
    ) -> Result<(), SessionError> {
        let index = self.find(reference)?;
        self.commit(|r| r.ingredients[index].apply(update))
    }

    pub fn set_entry_mode(&mut self, reference: &str, mode: EntryMode) -> Result<(), SessionError> {
        let index = self.find(reference)?;
        self.commit(|r| r.ingredients[index].switch_mode(mode))
    }

    /// Remove an ingredient; returns the removed row
    pub fn remove_ingredient(&mut self, reference: &str) -> Result<Ingredient, SessionError> {
        let index = self.find(reference)?;
        let removed = self.recipe.ingredients[index].clone();
        self.commit(|r| {
            r.ingredients.remove(index);
        })?;
        Ok(removed)
    }

    /// Reveal the totals; needs a name, at least one ingredient and a positive unit count
    pub fn generate_report(&mut self) -> Result<(), SessionError> {
        if let Some(reason) = report::missing_data(&self.recipe) {
            return Err(SessionError::NotReady(reason));
        }
        self.commit(|r| r.show_results = true)
    }

    /// Throw the current recipe away and start a new one
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.recipe = Recipe::new();
        tracing::info!(recipe_id = %self.recipe.id, "started new calculation");
        Ok(())
    }

    /// Resolve an ingredient by full id or by 1-based row number
    fn find(&self, reference: &str) -> Result<usize, SessionError> {
        let ingredients = &self.recipe.ingredients;
        if let Some(index) = ingredients.iter().position(|i| i.id == reference) {
            return Ok(index);
        }
        match reference.parse::<usize>() {
            Ok(row) if row >= 1 && row <= ingredients.len() => Ok(row - 1),
            _ => Err(SessionError::IngredientNotFound(reference.to_string())),
        }
    }

    fn commit(&mut self, edit: impl FnOnce(&mut Recipe)) -> Result<(), SessionError> {
        let mut next = self.recipe.clone();
        edit(&mut next);
        let next = recompute(&next);
        // A recipe nobody has typed anything into yet isn't worth keeping
        if !next.is_blank() {
            self.store.save(&next)?;
        }
        self.recipe = next;
        Ok(())
    }
}
