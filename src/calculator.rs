//! Recipe cost calculation
//!
//! All functions here are pure. Invalid or missing amounts never raise an
//! error: they fall back to zero or flow through the arithmetic unchanged, so
//! a half-filled recipe is always displayable.

use crate::models::{CostEntry, Ingredient, Recipe};

/// Cost of one ingredient as used in the batch
///
/// Direct entries return their flat cost. Detailed entries scale the purchase
/// price by `used / purchased`; units are taken at face value. A zero (or
/// NaN) purchase quantity means "no data yet" and yields 0.
pub fn ingredient_cost(ingredient: &Ingredient) -> f64 {
    match &ingredient.entry {
        CostEntry::Direct { direct_cost } => {
            if direct_cost.is_nan() {
                0.0
            } else {
                *direct_cost
            }
        }
        CostEntry::Detailed {
            purchase_price,
            purchase_quantity,
            used_quantity,
            ..
        } => {
            if *purchase_quantity == 0.0 || purchase_quantity.is_nan() {
                return 0.0;
            }
            let unit_cost = purchase_price / purchase_quantity;
            unit_cost * used_quantity
        }
    }
}

/// Sum of the (already resolved) ingredient costs
pub fn total_cost(ingredients: &[Ingredient]) -> f64 {
    ingredients.iter().map(|i| i.cost).sum()
}

/// Batch cost spread over the units it yields; 0 when there are no units
pub fn cost_per_unit(total_cost: f64, total_units: f64) -> f64 {
    if total_units > 0.0 {
        total_cost / total_units
    } else {
        0.0
    }
}

/// Recalculate every derived field of a recipe
///
/// Returns a new snapshot; `id`, `name`, `total_units` and `show_results`
/// pass through. Applying it to its own output changes nothing.
pub fn recompute(recipe: &Recipe) -> Recipe {
    let ingredients: Vec<Ingredient> = recipe
        .ingredients
        .iter()
        .map(|ingredient| Ingredient {
            cost: ingredient_cost(ingredient),
            ..ingredient.clone()
        })
        .collect();

    let total = total_cost(&ingredients);
    let per_unit = cost_per_unit(total, recipe.total_units);

    tracing::debug!(
        recipe_id = %recipe.id,
        ingredients = ingredients.len(),
        total_cost = total,
        cost_per_unit = per_unit,
        "recomputed recipe"
    );

    Recipe {
        ingredients,
        total_cost: total,
        cost_per_unit: per_unit,
        ..recipe.clone()
    }
}
