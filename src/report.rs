//! Plain-text cost report

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::models::Recipe;

pub const DEFAULT_CURRENCY: &str = "₹";

/// Why a recipe can't be reported on yet, if it can't
pub fn missing_data(recipe: &Recipe) -> Option<&'static str> {
    if recipe.name.is_empty() {
        Some("recipe has no name")
    } else if recipe.ingredients.is_empty() {
        Some("recipe has no ingredients")
    } else if recipe.total_units <= 0.0 {
        Some("total units must be greater than zero")
    } else {
        None
    }
}

pub fn has_data(recipe: &Recipe) -> bool {
    missing_data(recipe).is_none()
}

/// A recipe rendered with a currency symbol
pub struct CostReport<'a> {
    recipe: &'a Recipe,
    currency: &'a str,
}

impl<'a> CostReport<'a> {
    pub fn new(recipe: &'a Recipe, currency: &'a str) -> Self {
        CostReport { recipe, currency }
    }

    /// Download name: lowercased recipe name with whitespace runs, path
    /// separators and leading dots turned into `_`, so it stays inside the
    /// export directory
    pub fn file_name(&self) -> Result<String> {
        let unsafe_runs = Regex::new(r"^\.+|[\s/\\]+")?;
        let lowered = self.recipe.name.to_lowercase();
        let slug = unsafe_runs.replace_all(&lowered, "_");
        Ok(format!("{}_cost_report.txt", slug))
    }

    /// Write the report into `dir`, returning the file's path
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name()?);
        fs::write(&path, self.to_string())
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "exported cost report");
        Ok(path)
    }
}

impl fmt::Display for CostReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.recipe;
        let cur = self.currency;

        writeln!(f, "Baking Cost Report")?;
        writeln!(f, "====================")?;
        writeln!(f)?;
        writeln!(f, "Recipe Name: {}", r.name)?;
        writeln!(f, "Total Units Produced: {}", r.total_units)?;
        writeln!(f)?;
        writeln!(f, "Ingredient Costs:")?;
        writeln!(f, "--------------------")?;
        for ingredient in &r.ingredients {
            let name = if ingredient.name.is_empty() {
                "Unnamed Ingredient"
            } else {
                ingredient.name.as_str()
            };
            writeln!(f, "{}: {}{:.2}", name, cur, ingredient.cost)?;
        }
        writeln!(f)?;
        writeln!(f, "====================")?;
        writeln!(f, "Total Batch Cost: {}{:.2}", cur, r.total_cost)?;
        writeln!(f, "Cost Per Unit: {}{:.2}", cur, r.cost_per_unit)?;

        Ok(())
    }
}
