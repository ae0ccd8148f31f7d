//! Data models for recipes and their ingredients

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unit labels offered for purchase and usage quantities.
///
/// Labels are never converted into each other; any other label is accepted too.
pub const UNIT_OPTIONS: &[&str] = &[
    "kg", "g", "L", "ml", "piece", "cup", "tbsp", "tsp", "oz", "lb",
];

pub const DEFAULT_UNIT: &str = "g";

/// How an ingredient's cost is entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryMode", rename_all = "lowercase")]
pub enum CostEntry {
    /// Cost derived from what was bought and how much of it the batch uses
    #[serde(rename_all = "camelCase")]
    Detailed {
        #[serde(default, deserialize_with = "amount_or_zero")]
        purchase_price: f64,
        #[serde(default, deserialize_with = "amount_or_zero")]
        purchase_quantity: f64,
        #[serde(default = "default_unit")]
        purchase_unit: String,
        #[serde(default, deserialize_with = "amount_or_zero")]
        used_quantity: f64,
        #[serde(default = "default_unit")]
        used_unit: String,
    },
    /// Flat cost for the whole batch
    #[serde(rename_all = "camelCase")]
    Direct {
        #[serde(default, deserialize_with = "amount_or_zero")]
        direct_cost: f64,
    },
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

/// JSON has no infinity or NaN; serde_json writes them as `null`, read back as 0
fn amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntryMode {
    Detailed,
    Direct,
}

impl CostEntry {
    pub fn detailed() -> Self {
        CostEntry::Detailed {
            purchase_price: 0.0,
            purchase_quantity: 0.0,
            purchase_unit: default_unit(),
            used_quantity: 0.0,
            used_unit: default_unit(),
        }
    }

    pub fn direct() -> Self {
        CostEntry::Direct { direct_cost: 0.0 }
    }

    pub fn mode(&self) -> EntryMode {
        match self {
            CostEntry::Detailed { .. } => EntryMode::Detailed,
            CostEntry::Direct { .. } => EntryMode::Direct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub entry: CostEntry,
    /// Derived; overwritten on every recompute
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub cost: f64,
}

impl Ingredient {
    pub fn new() -> Self {
        Ingredient {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            entry: CostEntry::detailed(),
            cost: 0.0,
        }
    }

    /// Replace the entry payload with the defaults of `mode`, unless already in it
    pub fn switch_mode(&mut self, mode: EntryMode) {
        if self.entry.mode() == mode {
            return;
        }
        self.entry = match mode {
            EntryMode::Detailed => CostEntry::detailed(),
            EntryMode::Direct => CostEntry::direct(),
        };
    }

    /// Apply a partial edit. Fields that don't belong to the current mode are ignored.
    pub fn apply(&mut self, update: &IngredientUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }

        match &mut self.entry {
            CostEntry::Detailed {
                purchase_price,
                purchase_quantity,
                purchase_unit,
                used_quantity,
                used_unit,
            } => {
                if let Some(v) = update.purchase_price {
                    *purchase_price = v;
                }
                if let Some(v) = update.purchase_quantity {
                    *purchase_quantity = v;
                }
                if let Some(v) = update.used_quantity {
                    *used_quantity = v;
                }
                if let Some(unit) = &update.purchase_unit {
                    // Used unit tracks the purchase unit until the user picks a different one
                    if used_unit == purchase_unit {
                        *used_unit = unit.clone();
                    }
                    *purchase_unit = unit.clone();
                }
                if let Some(unit) = &update.used_unit {
                    *used_unit = unit.clone();
                }
            }
            CostEntry::Direct { direct_cost } => {
                if let Some(v) = update.direct_cost {
                    *direct_cost = v;
                }
            }
        }
    }
}

impl Default for Ingredient {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial edit of an ingredient; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_quantity: Option<f64>,
    pub purchase_unit: Option<String>,
    pub used_quantity: Option<f64>,
    pub used_unit: Option<String>,
    pub direct_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub total_units: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub total_cost: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub cost_per_unit: f64,
    #[serde(default)]
    pub show_results: bool,
}

impl Recipe {
    pub fn new() -> Self {
        Recipe {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            ingredients: Vec::new(),
            total_units: 0.0,
            total_cost: 0.0,
            cost_per_unit: 0.0,
            show_results: false,
        }
    }

    /// True when nothing has been entered yet
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.ingredients.is_empty() && self.total_units <= 0.0
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a user-entered amount, falling back to 0 for anything that isn't a number
pub fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_fails_soft() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount(" 3 "), 3.0);
        assert_eq!(parse_amount("-2"), -2.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("-infinity"), 0.0);
        assert_eq!(parse_amount("1e400"), 0.0);
    }

    #[test]
    fn test_new_ingredient_defaults() {
        let ing = Ingredient::new();
        assert!(ing.name.is_empty());
        assert_eq!(ing.cost, 0.0);
        assert_eq!(ing.entry, CostEntry::detailed());
        assert_eq!(ing.entry.mode(), EntryMode::Detailed);
    }

    #[test]
    fn test_purchase_unit_drags_matching_used_unit() {
        let mut ing = Ingredient::new();
        ing.apply(&IngredientUpdate {
            purchase_unit: Some("kg".to_string()),
            ..Default::default()
        });
        match &ing.entry {
            CostEntry::Detailed { purchase_unit, used_unit, .. } => {
                assert_eq!(purchase_unit, "kg");
                assert_eq!(used_unit, "kg");
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_purchase_unit_leaves_diverged_used_unit() {
        let mut ing = Ingredient::new();
        ing.apply(&IngredientUpdate {
            used_unit: Some("cup".to_string()),
            ..Default::default()
        });
        ing.apply(&IngredientUpdate {
            purchase_unit: Some("kg".to_string()),
            ..Default::default()
        });
        match &ing.entry {
            CostEntry::Detailed { purchase_unit, used_unit, .. } => {
                assert_eq!(purchase_unit, "kg");
                assert_eq!(used_unit, "cup");
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_update_ignores_other_mode_fields() {
        let mut ing = Ingredient::new();
        ing.switch_mode(EntryMode::Direct);
        ing.apply(&IngredientUpdate {
            purchase_price: Some(100.0),
            direct_cost: Some(7.5),
            ..Default::default()
        });
        assert_eq!(ing.entry, CostEntry::Direct { direct_cost: 7.5 });
    }

    #[test]
    fn test_switch_mode_to_same_mode_keeps_values() {
        let mut ing = Ingredient::new();
        ing.switch_mode(EntryMode::Direct);
        ing.apply(&IngredientUpdate {
            direct_cost: Some(4.0),
            ..Default::default()
        });
        ing.switch_mode(EntryMode::Direct);
        assert_eq!(ing.entry, CostEntry::Direct { direct_cost: 4.0 });

        ing.switch_mode(EntryMode::Detailed);
        assert_eq!(ing.entry, CostEntry::detailed());
    }

    #[test]
    fn test_ingredient_json_shape() {
        let ing = Ingredient {
            id: "a".to_string(),
            name: "Butter".to_string(),
            entry: CostEntry::Direct { direct_cost: 15.0 },
            cost: 15.0,
        };
        let value = serde_json::to_value(&ing).unwrap();
        assert_eq!(value["entryMode"], "direct");
        assert_eq!(value["directCost"], 15.0);
        assert_eq!(value["cost"], 15.0);
    }

    #[test]
    fn test_missing_numbers_deserialize_as_zero() {
        let json = r#"{"id":"x","entryMode":"detailed","purchasePrice":100}"#;
        let ing: Ingredient = serde_json::from_str(json).unwrap();
        assert_eq!(
            ing.entry,
            CostEntry::Detailed {
                purchase_price: 100.0,
                purchase_quantity: 0.0,
                purchase_unit: "g".to_string(),
                used_quantity: 0.0,
                used_unit: "g".to_string(),
            }
        );
        assert_eq!(ing.cost, 0.0);
    }

    #[test]
    fn test_null_amounts_deserialize_as_zero() {
        let json = r#"{"id":"r","totalUnits":2,"totalCost":null,"costPerUnit":null,
            "ingredients":[{"id":"i","entryMode":"direct","directCost":null,"cost":null}]}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.total_cost, 0.0);
        assert_eq!(recipe.cost_per_unit, 0.0);
        assert_eq!(recipe.ingredients[0].entry, CostEntry::Direct { direct_cost: 0.0 });
        assert_eq!(recipe.ingredients[0].cost, 0.0);
    }

    #[test]
    fn test_blank_recipe() {
        let mut recipe = Recipe::new();
        assert!(recipe.is_blank());
        recipe.total_units = 4.0;
        assert!(!recipe.is_blank());
    }
}
