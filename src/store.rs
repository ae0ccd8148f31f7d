//! Recipe persistence
//!
//! A single string-keyed table; the current recipe lives under one fixed key
//! as a JSON snapshot.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::StoreError;
use crate::models::Recipe;

pub const RECIPE_STORAGE_KEY: &str = "batchCostCalculator_currentRecipe";

pub struct RecipeStore {
    conn: Connection,
}

impl RecipeStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened recipe store");
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(RecipeStore { conn })
    }

    /// Write the full recipe snapshot, replacing whatever was stored
    pub fn save(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let json = serde_json::to_string(recipe).map_err(StoreError::Serialize)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value) VALUES (?1, ?2)",
            (RECIPE_STORAGE_KEY, &json),
        )?;
        tracing::debug!(recipe_id = %recipe.id, bytes = json.len(), "saved recipe");
        Ok(())
    }

    /// Read the stored recipe back, if there is one
    pub fn load(&self) -> Result<Option<Recipe>, StoreError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                [RECIPE_STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            None => Ok(None),
            Some(json) if json.is_empty() => Ok(None),
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: RECIPE_STORAGE_KEY.to_string(),
                    source,
                }),
        }
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM storage WHERE key = ?1", [RECIPE_STORAGE_KEY])?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value) VALUES (?1, ?2)",
            (RECIPE_STORAGE_KEY, value),
        )?;
        Ok(())
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::recompute;
    use crate::models::{CostEntry, Ingredient};

    fn sample() -> Recipe {
        recompute(&Recipe {
            name: "Brownies".to_string(),
            total_units: 12.0,
            ingredients: vec![Ingredient {
                name: "Cocoa".to_string(),
                entry: CostEntry::Direct { direct_cost: 6.0 },
                ..Ingredient::new()
            }],
            ..Recipe::new()
        })
    }

    #[test]
    fn test_load_empty_store() {
        let store = RecipeStore::open_in_memory().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = RecipeStore::open_in_memory().unwrap();
        let recipe = sample();
        store.save(&recipe).unwrap();
        assert_eq!(store.load().unwrap(), Some(recipe));
    }

    #[test]
    fn test_save_overwrites_previous() {
        let store = RecipeStore::open_in_memory().unwrap();
        store.save(&sample()).unwrap();
        let other = Recipe {
            name: "Scones".to_string(),
            ..Recipe::new()
        };
        store.save(&other).unwrap();
        assert_eq!(store.load().unwrap().map(|r| r.name), Some("Scones".to_string()));
    }

    #[test]
    fn test_clear() {
        let store = RecipeStore::open_in_memory().unwrap();
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_snapshot() {
        let store = RecipeStore::open_in_memory().unwrap();
        store.put_raw("{not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_reopen_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.db");
        let recipe = sample();
        {
            let store = RecipeStore::open(&path).unwrap();
            store.save(&recipe).unwrap();
        }
        let store = RecipeStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), Some(recipe));
    }
}
