//! Error types for persistence and session editing
//!
//! The cost engine itself never fails; these cover the layers around it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to serialize recipe: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored recipe under '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no ingredient matches '{0}'")]
    IngredientNotFound(String),

    #[error("recipe is not ready for a report: {0}")]
    NotReady(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}
