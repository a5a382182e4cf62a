//! Error types for the editor

use siteforge_common::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Persistence error: {0}")]
    Persistence(StoreError),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown palette category: {0}")]
    UnknownCategory(String),

    #[error("Unknown palette item: {0}")]
    UnknownPaletteItem(String),
}

impl From<StoreError> for EditorError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { user_id, site_id } => {
                EditorError::NotFound(format!("site {} of user {}", site_id, user_id))
            }
            other => EditorError::Persistence(other),
        }
    }
}
