use crate::store::DocumentKey;
use thiserror::Error;

/// Errors raised by a document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: users/{user_id}/sites/{site_id}")]
    NotFound { user_id: String, site_id: String },

    #[error("Invalid document id: {0:?}")]
    InvalidId(String),

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(key: &DocumentKey) -> Self {
        StoreError::NotFound {
            user_id: key.user_id.clone(),
            site_id: key.site_id.clone(),
        }
    }
}
