use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use siteforge_common::StoreError;
use siteforge_editor::EditorError;
use thiserror::Error;

/// Errors from the hosting provider
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Hosting access token is not configured")]
    MissingToken,

    #[error("Hosting request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Hosting provider rejected deployment ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Editor error: {0}")]
    Editor(EditorError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { site_id, .. } => ServerError::NotFound(format!("site {}", site_id)),
            StoreError::InvalidId(id) => ServerError::BadRequest(format!("invalid id {:?}", id)),
            StoreError::NotAnObject => {
                ServerError::BadRequest("site document must be a JSON object".to_string())
            }
            other => ServerError::Store(other),
        }
    }
}

impl From<EditorError> for ServerError {
    fn from(e: EditorError) -> Self {
        match e {
            EditorError::NotFound(what) => ServerError::NotFound(what),
            EditorError::Unauthenticated => ServerError::Unauthenticated,
            EditorError::Persistence(store) => store.into(),
            other => ServerError::Editor(other),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Store(_) | ServerError::Editor(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Publish(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
