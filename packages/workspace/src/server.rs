//! # Editor API
//!
//! HTTP routes for loading, editing, saving and publishing sites.
//! Every route except `/healthz` is scoped to the authenticated user.

use crate::auth::{AuthUser, TokenAuth};
use crate::error::ServerError;
use crate::hosting::{public_url, Deployer, HostingClient, HostingSettings};
use crate::sessions::SessionRegistry;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use siteforge_common::{merge_fields, DocumentKey, DocumentStore, FileDocumentStore};
use siteforge_editor::{load_or_create_site, load_site, Action, Outcome, Site};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// Everything needed to run the service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,

    /// `None` disables autosave
    pub autosave_interval: Option<Duration>,
    pub history_limit: usize,

    /// Bearer token → user id
    pub auth_tokens: HashMap<String, String>,
    pub hosting: HostingSettings,
}

/// Shared handler state
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub sessions: SessionRegistry,
    pub deployer: Arc<dyn Deployer>,
    pub auth: TokenAuth,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        deployer: Arc<dyn Deployer>,
        auth: TokenAuth,
        history_limit: usize,
    ) -> Self {
        Self {
            sessions: SessionRegistry::new(documents.clone(), history_limit),
            documents,
            deployer,
            auth,
        }
    }
}

/// Response to a dispatched action
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub changed: bool,

    /// Why the action was a no-op, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
    pub selected_page: String,
    pub can_undo: bool,
    pub can_redo: bool,
    pub version: u64,
    pub site: Site,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/sites/:site_id", get(get_site).put(put_site))
        .route("/sites/:site_id/actions", post(dispatch_action))
        .route("/sites/:site_id/save", post(save_site))
        .route("/sites/:site_id/publish", post(publish_site))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

fn document_key(user_id: String, site_id: String) -> Result<DocumentKey, ServerError> {
    let key = DocumentKey::new(user_id, site_id);
    key.validate()?;
    Ok(key)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Present site of the open session, otherwise the stored document
async fn get_site(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(site_id): Path<String>,
) -> Result<Json<Site>, ServerError> {
    let key = document_key(user_id, site_id)?;

    if let Some(session) = state.sessions.get(&key).await {
        return Ok(Json(session.lock().await.site().clone()));
    }

    let site = load_or_create_site(state.documents.as_ref(), &key).await?;
    Ok(Json(site))
}

/// Shallow-merge a partial site document into storage
async fn put_site(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(site_id): Path<String>,
    Json(fields): Json<Value>,
) -> Result<Json<Site>, ServerError> {
    let key = document_key(user_id, site_id)?;

    let mut doc = state
        .documents
        .get(&key)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("site {}", key.site_id)))?;
    merge_fields(&mut doc, fields)?;

    let site = Site::from_json(doc.clone())
        .map_err(|e| ServerError::BadRequest(format!("invalid site document: {}", e)))?;
    state.documents.set(&key, doc).await?;

    // Storage now wins over any in-memory edits
    if state.sessions.close(&key).await {
        tracing::info!(site_id = %key.site_id, "site replaced, open session discarded");
    }

    Ok(Json(site))
}

async fn dispatch_action(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(site_id): Path<String>,
    Json(action): Json<Action>,
) -> Result<Json<DispatchResponse>, ServerError> {
    let key = document_key(user_id, site_id)?;
    let session = state.sessions.get_or_open(&key).await?;
    let mut session = session.lock().await;

    let outcome = session.dispatch(action);
    let store = session.store();

    Ok(Json(DispatchResponse {
        changed: outcome.site_changed(),
        ignored: match &outcome {
            Outcome::Ignored(reason) => Some(reason.to_string()),
            _ => None,
        },
        selected_page: store.selected_page_id().to_string(),
        can_undo: store.can_undo(),
        can_redo: store.can_redo(),
        version: store.version(),
        site: store.site().clone(),
    }))
}

async fn save_site(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(site_id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let key = document_key(user_id, site_id)?;
    let session = state.sessions.get_or_open(&key).await?;
    let mut session = session.lock().await;

    session.save().await?;
    Ok(Json(json!({ "saved": true, "version": session.store().version() })))
}

/// Deploy the stored site and record where it went
async fn publish_site(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(site_id): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let key = document_key(user_id, site_id)?;
    let session = state.sessions.get(&key).await;

    if let Some(session) = &session {
        session.lock().await.save_if_dirty().await?;
    }

    let site = load_site(state.documents.as_ref(), &key).await?;
    let deployment = match state.deployer.deploy(&site).await {
        Ok(deployment) => deployment,
        Err(e) => {
            if let Some(session) = &session {
                session.lock().await.record_failure(e.to_string());
            }
            return Err(e.into());
        }
    };
    let url = public_url(&deployment);
    let published_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    // Session stays locked until storage and session agree on the publish
    let mut guard = match &session {
        Some(session) => Some(session.lock().await),
        None => None,
    };

    state
        .documents
        .update(
            &key,
            json!({ "publishedUrl": url, "lastPublishedAt": published_at }),
        )
        .await?;

    if let Some(session) = guard.as_mut() {
        session.record_published(url.clone(), published_at);
    }

    tracing::info!(site_id = %key.site_id, url = %url, "site published");
    Ok(Json(json!({ "url": url })))
}

/// Run the service until ctrl-c, then flush unsaved sessions
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let documents: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(config.data_dir.clone()));
    let deployer: Arc<dyn Deployer> = Arc::new(HostingClient::new(config.hosting.clone()));

    if config.auth_tokens.is_empty() {
        tracing::warn!("no auth tokens configured, every site request will be rejected");
    }

    let state = Arc::new(AppState::new(
        documents,
        deployer,
        TokenAuth::new(config.auth_tokens.clone()),
        config.history_limit,
    ));

    let autosave = config
        .autosave_interval
        .map(|interval| state.sessions.spawn_autosave(interval));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, data_dir = %config.data_dir.display(), "listening");

    axum::serve(listener, build_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = autosave {
        task.abort();
    }
    let saved = state.sessions.save_all().await;
    tracing::info!(saved, "shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
