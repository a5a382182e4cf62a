//! # Edit Session
//!
//! One user's editing session on one site: the store plus its
//! persistence and publish collaborators.
//!
//! Saving and publishing never fail silently. Errors are returned to the
//! caller and also kept in `status()` until the next successful save, so a
//! UI can show them and offer a retry.

use crate::actions::Action;
use crate::errors::EditorError;
use crate::history::DEFAULT_MAX_LEVELS;
use crate::model::{Site, SitePatch};
use crate::reducer::Outcome;
use crate::store::EditorStore;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use siteforge_common::{DocumentKey, DocumentStore};
use std::sync::Arc;

/// Publishes a stored site and returns its public URL
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, site_id: &str) -> Result<String, EditorError>;
}

/// Persistence state shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing edited since load
    Clean,

    /// Unsaved edits
    Dirty,

    Saved { at: DateTime<Utc> },

    /// The last save or publish failed; edits are still in memory
    Failed { message: String },
}

/// Load a site document, `NotFound` if it does not exist
pub async fn load_site(documents: &dyn DocumentStore, key: &DocumentKey) -> Result<Site, EditorError> {
    let doc = documents
        .get(key)
        .await?
        .ok_or_else(|| EditorError::NotFound(format!("site {}", key.site_id)))?;

    let mut site = Site::from_json(doc)?;
    if site.id.is_empty() {
        site.id = key.site_id.clone();
    }
    Ok(site)
}

/// Load a site, creating and storing the default site if it is missing
pub async fn load_or_create_site(
    documents: &dyn DocumentStore,
    key: &DocumentKey,
) -> Result<Site, EditorError> {
    match load_site(documents, key).await {
        Err(EditorError::NotFound(_)) => {
            let site = Site::new(key.site_id.clone());
            documents.set(key, site.to_json()?).await?;
            tracing::info!(user_id = %key.user_id, site_id = %key.site_id, "created default site");
            Ok(site)
        }
        other => other,
    }
}

pub struct EditSession {
    key: DocumentKey,
    store: EditorStore,
    documents: Arc<dyn DocumentStore>,

    /// Store version that was last persisted
    saved_version: u64,
    saved_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl EditSession {
    /// Open a session, materializing the default site on first load
    pub async fn open(
        documents: Arc<dyn DocumentStore>,
        key: DocumentKey,
    ) -> Result<Self, EditorError> {
        Self::open_with_history_limit(documents, key, DEFAULT_MAX_LEVELS).await
    }

    pub async fn open_with_history_limit(
        documents: Arc<dyn DocumentStore>,
        key: DocumentKey,
        history_limit: usize,
    ) -> Result<Self, EditorError> {
        let site = load_or_create_site(documents.as_ref(), &key).await?;

        Ok(Self {
            key,
            store: EditorStore::with_history_limit(site, history_limit),
            documents,
            saved_version: 0,
            saved_at: None,
            last_error: None,
        })
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    /// Mutable store access for canvas and palette helpers
    pub fn store_mut(&mut self) -> &mut EditorStore {
        &mut self.store
    }

    pub fn site(&self) -> &Site {
        self.store.site()
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        self.store.dispatch(action)
    }

    pub fn is_dirty(&self) -> bool {
        self.store.version() != self.saved_version
    }

    pub fn status(&self) -> SaveStatus {
        if let Some(message) = &self.last_error {
            return SaveStatus::Failed {
                message: message.clone(),
            };
        }

        match (self.is_dirty(), self.saved_at) {
            (true, _) => SaveStatus::Dirty,
            (false, Some(at)) => SaveStatus::Saved { at },
            (false, None) => SaveStatus::Clean,
        }
    }

    /// Persist the present site
    pub async fn save(&mut self) -> Result<(), EditorError> {
        let version = self.store.version();
        let result = self.write_present().await;

        match result {
            Ok(()) => {
                self.saved_version = version;
                self.saved_at = Some(Utc::now());
                self.last_error = None;
                tracing::info!(site_id = %self.key.site_id, version, "site saved");
                Ok(())
            }
            Err(e) => {
                tracing::error!(site_id = %self.key.site_id, error = %e, "failed to save site");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Save only if there are unsaved edits. Returns whether a save happened.
    pub async fn save_if_dirty(&mut self) -> Result<bool, EditorError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }

    /// Replace the stored document with the present site
    async fn write_present(&self) -> Result<(), EditorError> {
        let doc = self.store.site().to_json()?;
        self.documents.set(&self.key, doc).await?;
        Ok(())
    }

    /// Record a publish that happened, outside the undo history
    pub fn record_published(&mut self, url: impl Into<String>, published_at: impl Into<String>) {
        self.store.amend_site(SitePatch {
            published_url: Some(url.into()),
            last_published_at: Some(published_at.into()),
            ..SitePatch::default()
        });
        self.last_error = None;
    }

    /// Record a failed save or publish so `status()` reports it
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Save pending edits, publish, and record the published URL on the site
    pub async fn publish(&mut self, publisher: &dyn Publisher) -> Result<String, EditorError> {
        self.save_if_dirty().await?;

        match publisher.publish(&self.key.site_id).await {
            Ok(url) => {
                let published_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
                self.record_published(url.clone(), published_at);
                tracing::info!(site_id = %self.key.site_id, url = %url, "site published");
                Ok(url)
            }
            Err(e) => {
                tracing::error!(site_id = %self.key.site_id, error = %e, "failed to publish site");
                self.record_failure(e.to_string());
                Err(e)
            }
        }
    }
}
