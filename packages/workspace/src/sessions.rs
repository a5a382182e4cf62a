//! Open editing sessions, one per (user, site).

use siteforge_common::{DocumentKey, DocumentStore};
use siteforge_editor::{EditSession, EditorError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

pub type SharedSession = Arc<Mutex<EditSession>>;

#[derive(Clone)]
pub struct SessionRegistry {
    documents: Arc<dyn DocumentStore>,
    sessions: Arc<RwLock<HashMap<DocumentKey, SharedSession>>>,
    history_limit: usize,
}

impl SessionRegistry {
    pub fn new(documents: Arc<dyn DocumentStore>, history_limit: usize) -> Self {
        Self {
            documents,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            history_limit,
        }
    }

    /// Session for `key` if one is open
    pub async fn get(&self, key: &DocumentKey) -> Option<SharedSession> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Return the open session for `key`, opening it on first use
    pub async fn get_or_open(&self, key: &DocumentKey) -> Result<SharedSession, EditorError> {
        if let Some(session) = self.get(key).await {
            return Ok(session);
        }

        // Load outside the registry lock so other lookups are not blocked
        let opened = EditSession::open_with_history_limit(
            self.documents.clone(),
            key.clone(),
            self.history_limit,
        )
        .await?;

        // Another request may have opened it while we were loading
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::debug!(user_id = %key.user_id, site_id = %key.site_id, "session opened");
                Arc::new(Mutex::new(opened))
            })
            .clone();
        Ok(session)
    }

    /// Drop the open session for `key`, discarding unsaved edits
    pub async fn close(&self, key: &DocumentKey) -> bool {
        self.sessions.write().await.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Save every dirty session. Returns how many were written.
    ///
    /// Failures are logged and kept in each session's save status.
    pub async fn save_all(&self) -> usize {
        let sessions: Vec<SharedSession> = self.sessions.read().await.values().cloned().collect();

        let mut saved = 0;
        for session in sessions {
            let mut session = session.lock().await;
            match session.save_if_dirty().await {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(site_id = %session.key().site_id, error = %e, "autosave failed");
                }
            }
        }
        saved
    }

    /// Periodically save dirty sessions until the task is aborted
    pub fn spawn_autosave(&self, interval: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let saved = registry.save_all().await;
                if saved > 0 {
                    tracing::debug!(saved, "autosave");
                }
            }
        })
    }
}
