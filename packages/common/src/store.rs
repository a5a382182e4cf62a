use crate::error::StoreError;
use crate::ids::validate_id;
use crate::result::StoreResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Address of a site document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub user_id: String,
    pub site_id: String,
}

impl DocumentKey {
    pub fn new(user_id: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            site_id: site_id.into(),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        validate_id(&self.user_id)?;
        validate_id(&self.site_id)
    }
}

/// JSON document store abstraction
///
/// Documents are always JSON objects. `update` shallow-merges the given
/// fields into an existing document and fails with `NotFound` when the
/// document does not exist.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if absent
    async fn get(&self, key: &DocumentKey) -> StoreResult<Option<Value>>;

    /// Create or replace a document
    async fn set(&self, key: &DocumentKey, doc: Value) -> StoreResult<()>;

    /// Shallow-merge fields into an existing document
    async fn update(&self, key: &DocumentKey, fields: Value) -> StoreResult<()>;

    /// List site ids stored for a user
    async fn list(&self, user_id: &str) -> StoreResult<Vec<String>>;
}

/// Merge the top-level fields of `fields` into `target`
pub fn merge_fields(target: &mut Value, fields: Value) -> StoreResult<()> {
    let target = target.as_object_mut().ok_or(StoreError::NotAnObject)?;
    match fields {
        Value::Object(fields) => {
            for (name, value) in fields {
                target.insert(name, value);
            }
            Ok(())
        }
        _ => Err(StoreError::NotAnObject),
    }
}

fn ensure_object(doc: &Value) -> StoreResult<()> {
    if doc.is_object() {
        Ok(())
    } else {
        Err(StoreError::NotAnObject)
    }
}

/// File-backed store: `<root>/users/<userId>/sites/<siteId>.json`
///
/// Writes to one document are serialized, so concurrent `update`s never
/// lose each other's fields.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<DocumentKey, Arc<Mutex<()>>>>>,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sites_dir(&self, user_id: &str) -> PathBuf {
        self.root.join("users").join(user_id).join("sites")
    }

    fn document_path(&self, key: &DocumentKey) -> PathBuf {
        self.sites_dir(&key.user_id)
            .join(format!("{}.json", key.site_id))
    }

    /// Write lock for one document
    async fn document_lock(&self, key: &DocumentKey) -> Arc<Mutex<()>> {
        self.locks.lock().await.entry(key.clone()).or_default().clone()
    }

    /// Caller must hold the document lock
    async fn write(&self, key: &DocumentKey, doc: &Value) -> StoreResult<()> {
        let path = self.document_path(key);
        let dir = self.sites_dir(&key.user_id);
        tokio::fs::create_dir_all(&dir).await?;

        // Write a uniquely named temp file, then rename over the document,
        // so readers never see a partial document
        let bytes = serde_json::to_vec_pretty(doc)?;
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        tracing::debug!(path = %path.display(), "wrote site document");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, key: &DocumentKey) -> StoreResult<Option<Value>> {
        key.validate()?;
        match tokio::fs::read(self.document_path(key)).await {
            Ok(bytes) => {
                let doc: Value = serde_json::from_slice(&bytes)?;
                ensure_object(&doc)?;
                Ok(Some(doc))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &DocumentKey, doc: Value) -> StoreResult<()> {
        key.validate()?;
        ensure_object(&doc)?;
        let lock = self.document_lock(key).await;
        let _guard = lock.lock().await;
        self.write(key, &doc).await
    }

    async fn update(&self, key: &DocumentKey, fields: Value) -> StoreResult<()> {
        key.validate()?;
        let lock = self.document_lock(key).await;
        let _guard = lock.lock().await;

        let mut doc = self
            .get(key)
            .await?
            .ok_or_else(|| StoreError::not_found(key))?;
        merge_fields(&mut doc, fields)?;
        self.write(key, &doc).await
    }

    async fn list(&self, user_id: &str) -> StoreResult<Vec<String>> {
        validate_id(user_id)?;
        let dir = self.sites_dir(user_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<DocumentKey, Map<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &DocumentKey) -> StoreResult<Option<Value>> {
        key.validate()?;
        Ok(self
            .docs
            .read()
            .await
            .get(key)
            .map(|doc| Value::Object(doc.clone())))
    }

    async fn set(&self, key: &DocumentKey, doc: Value) -> StoreResult<()> {
        key.validate()?;
        match doc {
            Value::Object(doc) => {
                self.docs.write().await.insert(key.clone(), doc);
                Ok(())
            }
            _ => Err(StoreError::NotAnObject),
        }
    }

    async fn update(&self, key: &DocumentKey, fields: Value) -> StoreResult<()> {
        key.validate()?;
        let mut docs = self.docs.write().await;
        let doc = docs.get_mut(key).ok_or_else(|| StoreError::not_found(key))?;
        match fields {
            Value::Object(fields) => {
                for (name, value) in fields {
                    doc.insert(name, value);
                }
                Ok(())
            }
            _ => Err(StoreError::NotAnObject),
        }
    }

    async fn list(&self, user_id: &str) -> StoreResult<Vec<String>> {
        validate_id(user_id)?;
        let mut ids: Vec<String> = self
            .docs
            .read()
            .await
            .keys()
            .filter(|key| key.user_id == user_id)
            .map(|key| key.site_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_update_merges_top_level_fields() {
        let store = MemoryDocumentStore::new();
        let key = DocumentKey::new("alice", "shop");

        store
            .set(&key, json!({ "id": "shop", "name": "Shop", "pages": {} }))
            .await
            .unwrap();
        store
            .update(&key, json!({ "name": "Renamed" }))
            .await
            .unwrap();

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc["name"], "Renamed");
        assert_eq!(doc["id"], "shop");
        assert_eq!(doc["pages"], json!({}));
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let key = DocumentKey::new("alice", "missing");

        let err = store.update(&key, json!({ "name": "x" })).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rejects_non_object_documents() {
        let store = MemoryDocumentStore::new();
        let key = DocumentKey::new("alice", "shop");

        let err = store.set(&key, json!([1, 2, 3])).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let key = DocumentKey::new("alice", "shop");

        assert!(store.get(&key).await.unwrap().is_none());

        store
            .set(&key, json!({ "id": "shop", "name": "Shop" }))
            .await
            .unwrap();
        store
            .update(&key, json!({ "publishedUrl": "https://shop.example" }))
            .await
            .unwrap();

        let doc = store.get(&key).await.unwrap().unwrap();
        assert_eq!(doc["name"], "Shop");
        assert_eq!(doc["publishedUrl"], "https://shop.example");
        assert!(dir
            .path()
            .join("users/alice/sites/shop.json")
            .exists());
    }

    #[tokio::test]
    async fn test_file_store_lists_sites_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());

        for site in ["b", "a"] {
            store
                .set(&DocumentKey::new("alice", site), json!({ "id": site }))
                .await
                .unwrap();
        }
        store
            .set(&DocumentKey::new("bob", "c"), json!({ "id": "c" }))
            .await
            .unwrap();

        assert_eq!(store.list("alice").await.unwrap(), vec!["a", "b"]);
        assert!(store.list("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_rejects_traversal_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        let key = DocumentKey::new("alice", "../escape");

        let err = store.set(&key, json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_concurrent_updates_keep_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileDocumentStore::new(dir.path()));
        let key = DocumentKey::new("alice", "shop");
        store.set(&key, json!({ "id": "shop" })).await.unwrap();

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                let key = key.clone();
                tokio::spawn(async move {
                    let mut fields = Map::new();
                    fields.insert(format!("f{}", i), json!(i));
                    store.update(&key, Value::Object(fields)).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let doc = store.get(&key).await.unwrap().unwrap();
        for i in 0..32 {
            assert_eq!(doc[format!("f{}", i).as_str()], i);
        }
        assert_eq!(store.list("alice").await.unwrap(), vec!["shop"]);
    }
}
