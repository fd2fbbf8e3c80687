use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::{DraftError, DraftRecord};

/// Every draft, persisted as one JSON document `{"drafts": {<id>: <record>}}`.
///
/// Stored records are kept as opaque JSON so an entry edited out of band is
/// returned verbatim and never causes its siblings to be dropped. Other
/// top-level keys of the document are carried through saves.
#[derive(Debug, Default, Clone)]
pub struct DraftCollection {
    pub drafts: Map<String, Value>,
    rest: Map<String, Value>,
}

impl DraftCollection {
    /// Build a collection from a parsed document. A non-object document, or a
    /// `drafts` entry that is not an object, yields no drafts.
    fn from_document(document: Value) -> Result<Self, &'static str> {
        let Value::Object(mut rest) = document else {
            return Err("top-level value is not an object");
        };
        match rest.remove("drafts") {
            None => Ok(Self { drafts: Map::new(), rest }),
            Some(Value::Object(drafts)) => Ok(Self { drafts, rest }),
            Some(_) => Err("`drafts` is not an object"),
        }
    }

    fn to_document(&self) -> Value {
        let mut document = Map::new();
        document.insert("drafts".to_string(), Value::Object(self.drafts.clone()));
        document.extend(self.rest.clone());
        Value::Object(document)
    }
}

/// File backed draft storage.
///
/// Writes replace the whole collection through a temporary file and a rename,
/// so readers never observe a partially written file. Read-modify-write cycles
/// are serialized by `write_lock` and run on their own task, so a caller that
/// goes away mid-request cannot leave a write half done.
#[derive(Clone)]
pub struct DraftStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl DraftStore {
    /// Open the store at `path`, creating its parent directory if missing.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DraftError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DraftError::Storage(format!(
                    "failed to create storage directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
            info!("Storage directory ready at {}", parent.display());
        }
        Ok(Self {
            inner: Arc::new(StoreInner {
                path,
                write_lock: Mutex::new(()),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Insert or fully replace the record stored under `record.id`.
    pub async fn upsert(&self, record: DraftRecord) -> Result<UpsertOutcome, DraftError> {
        let store = self.clone();
        tokio::spawn(async move { store.upsert_locked(record).await })
            .await
            .map_err(|e| DraftError::Storage(format!("upsert task failed: {}", e)))?
    }

    async fn upsert_locked(&self, record: DraftRecord) -> Result<UpsertOutcome, DraftError> {
        let _guard = self.inner.write_lock.lock().await;

        let value = serde_json::to_value(&record)
            .map_err(|e| DraftError::Storage(format!("failed to encode draft: {}", e)))?;
        let mut collection = self.load().await?;
        let outcome = match collection.drafts.insert(record.id, value) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        };
        self.save(&collection).await?;
        Ok(outcome)
    }

    /// Fetch the record stored under `id`, exactly as stored.
    pub async fn get(&self, id: &str) -> Result<Value, DraftError> {
        let mut collection = self.load().await?;
        collection
            .drafts
            .remove(id)
            .ok_or_else(|| DraftError::NotFound(id.to_string()))
    }

    /// Read the whole collection. A missing file is an empty collection, and so
    /// is a file that is not a JSON object with an object `drafts` entry: the
    /// corruption is logged, not surfaced.
    pub async fn load(&self) -> Result<DraftCollection, DraftError> {
        let path = self.path();
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No drafts file at {}, starting empty", path.display());
                return Ok(DraftCollection::default());
            }
            Err(e) => {
                return Err(DraftError::Storage(format!(
                    "failed to read '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        let parsed = serde_json::from_slice::<Value>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|document| DraftCollection::from_document(document).map_err(str::to_string));
        match parsed {
            Ok(collection) => Ok(collection),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "drafts file is corrupt; treating it as empty, existing drafts will be overwritten on next save"
                );
                Ok(DraftCollection::default())
            }
        }
    }

    /// Write the whole collection through `<file>.json.tmp` and a rename.
    async fn save(&self, collection: &DraftCollection) -> Result<(), DraftError> {
        let path = self.path();
        let payload = serde_json::to_vec_pretty(&collection.to_document())
            .map_err(|e| DraftError::Storage(format!("failed to encode drafts: {}", e)))?;

        let tmp_path = path.with_extension("json.tmp");
        let mut tmp = TempFile::new(tmp_path.clone());
        tokio::fs::write(&tmp_path, payload).await.map_err(|e| {
            DraftError::Storage(format!("failed to write '{}': {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
            DraftError::Storage(format!("failed to replace '{}': {}", path.display(), e))
        })?;
        tmp.persisted();
        Ok(())
    }
}

/// Removes the temporary file on drop unless it was renamed into place.
struct TempFile {
    path: Option<PathBuf>,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn persisted(&mut self) {
        self.path = None;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
