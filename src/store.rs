//! Document store for activity records.
//!
//! Every document lives in memory in insertion order. A file-backed store
//! rewrites the whole collection to disk after each change, going through a
//! temp file and a rename so a crash never leaves a half-written collection.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{Activity, StoreConfig};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("malformed document file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode documents: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("duplicate key {0:?}")]
    DuplicateKey(String),
}

pub struct ActivityStore {
    path: Option<PathBuf>,
    docs: RwLock<Vec<Activity>>,
}

impl ActivityStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            docs: RwLock::new(Vec::new()),
        }
    }

    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.in_memory {
            info!("Using in-memory activity store");
            return Ok(Self::in_memory());
        }
        Self::open_file(&config.path).await
    }

    /// Load the collection from `path`. A missing file is an empty store.
    pub async fn open_file(path: &Path) -> Result<Self, StoreError> {
        let docs: Vec<Activity> = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        info!(
            "Opened activity store at {} ({} documents)",
            path.display(),
            docs.len()
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            docs: RwLock::new(docs),
        })
    }

    pub async fn count(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn find_all(&self) -> Vec<Activity> {
        self.docs.read().await.clone()
    }

    pub async fn find_one(&self, name: &str) -> Option<Activity> {
        self.docs
            .read()
            .await
            .iter()
            .find(|a| a.name == name)
            .cloned()
    }

    pub async fn insert(&self, activity: Activity) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        if docs.iter().any(|a| a.name == activity.name) {
            return Err(StoreError::DuplicateKey(activity.name));
        }
        docs.push(activity);
        if let Err(e) = self.persist(&docs).await {
            docs.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Apply `f` to the document keyed by `name` and persist if it reports a
    /// change. Returns `None` when no such document exists, otherwise what `f`
    /// returned. The lookup and the mutation run under one write lock.
    pub async fn update<F>(&self, name: &str, f: F) -> Result<Option<bool>, StoreError>
    where
        F: FnOnce(&mut Activity) -> bool,
    {
        let mut docs = self.docs.write().await;
        let Some(idx) = docs.iter().position(|a| a.name == name) else {
            return Ok(None);
        };
        let previous = docs[idx].clone();
        if !f(&mut docs[idx]) {
            return Ok(Some(false));
        }
        if let Err(e) = self.persist(&docs).await {
            docs[idx] = previous;
            return Err(e);
        }
        Ok(Some(true))
    }

    async fn persist(&self, docs: &[Activity]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(docs)?;
        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(write_err)?;
        debug!("Wrote {} documents to {}", docs.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(name: &str) -> Activity {
        Activity {
            name: name.into(),
            description: "desc".into(),
            schedule: "Mondays".into(),
            max_participants: 10,
            participants: vec![],
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_key() {
        let store = ActivityStore::in_memory();
        store.insert(activity("Chess Club")).await.unwrap();
        let err = store.insert(activity("Chess Club")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(name) if name == "Chess Club"));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_find_is_case_sensitive() {
        let store = ActivityStore::in_memory();
        store.insert(activity("Chess Club")).await.unwrap();
        assert!(store.find_one("Chess Club").await.is_some());
        assert!(store.find_one("chess club").await.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = ActivityStore::in_memory();
        let res = store.update("Nope", |_| true).await.unwrap();
        assert_eq!(res, None);
    }

    #[tokio::test]
    async fn test_update_reports_change() {
        let store = ActivityStore::in_memory();
        store.insert(activity("Chess Club")).await.unwrap();
        let res = store
            .update("Chess Club", |a| a.add_participant("a@mergington.edu"))
            .await
            .unwrap();
        assert_eq!(res, Some(true));
        let res = store
            .update("Chess Club", |a| a.add_participant("a@mergington.edu"))
            .await
            .unwrap();
        assert_eq!(res, Some(false));
        let doc = store.find_one("Chess Club").await.unwrap();
        assert_eq!(doc.participants, vec!["a@mergington.edu"]);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("activities.json");

        let store = ActivityStore::open_file(&path).await.unwrap();
        assert_eq!(store.count().await, 0);
        store.insert(activity("Chess Club")).await.unwrap();
        store.insert(activity("Drama Club")).await.unwrap();
        store
            .update("Drama Club", |a| a.add_participant("b@mergington.edu"))
            .await
            .unwrap();
        drop(store);

        let reopened = ActivityStore::open_file(&path).await.unwrap();
        let names: Vec<String> = reopened.find_all().await.into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["Chess Club", "Drama Club"]);
        let drama = reopened.find_one("Drama Club").await.unwrap();
        assert_eq!(drama.participants, vec!["b@mergington.edu"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ActivityStore::open_file(&path).await.err().unwrap();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_add_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.json");
        let store = std::sync::Arc::new(ActivityStore::open_file(&path).await.unwrap());
        store.insert(activity("Chess Club")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update("Chess Club", |a| a.add_participant("same@mergington.edu"))
                    .await
                    .unwrap()
            }));
        }
        let mut added = 0;
        for h in handles {
            if h.await.unwrap() == Some(true) {
                added += 1;
            }
        }
        assert_eq!(added, 1);
        assert_eq!(store.find_one("Chess Club").await.unwrap().participants.len(), 1);

        let reopened = ActivityStore::open_file(&path).await.unwrap();
        assert_eq!(
            reopened.find_one("Chess Club").await.unwrap().participants,
            vec!["same@mergington.edu"]
        );
    }

    #[tokio::test]
    async fn test_failed_insert_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.json");
        let store = ActivityStore::open_file(&path).await.unwrap();
        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let err = store.insert(activity("Chess Club")).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.count().await, 0);
        assert!(store.find_one("Chess Club").await.is_none());
    }

    #[tokio::test]
    async fn test_failed_update_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activities.json");
        let store = ActivityStore::open_file(&path).await.unwrap();
        store.insert(activity("Chess Club")).await.unwrap();
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let err = store
            .update("Chess Club", |a| a.add_participant("z@mergington.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert!(store.find_one("Chess Club").await.unwrap().participants.is_empty());
    }
}
