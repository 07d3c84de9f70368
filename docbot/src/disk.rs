//! Persistent on-disk vector index.
//!
//! [`DiskIndex`] is addressed by a directory path; each collection lives in
//! its own JSON file under that directory and is an independent namespace.
//! Collections are loaded once at open and held in memory; every mutation
//! rewrites the collection file through a temp-file-and-rename so a crash
//! mid-write cannot leave a torn file behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{IndexedDocument, SearchResult};
use crate::error::{DocbotError, Result};
use crate::inmemory::{check_dimensions, rank};
use crate::vectorstore::VectorIndex;

const BACKEND: &str = "disk";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    dimensions: usize,
    documents: HashMap<String, IndexedDocument>,
}

/// A persistent [`VectorIndex`] storing one JSON file per collection under a
/// directory.
///
/// The directory is created on open if absent. The single-writer model of
/// the indexing pipeline means file rewrites never race each other; readers
/// are served from the in-memory copy.
#[derive(Debug)]
pub struct DiskIndex {
    dir: PathBuf,
    collections: RwLock<HashMap<String, Collection>>,
}

fn unavailable(message: String) -> DocbotError {
    DocbotError::Index { backend: BACKEND.to_string(), message }
}

fn missing_collection(name: &str) -> DocbotError {
    unavailable(format!("collection '{name}' does not exist"))
}

impl DiskIndex {
    /// Open (or initialize) a disk index rooted at `dir`, loading every
    /// existing collection file.
    ///
    /// # Errors
    ///
    /// Returns [`DocbotError::Index`] if the directory cannot be created or
    /// read, or if a collection file is corrupt.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| unavailable(format!("cannot create '{}': {e}", dir.display())))?;

        let mut collections = HashMap::new();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| unavailable(format!("cannot read '{}': {e}", dir.display())))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| unavailable(format!("cannot read '{}': {e}", dir.display())))?
        {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let collection = load_collection(&path).await?;
            debug!(
                collection = name,
                documents = collection.documents.len(),
                "loaded collection from disk"
            );
            collections.insert(name.to_string(), collection);
        }

        info!(dir = %dir.display(), collections = collections.len(), "opened disk index");
        Ok(Self { dir, collections: RwLock::new(collections) })
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Serialize a collection and atomically replace its file.
    async fn persist(&self, name: &str, collection: &Collection) -> Result<()> {
        let path = self.collection_path(name);
        let tmp = self.dir.join(format!(".{name}.json.tmp"));

        let bytes = serde_json::to_vec(collection)
            .map_err(|e| unavailable(format!("cannot serialize collection '{name}': {e}")))?;
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| unavailable(format!("cannot write '{}': {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| unavailable(format!("cannot replace '{}': {e}", path.display())))?;

        Ok(())
    }
}

async fn load_collection(path: &Path) -> Result<Collection> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| unavailable(format!("cannot read '{}': {e}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| unavailable(format!("corrupt collection file '{}': {e}", path.display())))
}

#[async_trait]
impl VectorIndex for DiskIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Ok(());
        }
        let collection = Collection { dimensions, documents: HashMap::new() };
        self.persist(name, &collection).await?;
        collections.insert(name.to_string(), collection);
        info!(collection = name, dimensions, "created collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, documents: &[IndexedDocument]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let stored =
            collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        check_dimensions(BACKEND, stored.dimensions, documents)?;
        for document in documents {
            stored.documents.insert(document.id.clone(), document.clone());
        }
        let snapshot = &*stored;
        self.persist(collection, snapshot).await
    }

    async fn remove(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let stored =
            collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for id in ids {
            stored.documents.remove(*id);
        }
        let snapshot = &*stored;
        self.persist(collection, snapshot).await
    }

    async fn ids(&self, collection: &str) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        let stored = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(stored.documents.keys().cloned().collect())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let stored = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(rank(stored.documents.values(), embedding, top_k))
    }
}
