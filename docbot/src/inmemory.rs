//! In-memory vector index using cosine similarity.
//!
//! [`InMemoryIndex`] keeps collections in a `HashMap` behind a
//! `tokio::sync::RwLock`. It is the backend of choice for tests and
//! small, non-persistent deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexedDocument, SearchResult};
use crate::error::{DocbotError, Result};
use crate::vectorstore::VectorIndex;

const BACKEND: &str = "in-memory";

#[derive(Debug, Default)]
struct Collection {
    dimensions: usize,
    documents: HashMap<String, IndexedDocument>,
}

/// An in-memory vector index using cosine similarity for search.
///
/// Collections are stored as collection name → document id → document.
/// All operations are async-safe via `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryIndex {
    /// Create a new empty in-memory index.
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing_collection(name: &str) -> DocbotError {
    DocbotError::Index {
        backend: BACKEND.to_string(),
        message: format!("collection '{name}' does not exist"),
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Validate that every document's embedding matches the collection
/// dimensionality.
pub(crate) fn check_dimensions(
    backend: &str,
    dimensions: usize,
    documents: &[IndexedDocument],
) -> Result<()> {
    for document in documents {
        if document.embedding.len() != dimensions {
            return Err(DocbotError::Index {
                backend: backend.to_string(),
                message: format!(
                    "document '{}' has embedding of length {}, collection expects {dimensions}",
                    document.id,
                    document.embedding.len()
                ),
            });
        }
    }
    Ok(())
}

/// Score every stored document against the query and keep the top `top_k`.
pub(crate) fn rank<'a, I>(documents: I, embedding: &[f32], top_k: usize) -> Vec<SearchResult>
where
    I: Iterator<Item = &'a IndexedDocument>,
{
    let mut scored: Vec<SearchResult> = documents
        .map(|document| {
            let score = cosine_similarity(&document.embedding, embedding);
            SearchResult { document: document.clone(), score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(name.to_string())
            .or_insert_with(|| Collection { dimensions, documents: HashMap::new() });
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
        Ok(())
    }

    async fn remove(&self, collection: &str, ids: &[&str]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let stored =
            collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;
        for id in ids {
            stored.documents.remove(*id);
        }
        Ok(())
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
