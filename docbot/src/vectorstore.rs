//! Vector index trait for storing and searching embedded documents.

use async_trait::async_trait;

use crate::document::{IndexedDocument, SearchResult};
use crate::error::Result;

/// A storage backend for embedded documents with similarity search.
///
/// Implementations manage named collections of [`IndexedDocument`]s. The
/// system assumes a single concurrent writer (the indexing run) and
/// arbitrarily many readers; upsert is atomic per document, so an aborted
/// run leaves already-applied batches valid.
///
/// # Example
///
/// ```rust,ignore
/// use docbot::{VectorIndex, InMemoryIndex};
///
/// let index = InMemoryIndex::new();
/// index.ensure_collection("docs", 1024).await?;
/// index.upsert("docs", &documents).await?;
/// let results = index.search("docs", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create a named collection with the given dimensionality.
    /// No-op if it already exists.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Insert-or-replace documents by id.
    ///
    /// Rejects documents whose embedding length differs from the
    /// collection's dimensionality.
    async fn upsert(&self, collection: &str, documents: &[IndexedDocument]) -> Result<()>;

    /// Delete documents by their ids. Unknown ids are ignored.
    async fn remove(&self, collection: &str, ids: &[&str]) -> Result<()>;

    /// Return the ids of all stored documents, in no particular order.
    async fn ids(&self, collection: &str) -> Result<Vec<String>>;

    /// Search for the `top_k` documents most similar to the given embedding.
    ///
    /// Returns results ordered by descending similarity score; fewer than
    /// `top_k` only when the collection holds fewer documents.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
