//! Query-time retrieval: embed a question, search the index.

use std::sync::Arc;

use tracing::{debug, error};

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorIndex;

/// Fetches the documents most relevant to a natural-language question.
///
/// Read-only over the index; the embedding provider must be the same one the
/// collection was populated with, or scores are meaningless.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    collection: String,
}

impl Retriever {
    /// Create a retriever over the given collection.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self { embedder, index, collection: collection.into() }
    }

    /// Retrieve the `top_k` documents most similar to `question`, ordered by
    /// decreasing similarity.
    ///
    /// # Errors
    ///
    /// A failure to embed the question or to search the index is fatal to
    /// the query and propagates to the caller; there is no fallback answer.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let embedding = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            e
        })?;

        let results = self.index.search(&self.collection, &embedding, top_k).await?;
        debug!(collection = %self.collection, top_k, results = results.len(), "retrieved");
        Ok(results)
    }
}
