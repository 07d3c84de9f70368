//! Corpus indexing pipeline.
//!
//! [`IndexingPipeline`] drives a full corpus (re)build through three linear
//! stages: normalize the corpus file, embed each document, upsert into the
//! vector index in fixed-size batches. Per-record embedding failures and
//! per-batch upsert failures are recovered locally and reported; schema and
//! index-availability failures abort the run.
//!
//! A run is idempotent: every upsert is keyed by document id, so re-running
//! over an unchanged corpus leaves the index in the same logical state.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::DocbotConfig;
use crate::corpus::load_corpus;
use crate::document::{Document, IndexedDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{DocbotError, Result};
use crate::vectorstore::VectorIndex;

/// A batch whose upsert failed, identified by the exact ids it contained.
///
/// The caller can retry just these ids in a later run; they are never
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBatch {
    /// Ids of every document in the failed batch.
    pub ids: Vec<String>,
    /// The upsert error, rendered.
    pub error: String,
}

/// Summary of one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Corpus rows that normalized cleanly.
    pub rows_accepted: usize,
    /// Corpus rows dropped during normalization.
    pub rows_rejected: usize,
    /// Documents successfully embedded.
    pub documents_embedded: usize,
    /// Documents successfully upserted into the index.
    pub documents_indexed: usize,
    /// Batches whose upsert failed, with their ids.
    pub failed_batches: Vec<FailedBatch>,
    /// Ids removed by reconciliation (0 unless `prune_missing` is enabled).
    pub documents_pruned: usize,
}

/// The indexing pipeline orchestrator.
///
/// Construct one via [`IndexingPipeline::builder()`].
pub struct IndexingPipeline {
    config: DocbotConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl IndexingPipeline {
    /// Create a new [`IndexingPipelineBuilder`].
    pub fn builder() -> IndexingPipelineBuilder {
        IndexingPipelineBuilder::default()
    }

    /// Run a full corpus (re)build from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`DocbotError::Schema`] for a missing/malformed corpus and
    /// [`DocbotError::Index`] if the collection cannot be created. Per-record
    /// and per-batch failures do not abort the run; they are counted in the
    /// returned [`IndexReport`].
    pub async fn run(&self, corpus_path: &Path) -> Result<IndexReport> {
        let corpus = load_corpus(corpus_path, self.config.max_rows)?;
        let mut report = self.index_documents(&corpus.documents).await?;
        report.rows_accepted = corpus.documents.len();
        report.rows_rejected = corpus.rejected;

        info!(
            rows_accepted = report.rows_accepted,
            rows_rejected = report.rows_rejected,
            documents_embedded = report.documents_embedded,
            documents_indexed = report.documents_indexed,
            failed_batches = report.failed_batches.len(),
            documents_pruned = report.documents_pruned,
            "indexing run complete"
        );

        Ok(report)
    }

    /// Embed and upsert already-normalized documents.
    ///
    /// This is the EMBED → UPSERT tail of [`run`](IndexingPipeline::run),
    /// exposed so callers with an in-memory corpus can skip the CSV stage.
    pub async fn index_documents(&self, documents: &[Document]) -> Result<IndexReport> {
        let collection = self.config.collection.as_str();
        self.index.ensure_collection(collection, self.embedder.dimensions()).await?;

        // EMBED: one call per document, skip-and-count on failure. A document
        // that fails here is simply absent from the index until a future run
        // re-embeds it.
        let mut embedded = Vec::with_capacity(documents.len());
        for document in documents {
            match self.embedder.embed(&document.text).await {
                Ok(embedding) => {
                    embedded.push(IndexedDocument::from_document(document, embedding));
                }
                Err(e) => {
                    warn!(id = %document.id, error = %e, "embedding failed, skipping document");
                }
            }
        }

        // UPSERT: fixed-size batches, remainder flushed by `chunks`. A failed
        // batch is reported with its ids so the caller can retry exactly that
        // slice of the corpus.
        let mut report = IndexReport { documents_embedded: embedded.len(), ..Default::default() };
        for batch in embedded.chunks(self.config.batch_size) {
            match self.index.upsert(collection, batch).await {
                Ok(()) => report.documents_indexed += batch.len(),
                Err(e) => {
                    let ids: Vec<String> = batch.iter().map(|d| d.id.clone()).collect();
                    error!(
                        collection,
                        batch_len = batch.len(),
                        error = %e,
                        "batch upsert failed"
                    );
                    report.failed_batches.push(FailedBatch { ids, error: e.to_string() });
                }
            }
        }

        if self.config.prune_missing {
            report.documents_pruned = self.prune(collection, documents).await?;
        }

        Ok(report)
    }

    /// Remove ids present in the collection but absent from the corpus.
    ///
    /// Documents whose embedding or upsert failed this run are still part of
    /// the corpus, so reconciliation never removes them.
    async fn prune(&self, collection: &str, documents: &[Document]) -> Result<usize> {
        let corpus_ids: HashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        let stored = self.index.ids(collection).await?;
        let stale: Vec<&str> =
            stored.iter().map(String::as_str).filter(|id| !corpus_ids.contains(id)).collect();

        if stale.is_empty() {
            return Ok(0);
        }

        self.index.remove(collection, &stale).await?;
        info!(collection, pruned = stale.len(), "removed documents absent from corpus");
        Ok(stale.len())
    }
}

/// Builder for constructing an [`IndexingPipeline`].
#[derive(Default)]
pub struct IndexingPipelineBuilder {
    config: Option<DocbotConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl IndexingPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: DocbotConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`IndexingPipeline`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`DocbotError::Config`] if any required field is missing.
    pub fn build(self) -> Result<IndexingPipeline> {
        let config =
            self.config.ok_or_else(|| DocbotError::Config("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| DocbotError::Config("embedder is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| DocbotError::Config("index is required".to_string()))?;

        Ok(IndexingPipeline { config, embedder, index })
    }
}
