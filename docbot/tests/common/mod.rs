//! Shared test doubles: deterministic providers and instrumented indexes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docbot::{
    CompletionProvider, DocbotError, EmbeddingProvider, IndexedDocument, InMemoryIndex,
    SearchResult, VectorIndex,
};

/// Deterministic hash-based embedder: same text, same vector, fixed length.
pub struct HashEmbedder {
    pub dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> docbot::Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Embedder with a fixed text → vector table. Unmapped text fails, which
/// doubles as the per-record embedding-failure case.
pub struct StaticEmbedder {
    pub vectors: HashMap<String, Vec<f32>>,
    pub dimensions: usize,
}

impl StaticEmbedder {
    pub fn new(dimensions: usize, entries: &[(&str, Vec<f32>)]) -> Self {
        let vectors =
            entries.iter().map(|(text, v)| (text.to_string(), v.clone())).collect();
        Self { vectors, dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed(&self, text: &str) -> docbot::Result<Vec<f32>> {
        self.vectors.get(text).cloned().ok_or_else(|| DocbotError::Embedding {
            provider: "static".to_string(),
            message: format!("no vector for '{text}'"),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Completer that always returns the same reply.
pub struct StaticCompleter {
    pub reply: String,
}

#[async_trait]
impl CompletionProvider for StaticCompleter {
    async fn complete(&self, _prompt: &str) -> docbot::Result<String> {
        Ok(self.reply.clone())
    }
}

/// Completer that always fails.
pub struct FailingCompleter;

#[async_trait]
impl CompletionProvider for FailingCompleter {
    async fn complete(&self, _prompt: &str) -> docbot::Result<String> {
        Err(DocbotError::Completion {
            provider: "failing".to_string(),
            message: "provider down".to_string(),
        })
    }
}

/// Wraps an [`InMemoryIndex`], counting upsert calls.
pub struct CountingIndex {
    pub inner: InMemoryIndex,
    pub upsert_calls: AtomicUsize,
}

impl CountingIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { inner: InMemoryIndex::new(), upsert_calls: AtomicUsize::new(0) })
    }

    pub fn upserts(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorIndex for CountingIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> docbot::Result<()> {
        self.inner.ensure_collection(name, dimensions).await
    }

    async fn upsert(
        &self,
        collection: &str,
        documents: &[IndexedDocument],
    ) -> docbot::Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(collection, documents).await
    }

    async fn remove(&self, collection: &str, ids: &[&str]) -> docbot::Result<()> {
        self.inner.remove(collection, ids).await
    }

    async fn ids(&self, collection: &str) -> docbot::Result<Vec<String>> {
        self.inner.ids(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> docbot::Result<Vec<SearchResult>> {
        self.inner.search(collection, embedding, top_k).await
    }
}

/// Wraps an [`InMemoryIndex`], failing any upsert batch that contains the
/// poison id.
pub struct PoisonedIndex {
    pub inner: InMemoryIndex,
    pub poison_id: String,
}

impl PoisonedIndex {
    pub fn new(poison_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { inner: InMemoryIndex::new(), poison_id: poison_id.into() })
    }
}

#[async_trait]
impl VectorIndex for PoisonedIndex {
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> docbot::Result<()> {
        self.inner.ensure_collection(name, dimensions).await
    }

    async fn upsert(
        &self,
        collection: &str,
        documents: &[IndexedDocument],
    ) -> docbot::Result<()> {
        if documents.iter().any(|d| d.id == self.poison_id) {
            return Err(DocbotError::Index {
                backend: "poisoned".to_string(),
                message: "simulated upsert failure".to_string(),
            });
        }
        self.inner.upsert(collection, documents).await
    }

    async fn remove(&self, collection: &str, ids: &[&str]) -> docbot::Result<()> {
        self.inner.remove(collection, ids).await
    }

    async fn ids(&self, collection: &str) -> docbot::Result<Vec<String>> {
        self.inner.ids(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> docbot::Result<Vec<SearchResult>> {
        self.inner.search(collection, embedding, top_k).await
    }
}
