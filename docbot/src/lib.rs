//! # docbot
//!
//! Document indexing and retrieval-augmented question answering over an
//! internal documentation corpus.
//!
//! ## Overview
//!
//! A corpus CSV of page records is normalized, embedded, and upserted into a
//! named vector collection; at query time the question is embedded, the
//! top-k nearest documents are retrieved, and a completion model produces an
//! answer returned with a `Sources` block citing each retrieved page.
//!
//! - [`IndexingPipeline`] — normalize → embed → batched upsert
//! - [`QaEngine`] — retrieve → assemble → cited answer
//! - [`VectorIndex`] — pluggable storage ([`InMemoryIndex`], [`DiskIndex`])
//! - [`EmbeddingProvider`] / [`CompletionProvider`] — pluggable models
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docbot::{DiskIndex, DocbotConfig, IndexingPipeline, QaEngine};
//! use docbot::openai::{OpenAiCompletionProvider, OpenAiEmbeddingProvider};
//!
//! let config = DocbotConfig::from_env()?;
//! let embedder = Arc::new(OpenAiEmbeddingProvider::new(&config.embedding, config.request_timeout)?);
//! let completer = Arc::new(OpenAiCompletionProvider::new(&config.completion, config.request_timeout)?);
//! let index = Arc::new(DiskIndex::open(&config.index_dir).await?);
//!
//! let pipeline = IndexingPipeline::builder()
//!     .config(config.clone())
//!     .embedder(embedder.clone())
//!     .index(index.clone())
//!     .build()?;
//! let report = pipeline.run("./data/kb.csv".as_ref()).await?;
//!
//! let engine = QaEngine::new(&config, embedder, completer, index);
//! let answer = engine.query("How many approvals are needed to deploy?").await?;
//! ```

pub mod answer;
pub mod completion;
pub mod config;
pub mod corpus;
pub mod disk;
pub mod document;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod inmemory;
pub mod openai;
pub mod pipeline;
pub mod retriever;
pub mod vectorstore;

pub use answer::{Answer, AnswerAssembler};
pub use completion::CompletionProvider;
pub use config::{CompletionConfig, DocbotConfig, DocbotConfigBuilder, EmbeddingConfig};
pub use corpus::{NormalizedCorpus, load_corpus};
pub use disk::DiskIndex;
pub use document::{Document, IndexedDocument, SearchResult};
pub use embedding::EmbeddingProvider;
pub use engine::QaEngine;
pub use error::{DocbotError, Result};
pub use inmemory::InMemoryIndex;
pub use pipeline::{FailedBatch, IndexReport, IndexingPipeline};
pub use retriever::Retriever;
pub use vectorstore::VectorIndex;
