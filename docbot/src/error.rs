//! Error types for the `docbot` crate.

use thiserror::Error;

/// Errors that can occur while indexing or answering questions.
#[derive(Debug, Error)]
pub enum DocbotError {
    /// The corpus file is missing, unreadable, or lacks a required column.
    ///
    /// Always fatal to an indexing run.
    #[error("Corpus schema error: {0}")]
    Schema(String),

    /// An embedding call failed (transport error, non-success status, or timeout).
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A completion call failed (transport error, non-success status, or timeout).
    #[error("Completion error ({provider}): {message}")]
    Completion {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A vector index operation failed, including an unreachable or corrupt
    /// backing store.
    #[error("Vector index error ({backend}): {message}")]
    Index {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for docbot operations.
pub type Result<T> = std::result::Result<T, DocbotError>;
