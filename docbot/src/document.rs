//! Data types for corpus documents, indexed documents, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key under which a document's citation link is stored.
pub const META_SOURCE: &str = "source";
/// Metadata key under which a document's text is mirrored.
pub const META_TEXT: &str = "text";

/// A normalized corpus record: the canonical `{id, source, text}` triple.
///
/// `id` is the sole stable identity across pipeline runs: re-indexing the
/// same id overwrites the stored entry, never duplicates it. `source` is the
/// URL fragment used for citations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Unique, stable identifier for the document.
    pub id: String,
    /// URL fragment pointing at the original page, used for citation.
    pub source: String,
    /// The text content of the document. Non-empty after normalization.
    pub text: String,
}

/// A [`Document`] with its vector embedding and storage metadata attached.
///
/// The metadata map carries the `source` and `text` keys so that a retrieved
/// entry is self-describing without a second lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedDocument {
    /// Unique identifier, shared with the originating [`Document`].
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// The embedding vector for this document's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata, always including `source` and `text`.
    pub metadata: HashMap<String, String>,
}

impl IndexedDocument {
    /// Build an indexed document from a normalized record and its embedding.
    pub fn from_document(document: &Document, embedding: Vec<f32>) -> Self {
        let metadata = HashMap::from([
            (META_SOURCE.to_string(), document.source.clone()),
            (META_TEXT.to_string(), document.text.clone()),
        ]);
        Self { id: document.id.clone(), text: document.text.clone(), embedding, metadata }
    }

    /// The citation link stored in this document's metadata, if present.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(META_SOURCE).map(String::as_str)
    }
}

/// A retrieved [`IndexedDocument`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved document.
    pub document: IndexedDocument,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
