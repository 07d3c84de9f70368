//! Configuration for the indexing pipeline and query engine.
//!
//! All tunables live in one [`DocbotConfig`] constructed once at startup and
//! passed by reference into every component; nothing else in the crate reads
//! the process environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DocbotError, Result};

/// Hosted OpenAI-compatible endpoint used when `GROQ_API_KEY` is set.
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Local OpenAI-compatible endpoint (Ollama) used otherwise.
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Settings for the embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Base URL of an OpenAI-compatible embeddings endpoint.
    pub base_url: String,
    /// API key, empty for unauthenticated local endpoints.
    pub api_key: String,
    /// Embedding model name.
    pub model: String,
    /// Dimensionality of the vectors the model produces.
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: OLLAMA_BASE_URL.to_string(),
            api_key: String::new(),
            model: "bge-m3".to_string(),
            dimensions: 1024,
        }
    }
}

/// Settings for the completion provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    pub base_url: String,
    /// API key, empty for unauthenticated local endpoints.
    pub api_key: String,
    /// Completion model name.
    pub model: String,
    /// Sampling temperature. 0.0 keeps answers deterministic.
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: OLLAMA_BASE_URL.to_string(),
            api_key: String::new(),
            model: "llama3".to_string(),
            temperature: 0.0,
        }
    }
}

/// Configuration parameters for indexing and querying.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocbotConfig {
    /// Embedding provider settings.
    pub embedding: EmbeddingConfig,
    /// Completion provider settings.
    pub completion: CompletionConfig,
    /// Number of top results to return from vector search.
    pub top_k: usize,
    /// Maximum number of documents per upsert batch.
    pub batch_size: usize,
    /// Maximum number of corpus rows read per indexing run.
    pub max_rows: usize,
    /// Timeout applied to each embedding and completion request.
    pub request_timeout: Duration,
    /// Directory holding the persistent vector index.
    pub index_dir: PathBuf,
    /// Collection name shared by the indexing pipeline and the retriever.
    pub collection: String,
    /// Domain prepended to each document's source link in citations.
    pub base_domain: String,
    /// Remove indexed ids that are absent from the latest corpus.
    pub prune_missing: bool,
}

impl Default for DocbotConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            completion: CompletionConfig::default(),
            top_k: 5,
            batch_size: 200,
            max_rows: 2000,
            request_timeout: Duration::from_secs(30),
            index_dir: PathBuf::from("./index_db"),
            collection: "docs".to_string(),
            base_domain: String::new(),
            prune_missing: false,
        }
    }
}

impl DocbotConfig {
    /// Create a new builder for constructing a [`DocbotConfig`].
    pub fn builder() -> DocbotConfigBuilder {
        DocbotConfigBuilder::default()
    }

    /// Build a configuration from the process environment.
    ///
    /// Recognized variables, all optional:
    ///
    /// - `DOCBOT_EMBEDDING_URL`, `DOCBOT_EMBEDDING_API_KEY`,
    ///   `DOCBOT_EMBEDDING_MODEL`, `DOCBOT_EMBEDDING_DIMENSIONS`
    /// - `GROQ_API_KEY` — when set, completions go to the Groq endpoint with
    ///   an instruction-tuned hosted model; otherwise a local Ollama endpoint
    ///   is used
    /// - `DOCBOT_COMPLETION_URL`, `DOCBOT_COMPLETION_MODEL`, `DOCBOT_TEMPERATURE`
    /// - `DOCBOT_TOP_K`, `DOCBOT_BATCH_SIZE`, `DOCBOT_MAX_ROWS`, `DOCBOT_TIMEOUT_SECS`
    /// - `DOCBOT_INDEX_DIR`, `DOCBOT_COLLECTION`, `DOCBOT_BASE_DOMAIN`
    /// - `DOCBOT_PRUNE_MISSING` — `1`/`true` enables reconciliation
    ///
    /// # Errors
    ///
    /// Returns [`DocbotError::Config`] if a numeric variable fails to parse
    /// or the resulting configuration fails validation.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();

        if let Ok(url) = std::env::var("DOCBOT_EMBEDDING_URL") {
            builder = builder.embedding_base_url(url);
        }
        if let Ok(key) = std::env::var("DOCBOT_EMBEDDING_API_KEY") {
            builder = builder.embedding_api_key(key);
        }
        if let Ok(model) = std::env::var("DOCBOT_EMBEDDING_MODEL") {
            builder = builder.embedding_model(model);
        }
        if let Ok(dims) = std::env::var("DOCBOT_EMBEDDING_DIMENSIONS") {
            builder = builder.embedding_dimensions(parse_var("DOCBOT_EMBEDDING_DIMENSIONS", &dims)?);
        }

        // Prefer the hosted endpoint when a Groq key is present, the local
        // Ollama endpoint otherwise.
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                builder = builder
                    .completion_base_url(GROQ_BASE_URL)
                    .completion_api_key(key)
                    .completion_model("llama-3.1-8b-instant");
            }
        }
        if let Ok(url) = std::env::var("DOCBOT_COMPLETION_URL") {
            builder = builder.completion_base_url(url);
        }
        if let Ok(model) = std::env::var("DOCBOT_COMPLETION_MODEL") {
            builder = builder.completion_model(model);
        }
        if let Ok(temp) = std::env::var("DOCBOT_TEMPERATURE") {
            builder = builder.temperature(parse_var("DOCBOT_TEMPERATURE", &temp)?);
        }

        if let Ok(k) = std::env::var("DOCBOT_TOP_K") {
            builder = builder.top_k(parse_var("DOCBOT_TOP_K", &k)?);
        }
        if let Ok(size) = std::env::var("DOCBOT_BATCH_SIZE") {
            builder = builder.batch_size(parse_var("DOCBOT_BATCH_SIZE", &size)?);
        }
        if let Ok(rows) = std::env::var("DOCBOT_MAX_ROWS") {
            builder = builder.max_rows(parse_var("DOCBOT_MAX_ROWS", &rows)?);
        }
        if let Ok(secs) = std::env::var("DOCBOT_TIMEOUT_SECS") {
            let secs: u64 = parse_var("DOCBOT_TIMEOUT_SECS", &secs)?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        if let Ok(dir) = std::env::var("DOCBOT_INDEX_DIR") {
            builder = builder.index_dir(dir);
        }
        if let Ok(collection) = std::env::var("DOCBOT_COLLECTION") {
            builder = builder.collection(collection);
        }
        if let Ok(domain) = std::env::var("DOCBOT_BASE_DOMAIN") {
            builder = builder.base_domain(domain);
        }
        if let Ok(flag) = std::env::var("DOCBOT_PRUNE_MISSING") {
            builder = builder.prune_missing(flag == "1" || flag.eq_ignore_ascii_case("true"));
        }

        builder.build()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| DocbotError::Config(format!("invalid value for {name}: '{value}'")))
}

/// Builder for constructing a validated [`DocbotConfig`].
#[derive(Debug, Clone, Default)]
pub struct DocbotConfigBuilder {
    config: DocbotConfig,
}

impl DocbotConfigBuilder {
    /// Set the embedding endpoint base URL.
    pub fn embedding_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.embedding.base_url = url.into();
        self
    }

    /// Set the embedding endpoint API key.
    pub fn embedding_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.embedding.api_key = key.into();
        self
    }

    /// Set the embedding model name.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding.model = model.into();
        self
    }

    /// Set the embedding dimensionality.
    pub fn embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.config.embedding.dimensions = dimensions;
        self
    }

    /// Set the completion endpoint base URL.
    pub fn completion_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.completion.base_url = url.into();
        self
    }

    /// Set the completion endpoint API key.
    pub fn completion_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.completion.api_key = key.into();
        self
    }

    /// Set the completion model name.
    pub fn completion_model(mut self, model: impl Into<String>) -> Self {
        self.config.completion.model = model.into();
        self
    }

    /// Set the completion sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.completion.temperature = temperature;
        self
    }

    /// Set the number of top results returned from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum number of documents per upsert batch.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the corpus row cap.
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.config.max_rows = rows;
        self
    }

    /// Set the per-request timeout for provider calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the persistent index directory.
    pub fn index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.index_dir = dir.into();
        self
    }

    /// Set the collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Set the domain prepended to citation links.
    pub fn base_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.base_domain = domain.into();
        self
    }

    /// Enable or disable reconciliation of vanished corpus ids.
    pub fn prune_missing(mut self, prune: bool) -> Self {
        self.config.prune_missing = prune;
        self
    }

    /// Build the [`DocbotConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DocbotError::Config`] if:
    /// - `top_k == 0`
    /// - `batch_size == 0`
    /// - `embedding.dimensions == 0`
    pub fn build(self) -> Result<DocbotConfig> {
        if self.config.top_k == 0 {
            return Err(DocbotError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.batch_size == 0 {
            return Err(DocbotError::Config("batch_size must be greater than zero".to_string()));
        }
        if self.config.embedding.dimensions == 0 {
            return Err(DocbotError::Config(
                "embedding dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DocbotConfig::builder().build().unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.batch_size, 200);
        assert_eq!(config.max_rows, 2000);
        assert_eq!(config.completion.temperature, 0.0);
    }

    #[test]
    fn zero_top_k_rejected() {
        let err = DocbotConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, DocbotError::Config(_)));
    }

    #[test]
    fn zero_batch_size_rejected() {
        let err = DocbotConfig::builder().batch_size(0).build().unwrap_err();
        assert!(matches!(err, DocbotError::Config(_)));
    }
}
