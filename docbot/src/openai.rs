//! Providers for OpenAI-compatible embeddings and chat completions endpoints.
//!
//! Both a hosted service (Groq) and a local Ollama instance speak this API,
//! so one pair of clients covers every deployment target. Requests go
//! through `reqwest` with the configured timeout; a timeout surfaces as the
//! same provider error as any other transport failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::completion::CompletionProvider;
use crate::config::{CompletionConfig, EmbeddingConfig};
use crate::embedding::EmbeddingProvider;
use crate::error::{DocbotError, Result};

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible `/embeddings`
/// endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use docbot::openai::OpenAiEmbeddingProvider;
///
/// let provider = OpenAiEmbeddingProvider::new(&config.embedding, config.request_timeout)?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddingProvider {
    /// Create a new provider from embedding settings and a request timeout.
    pub fn new(config: &EmbeddingConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            DocbotError::Embedding {
                provider: config.model.clone(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }

    fn embedding_error(&self, message: String) -> DocbotError {
        DocbotError::Embedding { provider: self.model.clone(), message }
    }
}

// ── wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract a readable message from an error response body, falling back to
/// the raw body when it is not the standard error envelope.
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, text_len = text.len(), "embedding text");

        let request_body = EmbeddingRequest { model: &self.model, input: vec![text] };

        let mut request =
            self.client.post(format!("{}/embeddings", self.base_url)).json(&request_body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(model = %self.model, error = %e, "embedding request failed");
            self.embedding_error(format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(model = %self.model, %status, "embedding API error");
            return Err(self.embedding_error(format!("API returned {status}: {detail}")));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| self.embedding_error(format!("failed to parse response: {e}")))?;

        let embedding = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| self.embedding_error("API returned empty response".to_string()))?;

        if embedding.len() != self.dimensions {
            return Err(self.embedding_error(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A [`CompletionProvider`] backed by an OpenAI-compatible
/// `/chat/completions` endpoint.
///
/// The prompt is sent as a single user message; temperature comes from the
/// configuration (0.0 by default, keeping answers deterministic).
pub struct OpenAiCompletionProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompletionProvider {
    /// Create a new provider from completion settings and a request timeout.
    pub fn new(config: &CompletionConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            DocbotError::Completion {
                provider: config.model.clone(),
                message: format!("failed to build HTTP client: {e}"),
            }
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn completion_error(&self, message: String) -> DocbotError {
        DocbotError::Completion { provider: self.model.clone(), message }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting completion");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };

        let mut request =
            self.client.post(format!("{}/chat/completions", self.base_url)).json(&request_body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(model = %self.model, error = %e, "completion request failed");
            self.completion_error(format!("request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(model = %self.model, %status, "completion API error");
            return Err(self.completion_error(format!("API returned {status}: {detail}")));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.completion_error(format!("failed to parse response: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| self.completion_error("API returned no choices".to_string()))
    }
}
