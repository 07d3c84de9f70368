//! Completion provider trait for language-model text generation.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that completes a text prompt with a language model.
///
/// The single-operation surface keeps concrete backends swappable without
/// touching retrieval or assembly logic; provider selection happens once at
/// process start.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
