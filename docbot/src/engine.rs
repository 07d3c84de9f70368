//! The query engine: the single entry point chat surfaces call.

use std::sync::Arc;

use tracing::info;

use crate::answer::AnswerAssembler;
use crate::completion::CompletionProvider;
use crate::config::DocbotConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::retriever::Retriever;
use crate::vectorstore::VectorIndex;

/// Answers natural-language questions over an indexed corpus.
///
/// Composes a [`Retriever`] and an [`AnswerAssembler`]; the collection name
/// and `top_k` come from the shared configuration, so the engine and the
/// indexing pipeline always agree on where documents live.
pub struct QaEngine {
    retriever: Retriever,
    assembler: AnswerAssembler,
    top_k: usize,
    base_domain: String,
}

impl QaEngine {
    /// Create an engine from the shared configuration and concrete
    /// providers.
    pub fn new(
        config: &DocbotConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder, index, config.collection.clone()),
            assembler: AnswerAssembler::new(completer),
            top_k: config.top_k,
            base_domain: config.base_domain.clone(),
        }
    }

    /// Answer a question, returning the answer text with an appended
    /// `Sources` block (one citation URL per line, in retrieval order).
    ///
    /// # Errors
    ///
    /// A query-time embedding or completion failure propagates unchanged;
    /// there is no partial or fabricated answer.
    pub async fn query(&self, question: &str) -> Result<String> {
        let results = self.retriever.retrieve(question, self.top_k).await?;
        let answer = self.assembler.assemble(question, &results).await?;
        info!(results = results.len(), "answered question");
        Ok(answer.render(&self.base_domain))
    }
}
