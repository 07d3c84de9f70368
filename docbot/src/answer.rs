//! Answer assembly: prompt construction, completion, citation formatting.

use std::sync::Arc;

use tracing::{debug, error};

use crate::completion::CompletionProvider;
use crate::document::SearchResult;
use crate::error::Result;

/// An assembled answer with its citation links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// The completion text.
    pub text: String,
    /// Source links of the retrieved documents, in retrieval order.
    /// Duplicates are preserved; ranking order matters for traceability.
    pub sources: Vec<String>,
}

impl Answer {
    /// Render the answer with its `Sources` block, one citation per line,
    /// each prefixed with `base_domain`.
    pub fn render(&self, base_domain: &str) -> String {
        let mut rendered = self.text.clone();
        rendered.push_str("\n\nSources:");
        for source in &self.sources {
            rendered.push('\n');
            rendered.push_str(base_domain);
            rendered.push_str(source);
        }
        rendered
    }
}

/// Combines retrieved documents into a prompt, invokes the completion
/// provider once, and pairs the result with its citations.
pub struct AnswerAssembler {
    completer: Arc<dyn CompletionProvider>,
}

impl AnswerAssembler {
    /// Create an assembler over the given completion provider.
    pub fn new(completer: Arc<dyn CompletionProvider>) -> Self {
        Self { completer }
    }

    /// Assemble an [`Answer`] for `question` from the retrieved documents.
    ///
    /// The prompt places the retrieved text as context ahead of the
    /// question and instructs the model to answer only from that context,
    /// declining explicitly when it is insufficient.
    ///
    /// # Errors
    ///
    /// A completion failure surfaces as [`DocbotError::Completion`] with no
    /// automatic retry.
    ///
    /// [`DocbotError::Completion`]: crate::DocbotError::Completion
    pub async fn assemble(&self, question: &str, results: &[SearchResult]) -> Result<Answer> {
        let prompt = build_prompt(question, results);
        debug!(results = results.len(), prompt_len = prompt.len(), "assembling answer");

        let text = self.completer.complete(&prompt).await.map_err(|e| {
            error!(error = %e, "completion failed");
            e
        })?;

        let sources = results
            .iter()
            .map(|r| r.document.source().unwrap_or_default().to_string())
            .collect();

        Ok(Answer { text, sources })
    }
}

/// Build the completion prompt: context documents first, question last.
fn build_prompt(question: &str, results: &[SearchResult]) -> String {
    let mut context = String::new();
    for result in results {
        context.push_str(&result.document.text);
        context.push_str("\n\n");
    }

    format!(
        "You are a support agent answering questions from internal documents. \
         Use only the following pieces of context to give a detailed answer. \
         If the context does not contain the answer, just say that you don't \
         know, don't try to make up an answer.\n\n\
         {context}\
         Question: {question}\n"
    )
}
