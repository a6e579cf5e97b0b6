//! Enrichment backed by a chat-completion LLM.

use std::sync::Arc;

use async_trait::async_trait;

use super::{parse_payload, EnrichmentError, EnrichmentPayload, EnrichmentProvider, EnrichmentRequest};
use crate::prompts::build_enrichment_prompt;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};

/// Sends the enrichment prompt to an [`LlmProvider`] and validates the reply.
pub struct LlmEnrichmentProvider {
    llm: Arc<dyn LlmProvider>,
    config: CompletionConfig,
}

impl LlmEnrichmentProvider {
    pub fn new(llm: Arc<dyn LlmProvider>, config: CompletionConfig) -> Self {
        Self { llm, config }
    }
}

#[async_trait]
impl EnrichmentProvider for LlmEnrichmentProvider {
    async fn enrich(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<EnrichmentPayload, EnrichmentError> {
        let prompt = build_enrichment_prompt(request);
        let response = self
            .llm
            .complete(vec![ChatMessage::user(prompt)], &self.config)
            .await?;

        tracing::debug!(
            provider = self.llm.name(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Enrichment completion received"
        );

        parse_payload(&response.content)
    }

    fn name(&self) -> &str {
        self.llm.name()
    }
}
