//! Enrichment providers and their validated output.
//!
//! An enrichment provider receives the product and the metric keys we want
//! scored, and returns a partial analysis. Everything it returns is treated
//! as untrusted until [`parse_payload`] has validated it.

use std::time::Duration;

use async_trait::async_trait;
use ecolens_core::{MetricKey, ProductRecord};
use thiserror::Error;

use crate::providers::ProviderError;

mod llm;
mod payload;

pub use llm::LlmEnrichmentProvider;
pub use payload::{
    parse_payload, payload_from_value, validate_payload_schema, EnrichmentPayload, MetricOverlay,
};

/// Why enrichment did not produce a usable payload.
///
/// None of these are fatal: the orchestrator downgrades every one of them
/// to the heuristic analysis plus a note.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Malformed enrichment response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Unavailable(#[from] ProviderError),

    #[error("Enrichment timed out after {0:?}")]
    Timeout(Duration),

    #[error("Circuit open for provider '{0}'")]
    CircuitOpen(String),
}

/// What an enrichment provider is asked to score.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRequest {
    pub product: ProductRecord,

    /// Recognized metric keys with a usable weight, in canonical order
    pub metric_keys: Vec<MetricKey>,
}

/// Source of partial analyses that can be merged over the heuristic baseline.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    async fn enrich(&self, request: &EnrichmentRequest)
        -> Result<EnrichmentPayload, EnrichmentError>;

    /// Provider name for logs and circuit breaker keys.
    fn name(&self) -> &str;
}
