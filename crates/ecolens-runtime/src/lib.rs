//! # ecolens-runtime
//!
//! Optional enrichment for EcoLens analyses.
//!
//! `ecolens-core` scores products deterministically from on-page text. This
//! crate adds one optional step on top: ask an external provider (an LLM)
//! for a partial analysis, validate it, and merge it over the heuristic
//! result.
//!
//! ## Important
//!
//! Enrichment never makes an analysis fail. A disabled, unreachable,
//! slow or misbehaving provider yields the heuristic analysis, plus a note
//! when a call was attempted or skipped by an opt-in circuit breaker.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ecolens_core::{AnalysisOptions, ProductRecord, WeightConfig, WeightPreset};
//! use ecolens_runtime::{EnrichmentOrchestrator, ProviderRegistry, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_file("ecolens.yaml")?;
//! let orchestrator =
//!     EnrichmentOrchestrator::from_registry(&ProviderRegistry::with_defaults(), config)?;
//!
//! let analysis = orchestrator
//!     .analyze(
//!         &ProductRecord::new("Bamboo Toothbrush"),
//!         &WeightConfig::preset(WeightPreset::Balanced),
//!         &AnalysisOptions::default(),
//!     )
//!     .await;
//! println!("{} ({:?})", analysis.overall, analysis.engine);
//! ```

use thiserror::Error;

pub mod config;
pub mod enrichment;
pub mod merge;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod resilience;

pub use config::{ConfigError, EnrichmentConfig, RuntimeConfig};
pub use enrichment::{
    parse_payload, EnrichmentError, EnrichmentPayload, EnrichmentProvider, EnrichmentRequest,
    LlmEnrichmentProvider, MetricOverlay,
};
pub use merge::AnalysisMerger;
pub use orchestrator::{EnrichmentOrchestrator, EnrichmentOrchestratorBuilder};
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry,
};
pub use resilience::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakingProvider, CircuitState,
};

/// Errors setting up the runtime.
///
/// Analyses themselves never return these; they only arise while building an
/// orchestrator from configuration.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Enrichment not configured: {0}")]
    NotConfigured(String),
}
