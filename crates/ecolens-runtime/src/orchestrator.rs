//! Enrichment orchestrator.
//!
//! Runs the heuristic engine, then optionally awaits one enrichment call and
//! merges its payload. The flow never fails: whatever goes wrong with the
//! provider, the caller gets the heuristic analysis with a note attached.
//! The orchestrator keeps no state between analyses.
//!
//! 1. Heuristic analysis (deterministic, always)
//! 2. Skip enrichment if disabled or no provider is configured
//! 3. Await the provider under a timeout
//! 4. Merge on success, downgrade on failure

use std::sync::Arc;

use ecolens_core::{
    analyze_with_options, normalize_weights, Analysis, AnalysisOptions, ProductRecord,
    WeightConfig,
};

use crate::config::RuntimeConfig;
use crate::enrichment::{EnrichmentError, EnrichmentProvider, EnrichmentRequest, LlmEnrichmentProvider};
use crate::merge::AnalysisMerger;
use crate::providers::ProviderRegistry;
use crate::resilience::CircuitBreakingProvider;
use crate::RuntimeError;

/// Heuristic analysis plus optional enrichment.
pub struct EnrichmentOrchestrator {
    provider: Option<Arc<dyn EnrichmentProvider>>,
    config: RuntimeConfig,
    merger: AnalysisMerger,
}

impl EnrichmentOrchestrator {
    pub fn new(provider: Option<Arc<dyn EnrichmentProvider>>, config: RuntimeConfig) -> Self {
        Self {
            provider,
            config,
            merger: AnalysisMerger::new(),
        }
    }

    /// Heuristic-only orchestrator.
    pub fn heuristic() -> Self {
        Self::new(None, RuntimeConfig::default())
    }

    /// Build from configuration, creating the LLM provider through `registry`.
    ///
    /// With enrichment disabled no provider is created and the registry is
    /// not consulted. A configured `circuit_breaker` wraps the provider in a
    /// [`CircuitBreakingProvider`].
    pub fn from_registry(
        registry: &ProviderRegistry,
        config: RuntimeConfig,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        if !config.enrichment.enabled {
            return Ok(Self::new(None, config));
        }

        let enrichment = &config.enrichment;
        let llm = registry.create(&enrichment.provider, &enrichment.provider_config)?;
        let mut provider: Arc<dyn EnrichmentProvider> = Arc::new(LlmEnrichmentProvider::new(
            llm,
            enrichment.completion_config(),
        ));
        if let Some(breaker) = &config.circuit_breaker {
            provider = Arc::new(CircuitBreakingProvider::new(
                provider,
                breaker.clone(),
                enrichment.timeout,
            ));
        }

        tracing::debug!(
            provider = %enrichment.provider,
            model = %enrichment.model,
            timeout = ?enrichment.timeout,
            circuit_breaker = config.circuit_breaker.is_some(),
            "Enrichment provider configured"
        );

        Ok(Self::new(Some(provider), config))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Whether analyses will attempt enrichment.
    pub fn enrichment_enabled(&self) -> bool {
        self.config.enrichment.enabled && self.provider.is_some()
    }

    /// Score a product, enriching when configured.
    pub async fn analyze(
        &self,
        product: &ProductRecord,
        weights: &WeightConfig,
        options: &AnalysisOptions,
    ) -> Analysis {
        let baseline = analyze_with_options(product, weights, options);

        let provider = match &self.provider {
            Some(provider) if self.config.enrichment.enabled => provider,
            _ => return baseline,
        };
        let name = provider.name();

        let normalized = normalize_weights(weights);
        let request = EnrichmentRequest {
            product: product.clone(),
            metric_keys: normalized.keys().collect(),
        };

        let timeout = self.config.enrichment.timeout;
        let outcome = match tokio::time::timeout(timeout, provider.enrich(&request)).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout(timeout)),
        };

        match outcome {
            Ok(payload) => {
                let merged = self.merger.merge(baseline, &payload, &normalized);
                tracing::info!(
                    provider = name,
                    overall = merged.overall,
                    grade = %merged.grade,
                    "Enrichment merged"
                );
                merged
            }
            Err(e) => {
                tracing::warn!(provider = name, error = %e, "Enrichment failed, using heuristic analysis");
                self.merger.downgrade(baseline, &e)
            }
        }
    }
}

/// Builder for [`EnrichmentOrchestrator`].
pub struct EnrichmentOrchestratorBuilder {
    provider: Option<Arc<dyn EnrichmentProvider>>,
    config: RuntimeConfig,
}

impl EnrichmentOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the enrichment provider.
    pub fn provider(mut self, provider: Arc<dyn EnrichmentProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<EnrichmentOrchestrator, RuntimeError> {
        self.config.validate()?;
        if self.config.enrichment.enabled && self.provider.is_none() {
            return Err(RuntimeError::NotConfigured(
                "enrichment is enabled but no provider was set".to_string(),
            ));
        }
        Ok(EnrichmentOrchestrator::new(self.provider, self.config))
    }
}

impl Default for EnrichmentOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
