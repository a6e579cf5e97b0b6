//! Circuit breaker to prevent cascade failures.
//!
//! Opt-in: [`CircuitBreakingProvider`] wraps an enrichment provider and,
//! after repeated failures, rejects calls with
//! [`EnrichmentError::CircuitOpen`] until the recovery timeout passes. The
//! state is shared by every analysis that goes through the wrapper.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::enrichment::{EnrichmentError, EnrichmentPayload, EnrichmentProvider, EnrichmentRequest};

/// Circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Failures before opening circuit
    pub failure_threshold: u32,

    /// Time before attempting recovery, e.g. "30s"
    #[serde(with = "crate::config::humantime_duration")]
    pub recovery_timeout: Duration,

    /// Successes needed to close circuit
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

/// State of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation
    Closed { failures: u32 },

    /// Circuit is open, all calls bypass
    Open { opened_at: Instant },

    /// Testing if circuit can close
    HalfOpen { successes: u32 },
}

/// Per-provider circuit breaker.
///
/// Each provider name has its own circuit so they recover independently.
pub struct CircuitBreaker {
    states: RwLock<HashMap<String, CircuitState>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Whether calls to `provider` should be skipped.
    ///
    /// An open circuit whose recovery timeout has elapsed moves to half-open
    /// and lets the next call through.
    pub fn is_open(&self, provider: &str) -> bool {
        let states = self.states.read();
        match states.get(provider) {
            Some(CircuitState::Open { opened_at }) => {
                if opened_at.elapsed() >= self.config.recovery_timeout {
                    drop(states);
                    self.transition_to_half_open(provider);
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }

    pub fn record_success(&self, provider: &str) {
        let mut states = self.states.write();
        match states.get(provider).cloned() {
            Some(CircuitState::HalfOpen { successes }) => {
                if successes + 1 >= self.config.success_threshold {
                    states.insert(provider.to_string(), CircuitState::Closed { failures: 0 });
                    tracing::info!(provider, "Circuit closed after successful recovery");
                } else {
                    states.insert(
                        provider.to_string(),
                        CircuitState::HalfOpen {
                            successes: successes + 1,
                        },
                    );
                }
            }
            Some(CircuitState::Closed { failures }) if failures > 0 => {
                states.insert(provider.to_string(), CircuitState::Closed { failures: 0 });
            }
            _ => {}
        }
    }

    pub fn record_failure(&self, provider: &str) {
        let mut states = self.states.write();
        let failures = match states.get(provider) {
            Some(CircuitState::Closed { failures }) => *failures,
            None => 0,
            Some(CircuitState::HalfOpen { .. }) => {
                states.insert(
                    provider.to_string(),
                    CircuitState::Open {
                        opened_at: Instant::now(),
                    },
                );
                tracing::warn!(provider, "Circuit reopened after failed recovery attempt");
                return;
            }
            Some(CircuitState::Open { .. }) => return,
        };

        if failures + 1 >= self.config.failure_threshold {
            states.insert(
                provider.to_string(),
                CircuitState::Open {
                    opened_at: Instant::now(),
                },
            );
            tracing::warn!(
                provider,
                failures = failures + 1,
                "Circuit opened after repeated failures"
            );
        } else {
            states.insert(
                provider.to_string(),
                CircuitState::Closed {
                    failures: failures + 1,
                },
            );
        }
    }

    fn transition_to_half_open(&self, provider: &str) {
        let mut states = self.states.write();
        if matches!(states.get(provider), Some(CircuitState::Open { .. })) {
            states.insert(provider.to_string(), CircuitState::HalfOpen { successes: 0 });
            tracing::info!(provider, "Circuit half-open, allowing a recovery attempt");
        }
    }

    /// Current state of a provider's circuit.
    pub fn state(&self, provider: &str) -> CircuitState {
        self.states
            .read()
            .get(provider)
            .cloned()
            .unwrap_or(CircuitState::Closed { failures: 0 })
    }

    /// Reset all circuits to closed.
    pub fn reset(&self) {
        self.states.write().clear();
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

/// Enrichment provider guarded by a [`CircuitBreaker`].
///
/// Calls are bounded by `timeout` here so that slow replies count as
/// failures.
pub struct CircuitBreakingProvider {
    inner: Arc<dyn EnrichmentProvider>,
    breaker: CircuitBreaker,
    timeout: Duration,
}

impl CircuitBreakingProvider {
    pub fn new(
        inner: Arc<dyn EnrichmentProvider>,
        config: CircuitBreakerConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            inner,
            breaker: CircuitBreaker::new(config),
            timeout,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }
}

#[async_trait]
impl EnrichmentProvider for CircuitBreakingProvider {
    async fn enrich(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<EnrichmentPayload, EnrichmentError> {
        let name = self.inner.name();
        if self.breaker.is_open(name) {
            return Err(EnrichmentError::CircuitOpen(name.to_string()));
        }

        let outcome = match tokio::time::timeout(self.timeout, self.inner.enrich(request)).await {
            Ok(result) => result,
            Err(_) => Err(EnrichmentError::Timeout(self.timeout)),
        };

        match &outcome {
            Ok(_) => self.breaker.record_success(name),
            Err(_) => self.breaker.record_failure(name),
        }
        outcome
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolens_core::ProductRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EnrichmentProvider for Failing {
        async fn enrich(
            &self,
            _request: &EnrichmentRequest,
        ) -> Result<EnrichmentPayload, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(EnrichmentError::Malformed("not json".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn request() -> EnrichmentRequest {
        EnrichmentRequest {
            product: ProductRecord::new("Widget"),
            metric_keys: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_wrapper_opens_after_failures() {
        let inner = Arc::new(Failing {
            calls: AtomicUsize::new(0),
        });
        let guarded = CircuitBreakingProvider::new(
            inner.clone(),
            CircuitBreakerConfig::default(),
            Duration::from_secs(5),
        );

        for _ in 0..3 {
            let err = guarded.enrich(&request()).await.unwrap_err();
            assert!(matches!(err, EnrichmentError::Malformed(_)));
        }
        let err = guarded.enrich(&request()).await.unwrap_err();
        assert!(matches!(err, EnrichmentError::CircuitOpen(ref name) if name == "failing"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
        assert_eq!(guarded.name(), "failing");
    }

    fn breaker(failure_threshold: u32, recovery_timeout: Duration) -> CircuitBreaker {
        CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold,
            recovery_timeout,
            success_threshold: 2,
        })
    }

    #[test]
    fn test_circuit_starts_closed() {
        let cb = CircuitBreaker::default();
        assert!(!cb.is_open("gemini"));
        assert_eq!(cb.state("gemini"), CircuitState::Closed { failures: 0 });
    }

    #[test]
    fn test_circuit_opens_after_failures() {
        let cb = breaker(2, Duration::from_secs(30));

        cb.record_failure("gemini");
        assert!(!cb.is_open("gemini"));

        cb.record_failure("gemini");
        assert!(cb.is_open("gemini"));
    }

    #[test]
    fn test_success_resets_failures() {
        let cb = CircuitBreaker::default();

        cb.record_failure("gemini");
        cb.record_failure("gemini");
        cb.record_success("gemini");

        cb.record_failure("gemini");
        cb.record_failure("gemini");
        assert!(!cb.is_open("gemini"));
    }

    #[test]
    fn test_providers_are_independent() {
        let cb = breaker(2, Duration::from_secs(30));

        cb.record_failure("gemini");
        cb.record_failure("gemini");

        assert!(cb.is_open("gemini"));
        assert!(!cb.is_open("local"));
    }

    #[test]
    fn test_half_open_recovery() {
        let cb = breaker(1, Duration::ZERO);

        cb.record_failure("gemini");
        assert!(matches!(cb.state("gemini"), CircuitState::Open { .. }));

        // Zero recovery timeout: the next check lets a call through
        assert!(!cb.is_open("gemini"));
        assert_eq!(cb.state("gemini"), CircuitState::HalfOpen { successes: 0 });

        cb.record_success("gemini");
        assert_eq!(cb.state("gemini"), CircuitState::HalfOpen { successes: 1 });
        cb.record_success("gemini");
        assert_eq!(cb.state("gemini"), CircuitState::Closed { failures: 0 });
    }

    #[test]
    fn test_failed_recovery_reopens() {
        let cb = breaker(1, Duration::ZERO);

        cb.record_failure("gemini");
        assert!(!cb.is_open("gemini"));
        cb.record_failure("gemini");
        assert!(matches!(cb.state("gemini"), CircuitState::Open { .. }));
    }

    #[test]
    fn test_reset() {
        let cb = breaker(1, Duration::from_secs(30));
        cb.record_failure("gemini");
        assert!(cb.is_open("gemini"));

        cb.reset();
        assert!(!cb.is_open("gemini"));
    }
}
