//! Opt-in resilience for the enrichment call.
//!
//! A per-provider circuit breaker, applied by wrapping the provider, stops
//! calling a provider that keeps failing. Without it every analysis is
//! independent of the ones before it.

mod circuit_breaker;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakingProvider, CircuitState,
};
