//! # ecolens-core
//!
//! Deterministic sustainability scoring for product text.
//!
//! This crate turns a short, noisy product record (title, brand, bullets)
//! into an explainable [`Analysis`]:
//! - 16 per-dimension metric scores and a weighted overall grade
//! - "boosted" and "dropped" driver explanations
//! - greenwashing warnings and certification claims
//! - a coarse confidence label
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces the same scores
//! 2. **No network**: All scoring is lexicon and rule based
//! 3. **Total**: Any record with a non-empty title yields a complete Analysis
//! 4. **Stateless**: Nothing is shared or retained between invocations
//!
//! ## Example
//!
//! ```rust
//! use ecolens_core::{analyze, Category, ProductRecord, WeightConfig, WeightPreset};
//!
//! let product = ProductRecord::new("Bamboo Toothbrush")
//!     .with_bullets(["biodegradable", "plastic-free packaging", "FSC certified"]);
//! let weights = WeightConfig::preset(WeightPreset::Balanced);
//!
//! let analysis = analyze(&product, &weights);
//! assert_eq!(analysis.category, Category::PersonalCare);
//! println!("{} ({})", analysis.overall, analysis.grade);
//! ```

pub mod alternatives;
pub mod batch;
pub mod certifications;
pub mod confidence;
pub mod drivers;
pub mod greenwashing;
pub mod lexicon;
pub mod metrics;
pub mod product;
pub mod signals;
pub mod synthesizer;
pub mod types;
pub mod weights;

// Re-export main types at crate root
pub use alternatives::{suggest_alternatives, Alternative, VerifiedBrand};
pub use batch::{load_orders, score_orders, OrderItem, OrderScore};
pub use certifications::{CertVerifications, CertificationClaimBuilder};
pub use confidence::estimate_confidence;
pub use drivers::DriverExplainer;
pub use greenwashing::GreenwashingDetector;
pub use metrics::MetricScorer;
pub use product::{ProductError, ProductRecord};
pub use signals::{SignalHits, TextSignalExtractor};
pub use synthesizer::{Findings, Synthesizer, BASELINE_NOTE};
pub use types::{
    clamp_score, Analysis, AnalysisMeta, Category, CertClaim, CertStatus, Confidence, Drivers,
    Engine, Estimates, Grade, MetricKey, MetricResult, Metrics, Signals,
};
pub use weights::{
    aggregate, normalize_weights, weighted_overall, NormalizedWeights, WeightConfig, WeightError,
    WeightPreset,
};

/// Per-invocation options beyond the weights.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Curated brands used for alternative suggestions
    pub verified_brands: Vec<VerifiedBrand>,

    /// Certification statuses the caller has confirmed for this product
    pub cert_verifications: CertVerifications,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            verified_brands: VerifiedBrand::defaults(),
            cert_verifications: CertVerifications::new(),
        }
    }
}

/// Score a product with the given weights.
///
/// This is the main entry point for heuristic scoring. Alternatives are
/// drawn from the built-in curated brand list.
pub fn analyze(product: &ProductRecord, weights: &WeightConfig) -> Analysis {
    analyze_with_options(product, weights, &AnalysisOptions::default())
}

/// Score a product with explicit options.
///
/// # Arguments
///
/// * `product` - The product record to score
/// * `weights` - Weight configuration; unrecognized keys are ignored
/// * `options` - Curated brands and other per-call settings
pub fn analyze_with_options(
    product: &ProductRecord,
    weights: &WeightConfig,
    options: &AnalysisOptions,
) -> Analysis {
    let hits = TextSignalExtractor::new().extract(product);

    // Fan-out: every component reads the same hits independently
    let findings = Findings {
        metrics: MetricScorer::new().score(&hits),
        drivers: DriverExplainer::new().explain(&hits),
        greenwashing: GreenwashingDetector::new().detect(&hits),
        certifications: CertificationClaimBuilder::with_verifications(options.cert_verifications.clone())
            .build(&hits),
        hits,
    };

    let normalized = normalize_weights(weights);
    Synthesizer::new().synthesize(product, findings, &normalized, &options.verified_brands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_analysis() {
        let product = ProductRecord::new("Widget");
        let analysis = analyze(&product, &WeightConfig::preset(WeightPreset::Balanced));

        assert_eq!(analysis.category, Category::General);
        assert_eq!(analysis.confidence, Confidence::Low);
        assert_eq!(analysis.engine, Engine::Heuristic);
        assert_eq!(analysis.notes.len(), 1);
        assert!(analysis.drivers.boosted.is_empty());
        assert!(analysis.drivers.dropped.is_empty());
        assert!(analysis.greenwashing.is_empty());
        assert!(analysis.certifications.is_empty());
    }

    #[test]
    fn test_curated_alternatives_used_by_default() {
        let product = ProductRecord::new("Laundry detergent");
        let analysis = analyze(&product, &WeightConfig::preset(WeightPreset::Balanced));

        assert_eq!(analysis.category, Category::Cleaning);
        assert_eq!(analysis.alternatives.len(), 1);
        assert_eq!(analysis.alternatives[0].title, "Blueland (refillable cleaners)");
    }

    #[test]
    fn test_analysis_serializes_camel_case() {
        let analysis = analyze(
            &ProductRecord::new("Widget"),
            &WeightConfig::preset(WeightPreset::Balanced),
        );
        let json = serde_json::to_value(&analysis).unwrap();

        assert!(json["metrics"]["carbonFootprint"]["score"].is_u64());
        assert!(json["estimates"]["co2Kg"].is_u64());
        assert!(json["signals"]["toxicRisk"].is_boolean());
        assert_eq!(json["engine"], "heuristic");
        assert_eq!(json["category"], "general");
        assert!(json["meta"]["analyzedAt"].is_string());
    }

    #[test]
    fn test_caller_verification_reaches_analysis() {
        let product = ProductRecord::new("Notebook").with_bullets(["FSC certified", "GOTS"]);
        let options = AnalysisOptions {
            cert_verifications: [("fsc".to_string(), CertStatus::Verified)].into_iter().collect(),
            ..Default::default()
        };
        let analysis = analyze_with_options(
            &product,
            &WeightConfig::preset(WeightPreset::Balanced),
            &options,
        );

        let status = |name: &str| {
            analysis
                .certifications
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.status)
        };
        assert_eq!(status("fsc"), Some(CertStatus::Verified));
        assert_eq!(status("gots"), Some(CertStatus::Claimed));

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["certifications"][0]["status"], "verified");
    }
}
