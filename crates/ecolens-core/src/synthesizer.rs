//! Synthesizer: assembles component findings into the final Analysis.
//!
//! Weighted aggregation, grade, estimates, confidence and signal flags are
//! all derived here, so every Analysis leaves the engine internally
//! consistent.

use crate::alternatives::{suggest_alternatives, VerifiedBrand};
use crate::confidence::estimate_confidence;
use crate::product::ProductRecord;
use crate::signals::SignalHits;
use crate::types::{
    Analysis, AnalysisMeta, CertClaim, Drivers, Engine, Estimates, Metrics, Signals,
};
use crate::weights::{aggregate, NormalizedWeights};

/// Note attached to every heuristic analysis.
pub const BASELINE_NOTE: &str = "This score is generated from on-page signals and defaults. \
For higher accuracy, enable enrichment and/or use verified certification codes.";

/// Everything the independent components produced for one product.
#[derive(Debug, Clone)]
pub struct Findings {
    pub hits: SignalHits,
    pub metrics: Metrics,
    pub drivers: Drivers,
    pub greenwashing: Vec<String>,
    pub certifications: Vec<CertClaim>,
}

/// Combines findings, weights and curated brands into an [`Analysis`].
pub struct Synthesizer;

impl Synthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(
        &self,
        product: &ProductRecord,
        findings: Findings,
        weights: &NormalizedWeights,
        verified_brands: &[VerifiedBrand],
    ) -> Analysis {
        let (overall, grade) = aggregate(&findings.metrics, weights);
        let confidence = estimate_confidence(&findings.hits);
        let category = findings.hits.category;

        tracing::debug!(
            category = %category,
            overall,
            grade = %grade,
            confidence = %confidence,
            "Synthesized heuristic analysis"
        );

        Analysis {
            product: product.clone(),
            category,
            overall,
            grade,
            confidence,
            estimates: Estimates::from_overall(overall),
            signals: Signals::from_metrics(&findings.metrics),
            metrics: findings.metrics,
            drivers: findings.drivers,
            greenwashing: findings.greenwashing,
            certifications: findings.certifications,
            notes: vec![BASELINE_NOTE.to_string()],
            engine: Engine::Heuristic,
            alternatives: suggest_alternatives(product, category, verified_brands),
            meta: AnalysisMeta::now(),
        }
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Confidence, Grade, MetricKey, MetricResult};
    use crate::weights::{normalize_weights, WeightConfig, WeightPreset};

    fn flat_findings(score: u8) -> Findings {
        Findings {
            hits: SignalHits::default(),
            metrics: Metrics::from_fn(|_| MetricResult::new(score, "n")),
            drivers: Drivers::default(),
            greenwashing: Vec::new(),
            certifications: Vec::new(),
        }
    }

    #[test]
    fn test_flat_metrics_give_flat_overall() {
        let weights = normalize_weights(&WeightConfig::preset(WeightPreset::Balanced));
        let analysis = Synthesizer::new().synthesize(
            &ProductRecord::new("Widget"),
            flat_findings(72),
            &weights,
            &[],
        );

        assert_eq!(analysis.overall, 72);
        assert_eq!(analysis.grade, Grade::B);
        assert_eq!(analysis.estimates, Estimates { co2_kg: 0, water_l: 0 });
        assert!(analysis.signals.recyclable);
        assert!(analysis.signals.renewable);
        assert!(!analysis.signals.toxic_risk);
        assert_eq!(analysis.confidence, Confidence::Low);
        assert_eq!(analysis.notes, vec![BASELINE_NOTE]);
        assert_eq!(analysis.engine, Engine::Heuristic);
        assert_eq!(analysis.category, Category::General);
    }

    #[test]
    fn test_empty_weights_give_zero_overall() {
        let weights = normalize_weights(&WeightConfig::new());
        let analysis = Synthesizer::new().synthesize(
            &ProductRecord::new("Widget"),
            flat_findings(90),
            &weights,
            &[],
        );

        assert_eq!(analysis.overall, 0);
        assert_eq!(analysis.grade, Grade::F);
        assert_eq!(analysis.estimates, Estimates { co2_kg: 18, water_l: 210 });
        assert_eq!(analysis.metrics.score(MetricKey::Lifespan), 90);
    }

    #[test]
    fn test_alternatives_fall_back_without_brands() {
        let weights = normalize_weights(&WeightConfig::preset(WeightPreset::Balanced));
        let analysis = Synthesizer::new().synthesize(
            &ProductRecord::new("Widget"),
            flat_findings(50),
            &weights,
            &[],
        );
        assert_eq!(analysis.alternatives.len(), 3);
    }
}
