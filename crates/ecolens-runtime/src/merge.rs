//! AnalysisMerger: overlays an enrichment payload onto the heuristic baseline.
//!
//! Merge rules are fixed:
//! 1. A numeric `overall` replaces the baseline (rounded, clamped); grade and
//!    estimates follow it
//! 2. A non-empty `confidence` replaces the baseline confidence
//! 3. Metric overlays replace score and note, but only for weighted metrics
//! 4. External notes are appended after baseline notes, up to the note cap
//! 5. Signal flags are recomputed from the merged metrics
//!
//! On failure the baseline is kept and a single note explains why.

use ecolens_core::{clamp_score, Analysis, Engine, NormalizedWeights};

use crate::enrichment::{EnrichmentError, EnrichmentPayload};

/// Prefix of the note appended when enrichment fails.
pub const UNAVAILABLE_NOTE_PREFIX: &str = "Enrichment unavailable: ";

/// Merges enrichment payloads into heuristic analyses.
pub struct AnalysisMerger;

impl AnalysisMerger {
    pub fn new() -> Self {
        Self
    }

    /// Overlay `payload` onto `baseline`.
    ///
    /// `weights` decides which metric keys may be overlaid: the same keys
    /// that were requested from the provider.
    pub fn merge(
        &self,
        mut baseline: Analysis,
        payload: &EnrichmentPayload,
        weights: &NormalizedWeights,
    ) -> Analysis {
        let overall = payload
            .overall
            .map(clamp_score)
            .unwrap_or(baseline.overall);
        baseline.set_overall(overall);

        if let Some(confidence) = payload.confidence {
            baseline.confidence = confidence;
        }

        let mut overlaid = 0usize;
        for (&key, overlay) in &payload.metrics {
            if !weights.contains(key) {
                continue;
            }
            let note = overlay
                .note
                .clone()
                .unwrap_or_else(|| baseline.metrics.get(key).note.clone());
            baseline.metrics.set(key, clamp_score(overlay.score), note);
            overlaid += 1;
        }

        baseline.append_notes(payload.notes.iter().cloned());
        baseline.refresh_signals();
        baseline.engine = Engine::Enriched;

        tracing::debug!(
            overall = baseline.overall,
            overlaid,
            notes = payload.notes.len(),
            "Merged enrichment payload"
        );

        baseline
    }

    /// Keep `baseline` and record why enrichment was not applied.
    pub fn downgrade(&self, mut baseline: Analysis, error: &EnrichmentError) -> Analysis {
        baseline.engine = Engine::Heuristic;
        baseline.append_notes([format!("{}{}", UNAVAILABLE_NOTE_PREFIX, error)]);
        baseline
    }
}

impl Default for AnalysisMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::{parse_payload, MetricOverlay};
    use crate::providers::ProviderError;
    use ecolens_core::types::MAX_NOTES;
    use ecolens_core::{
        analyze, normalize_weights, Confidence, Estimates, Grade, MetricKey, ProductRecord,
        WeightConfig, WeightPreset,
    };
    use proptest::prelude::*;

    fn balanced() -> WeightConfig {
        WeightConfig::preset(WeightPreset::Balanced)
    }

    fn baseline() -> Analysis {
        analyze(
            &ProductRecord::new("Polyester Jacket")
                .with_bullets(["single-use packaging", "not repairable"]),
            &balanced(),
        )
    }

    fn merge(payload: &EnrichmentPayload) -> Analysis {
        AnalysisMerger::new().merge(baseline(), payload, &normalize_weights(&balanced()))
    }

    #[test]
    fn test_empty_payload_changes_nothing_but_engine() {
        let base = baseline();
        let merged = merge(&EnrichmentPayload::default());

        assert_eq!(merged.overall, base.overall);
        assert_eq!(merged.grade, base.grade);
        assert_eq!(merged.metrics, base.metrics);
        assert_eq!(merged.notes, base.notes);
        assert_eq!(merged.confidence, base.confidence);
        assert_eq!(merged.engine, Engine::Enriched);
    }

    #[test]
    fn test_overall_rounded_clamped_and_graded() {
        let merged = merge(&parse_payload(r#"{"overall": 84.6}"#).unwrap());
        assert_eq!(merged.overall, 85);
        assert_eq!(merged.grade, Grade::A);
        assert_eq!(merged.estimates, Estimates::from_overall(85));

        let merged = merge(&parse_payload(r#"{"overall": 250}"#).unwrap());
        assert_eq!(merged.overall, 100);

        let merged = merge(&parse_payload(r#"{"overall": -3}"#).unwrap());
        assert_eq!(merged.overall, 0);
        assert_eq!(merged.grade, Grade::F);
    }

    #[test]
    fn test_confidence_override() {
        let merged = merge(&parse_payload(r#"{"confidence": "high"}"#).unwrap());
        assert_eq!(merged.confidence, Confidence::High);

        let merged = merge(&parse_payload(r#"{"confidence": ""}"#).unwrap());
        assert_eq!(merged.confidence, baseline().confidence);
    }

    #[test]
    fn test_metric_overlay_and_note_fallback() {
        let base = baseline();
        let merged = merge(
            &parse_payload(
                r#"{"metrics": {
                    "lifespan": {"score": 90.4, "note": "Lined, heavy shell"},
                    "recyclability": {"score": 71, "note": 7}
                }}"#,
            )
            .unwrap(),
        );

        assert_eq!(merged.metrics.score(MetricKey::Lifespan), 90);
        assert_eq!(merged.metrics.get(MetricKey::Lifespan).note, "Lined, heavy shell");
        assert_eq!(merged.metrics.score(MetricKey::Recyclability), 71);
        assert_eq!(
            merged.metrics.get(MetricKey::Recyclability).note,
            base.metrics.get(MetricKey::Recyclability).note
        );
        assert_eq!(
            merged.metrics.get(MetricKey::Repairability),
            base.metrics.get(MetricKey::Repairability)
        );
        // Overlay alone does not move overall.
        assert_eq!(merged.overall, base.overall);
    }

    #[test]
    fn test_unweighted_metrics_not_overlaid() {
        let weights = normalize_weights(&WeightConfig::new().with("lifespan", 1.0));
        let mut payload = EnrichmentPayload::default();
        payload.metrics.insert(
            MetricKey::Recyclability,
            MetricOverlay {
                score: 99.0,
                note: None,
            },
        );

        let base = baseline();
        let merged = AnalysisMerger::new().merge(base.clone(), &payload, &weights);
        assert_eq!(merged.metrics, base.metrics);
    }

    #[test]
    fn test_signals_recomputed() {
        let merged = merge(
            &parse_payload(
                r#"{"metrics": {
                    "recyclability": {"score": 70},
                    "toxicMaterials": {"score": 45},
                    "renewableContent": {"score": 69}
                }}"#,
            )
            .unwrap(),
        );
        assert!(merged.signals.recyclable);
        assert!(merged.signals.toxic_risk);
        assert!(!merged.signals.renewable);
    }

    #[test]
    fn test_notes_appended_and_capped() {
        let notes: Vec<String> = (0..20).map(|i| format!("n{}", i)).collect();
        let payload = EnrichmentPayload {
            notes,
            ..Default::default()
        };
        let merged = merge(&payload);

        assert_eq!(merged.notes.len(), MAX_NOTES);
        assert_eq!(merged.notes[0], baseline().notes[0]);
        assert_eq!(merged.notes[1], "n0");
        assert_eq!(merged.notes[9], "n8");
    }

    #[test]
    fn test_downgrade_keeps_baseline_and_adds_note() {
        let base = baseline();
        let error = EnrichmentError::Unavailable(ProviderError::HttpError("connection refused".into()));
        let downgraded = AnalysisMerger::new().downgrade(base.clone(), &error);

        assert_eq!(downgraded.engine, Engine::Heuristic);
        assert_eq!(downgraded.overall, base.overall);
        assert_eq!(downgraded.metrics, base.metrics);
        assert_eq!(downgraded.notes.len(), base.notes.len() + 1);
        assert_eq!(
            downgraded.notes.last().unwrap(),
            "Enrichment unavailable: HTTP request failed: connection refused"
        );
    }

    #[test]
    fn test_downgrade_respects_note_cap() {
        let mut base = baseline();
        base.append_notes((0..20).map(|i| format!("n{}", i)));
        let downgraded =
            AnalysisMerger::new().downgrade(base, &EnrichmentError::Malformed("x".into()));
        assert_eq!(downgraded.notes.len(), MAX_NOTES);
        assert!(!downgraded.notes.iter().any(|n| n.starts_with(UNAVAILABLE_NOTE_PREFIX)));
    }

    proptest! {
        #[test]
        fn merged_scores_stay_in_range(
            overall in prop::option::of(-1.0e6f64..1.0e6),
            scores in prop::collection::vec(-1.0e6f64..1.0e6, MetricKey::COUNT),
        ) {
            let mut payload = EnrichmentPayload { overall, ..Default::default() };
            for (key, score) in MetricKey::ALL.iter().zip(scores) {
                payload.metrics.insert(*key, MetricOverlay { score, note: None });
            }

            let merged = merge(&payload);
            prop_assert!(merged.overall <= 100);
            prop_assert_eq!(merged.grade, Grade::from_overall(merged.overall));
            for (_, metric) in merged.metrics.iter() {
                prop_assert!(metric.score <= 100);
            }
        }
    }
}
