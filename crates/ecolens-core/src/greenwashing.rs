//! Greenwashing detection: vague marketing claims without backing evidence.

use crate::lexicon::MARKETING_CLAIMS;
use crate::signals::{find_hits, SignalHits};
use crate::types::MAX_GREENWASHING;

/// Positive hits that count as concrete evidence on their own.
const EVIDENCE_POSITIVE_HITS: usize = 2;

/// Flags marketing claims that appear without certifications or concrete
/// positive signals.
pub struct GreenwashingDetector;

impl GreenwashingDetector {
    pub fn new() -> Self {
        Self
    }

    /// Whether the page backs its claims with anything checkable.
    pub fn has_evidence(hits: &SignalHits) -> bool {
        !hits.certifications.is_empty() || hits.positive.len() >= EVIDENCE_POSITIVE_HITS
    }

    pub fn detect(&self, hits: &SignalHits) -> Vec<String> {
        if Self::has_evidence(hits) {
            return Vec::new();
        }

        find_hits(&hits.blob, MARKETING_CLAIMS)
            .into_iter()
            .take(MAX_GREENWASHING)
            .map(warning)
            .collect()
    }
}

impl Default for GreenwashingDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn warning(claim: &str) -> String {
    format!(
        "Marketing claim detected (“{}”) without clear certification or concrete evidence on-page.",
        claim
    )
}
