//! Coarse confidence from signal density.
//!
//! The heuristic path only ever yields `low` or `medium`; `high` can only
//! arrive through an enrichment overlay.

use crate::signals::SignalHits;
use crate::types::Confidence;

/// Combined hit count at which a page counts as signal-rich.
pub const MEDIUM_SIGNAL_COUNT: usize = 6;

pub fn estimate_confidence(hits: &SignalHits) -> Confidence {
    if !hits.certifications.is_empty() || hits.total() >= MEDIUM_SIGNAL_COUNT {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(positive: usize, negative: usize, certs: usize) -> SignalHits {
        SignalHits {
            positive: crate::lexicon::POSITIVE[..positive].to_vec(),
            negative: crate::lexicon::NEGATIVE[..negative].to_vec(),
            certifications: crate::lexicon::CERTIFICATIONS[..certs].to_vec(),
            ..SignalHits::default()
        }
    }

    #[test]
    fn test_no_signals_is_low() {
        assert_eq!(estimate_confidence(&hits(0, 0, 0)), Confidence::Low);
        assert_eq!(estimate_confidence(&hits(3, 2, 0)), Confidence::Low);
    }

    #[test]
    fn test_single_certification_is_medium() {
        assert_eq!(estimate_confidence(&hits(0, 0, 1)), Confidence::Medium);
    }

    #[test]
    fn test_six_signals_is_medium() {
        assert_eq!(estimate_confidence(&hits(4, 2, 0)), Confidence::Medium);
    }

    #[test]
    fn test_never_high() {
        assert_ne!(estimate_confidence(&hits(20, 10, 8)), Confidence::High);
    }
}
