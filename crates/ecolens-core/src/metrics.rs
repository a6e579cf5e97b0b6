//! Per-metric scoring from baselines and hit counts.
//!
//! Every metric except certifications follows the same formula:
//!
//! ```text
//! score = clamp(baseline + pos_hits * pos_step - neg_hits * neg_step, 0, 100)
//! ```
//!
//! The certifications metric is scored from the number of certification hits.

use crate::signals::{count_hits, SignalHits};
use crate::types::{Category, MetricKey, MetricResult, Metrics};

/// Baseline score before any hits are applied.
#[derive(Debug, Clone, Copy)]
enum Baseline {
    Fixed(i32),
    /// `value` for `category`, `otherwise` for every other category
    ForCategory {
        category: Category,
        value: i32,
        otherwise: i32,
    },
}

impl Baseline {
    fn resolve(self, category: Category) -> i32 {
        match self {
            Baseline::Fixed(v) => v,
            Baseline::ForCategory {
                category: c,
                value,
                otherwise,
            } => {
                if c == category {
                    value
                } else {
                    otherwise
                }
            }
        }
    }
}

/// Where a rule's hit count comes from.
#[derive(Debug, Clone, Copy)]
enum HitSource {
    None,
    /// All positive lexicon hits
    Positive,
    /// All negative lexicon hits
    Negative,
    /// Metric-specific terms searched in the blob
    Terms(&'static [&'static str]),
    /// A fixed count when the term is present
    Flag { term: &'static str, count: usize },
}

impl HitSource {
    fn count(self, hits: &SignalHits) -> usize {
        match self {
            HitSource::None => 0,
            HitSource::Positive => hits.positive.len(),
            HitSource::Negative => hits.negative.len(),
            HitSource::Terms(terms) => count_hits(&hits.blob, terms),
            HitSource::Flag { term, count } => {
                if hits.blob.contains(term) {
                    count
                } else {
                    0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Note {
    Fixed(&'static str),
    ForCategory {
        category: Category,
        value: &'static str,
        otherwise: &'static str,
    },
}

impl Note {
    fn resolve(self, category: Category) -> &'static str {
        match self {
            Note::Fixed(s) => s,
            Note::ForCategory {
                category: c,
                value,
                otherwise,
            } => {
                if c == category {
                    value
                } else {
                    otherwise
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MetricRule {
    baseline: Baseline,
    positive: HitSource,
    negative: HitSource,
    pos_step: i32,
    neg_step: i32,
    note: Note,
}

impl MetricRule {
    fn apply(&self, hits: &SignalHits) -> MetricResult {
        let score = score_from_signals(
            self.baseline.resolve(hits.category),
            self.positive.count(hits),
            self.negative.count(hits),
            self.pos_step,
            self.neg_step,
        );
        MetricResult::new(score, self.note.resolve(hits.category))
    }
}

/// Certification metric baseline when nothing is detected.
const NO_CERT_SCORE: u8 = 20;

/// Number of certification names listed in the metric note.
const CERT_NOTE_LIMIT: usize = 4;

/// The scoring rule for each metric. Certifications have no rule.
fn rule(key: MetricKey) -> Option<MetricRule> {
    use Baseline::{Fixed, ForCategory};
    use HitSource::{Flag, Negative, Positive, Terms};

    let rule = match key {
        MetricKey::CarbonFootprint => MetricRule {
            baseline: ForCategory {
                category: Category::Electronics,
                value: 35,
                otherwise: 50,
            },
            positive: Positive,
            negative: Negative,
            pos_step: 5,
            neg_step: 8,
            note: Note::Fixed("Estimated from materials/keywords and category baseline."),
        },
        MetricKey::EcoCertifications => return None,
        MetricKey::EnergyEfficiency => MetricRule {
            baseline: ForCategory {
                category: Category::Electronics,
                value: 45,
                otherwise: 55,
            },
            positive: Flag {
                term: "energy star",
                count: 3,
            },
            negative: Negative,
            pos_step: 10,
            neg_step: 6,
            note: Note::ForCategory {
                category: Category::Electronics,
                value: "Electronics baseline; Energy Star boosts score.",
                otherwise: "Non-electronics baseline.",
            },
        },
        MetricKey::Recyclability => MetricRule {
            baseline: Fixed(50),
            positive: Terms(&["recyclable", "recycled", "aluminum", "glass", "paper"]),
            negative: Terms(&["mixed material", "laminated", "multi-layer"]),
            pos_step: 10,
            neg_step: 10,
            note: Note::Fixed("Higher for recyclable/recycled materials; lower for mixed materials."),
        },
        MetricKey::WaterUsage => MetricRule {
            baseline: ForCategory {
                category: Category::Fashion,
                value: 40,
                otherwise: 50,
            },
            positive: Terms(&["waterless", "low water"]),
            negative: HitSource::None,
            pos_step: 15,
            neg_step: 0,
            note: Note::Fixed("Category baseline; boosts for explicit low-water claims."),
        },
        MetricKey::Biodegradability => MetricRule {
            baseline: Fixed(45),
            positive: Terms(&["biodegradable", "compostable", "plant-based"]),
            negative: Terms(&["plastic", "polyester", "vinyl", "pvc"]),
            pos_step: 12,
            neg_step: 10,
            note: Note::Fixed("Boosted by compostable/plant-based; reduced by plastics/synthetics."),
        },
        MetricKey::ToxicMaterials => MetricRule {
            baseline: Fixed(55),
            positive: Terms(&["bpa-free", "phthalate-free", "non-toxic", "pfas-free"]),
            negative: Terms(&["pfas", "ptfe", "bpa", "phthalate", "microplastic"]),
            pos_step: 12,
            neg_step: 15,
            note: Note::Fixed("Looks for toxic-chemical indicators on-page."),
        },
        MetricKey::Lifespan => MetricRule {
            baseline: Fixed(55),
            positive: Terms(&["durable", "long-lasting", "lifetime", "heavy-duty"]),
            negative: Terms(&["disposable", "single-use"]),
            pos_step: 10,
            neg_step: 20,
            note: Note::Fixed("Durability claims improve score; disposable terms reduce it."),
        },
        MetricKey::Repairability => MetricRule {
            baseline: ForCategory {
                category: Category::Electronics,
                value: 40,
                otherwise: 55,
            },
            positive: Terms(&["repairable", "modular", "replaceable parts"]),
            negative: Terms(&["sealed", "non-repairable"]),
            pos_step: 18,
            neg_step: 12,
            note: Note::Fixed("Boosted by repair/modular wording; lower for sealed designs."),
        },
        MetricKey::PackagingWaste => MetricRule {
            baseline: Fixed(50),
            positive: Terms(&["plastic-free", "minimal packaging", "recyclable packaging"]),
            negative: Terms(&["individually wrapped", "blister pack"]),
            pos_step: 14,
            neg_step: 10,
            note: Note::Fixed("Packaging-related terms affect score."),
        },
        MetricKey::TransportDistance => MetricRule {
            baseline: Fixed(50),
            positive: Terms(&["made in usa", "made in uk", "made in eu", "locally made"]),
            negative: HitSource::None,
            pos_step: 12,
            neg_step: 0,
            note: Note::Fixed("Boosted by local manufacturing claims when present."),
        },
        MetricKey::ResourceEfficiency => MetricRule {
            baseline: Fixed(50),
            positive: Terms(&["refill", "concentrated", "multi-use"]),
            negative: Terms(&["single-use", "disposable"]),
            pos_step: 12,
            neg_step: 16,
            note: Note::Fixed("Refills/concentrates/multi-use score higher."),
        },
        MetricKey::ChemicalUse => MetricRule {
            baseline: Fixed(55),
            positive: Terms(&["plant-based", "non-toxic", "free of"]),
            negative: Terms(&["pfas", "solvent", "bleach", "ammonia"]),
            pos_step: 10,
            neg_step: 12,
            note: Note::Fixed("Proxy from ingredient/chemical keywords."),
        },
        MetricKey::RenewableContent => MetricRule {
            baseline: Fixed(50),
            positive: Terms(&["bamboo", "wood", "paper", "hemp", "organic cotton", "cork"]),
            negative: Terms(&["plastic", "petroleum", "polyester", "vinyl", "pvc"]),
            pos_step: 12,
            neg_step: 10,
            note: Note::Fixed(
                "Higher for renewable fibers/materials; lower for petroleum-based materials.",
            ),
        },
        MetricKey::WorkingConditions => MetricRule {
            baseline: Fixed(45),
            positive: Terms(&[
                "fair trade",
                "ethical",
                "living wage",
                "responsible sourcing",
                "b corp",
            ]),
            negative: HitSource::None,
            pos_step: 14,
            neg_step: 0,
            note: Note::Fixed("Boosted by ethics claims/certs when present."),
        },
        MetricKey::VocEmissions => MetricRule {
            baseline: Fixed(50),
            positive: Terms(&["low voc", "voc-free", "zero voc"]),
            negative: HitSource::None,
            pos_step: 18,
            neg_step: 0,
            note: Note::Fixed("Boosted by explicit VOC claims."),
        },
    };

    Some(rule)
}

/// `clamp(base + pos * pos_step - neg * neg_step, 0, 100)`
pub fn score_from_signals(
    base: i32,
    pos_hits: usize,
    neg_hits: usize,
    pos_step: i32,
    neg_step: i32,
) -> u8 {
    let pos = i64::try_from(pos_hits).unwrap_or(i64::MAX / 2);
    let neg = i64::try_from(neg_hits).unwrap_or(i64::MAX / 2);
    let raw = i64::from(base)
        .saturating_add(pos.saturating_mul(i64::from(pos_step)))
        .saturating_sub(neg.saturating_mul(i64::from(neg_step)));
    raw.clamp(0, 100) as u8
}

/// Score the certifications metric from the certification hits.
pub fn certification_metric(cert_hits: &[&str]) -> MetricResult {
    if cert_hits.is_empty() {
        return MetricResult::new(NO_CERT_SCORE, "No clear certifications detected on-page.");
    }

    let score = score_from_signals(40, cert_hits.len(), 0, 15, 0);
    let listed = cert_hits
        .iter()
        .take(CERT_NOTE_LIMIT)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let ellipsis = if cert_hits.len() > CERT_NOTE_LIMIT { "…" } else { "" };

    MetricResult::new(score, format!("Detected: {}{}", listed, ellipsis))
}

/// Computes all sixteen metric scores from signal hits.
pub struct MetricScorer;

impl MetricScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, hits: &SignalHits) -> Metrics {
        Metrics::from_fn(|key| self.score_metric(key, hits))
    }

    pub fn score_metric(&self, key: MetricKey, hits: &SignalHits) -> MetricResult {
        match rule(key) {
            Some(rule) => rule.apply(hits),
            None => certification_metric(&hits.certifications),
        }
    }
}

impl Default for MetricScorer {
    fn default() -> Self {
        Self::new()
    }
}
