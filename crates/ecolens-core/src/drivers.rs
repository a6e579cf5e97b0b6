//! Driver explanations: why scores went up or down.
//!
//! Rules are evaluated in table order; the first occurrence of a label wins
//! its position and each list is capped at [`MAX_DRIVERS`].

use crate::signals::SignalHits;
use crate::types::{unique_capped, Drivers, MAX_DRIVERS};

/// What fires a driver rule.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    /// Any of these terms is among the relevant hits
    AnyHit(&'static [&'static str]),
    /// The blob contains `term` and at least one of `with`
    BlobCombo {
        term: &'static str,
        with: &'static [&'static str],
    },
}

impl Trigger {
    fn fires(self, hits: &[&str], blob: &str) -> bool {
        match self {
            Trigger::AnyHit(terms) => terms.iter().any(|t| hits.contains(t)),
            Trigger::BlobCombo { term, with } => {
                blob.contains(term) && with.iter().any(|w| blob.contains(w))
            }
        }
    }
}

type DriverRule = (Trigger, &'static str);

/// Rules over positive hits.
const BOOSTED_RULES: &[DriverRule] = &[
    (Trigger::AnyHit(&["refill", "refillable"]), "Refillable / reduced packaging"),
    (Trigger::AnyHit(&["plastic-free"]), "Plastic-free packaging"),
    (Trigger::AnyHit(&["recycled", "post-consumer"]), "Recycled content"),
    (
        Trigger::AnyHit(&["compostable", "biodegradable"]),
        "Compostable / biodegradable claim",
    ),
    (Trigger::AnyHit(&["bamboo", "plant-based"]), "Renewable materials"),
    (
        Trigger::AnyHit(&["repairable", "modular", "replaceable"]),
        "Repairability signals",
    ),
    (Trigger::AnyHit(&["durable", "warranty"]), "Durability / warranty signals"),
    (
        Trigger::AnyHit(&["recyclable", "glass", "aluminum", "paper"]),
        "Recyclable materials",
    ),
];

/// Rules over negative hits, plus the plastic packaging heuristic.
const DROPPED_RULES: &[DriverRule] = &[
    (Trigger::AnyHit(&["pfas"]), "PFAS mention"),
    (Trigger::AnyHit(&["ptfe"]), "PTFE / non-stick chemical mention"),
    (Trigger::AnyHit(&["bpa"]), "BPA mention"),
    (Trigger::AnyHit(&["phthalate"]), "Phthalate mention"),
    (Trigger::AnyHit(&["microplastic"]), "Microplastic mention"),
    (
        Trigger::AnyHit(&["single-use", "disposable"]),
        "Single-use / disposable wording",
    ),
    (Trigger::AnyHit(&["pvc", "vinyl"]), "PVC/vinyl materials"),
    (
        Trigger::AnyHit(&["polyester", "fast fashion"]),
        "Fast-fashion / synthetics",
    ),
    (
        Trigger::AnyHit(&["blister pack", "individually wrapped"]),
        "High-waste packaging",
    ),
    (
        Trigger::BlobCombo {
            term: "plastic",
            with: &["packaging", "wrapped", "blister"],
        },
        "Plastic packaging",
    ),
];

/// Display label for a certification driver.
pub fn certification_label(cert: &str) -> String {
    match cert {
        "fsc" => "FSC certification".to_string(),
        "energy star" => "Energy Star certification".to_string(),
        other => format!("{} certification", other.to_uppercase()),
    }
}

fn fired_labels<'r>(
    rules: &'r [DriverRule],
    hits: &'r [&'static str],
    blob: &'r str,
) -> impl Iterator<Item = &'static str> + 'r {
    rules
        .iter()
        .filter(move |(trigger, _)| trigger.fires(hits, blob))
        .map(|(_, label)| *label)
}

/// Turns hits into "boosted" and "dropped" explanation lists.
pub struct DriverExplainer;

impl DriverExplainer {
    pub fn new() -> Self {
        Self
    }

    pub fn explain(&self, hits: &SignalHits) -> Drivers {
        let boosted = hits
            .certifications
            .iter()
            .map(|c| certification_label(c))
            .chain(fired_labels(BOOSTED_RULES, &hits.positive, &hits.blob).map(String::from));

        let dropped = fired_labels(DROPPED_RULES, &hits.negative, &hits.blob);

        Drivers {
            boosted: unique_capped(boosted, MAX_DRIVERS),
            dropped: unique_capped(dropped, MAX_DRIVERS),
        }
    }
}

impl Default for DriverExplainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductRecord;
    use crate::signals::TextSignalExtractor;

    fn explain(product: ProductRecord) -> Drivers {
        DriverExplainer::new().explain(&TextSignalExtractor::new().extract(&product))
    }

    #[test]
    fn test_certification_labels() {
        assert_eq!(certification_label("fsc"), "FSC certification");
        assert_eq!(certification_label("energy star"), "Energy Star certification");
        assert_eq!(certification_label("b corp"), "B CORP certification");
    }

    #[test]
    fn test_certifications_come_first() {
        let drivers = explain(ProductRecord::new("Refillable soap").with_bullets(["GOTS"]));
        assert_eq!(
            drivers.boosted,
            vec!["GOTS certification", "Refillable / reduced packaging"]
        );
    }

    #[test]
    fn test_refill_and_refillable_collapse_to_one() {
        let drivers = explain(ProductRecord::new("refill refillable"));
        assert_eq!(drivers.boosted, vec!["Refillable / reduced packaging"]);
    }

    #[test]
    fn test_dropped_rules() {
        let drivers = explain(
            ProductRecord::new("Nonstick pan").with_bullets(["PTFE coating", "PFAS", "vinyl handle"]),
        );
        assert_eq!(
            drivers.dropped,
            vec![
                "PFAS mention",
                "PTFE / non-stick chemical mention",
                "PVC/vinyl materials"
            ]
        );
    }

    #[test]
    fn test_plastic_packaging_combo() {
        let drivers = explain(ProductRecord::new("Snacks").with_bullets(["plastic wrapped"]));
        assert_eq!(drivers.dropped, vec!["Plastic packaging"]);

        let no_combo = explain(ProductRecord::new("Plastic chair"));
        assert!(no_combo.dropped.is_empty());
    }

    #[test]
    fn test_lists_are_capped() {
        let drivers = explain(ProductRecord::new("x").with_bullets([
            "fair trade fsc energy star gots oeko-tex rainforest alliance b corp",
            "refill plastic-free recycled compostable bamboo",
        ]));
        assert_eq!(drivers.boosted.len(), MAX_DRIVERS);
        assert_eq!(drivers.boosted[0], "FAIR TRADE certification");

        let dropped = explain(ProductRecord::new("x").with_bullets([
            "pfas ptfe bpa phthalate microplastic single-use pvc polyester blister pack plastic",
        ]));
        assert_eq!(dropped.dropped.len(), MAX_DRIVERS);
        assert_eq!(dropped.dropped[5], "Single-use / disposable wording");
    }
}
