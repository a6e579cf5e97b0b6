//! Fixed term lists and detection patterns.
//!
//! All lists are lowercase and ordered; hit detection preserves this order.
//! Everything here is immutable after first use and safe to read from any
//! thread.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::Category;

/// Terms that indicate better environmental practice.
pub const POSITIVE: &[&str] = &[
    "recycled",
    "post-consumer",
    "bamboo",
    "organic",
    "refill",
    "refillable",
    "compostable",
    "biodegradable",
    "plastic-free",
    "low voc",
    "voc-free",
    "repairable",
    "modular",
    "replaceable",
    "warranty",
    "durable",
    "energy star",
    "fsc",
    "fair trade",
    "recyclable",
    "glass",
    "aluminum",
    "paper",
    "plant-based",
];

/// Terms that indicate worse environmental practice.
pub const NEGATIVE: &[&str] = &[
    "single-use",
    "disposable",
    "pvc",
    "vinyl",
    "pfas",
    "ptfe",
    "bpa",
    "phthalate",
    "microplastic",
    "fast fashion",
    "polyester",
    "glitter",
    "blister pack",
    "individually wrapped",
];

/// Recognized third-party certifications.
pub const CERTIFICATIONS: &[&str] = &[
    "fair trade",
    "fsc",
    "energy star",
    "gots",
    "oeko-tex",
    "rainforest alliance",
    "b corp",
    "leaping bunny",
    "cradle to cradle",
    "usda organic",
];

/// Vague marketing language that needs backing evidence.
pub const MARKETING_CLAIMS: &[&str] = &[
    "eco-friendly",
    "environmentally friendly",
    "green",
    "natural",
    "sustainable",
    "planet friendly",
    "earth friendly",
    "clean",
    "conscious",
];

/// Where each certification can be checked.
pub const CERT_VERIFY_LINKS: &[(&str, &str)] = &[
    ("fsc", "https://search.fsc.org/"),
    (
        "energy star",
        "https://www.energystar.gov/productfinder/product/certified-products",
    ),
    ("fair trade", "https://www.fairtrade.net/"),
    ("gots", "https://global-standard.org/"),
    ("oeko-tex", "https://www.oeko-tex.com/en/label-check"),
    ("rainforest alliance", "https://www.rainforest-alliance.org/"),
    ("b corp", "https://www.bcorporation.net/en-us/find-a-b-corp/"),
    ("leaping bunny", "https://www.leapingbunny.org/shopping-guide"),
    ("cradle to cradle", "https://www.c2ccertified.org/"),
    ("usda organic", "https://organic.ams.usda.gov/integrity/"),
];

lazy_static! {
    static ref VERIFY_LINKS: HashMap<&'static str, &'static str> =
        CERT_VERIFY_LINKS.iter().copied().collect();

    // =========================================================================
    // CATEGORY PATTERNS (priority order, first match wins)
    // =========================================================================

    pub static ref CATEGORY_PATTERNS: Vec<(Category, Regex)> = vec![
        (Category::PersonalCare, Regex::new(
            r"(?i)(shampoo|soap|conditioner|deodorant|toothpaste|toothbrush|lotion|serum|skincare)"
        ).unwrap()),
        (Category::Cleaning, Regex::new(
            r"(?i)(detergent|cleaner|spray|dish|laundry|bleach)"
        ).unwrap()),
        (Category::Fashion, Regex::new(
            r"(?i)(t-?shirt|jeans|jacket|hoodie|dress|fashion|sneaker|shoe|polyester)"
        ).unwrap()),
        (Category::Electronics, Regex::new(
            r"(?i)(phone|laptop|headphone|speaker|electronics|charger|battery|tv|monitor)"
        ).unwrap()),
        (Category::Reusables, Regex::new(
            r"(?i)(bottle|cup|mug|straw|container|reusable)"
        ).unwrap()),
    ];

    // =========================================================================
    // CERTIFICATION CODE PATTERNS
    // =========================================================================

    /// FSC license code, e.g. "FSC-C123456", "fsc c123456", "FSC–123456"
    pub static ref FSC_CODE_PATTERN: Regex = Regex::new(
        r"(?i)fsc\s*[-–]?\s*c?\s*\d{6}"
    ).unwrap();
}

/// Verification URL for a certification, if one is registered.
pub fn verify_url(cert: &str) -> Option<&'static str> {
    VERIFY_LINKS.get(cert).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lowercase_unique(list: &[&str]) {
        for (i, term) in list.iter().enumerate() {
            assert_eq!(*term, term.to_lowercase(), "term not lowercase: {}", term);
            assert!(!term.is_empty());
            assert!(!list[..i].contains(term), "duplicate term: {}", term);
        }
    }

    #[test]
    fn test_term_lists_are_lowercase_and_unique() {
        assert_lowercase_unique(POSITIVE);
        assert_lowercase_unique(NEGATIVE);
        assert_lowercase_unique(CERTIFICATIONS);
        assert_lowercase_unique(MARKETING_CLAIMS);
    }

    #[test]
    fn test_every_certification_has_verify_link() {
        for cert in CERTIFICATIONS {
            assert!(verify_url(cert).is_some(), "missing link for {}", cert);
        }
        assert_eq!(verify_url("made up"), None);
    }

    #[test]
    fn test_fsc_code_pattern() {
        assert!(FSC_CODE_PATTERN.is_match("license fsc-c123456"));
        assert!(FSC_CODE_PATTERN.is_match("FSC C123456"));
        assert!(FSC_CODE_PATTERN.is_match("fsc–123456"));
        assert!(FSC_CODE_PATTERN.is_match("fsc123456"));
        assert!(!FSC_CODE_PATTERN.is_match("fsc certified"));
        assert!(!FSC_CODE_PATTERN.is_match("fsc-c12345"));
    }

    #[test]
    fn test_category_patterns_in_priority_order() {
        let order: Vec<Category> = CATEGORY_PATTERNS.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
                Category::PersonalCare,
                Category::Cleaning,
                Category::Fashion,
                Category::Electronics,
                Category::Reusables,
            ]
        );
    }
}
