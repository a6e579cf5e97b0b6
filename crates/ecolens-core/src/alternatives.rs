//! Alternative product suggestions.
//!
//! Curated brands are matched on the analysis category. When none match,
//! three generic search suggestions built from the product title are
//! returned instead. Turning a query into a URL is left to the consumer.

use serde::{Deserialize, Serialize};

use crate::product::ProductRecord;
use crate::types::Category;

/// Maximum number of curated picks returned.
pub const MAX_ALTERNATIVES: usize = 3;

/// A suggested alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub title: String,
    pub reason: String,
    pub query: String,
}

/// A curated brand known to do better in its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedBrand {
    #[serde(default)]
    pub category: Category,
    pub title: String,
    pub query: String,
    pub reason: String,
}

impl VerifiedBrand {
    pub fn new(
        category: Category,
        title: impl Into<String>,
        query: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// The built-in curated list.
    pub fn defaults() -> Vec<VerifiedBrand> {
        vec![
            VerifiedBrand::new(
                Category::PersonalCare,
                "Ethique (plastic-free bars)",
                "Ethique shampoo bar plastic free",
                "Concentrated, plastic-free alternatives.",
            ),
            VerifiedBrand::new(
                Category::Cleaning,
                "Blueland (refillable cleaners)",
                "Blueland refill tablets cleaner",
                "Refill tablets reduce packaging waste.",
            ),
            VerifiedBrand::new(
                Category::Fashion,
                "Patagonia (repair & longevity)",
                "Patagonia Worn Wear",
                "Durable products + repair culture.",
            ),
            VerifiedBrand::new(
                Category::Electronics,
                "Fairphone (repairable phone)",
                "Fairphone repairable smartphone",
                "Modular, repair-friendly design.",
            ),
        ]
    }
}

impl From<&VerifiedBrand> for Alternative {
    fn from(brand: &VerifiedBrand) -> Self {
        Self {
            title: brand.title.clone(),
            reason: brand.reason.clone(),
            query: brand.query.clone(),
        }
    }
}

/// Suggestions for `product` given its analyzed `category`.
pub fn suggest_alternatives(
    product: &ProductRecord,
    category: Category,
    verified: &[VerifiedBrand],
) -> Vec<Alternative> {
    let picks: Vec<Alternative> = verified
        .iter()
        .filter(|brand| brand.category == category)
        .take(MAX_ALTERNATIVES)
        .map(Alternative::from)
        .collect();

    if picks.is_empty() {
        fallback_searches(&product.title)
    } else {
        picks
    }
}

fn fallback_searches(title: &str) -> Vec<Alternative> {
    let title = match title.trim() {
        "" => "product",
        t => t,
    };

    [
        (
            "Plastic-free / refill alternative",
            "plastic-free refill",
            "Search for lower-waste options.",
        ),
        (
            "Recycled materials alternative",
            "recycled materials",
            "Search for recycled/renewable content.",
        ),
        (
            "Certified eco alternative",
            "FSC Fair Trade Energy Star",
            "Search for credible certifications.",
        ),
    ]
    .into_iter()
    .map(|(label, suffix, reason)| Alternative {
        title: label.to_string(),
        reason: reason.to_string(),
        query: format!("{} {}", title, suffix),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_pick_for_category() {
        let product = ProductRecord::new("Cotton Hoodie");
        let alts = suggest_alternatives(&product, Category::Fashion, &VerifiedBrand::defaults());
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].title, "Patagonia (repair & longevity)");
        assert_eq!(alts[0].query, "Patagonia Worn Wear");
    }

    #[test]
    fn test_fallback_uses_title() {
        let product = ProductRecord::new("Widget");
        let alts = suggest_alternatives(&product, Category::General, &VerifiedBrand::defaults());
        let queries: Vec<&str> = alts.iter().map(|a| a.query.as_str()).collect();
        assert_eq!(
            queries,
            vec![
                "Widget plastic-free refill",
                "Widget recycled materials",
                "Widget FSC Fair Trade Energy Star"
            ]
        );
    }

    #[test]
    fn test_curated_picks_are_capped() {
        let brands: Vec<VerifiedBrand> = (0..5)
            .map(|i| VerifiedBrand::new(Category::Reusables, format!("Brand {}", i), "q", "r"))
            .collect();
        let alts = suggest_alternatives(&ProductRecord::new("Mug"), Category::Reusables, &brands);
        assert_eq!(alts.len(), MAX_ALTERNATIVES);
        assert_eq!(alts[2].title, "Brand 2");
    }

    #[test]
    fn test_verified_brand_category_defaults_to_general() {
        let brand: VerifiedBrand =
            serde_json::from_str(r#"{"title":"T","query":"q","reason":"r"}"#).unwrap();
        assert_eq!(brand.category, Category::General);
    }
}
