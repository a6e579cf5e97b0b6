//! Text signal extraction.
//!
//! Builds a lowercase text blob from a product record and finds lexicon
//! terms in it. Matching is plain substring search, not word-boundary
//! tokenized: "recycled" also matches inside "non-recycled".

use crate::lexicon::{self, CATEGORY_PATTERNS};
use crate::product::ProductRecord;
use crate::types::Category;

/// Everything the scorers need to know about a product's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalHits {
    /// Lowercase, space-joined product text
    pub blob: String,

    /// Positive lexicon terms found, in lexicon order
    pub positive: Vec<&'static str>,

    /// Negative lexicon terms found, in lexicon order
    pub negative: Vec<&'static str>,

    /// Certifications found, in lexicon order
    pub certifications: Vec<&'static str>,

    pub category: Category,
}

impl SignalHits {
    /// Combined number of positive, negative and certification hits.
    pub fn total(&self) -> usize {
        self.positive.len() + self.negative.len() + self.certifications.len()
    }

    pub fn has_positive(&self, term: &str) -> bool {
        self.positive.contains(&term)
    }

    pub fn has_negative(&self, term: &str) -> bool {
        self.negative.contains(&term)
    }
}

/// Extracts lexicon hits and a category from product text.
pub struct TextSignalExtractor;

impl TextSignalExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, product: &ProductRecord) -> SignalHits {
        let blob = text_blob(product);
        let hits = SignalHits {
            positive: find_hits(&blob, lexicon::POSITIVE),
            negative: find_hits(&blob, lexicon::NEGATIVE),
            certifications: find_hits(&blob, lexicon::CERTIFICATIONS),
            category: category_hint(&blob),
            blob,
        };

        tracing::debug!(
            category = %hits.category,
            positive = hits.positive.len(),
            negative = hits.negative.len(),
            certifications = hits.certifications.len(),
            "Extracted text signals"
        );

        hits
    }
}

impl Default for TextSignalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase concatenation of title, brand, bullets and description.
///
/// Absent or empty fields contribute nothing.
pub fn text_blob(product: &ProductRecord) -> String {
    std::iter::once(product.title.as_str())
        .chain(product.brand.as_deref())
        .chain(product.bullets.iter().map(String::as_str))
        .chain(product.description.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Terms from `terms` that occur as substrings of `haystack`.
///
/// Case-insensitive. The result is deduplicated and keeps the order of
/// `terms`, regardless of how often or where each term occurs.
pub fn find_hits<'a>(haystack: &str, terms: &[&'a str]) -> Vec<&'a str> {
    let haystack = haystack.to_lowercase();
    let mut hits: Vec<&'a str> = Vec::new();

    for &term in terms {
        if term.is_empty() || hits.contains(&term) {
            continue;
        }
        if haystack.contains(&term.to_lowercase()) {
            hits.push(term);
        }
    }

    hits
}

/// Number of `terms` found in `haystack`.
pub fn count_hits(haystack: &str, terms: &[&str]) -> usize {
    find_hits(haystack, terms).len()
}

/// Category of the first pattern that matches, or `General`.
pub fn category_hint(blob: &str) -> Category {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(blob))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}
