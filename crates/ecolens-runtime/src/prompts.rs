//! Enrichment prompt and response cleanup.
//!
//! The prompt is a single user message: product facts, the metric keys we
//! want scored, and the JSON shape to return. Models often wrap JSON in
//! Markdown fences anyway, so replies go through [`strip_code_fences`]
//! before parsing.

use lazy_static::lazy_static;
use regex::Regex;

use crate::enrichment::EnrichmentRequest;

/// Bullets included in the prompt.
pub const PROMPT_BULLET_LIMIT: usize = 8;

/// Instructions preceding the product facts.
pub const ENRICHMENT_INSTRUCTIONS: &str = r#"You are an environmental product analyst.

Given this product info, return ONLY valid JSON (no markdown).
Compute metric scores 0-100 for each field listed in "metricsWanted".
Also include "overall" (0-100) and short "notes" (array of strings)."#;

/// The JSON shape the model must return.
pub const ENRICHMENT_RESPONSE_SHAPE: &str = r#"JSON shape:
{
  "overall": number,
  "metrics": { "carbonFootprint": {"score": number, "note": string}, ... },
  "notes": [string, ...],
  "confidence": "low"|"medium"|"high"
}"#;

lazy_static! {
    /// Any fence, with an optional "json" tag and the whitespace after it
    static ref CODE_FENCE: Regex = Regex::new(r"(?i)```(?:json)?\s*").unwrap();
}

/// Build the user prompt for an enrichment request.
pub fn build_enrichment_prompt(request: &EnrichmentRequest) -> String {
    let product = &request.product;
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    let bullets = product
        .bullets
        .iter()
        .take(PROMPT_BULLET_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ");

    let wanted = serde_json::to_string(&request.metric_keys).unwrap_or_else(|_| "[]".to_string());

    format!(
        "{instructions}\n\n\
         Product:\n\
         - title: {title}\n\
         - brand: {brand}\n\
         - price: {price}\n\
         - site: {site}\n\
         - url: {url}\n\
         - bullets: {bullets}\n\n\
         metricsWanted:\n\
         {wanted}\n\n\
         {shape}",
        instructions = ENRICHMENT_INSTRUCTIONS,
        title = product.title,
        brand = field(&product.brand),
        price = field(&product.price),
        site = field(&product.site),
        url = field(&product.url),
        bullets = bullets,
        wanted = wanted,
        shape = ENRICHMENT_RESPONSE_SHAPE,
    )
}

/// Remove every Markdown code fence marker and trim whitespace.
///
/// Fences are dropped wherever they appear, not only at the ends, so a
/// reply with prose around a fenced block keeps just the text.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolens_core::{MetricKey, ProductRecord};

    fn request(product: ProductRecord) -> EnrichmentRequest {
        EnrichmentRequest {
            product,
            metric_keys: vec![MetricKey::CarbonFootprint, MetricKey::Lifespan],
        }
    }

    #[test]
    fn test_prompt_lists_product_and_keys() {
        let product = ProductRecord::new("Steel Bottle")
            .with_brand("ACME")
            .with_bullets(["Leak proof", "BPA-free"]);
        let prompt = build_enrichment_prompt(&request(product));

        assert!(prompt.starts_with("You are an environmental product analyst."));
        assert!(prompt.contains("- title: Steel Bottle\n"));
        assert!(prompt.contains("- brand: ACME\n"));
        assert!(prompt.contains("- price: \n"));
        assert!(prompt.contains("- bullets: Leak proof | BPA-free\n"));
        assert!(prompt.contains(r#"["carbonFootprint","lifespan"]"#));
        assert!(prompt.ends_with(ENRICHMENT_RESPONSE_SHAPE));
    }

    #[test]
    fn test_prompt_limits_bullets() {
        let bullets: Vec<String> = (0..12).map(|i| format!("b{}", i)).collect();
        let prompt = build_enrichment_prompt(&request(ProductRecord::new("X").with_bullets(bullets)));

        assert!(prompt.contains("b7\n"));
        assert!(!prompt.contains("b8"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```JSON {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_code_fences_inside_text() {
        assert_eq!(
            strip_code_fences("Sure:\n```json\n{\"overall\":70}\n```\nHope this helps"),
            "Sure:\n{\"overall\":70}\nHope this helps"
        );
        assert_eq!(
            strip_code_fences("{\"notes\":[]}\n```\n```json\n"),
            "{\"notes\":[]}"
        );
        assert_eq!(strip_code_fences("```json```json{}```"), "{}");
    }
}
