//! Product records and parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a product record.
#[derive(Error, Debug)]
pub enum ProductError {
    #[error("Failed to read product file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Product title is missing or empty")]
    MissingTitle,
}

/// A product as extracted from a shopping page.
///
/// Only `title` is required. Absent or empty optional fields contribute
/// nothing to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Display price as shown on the page (unparsed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Retail site identifier (e.g. "amazon")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Feature bullets in page order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductRecord {
    /// Create a record with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Parse a product from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProductError> {
        let product: ProductRecord = serde_yaml::from_str(yaml)?;
        product.validate()?;
        Ok(product)
    }

    /// Parse a product from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProductError> {
        let product: ProductRecord = serde_json::from_str(json)?;
        product.validate()?;
        Ok(product)
    }

    /// Load a product from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProductError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Check that the record is scoreable.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.title.trim().is_empty() {
            return Err(ProductError::MissingTitle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_json() {
        let product = ProductRecord::from_json(r#"{"title": "Widget"}"#).unwrap();
        assert_eq!(product.title, "Widget");
        assert!(product.brand.is_none());
        assert!(product.bullets.is_empty());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
title: "Bamboo Toothbrush"
brand: "Brushly"
price: "$4.99"
site: "amazon"
url: "https://example.com/p/1"
bullets:
  - "biodegradable"
  - "plastic-free packaging"
description: "A toothbrush."
image: "ignored.png"
"#;
        let product = ProductRecord::from_yaml(yaml).unwrap();
        assert_eq!(product.brand.as_deref(), Some("Brushly"));
        assert_eq!(product.bullets.len(), 2);
        assert_eq!(product.site.as_deref(), Some("amazon"));
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = ProductRecord::from_json(r#"{"title": "   "}"#);
        assert!(matches!(result, Err(ProductError::MissingTitle)));
    }

    #[test]
    fn test_missing_title_is_parse_error() {
        let result = ProductRecord::from_json(r#"{"brand": "Acme"}"#);
        assert!(matches!(result, Err(ProductError::JsonError(_))));
    }
}
