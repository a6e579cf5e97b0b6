//! Heuristic-only batch scoring of order-history rows.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::product::{ProductError, ProductRecord};
use crate::types::{Category, Grade};
use crate::weights::WeightConfig;
use crate::AnalysisOptions;

/// Maximum number of rows scored per batch.
pub const MAX_ORDER_ITEMS: usize = 80;

/// One row of an order history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
}

impl OrderItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn to_product(&self) -> ProductRecord {
        ProductRecord {
            title: self.title.clone(),
            brand: self.brand.clone(),
            price: self.price.clone(),
            url: self.url.clone(),
            ..Default::default()
        }
    }
}

/// Accepts either a bare list of rows or `{ items: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum OrderFile {
    List(Vec<OrderItem>),
    Wrapped { items: Vec<OrderItem> },
}

impl From<OrderFile> for Vec<OrderItem> {
    fn from(file: OrderFile) -> Self {
        match file {
            OrderFile::List(items) | OrderFile::Wrapped { items } => items,
        }
    }
}

/// Load order rows from a file; `.json` is parsed as JSON, anything else as YAML.
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<OrderItem>, ProductError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let file: OrderFile = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(file.into())
}

/// Scored summary of one order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderScore {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub order_date: String,
    pub overall: u8,
    pub grade: Grade,
    pub category: Category,
    pub co2_kg: u32,
    pub water_l: u32,
}

/// Score up to [`MAX_ORDER_ITEMS`] rows; rows with an empty title are skipped.
pub fn score_orders(items: &[OrderItem], weights: &WeightConfig) -> Vec<OrderScore> {
    let options = AnalysisOptions {
        verified_brands: Vec::new(),
        cert_verifications: Default::default(),
    };

    let scored: Vec<OrderScore> = items
        .iter()
        .take(MAX_ORDER_ITEMS)
        .filter(|item| !item.title.trim().is_empty())
        .map(|item| {
            let analysis = crate::analyze_with_options(&item.to_product(), weights, &options);
            OrderScore {
                title: item.title.clone(),
                url: item.url.clone().unwrap_or_default(),
                order_date: item.order_date.clone().unwrap_or_default(),
                overall: analysis.overall,
                grade: analysis.grade,
                category: analysis.category,
                co2_kg: analysis.estimates.co2_kg,
                water_l: analysis.estimates.water_l,
            }
        })
        .collect();

    tracing::debug!(
        rows = items.len(),
        scored = scored.len(),
        "Scored order history"
    );

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::WeightPreset;

    fn balanced() -> WeightConfig {
        WeightConfig::preset(WeightPreset::Balanced)
    }

    #[test]
    fn test_empty_titles_are_skipped() {
        let items = vec![OrderItem::new("Widget"), OrderItem::new("  "), OrderItem::new("Mug")];
        let scored = score_orders(&items, &balanced());
        let titles: Vec<&str> = scored.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Widget", "Mug"]);
    }

    #[test]
    fn test_batch_is_capped() {
        let items: Vec<OrderItem> = (0..100).map(|i| OrderItem::new(format!("Item {}", i))).collect();
        assert_eq!(score_orders(&items, &balanced()).len(), MAX_ORDER_ITEMS);
    }

    #[test]
    fn test_cap_counts_skipped_rows() {
        let mut items: Vec<OrderItem> = (0..80).map(|_| OrderItem::new("")).collect();
        items.push(OrderItem::new("Late row"));
        assert!(score_orders(&items, &balanced()).is_empty());
    }

    #[test]
    fn test_row_carries_order_fields() {
        let mut item = OrderItem::new("Reusable bottle");
        item.url = Some("https://shop.example/b".to_string());
        item.order_date = Some("2024-03-01".to_string());

        let scored = score_orders(&[item], &balanced());
        assert_eq!(scored[0].url, "https://shop.example/b");
        assert_eq!(scored[0].order_date, "2024-03-01");
        assert_eq!(scored[0].category, Category::Reusables);
        assert_eq!(scored[0].grade, Grade::from_overall(scored[0].overall));
    }

    #[test]
    fn test_order_file_shapes() {
        let list: OrderFile = serde_json::from_str(r#"[{"title":"A"}]"#).unwrap();
        let wrapped: OrderFile =
            serde_json::from_str(r#"{"items":[{"title":"A","orderDate":"2024-01-01"}]}"#).unwrap();

        let list: Vec<OrderItem> = list.into();
        let wrapped: Vec<OrderItem> = wrapped.into();
        assert_eq!(list[0].title, "A");
        assert_eq!(wrapped[0].order_date.as_deref(), Some("2024-01-01"));
    }
}
