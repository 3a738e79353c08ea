// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub images: Vec<String>,
  #[serde(default)]
  pub brand: String,
  /// Category identifier in its normalized slug form (`cat_...`).
  pub category: String,
  #[serde(default)]
  pub specs: BTreeMap<String, String>,
  #[serde(default)]
  pub features: Vec<String>,
  pub price: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_price: Option<f64>,
  /// 0 to 5.
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub review_count: u32,
  #[serde(default)]
  pub in_stock: bool,
  #[serde(default)]
  pub stock_quantity: u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Whole-percent discount against `original_price`, when the product is marked down.
  pub fn discount_percent(&self) -> Option<u32> {
    match self.original_price {
      Some(original) if original > self.price && original > 0.0 => {
        Some(((original - self.price) / original * 100.0).round() as u32)
      }
      _ => None,
    }
  }

  /// First image, used as the card thumbnail.
  pub fn primary_image(&self) -> Option<&str> {
    self.images.first().map(String::as_str)
  }
}
