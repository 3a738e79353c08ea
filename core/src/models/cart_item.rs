// storefront/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cart line: the quantity of one product in one user's cart.
///
/// `quantity` is at least 1 while the line exists; lowering it to zero or
/// below deletes the line instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: String,
  pub user_id: String,
  pub product_id: String,
  pub quantity: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl CartItem {
  /// A fresh line with quantity 1 and a newly generated id.
  pub fn new_line(user_id: &str, product_id: &str, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      user_id: user_id.to_string(),
      product_id: product_id.to_string(),
      quantity: 1,
      created_at: now,
      updated_at: now,
    }
  }
}
