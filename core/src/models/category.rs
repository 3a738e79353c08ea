// storefront/src/models/category.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: String,
  /// Display name, also the source of the slug products are matched against.
  pub name: String,
  pub slug: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<String>,
}

impl Category {
  pub fn is_top_level(&self) -> bool {
    self.parent_id.is_none()
  }
}
