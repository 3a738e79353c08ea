// storefront/src/catalog/filter.rs

//! The search / category / price / sort projection over the product snapshot.
//!
//! Pure and synchronous. Filters are conjunctive and run before the sort.

use crate::models::Product;
use std::cmp::Ordering;

/// Category selection meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Prefix of the category identifiers stored on products.
pub const CATEGORY_ID_PREFIX: &str = "cat_";

/// Maps a category display name to the identifier products store:
/// lowercased, everything but ASCII letters and digits removed, prefixed.
///
/// `"Home & Garden"` becomes `"cat_homegarden"`.
pub fn normalize_category_slug(display_name: &str) -> String {
  let stripped: String = display_name
    .to_lowercase()
    .chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .collect();
  format!("{}{}", CATEGORY_ID_PREFIX, stripped)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
  /// Fetch order.
  #[default]
  Featured,
  PriceLow,
  PriceHigh,
  Rating,
  Newest,
}

impl SortKey {
  /// Parses the UI key. Unknown keys fall back to `Featured`.
  pub fn from_key(key: &str) -> Self {
    match key {
      "price-low" => SortKey::PriceLow,
      "price-high" => SortKey::PriceHigh,
      "rating" => SortKey::Rating,
      "newest" => SortKey::Newest,
      _ => SortKey::Featured,
    }
  }

  pub fn as_key(&self) -> &'static str {
    match self {
      SortKey::Featured => "featured",
      SortKey::PriceLow => "price-low",
      SortKey::PriceHigh => "price-high",
      SortKey::Rating => "rating",
      SortKey::Newest => "newest",
    }
  }

  fn compare(&self, a: &Product, b: &Product) -> Ordering {
    match self {
      SortKey::Featured => Ordering::Equal,
      SortKey::PriceLow => a.price.total_cmp(&b.price),
      SortKey::PriceHigh => b.price.total_cmp(&a.price),
      SortKey::Rating => b.rating.total_cmp(&a.rating),
      SortKey::Newest => b.created_at.cmp(&a.created_at),
    }
  }
}

/// Inclusive price bounds. `None` is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
  pub min: Option<f64>,
  pub max: Option<f64>,
}

impl PriceRange {
  /// Parses the raw bound inputs. Empty or unparseable input is unbounded.
  pub fn parse(min: &str, max: &str) -> Self {
    Self {
      min: parse_bound(min),
      max: parse_bound(max),
    }
  }

  pub fn contains(&self, price: f64) -> bool {
    self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
  }
}

fn parse_bound(raw: &str) -> Option<f64> {
  raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Case-insensitive substring match on title, brand or description.
pub fn matches_search(product: &Product, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  let needle = query.to_lowercase();
  [&product.title, &product.brand, &product.description]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// The slug a category selection filters on. `None`, blank and `"All"` select
/// every category.
fn selected_slug(selected: Option<&str>) -> Option<String> {
  selected
    .map(str::trim)
    .filter(|name| !name.is_empty() && *name != ALL_CATEGORIES)
    .map(normalize_category_slug)
}

pub fn matches_category(product: &Product, selected: Option<&str>) -> bool {
  selected_slug(selected).map_or(true, |slug| product.category == slug)
}

/// The user's current view criteria.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFilter {
  pub search: String,
  /// Display name of the selected category.
  pub category: Option<String>,
  pub min_price: String,
  pub max_price: String,
  pub sort: SortKey,
}

impl ProductFilter {
  pub fn price_range(&self) -> PriceRange {
    PriceRange::parse(&self.min_price, &self.max_price)
  }

  pub fn matches(&self, product: &Product) -> bool {
    matches_search(product, &self.search)
      && matches_category(product, self.category.as_deref())
      && self.price_range().contains(product.price)
  }

  /// Filters then stably sorts `products`.
  pub fn apply(&self, products: &[Product]) -> Vec<Product> {
    let range = self.price_range();
    let slug = selected_slug(self.category.as_deref());

    let mut visible: Vec<Product> = products
      .iter()
      .filter(|p| matches_search(p, &self.search))
      .filter(|p| slug.as_ref().map_or(true, |s| &p.category == s))
      .filter(|p| range.contains(p.price))
      .cloned()
      .collect();

    if self.sort != SortKey::Featured {
      visible.sort_by(|a, b| self.sort.compare(a, b));
    }
    visible
  }
}
