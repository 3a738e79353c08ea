// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;
use storefront::{
  normalize_category_slug, AppController, CartItem, Category, Collection, LocalAuthSession, MemoryCollectionClient,
  Product, StorefrontOptions, User,
};
use tracing::Level;

// --- Tracing Setup (once per test binary) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Record Builders ---

pub fn epoch() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

pub fn product(id: &str, title: &str, price: f64) -> Product {
  Product {
    id: id.to_string(),
    title: title.to_string(),
    description: String::new(),
    images: Vec::new(),
    brand: String::new(),
    category: normalize_category_slug("General"),
    specs: Default::default(),
    features: Vec::new(),
    price,
    original_price: None,
    rating: 0.0,
    review_count: 0,
    in_stock: true,
    stock_quantity: 10,
    created_at: epoch(),
    updated_at: epoch(),
  }
}

/// A product with every attribute the filters and sorts look at.
pub fn full_product(
  id: &str,
  title: &str,
  brand: &str,
  category: &str,
  price: f64,
  rating: f64,
  days_old: i64,
) -> Product {
  let created_at = epoch() - Duration::days(days_old);
  Product {
    brand: brand.to_string(),
    category: normalize_category_slug(category),
    rating,
    created_at,
    updated_at: created_at,
    description: format!("{} from {}", title, brand),
    ..product(id, title, price)
  }
}

pub fn category(name: &str) -> Category {
  Category {
    id: normalize_category_slug(name),
    name: name.to_string(),
    slug: name.to_lowercase().replace(' ', "-"),
    description: None,
    image: None,
    parent_id: None,
  }
}

pub fn cart_line(id: &str, user_id: &str, product_id: &str, quantity: i64) -> CartItem {
  CartItem {
    id: id.to_string(),
    user_id: user_id.to_string(),
    product_id: product_id.to_string(),
    quantity,
    created_at: epoch(),
    updated_at: epoch(),
  }
}

pub fn to_values<T: serde::Serialize>(records: &[T]) -> Vec<Value> {
  records.iter().map(|r| serde_json::to_value(r).unwrap()).collect()
}

/// Fetch order of the catalog load is newest first: p4, p2, p3, p1.
pub fn sample_products() -> Vec<Product> {
  vec![
    full_product("p1", "Match Football", "Kickoff", "Sports", 19.99, 4.8, 3),
    full_product("p2", "Laptop Pro", "Northwind", "Electronics", 1200.0, 4.5, 1),
    full_product("p3", "Desk Lamp", "Lumen", "Home & Garden", 35.0, 4.1, 2),
    full_product("p4", "Phone Mini", "Northwind", "Electronics", 650.0, 4.3, 0),
  ]
}

pub fn seeded_client() -> Arc<MemoryCollectionClient> {
  let client = Arc::new(MemoryCollectionClient::new());
  client.seed(Collection::Products, to_values(&sample_products()));
  client.seed(
    Collection::Categories,
    to_values(&[category("Sports"), category("Electronics"), category("Home & Garden")]),
  );
  client
}

pub fn shopper() -> User {
  User::new("u1", "shopper@example.com")
}

pub struct Fixture {
  pub client: Arc<MemoryCollectionClient>,
  pub auth: Arc<LocalAuthSession>,
  pub controller: AppController,
}

pub fn fixture() -> Fixture {
  let client = seeded_client();
  let auth = Arc::new(LocalAuthSession::new(shopper()));
  let controller = AppController::new(auth.clone(), client.clone(), StorefrontOptions::default());
  Fixture {
    client,
    auth,
    controller,
  }
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
  let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(2);
  while tokio::time::Instant::now() < deadline {
    if condition() {
      return true;
    }
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  }
  condition()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
  (a - b).abs() < 1e-9
}
