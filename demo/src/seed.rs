// storefront_demo/src/seed.rs

//! A small sample catalog for the in-memory store.

use crate::errors::Result;
use chrono::{Duration, Utc};
use storefront::{normalize_category_slug, Category, Collection, MemoryCollectionClient, Product};

const CATEGORIES: &[(&str, &str)] = &[
  ("Electronics", "electronics"),
  ("Home & Garden", "home-garden"),
  ("Sports", "sports"),
];

// (id, title, brand, category, price, original price, rating, reviews)
const PRODUCTS: &[(&str, &str, &str, &str, f64, Option<f64>, f64, u32)] = &[
  ("p-laptop", "Ultralight Laptop 14", "Northwind", "Electronics", 1199.0, Some(1399.0), 4.6, 812),
  ("p-lamp", "Arc Floor Lamp", "Lumen", "Home & Garden", 89.5, None, 4.1, 143),
  ("p-phone", "Pocket Phone Mini", "Northwind", "Electronics", 649.0, None, 4.3, 2210),
  ("p-hose", "Coil Garden Hose", "GreenYard", "Home & Garden", 24.99, Some(29.99), 3.9, 57),
  ("p-ball", "Match Football", "Kickoff", "Sports", 19.99, None, 4.8, 3120),
  ("p-racket", "Carbon Tennis Racket", "Kickoff", "Sports", 149.0, Some(179.0), 4.4, 388),
];

pub fn seed_catalog(client: &MemoryCollectionClient) -> Result<()> {
  let now = Utc::now();

  let categories = CATEGORIES
    .iter()
    .map(|(name, slug)| {
      serde_json::to_value(Category {
        id: normalize_category_slug(name),
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        image: None,
        parent_id: None,
      })
    })
    .collect::<std::result::Result<Vec<_>, _>>()?;
  client.seed(Collection::Categories, categories);

  let products = PRODUCTS
    .iter()
    .enumerate()
    .map(|(age, (id, title, brand, category, price, original_price, rating, reviews))| {
      let created_at = now - Duration::days(age as i64);
      serde_json::to_value(Product {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{} by {}", title, brand),
        images: vec![format!("https://img.example.com/{}.jpg", id)],
        brand: brand.to_string(),
        category: normalize_category_slug(category),
        specs: Default::default(),
        features: Vec::new(),
        price: *price,
        original_price: *original_price,
        rating: *rating,
        review_count: *reviews,
        in_stock: true,
        stock_quantity: 25,
        created_at,
        updated_at: created_at,
      })
    })
    .collect::<std::result::Result<Vec<_>, _>>()?;
  client.seed(Collection::Products, products);

  tracing::info!(
    categories = CATEGORIES.len(),
    products = PRODUCTS.len(),
    "Sample catalog seeded."
  );
  Ok(())
}
