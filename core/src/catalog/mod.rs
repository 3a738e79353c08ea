// storefront/src/catalog/mod.rs

//! `CatalogView`: the product/category snapshot and its filtered projection.

pub mod filter;

use crate::error::{Result, StorefrontError};
use crate::models::{Category, Product};
use crate::remote::{list_as, Collection, Direction, ListOptions, RemoteCollectionClient};
use crate::workflow::ContextData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub use filter::{
  matches_category, matches_search, normalize_category_slug, PriceRange, ProductFilter, SortKey, ALL_CATEGORIES,
  CATEGORY_ID_PREFIX,
};

/// Products fetched per catalog load.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
  /// Newest first, as fetched.
  pub products: Vec<Product>,
  /// Alphabetical by name.
  pub categories: Vec<Category>,
  pub is_loading: bool,
  pub loaded: bool,
  pub last_error: Option<String>,
}

#[derive(Clone)]
pub struct CatalogView {
  client: Arc<dyn RemoteCollectionClient>,
  page_size: usize,
  state: ContextData<CatalogState>,
}

impl CatalogView {
  pub fn new(client: Arc<dyn RemoteCollectionClient>, page_size: usize) -> Self {
    Self {
      client,
      page_size,
      state: ContextData::new(CatalogState::default()),
    }
  }

  /// Fetches products and categories concurrently.
  ///
  /// On success both lists are replaced. If either fetch fails the previous
  /// snapshot is kept, the failure is recorded in `last_error` and returned.
  /// `is_loading` is cleared either way. Nothing is retried.
  #[instrument(name = "CatalogView::load", skip(self), fields(page_size = self.page_size), err(Display))]
  pub async fn load(&self) -> Result<()> {
    self.state.write().is_loading = true;

    let products_query = ListOptions::new()
      .order_by("createdAt", Direction::Descending)
      .limit(self.page_size);
    let categories_query = ListOptions::new().order_by("name", Direction::Ascending);

    let client = self.client.as_ref();
    let (products, categories) = tokio::join!(
      list_as::<Product>(client, Collection::Products, products_query),
      list_as::<Category>(client, Collection::Categories, categories_query),
    );

    let outcome = match (products, categories) {
      (Ok(products), Ok(categories)) => Ok((products, categories)),
      (Err(e), _) => Err(StorefrontError::store(Collection::Products.as_str(), e)),
      (_, Err(e)) => Err(StorefrontError::store(Collection::Categories.as_str(), e)),
    };

    let mut state = self.state.write();
    state.is_loading = false;
    match outcome {
      Ok((products, categories)) => {
        event!(
          Level::INFO,
          products = products.len(),
          categories = categories.len(),
          "Catalog loaded."
        );
        state.products = products;
        state.categories = categories;
        state.loaded = true;
        state.last_error = None;
        Ok(())
      }
      Err(e) => {
        event!(Level::ERROR, error = %e, "Catalog load failed.");
        state.last_error = Some(e.to_string());
        Err(e)
      }
    }
  }

  pub fn snapshot(&self) -> CatalogState {
    self.state.read().clone()
  }

  pub fn is_loading(&self) -> bool {
    self.state.read().is_loading
  }

  pub fn last_error(&self) -> Option<String> {
    self.state.read().last_error.clone()
  }

  pub fn products(&self) -> Vec<Product> {
    self.state.read().products.clone()
  }

  pub fn categories(&self) -> Vec<Category> {
    self.state.read().categories.clone()
  }

  pub fn find_product(&self, product_id: &str) -> Option<Product> {
    self.state.with(|s| s.products.iter().find(|p| p.id == product_id).cloned())
  }

  /// Category choices for the filter control: `All`, then the top-level names.
  pub fn category_options(&self) -> Vec<String> {
    self.state.with(|s| {
      std::iter::once(ALL_CATEGORIES.to_string())
        .chain(s.categories.iter().filter(|c| c.is_top_level()).map(|c| c.name.clone()))
        .collect()
    })
  }

  /// The filtered, sorted projection. Recomputed on every call.
  pub fn visible(&self, filter: &ProductFilter) -> Vec<Product> {
    self.state.with(|s| filter.apply(&s.products))
  }
}
