// storefront/src/cart.rs

//! `CartStore`: the signed-in user's cart lines, the product lookup needed to
//! price them, and every mutating cart operation.
//!
//! The store never patches its lines locally. Each mutation performs its
//! remote write and then reloads from the collection, whatever the write's
//! outcome.
//!
//! Reloads are ticketed. A user switch bumps the session generation, and a
//! reload result is applied only while its generation is current and no
//! later-ticketed reload has been applied. Late responses for a previous user,
//! or for a reload that has been overtaken, are dropped.

use crate::error::{Result, StorefrontError};
use crate::models::{CartItem, Product};
use crate::remote::{create_from, list_as, Collection, Direction, ListOptions, RemoteCollectionClient};
use crate::workflow::ContextData;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[derive(Debug, Clone, Default)]
pub struct CartState {
  pub user_id: Option<String>,
  pub items: Vec<CartItem>,
  /// product id -> product, for the products referenced by `items`.
  pub products: HashMap<String, Product>,
  pub is_loading: bool,
  generation: u64,
  issued_ticket: u64,
  applied_ticket: u64,
}

/// A cart line joined with its product, when resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
  pub item: CartItem,
  pub product: Option<Product>,
}

impl CartLine {
  /// Zero while the product is unresolved.
  pub fn line_total(&self) -> f64 {
    self.product.as_ref().map_or(0.0, |p| p.price * self.item.quantity as f64)
  }
}

#[derive(Clone)]
pub struct CartStore {
  client: Arc<dyn RemoteCollectionClient>,
  state: ContextData<CartState>,
}

impl CartStore {
  pub fn new(client: Arc<dyn RemoteCollectionClient>) -> Self {
    Self {
      client,
      state: ContextData::new(CartState::default()),
    }
  }

  /// Switches the cart to `user_id`.
  ///
  /// A change of user drops the lines and the product lookup immediately and
  /// invalidates any reload still in flight. Returns whether anything changed.
  pub fn set_user(&self, user_id: Option<&str>) -> bool {
    let mut state = self.state.write();
    if state.user_id.as_deref() == user_id {
      return false;
    }
    event!(Level::DEBUG, from = ?state.user_id, to = ?user_id, "Cart user changed.");
    state.user_id = user_id.map(str::to_string);
    state.generation += 1;
    state.items.clear();
    state.products.clear();
    state.is_loading = false;
    true
  }

  pub fn user_id(&self) -> Option<String> {
    self.state.read().user_id.clone()
  }

  pub fn snapshot(&self) -> CartState {
    self.state.read().clone()
  }

  pub fn items(&self) -> Vec<CartItem> {
    self.state.read().items.clone()
  }

  pub fn is_loading(&self) -> bool {
    self.state.read().is_loading
  }

  /// The loaded line for `product_id`, if any.
  pub fn find_line(&self, product_id: &str) -> Option<CartItem> {
    self.state.with(|s| s.items.iter().find(|i| i.product_id == product_id).cloned())
  }

  pub fn product(&self, product_id: &str) -> Option<Product> {
    self.state.with(|s| s.products.get(product_id).cloned())
  }

  pub fn lines(&self) -> Vec<CartLine> {
    self.state.with(|s| {
      s.items
        .iter()
        .map(|item| CartLine {
          item: item.clone(),
          product: s.products.get(&item.product_id).cloned(),
        })
        .collect()
    })
  }

  /// Σ price × quantity over lines whose product is resolved. Unresolved
  /// lines contribute nothing until their product arrives.
  pub fn calculate_total(&self) -> f64 {
    self.state.with(|s| {
      s.items
        .iter()
        .filter_map(|item| s.products.get(&item.product_id).map(|p| p.price * item.quantity as f64))
        .sum()
    })
  }

  /// Σ quantity over all lines, resolved or not.
  pub fn item_count(&self) -> i64 {
    self.state.with(|s| s.items.iter().map(|i| i.quantity).sum())
  }

  fn require_user(&self, operation: &'static str) -> Result<String> {
    self.user_id().ok_or_else(|| {
      event!(Level::WARN, operation, "Cart mutation rejected: no signed-in user.");
      StorefrontError::AuthRequired { operation }
    })
  }

  /// Replaces the lines with the active user's cart from the store, then
  /// resolves their products in one batched query.
  ///
  /// Without an active user the cart is emptied and nothing is fetched. A
  /// failed line fetch empties the cart rather than leaving stale lines.
  #[instrument(name = "CartStore::reload", skip(self), err(Display))]
  pub async fn reload(&self) -> Result<()> {
    let (user_id, generation, ticket) = {
      let mut state = self.state.write();
      let Some(user_id) = state.user_id.clone() else {
        state.items.clear();
        state.products.clear();
        return Ok(());
      };
      state.issued_ticket += 1;
      state.is_loading = true;
      (user_id, state.generation, state.issued_ticket)
    };

    let query = ListOptions::new()
      .where_eq("userId", user_id.as_str())
      .order_by("createdAt", Direction::Ascending);
    let fetched = list_as::<CartItem>(self.client.as_ref(), Collection::CartItems, query).await;

    let items = {
      let mut state = self.state.write();
      if state.generation != generation || ticket <= state.applied_ticket {
        event!(Level::DEBUG, ticket, "Discarding stale cart reload.");
        return Ok(());
      }
      state.applied_ticket = ticket;
      if ticket == state.issued_ticket {
        state.is_loading = false;
      }
      match fetched {
        Ok(items) => {
          state.items = items.clone();
          items
        }
        Err(e) => {
          event!(Level::ERROR, error = %e, "Cart load failed; showing an empty cart.");
          state.items.clear();
          state.products.clear();
          return Err(StorefrontError::store(Collection::CartItems.as_str(), e));
        }
      }
    };
    event!(Level::DEBUG, lines = items.len(), "Cart lines loaded.");

    self.resolve_products(&items, generation, ticket).await
  }

  async fn resolve_products(&self, items: &[CartItem], generation: u64, ticket: u64) -> Result<()> {
    if items.is_empty() {
      self.state.write().products.clear();
      return Ok(());
    }

    let ids: BTreeSet<&str> = items.iter().map(|i| i.product_id.as_str()).collect();
    let query = ListOptions::new().where_in("id", ids);
    let fetched = list_as::<Product>(self.client.as_ref(), Collection::Products, query).await;

    let mut state = self.state.write();
    if state.generation != generation || state.applied_ticket != ticket {
      event!(Level::DEBUG, ticket, "Discarding stale product lookup.");
      return Ok(());
    }
    match fetched {
      Ok(products) => {
        state.products = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        Ok(())
      }
      Err(e) => {
        event!(Level::ERROR, error = %e, "Cart product lookup failed; unresolved lines count as zero.");
        Err(StorefrontError::store(Collection::Products.as_str(), e))
      }
    }
  }

  /// Reloads after a write and reports the write's failure first.
  async fn reload_after(&self, written: Result<()>) -> Result<()> {
    if let Err(e) = &written {
      event!(Level::ERROR, error = %e, "Cart write failed; reloading anyway.");
    }
    let reloaded = self.reload().await;
    written.and(reloaded)
  }

  /// Increments an existing line by one. Does not reload.
  pub(crate) async fn write_increment(&self, line: &CartItem) -> Result<()> {
    let fields = json!({ "quantity": line.quantity + 1, "updatedAt": Utc::now() });
    self
      .client
      .update(Collection::CartItems, &line.id, fields)
      .await
      .map_err(|e| StorefrontError::store(Collection::CartItems.as_str(), e))
  }

  /// Creates a fresh quantity-1 line. Does not reload.
  pub(crate) async fn write_new_line(&self, user_id: &str, product_id: &str) -> Result<CartItem> {
    let line = CartItem::new_line(user_id, product_id, Utc::now());
    create_from(self.client.as_ref(), Collection::CartItems, &line)
      .await
      .map_err(|e| StorefrontError::store(Collection::CartItems.as_str(), e))?;
    Ok(line)
  }

  /// Sets a line's quantity. Zero or below removes the line instead.
  #[instrument(name = "CartStore::update_quantity", skip(self), err(Display))]
  pub async fn update_quantity(&self, item_id: &str, quantity: i64) -> Result<()> {
    if quantity <= 0 {
      return self.remove_item(item_id).await;
    }
    self.require_user("update cart quantity")?;

    let fields = json!({ "quantity": quantity, "updatedAt": Utc::now() });
    let written = self
      .client
      .update(Collection::CartItems, item_id, fields)
      .await
      .map_err(|e| StorefrontError::store(Collection::CartItems.as_str(), e));
    self.reload_after(written).await
  }

  #[instrument(name = "CartStore::remove_item", skip(self), err(Display))]
  pub async fn remove_item(&self, item_id: &str) -> Result<()> {
    self.require_user("remove a cart line")?;

    let written = self
      .client
      .delete(Collection::CartItems, item_id)
      .await
      .map_err(|e| StorefrontError::store(Collection::CartItems.as_str(), e));
    self.reload_after(written).await
  }

  /// Deletes every loaded line, one call per line, stopping at the first
  /// failure. Lines already deleted stay deleted; the reload shows what the
  /// store actually holds.
  #[instrument(name = "CartStore::clear_cart", skip(self), err(Display))]
  pub async fn clear_cart(&self) -> Result<()> {
    self.require_user("clear the cart")?;

    let ids: Vec<String> = self.state.with(|s| s.items.iter().map(|i| i.id.clone()).collect());
    let mut written = Ok(());
    for (deleted, id) in ids.iter().enumerate() {
      if let Err(e) = self.client.delete(Collection::CartItems, id).await {
        event!(Level::WARN, deleted, remaining = ids.len() - deleted, "Cart clear interrupted.");
        written = Err(StorefrontError::store(Collection::CartItems.as_str(), e));
        break;
      }
    }
    self.reload_after(written).await
  }
}
