// storefront/src/remote/mod.rs

//! The contract the core consumes from the hosted collection store.
//!
//! Records cross the boundary as JSON objects. The typed helpers at the
//! bottom of this module do the serde conversion so the stores can work with
//! `Product`, `CartItem` and friends.

pub mod memory;

use crate::error::StoreError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub use memory::MemoryCollectionClient;

/// Named collections of the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Products,
  Categories,
  CartItems,
  Orders,
  OrderItems,
  Reviews,
  Addresses,
  Users,
}

impl Collection {
  pub fn as_str(&self) -> &'static str {
    match self {
      Collection::Products => "products",
      Collection::Categories => "categories",
      Collection::CartItems => "cartItems",
      Collection::Orders => "orders",
      Collection::OrderItems => "orderItems",
      Collection::Reviews => "reviews",
      Collection::Addresses => "addresses",
      Collection::Users => "users",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The four operations of the client, used for call logs and failure rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  List,
  Create,
  Update,
  Delete,
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Operation::List => "list",
      Operation::Create => "create",
      Operation::Update => "update",
      Operation::Delete => "delete",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
  /// `field == value`
  Eq { field: String, value: Value },
  /// `field` is one of `values`
  In { field: String, values: Vec<Value> },
}

impl Filter {
  pub fn matches(&self, record: &Value) -> bool {
    match self {
      Filter::Eq { field, value } => record.get(field) == Some(value),
      Filter::In { field, values } => record.get(field).map_or(false, |v| values.contains(v)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ascending,
  Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
  pub field: String,
  pub direction: Direction,
}

/// Query options for `RemoteCollectionClient::list`. Filters are conjunctive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
  pub filters: Vec<Filter>,
  pub order_by: Option<OrderBy>,
  pub limit: Option<usize>,
}

impl ListOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
    self.filters.push(Filter::Eq {
      field: field.to_string(),
      value: value.into(),
    });
    self
  }

  pub fn where_in<V: Into<Value>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
    self.filters.push(Filter::In {
      field: field.to_string(),
      values: values.into_iter().map(Into::into).collect(),
    });
    self
  }

  pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
    self.order_by = Some(OrderBy {
      field: field.to_string(),
      direction,
    });
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }
}

/// Generic CRUD + query access to the hosted store.
///
/// `create` takes a fully specified record including its `id`. `update`
/// merges the given fields into the record. `delete` of an absent id succeeds.
#[async_trait]
pub trait RemoteCollectionClient: Send + Sync {
  async fn list(&self, collection: Collection, options: ListOptions) -> Result<Vec<Value>, StoreError>;

  async fn create(&self, collection: Collection, record: Value) -> Result<(), StoreError>;

  async fn update(&self, collection: Collection, id: &str, fields: Value) -> Result<(), StoreError>;

  async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Lists `collection` and deserializes every record into `T`.
pub async fn list_as<T: DeserializeOwned>(
  client: &dyn RemoteCollectionClient,
  collection: Collection,
  options: ListOptions,
) -> Result<Vec<T>, StoreError> {
  let records = client.list(collection, options).await?;
  records
    .into_iter()
    .map(|record| serde_json::from_value(record).map_err(StoreError::from))
    .collect()
}

/// Serializes `record` and creates it in `collection`.
pub async fn create_from<T: Serialize>(
  client: &dyn RemoteCollectionClient,
  collection: Collection,
  record: &T,
) -> Result<(), StoreError> {
  let value = serde_json::to_value(record)?;
  client.create(collection, value).await
}
