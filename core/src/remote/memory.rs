// storefront/src/remote/memory.rs

//! An in-process `RemoteCollectionClient`.
//!
//! Backs the demo binary and the test-suite. Besides storing records it keeps
//! a log of every call, can be told to reject chosen operations, and can hold
//! a call until the test releases it, which is how reload races are staged.

use crate::error::StoreError;
use crate::remote::{Collection, Direction, ListOptions, Operation, RemoteCollectionClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{event, Level};

/// One received call, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
  pub operation: Operation,
  pub collection: Collection,
  pub id: Option<String>,
}

#[derive(Debug)]
struct FailureRule {
  operation: Operation,
  collection: Collection,
  /// Matching calls to let through before the rule fires.
  skip: usize,
  persistent: bool,
}

#[derive(Default)]
struct MemoryState {
  records: HashMap<Collection, Vec<Value>>,
  calls: Vec<RemoteCall>,
  failures: Vec<FailureRule>,
  holds: Vec<(Operation, Collection, Arc<Notify>)>,
}

#[derive(Default)]
pub struct MemoryCollectionClient {
  state: Mutex<MemoryState>,
}

impl MemoryCollectionClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts records directly, bypassing the call log.
  pub fn seed(&self, collection: Collection, records: impl IntoIterator<Item = Value>) {
    let mut state = self.state.lock();
    state.records.entry(collection).or_default().extend(records);
  }

  /// Current contents of a collection, in insertion order.
  pub fn records(&self, collection: Collection) -> Vec<Value> {
    self.state.lock().records.get(&collection).cloned().unwrap_or_default()
  }

  pub fn calls(&self) -> Vec<RemoteCall> {
    self.state.lock().calls.clone()
  }

  pub fn call_count(&self) -> usize {
    self.state.lock().calls.len()
  }

  pub fn calls_of(&self, operation: Operation, collection: Collection) -> usize {
    self
      .state
      .lock()
      .calls
      .iter()
      .filter(|c| c.operation == operation && c.collection == collection)
      .count()
  }

  pub fn clear_calls(&self) {
    self.state.lock().calls.clear();
  }

  /// Rejects every later `operation` on `collection`.
  pub fn fail_always(&self, operation: Operation, collection: Collection) {
    self.state.lock().failures.push(FailureRule {
      operation,
      collection,
      skip: 0,
      persistent: true,
    });
  }

  /// Rejects the `nth` (1-based) later `operation` on `collection`, once.
  pub fn fail_nth(&self, operation: Operation, collection: Collection, nth: usize) {
    self.state.lock().failures.push(FailureRule {
      operation,
      collection,
      skip: nth.saturating_sub(1),
      persistent: false,
    });
  }

  pub fn clear_failures(&self) {
    self.state.lock().failures.clear();
  }

  /// Makes the next `operation` on `collection` wait until the returned
  /// `Notify` is signalled. The call is logged when it arrives, and its
  /// effect is applied after release.
  pub fn hold_next(&self, operation: Operation, collection: Collection) -> Arc<Notify> {
    let gate = Arc::new(Notify::new());
    self.state.lock().holds.push((operation, collection, gate.clone()));
    gate
  }

  /// Logs the call, takes a pending hold for it and decides whether it fails.
  fn admit(&self, operation: Operation, collection: Collection, id: Option<&str>) -> (Option<Arc<Notify>>, bool) {
    let mut state = self.state.lock();
    state.calls.push(RemoteCall {
      operation,
      collection,
      id: id.map(str::to_string),
    });

    let hold = state
      .holds
      .iter()
      .position(|(op, coll, _)| *op == operation && *coll == collection)
      .map(|idx| state.holds.remove(idx).2);

    let mut fail = false;
    if let Some(idx) = state
      .failures
      .iter()
      .position(|r| r.operation == operation && r.collection == collection)
    {
      let rule = &mut state.failures[idx];
      if rule.skip > 0 {
        rule.skip -= 1;
      } else {
        fail = true;
        if !rule.persistent {
          state.failures.remove(idx);
        }
      }
    }
    (hold, fail)
  }

  async fn enter(&self, operation: Operation, collection: Collection, id: Option<&str>) -> Result<(), StoreError> {
    let (hold, fail) = self.admit(operation, collection, id);
    if let Some(gate) = hold {
      gate.notified().await;
    }
    if fail {
      event!(Level::DEBUG, %operation, %collection, "Injected failure.");
      return Err(StoreError::Rejected {
        collection: collection.to_string(),
        operation: operation.to_string(),
        message: "injected failure".to_string(),
      });
    }
    Ok(())
  }
}

fn record_id(record: &Value) -> Option<&str> {
  record.get("id").and_then(Value::as_str)
}

/// Orders two field values: numbers numerically, RFC 3339 timestamps
/// chronologically, other strings lexically, missing values first.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
  match (a, b) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Less,
    (Some(_), None) => Ordering::Greater,
    (Some(Value::Number(x)), Some(Value::Number(y))) => {
      let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
      x.total_cmp(&y)
    }
    (Some(Value::String(x)), Some(Value::String(y))) => {
      match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
        (Ok(tx), Ok(ty)) => tx.cmp(&ty),
        _ => x.cmp(y),
      }
    }
    (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
    _ => Ordering::Equal,
  }
}

#[async_trait]
impl RemoteCollectionClient for MemoryCollectionClient {
  async fn list(&self, collection: Collection, options: ListOptions) -> Result<Vec<Value>, StoreError> {
    self.enter(Operation::List, collection, None).await?;

    let mut matched: Vec<Value> = {
      let state = self.state.lock();
      state
        .records
        .get(&collection)
        .map(|records| {
          records
            .iter()
            .filter(|r| options.filters.iter().all(|f| f.matches(r)))
            .cloned()
            .collect()
        })
        .unwrap_or_default()
    };

    if let Some(order) = &options.order_by {
      matched.sort_by(|a, b| {
        let ord = compare_field(a.get(&order.field), b.get(&order.field));
        match order.direction {
          Direction::Ascending => ord,
          Direction::Descending => ord.reverse(),
        }
      });
    }
    if let Some(limit) = options.limit {
      matched.truncate(limit);
    }
    Ok(matched)
  }

  async fn create(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
    let id = record_id(&record)
      .map(str::to_string)
      .ok_or_else(|| StoreError::InvalidRecord {
        collection: collection.to_string(),
        message: "record has no string 'id'".to_string(),
      })?;
    self.enter(Operation::Create, collection, Some(&id)).await?;

    let mut state = self.state.lock();
    let records = state.records.entry(collection).or_default();
    if records.iter().any(|r| record_id(r) == Some(id.as_str())) {
      return Err(StoreError::InvalidRecord {
        collection: collection.to_string(),
        message: format!("duplicate id '{}'", id),
      });
    }
    records.push(record);
    Ok(())
  }

  async fn update(&self, collection: Collection, id: &str, fields: Value) -> Result<(), StoreError> {
    self.enter(Operation::Update, collection, Some(id)).await?;

    let Value::Object(fields) = fields else {
      return Err(StoreError::InvalidRecord {
        collection: collection.to_string(),
        message: "update fields must be an object".to_string(),
      });
    };

    let mut state = self.state.lock();
    let record = state
      .records
      .get_mut(&collection)
      .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
      .ok_or_else(|| StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
      })?;
    if let Value::Object(existing) = record {
      existing.extend(fields);
    }
    Ok(())
  }

  async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
    self.enter(Operation::Delete, collection, Some(id)).await?;

    let mut state = self.state.lock();
    if let Some(records) = state.records.get_mut(&collection) {
      records.retain(|r| record_id(r) != Some(id));
    }
    Ok(())
  }
}
