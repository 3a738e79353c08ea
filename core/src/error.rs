// storefront/src/error.rs

use thiserror::Error;

/// Errors reported by a `RemoteCollectionClient`.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Record '{id}' not found in collection '{collection}'")]
  NotFound { collection: String, id: String },

  #[error("Invalid record for collection '{collection}': {message}")]
  InvalidRecord { collection: String, message: String },

  #[error("Remote store rejected {operation} on '{collection}': {message}")]
  Rejected {
    collection: String,
    operation: String,
    message: String,
  },

  #[error("Record serialization failed: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// Errors raised by the workflow engine itself, as opposed to its handlers.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Handler missing for required step '{step_name}' of workflow '{workflow}'")]
  HandlerMissing { workflow: String, step_name: String },

  #[error("Internal workflow error: {0}")]
  Internal(String),
}

/// Application-level error returned by the controller and the stores.
#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error("Sign-in required to {operation}")]
  AuthRequired { operation: &'static str },

  #[error("Remote operation on '{collection}' failed: {source}")]
  Store {
    collection: String,
    #[source]
    source: StoreError,
  },

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("The cart is empty")]
  EmptyCart,

  #[error("Checkout is not available")]
  CheckoutUnavailable,

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl StorefrontError {
  pub fn store(collection: impl Into<String>, source: StoreError) -> Self {
    StorefrontError::Store {
      collection: collection.into(),
      source,
    }
  }

  /// True for failures reported by the remote store, as opposed to local rejections.
  pub fn is_remote(&self) -> bool {
    matches!(self, StorefrontError::Store { .. })
  }
}

impl From<anyhow::Error> for StorefrontError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StorefrontError>() {
      Ok(app_err) => app_err,
      Err(err) => StorefrontError::Internal(format!("{:#}", err)),
    }
  }
}

pub type Result<T, E = StorefrontError> = std::result::Result<T, E>;
