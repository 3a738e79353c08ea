// storefront_demo/src/errors.rs

use storefront::StorefrontError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Seed Data Error: {0}")]
  Seed(#[from] serde_json::Error),

  #[error("Storefront Error: {source}")]
  Storefront {
    #[from]
    source: StorefrontError,
  },
}

pub type Result<T, E = DemoError> = std::result::Result<T, E>;
