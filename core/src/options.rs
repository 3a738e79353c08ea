// storefront/src/options.rs

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::error::{Result, StorefrontError};

/// Construction-time settings for `AppController`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontOptions {
  /// Products fetched by the catalog load.
  pub page_size: usize,
}

impl Default for StorefrontOptions {
  fn default() -> Self {
    Self {
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

impl StorefrontOptions {
  pub fn with_page_size(page_size: usize) -> Result<Self> {
    if page_size == 0 {
      return Err(StorefrontError::Config("page size must be at least 1".to_string()));
    }
    Ok(Self { page_size })
  }
}
