// storefront_demo/src/config.rs

use crate::errors::{DemoError, Result};
use dotenvy::dotenv;
use std::env;
use storefront::StorefrontOptions;

#[derive(Debug, Clone)]
pub struct DemoConfig {
  pub page_size: usize,
  pub demo_user_id: String,
  pub demo_user_email: String,
  /// Seed the in-memory store with the sample catalog.
  pub seed_catalog: bool,
}

impl DemoConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| env::var(var_name).ok();

    let page_size = get_env("STOREFRONT_PAGE_SIZE")
      .unwrap_or_else(|| "50".to_string())
      .parse::<usize>()
      .map_err(|e| DemoError::Config(format!("Invalid STOREFRONT_PAGE_SIZE: {}", e)))?;
    let demo_user_id = get_env("STOREFRONT_DEMO_USER_ID").unwrap_or_else(|| "demo-user".to_string());
    let demo_user_email = get_env("STOREFRONT_DEMO_USER_EMAIL").unwrap_or_else(|| "shopper@example.com".to_string());
    let seed_catalog = get_env("STOREFRONT_SEED_CATALOG")
      .unwrap_or_else(|| "true".to_string())
      .parse::<bool>()
      .map_err(|e| DemoError::Config(format!("Invalid STOREFRONT_SEED_CATALOG value: {}", e)))?;

    tracing::info!("Demo configuration loaded.");

    Ok(Self {
      page_size,
      demo_user_id,
      demo_user_email,
      seed_catalog,
    })
  }

  pub fn storefront_options(&self) -> Result<StorefrontOptions> {
    Ok(StorefrontOptions::with_page_size(self.page_size)?)
  }
}
