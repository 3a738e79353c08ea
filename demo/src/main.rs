// storefront_demo/src/main.rs

mod config;
mod errors;
mod seed;
mod session;

use crate::config::DemoConfig;
use std::sync::Arc;
use storefront::{AppController, LocalAuthSession, MemoryCollectionClient, User};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting storefront demo...");

  let config = match DemoConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load demo configuration.");
      return Err(e.into());
    }
  };

  let client = Arc::new(MemoryCollectionClient::new());
  if config.seed_catalog {
    seed::seed_catalog(&client)?;
  } else {
    tracing::info!("Catalog seeding disabled; the catalog will be empty.");
  }

  let auth = Arc::new(LocalAuthSession::new(User::new(
    config.demo_user_id.clone(),
    config.demo_user_email.clone(),
  )));
  let controller = AppController::new(auth.clone(), client.clone(), config.storefront_options()?);

  session::run(&controller, &auth).await?;

  tracing::info!(remote_calls = client.call_count(), "Storefront demo finished.");
  Ok(())
}
