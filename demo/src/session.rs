// storefront_demo/src/session.rs

//! A scripted shopping session driven through the controller.

use crate::errors::Result;
use std::time::Duration;
use storefront::{AppController, LocalAuthSession, SessionPhase, StorefrontError};
use tracing::{info, instrument, warn};

const PHASE_WAIT: Duration = Duration::from_secs(2);

/// Polls until the controller reaches a phase matching `want`.
async fn wait_for_phase(controller: &AppController, want: impl Fn(&SessionPhase) -> bool) -> bool {
  let deadline = tokio::time::Instant::now() + PHASE_WAIT;
  while tokio::time::Instant::now() < deadline {
    if want(&controller.phase()) {
      return true;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  false
}

fn log_visible(controller: &AppController, label: &str) {
  let titles: Vec<String> = controller.visible_products().into_iter().map(|p| p.title).collect();
  info!(view = label, count = titles.len(), products = ?titles, "Visible products.");
}

fn log_cart(controller: &AppController) {
  for line in controller.cart_lines() {
    let title = line.product.as_ref().map_or("<unresolved>", |p| p.title.as_str());
    info!(line_id = %line.item.id, %title, quantity = line.item.quantity, line_total = line.line_total(), "Cart line.");
  }
  info!(
    items = controller.cart_item_count(),
    total = %format!("{:.2}", controller.cart_total()),
    "Cart summary."
  );
}

#[instrument(name = "demo_session", skip_all)]
pub async fn run(controller: &AppController, auth: &LocalAuthSession) -> Result<()> {
  let handle = controller.start().await;
  info!(categories = ?controller.category_options(), "Catalog ready.");

  // The provider restores no previous session.
  auth.finish_loading(None);
  wait_for_phase(controller, |p| *p == SessionPhase::Anonymous).await;

  match controller.add_to_cart("p-ball").await {
    Err(StorefrontError::AuthRequired { .. }) => info!("Anonymous add to cart rejected as expected."),
    other => warn!(result = ?other, "Unexpected anonymous add to cart outcome."),
  }

  controller.login().await?;
  if !wait_for_phase(controller, |p| matches!(p, SessionPhase::Authenticated { .. })).await {
    warn!("Sign-in was not observed in time.");
  }

  log_visible(controller, "featured");
  controller.set_search("lap");
  log_visible(controller, "search 'lap'");
  controller.set_search("");
  controller.select_category(Some("Electronics"));
  controller.set_sort("price-low");
  log_visible(controller, "electronics by price");
  controller.select_category(None);
  controller.set_price_range("20", "");
  controller.set_sort("rating");
  log_visible(controller, "from 20 by rating");

  controller.open_cart();
  controller.add_to_cart("p-laptop").await?;
  controller.add_to_cart("p-laptop").await?;
  controller.add_to_cart("p-ball").await?;
  log_cart(controller);

  if let Some(ball) = controller.cart().find_line("p-ball") {
    controller.update_quantity(&ball.id, 3).await?;
  }
  if let Some(laptop) = controller.cart().find_line("p-laptop") {
    controller.update_quantity(&laptop.id, 0).await?;
  }
  log_cart(controller);

  match controller.checkout().await {
    Err(StorefrontError::CheckoutUnavailable) => info!("Checkout is stubbed."),
    other => warn!(result = ?other, "Unexpected checkout outcome."),
  }

  controller.clear_cart().await?;
  controller.close_cart();
  log_cart(controller);

  controller.logout().await?;
  wait_for_phase(controller, |p| *p == SessionPhase::Anonymous).await;
  handle.shutdown().await;
  info!("Demo session finished.");
  Ok(())
}
