// storefront/src/controller/commands.rs

//! Multi-step cart commands, declared as workflows.
//!
//! Each command's context carries the `CartStore` handle the same way every
//! step needs it. Write failures are parked in the context so the
//! `reload_cart` step still runs; the controller reports them afterwards.

use crate::cart::CartStore;
use crate::error::StorefrontError;
use crate::models::CartItem;
use crate::workflow::{ContextData, SkipCondition, StepControl, Workflow};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct AddToCartCtxData {
  pub cart: CartStore,
  pub user_id: Option<String>,
  pub product_id: String,
  pub existing_line: Option<CartItem>,
  pub write_error: Option<StorefrontError>,
}

impl AddToCartCtxData {
  pub fn new(cart: CartStore, user_id: Option<String>, product_id: &str) -> Self {
    Self {
      cart,
      user_id,
      product_id: product_id.to_string(),
      existing_line: None,
      write_error: None,
    }
  }
}

pub struct CheckoutCtxData {
  pub cart: CartStore,
  pub user_id: Option<String>,
  pub line_count: usize,
  pub total: f64,
}

pub struct CartCommands {
  pub add_to_cart: Workflow<AddToCartCtxData, StorefrontError>,
  pub checkout: Workflow<CheckoutCtxData, StorefrontError>,
}

impl CartCommands {
  pub fn new() -> Self {
    Self {
      add_to_cart: add_to_cart_workflow(),
      checkout: checkout_workflow(),
    }
  }
}

impl Default for CartCommands {
  fn default() -> Self {
    Self::new()
  }
}

/// require_user → locate_cart_line → increment_cart_line | create_cart_line → reload_cart
pub fn add_to_cart_workflow() -> Workflow<AddToCartCtxData, StorefrontError> {
  let has_line: SkipCondition<AddToCartCtxData> =
    Arc::new(|ctx: &ContextData<AddToCartCtxData>| ctx.read().existing_line.is_some());
  let has_no_line: SkipCondition<AddToCartCtxData> =
    Arc::new(|ctx: &ContextData<AddToCartCtxData>| ctx.read().existing_line.is_none());

  let mut w = Workflow::<AddToCartCtxData, StorefrontError>::new(
    "add_to_cart",
    &[
      ("require_user", false, None),
      ("locate_cart_line", false, None),
      ("increment_cart_line", false, Some(has_no_line)),
      ("create_cart_line", false, Some(has_line)),
      ("reload_cart", false, None),
    ],
  );

  // Rejected locally, before any remote call.
  w.on_step("require_user", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (signed_in, product_id) = {
        let guard = ctx_data.read();
        (guard.user_id.is_some(), guard.product_id.clone())
      };
      if !signed_in {
        warn!(%product_id, "Add to cart attempted without a signed-in user.");
        return Err(StorefrontError::AuthRequired { operation: "add to cart" });
      }
      Ok(StepControl::Continue)
    })
  });

  // Looks among the lines already loaded, not in the store.
  w.on_step("locate_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let existing = guard.cart.find_line(&guard.product_id);
      guard.existing_line = existing;
      Ok::<_, StorefrontError>(StepControl::Continue)
    })
  });

  w.on_step("increment_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (cart, line) = {
        let guard = ctx_data.read();
        (guard.cart.clone(), guard.existing_line.clone())
      };
      let Some(line) = line else {
        return Ok(StepControl::Continue);
      };
      let written = cart.write_increment(&line).await;

      let mut guard = ctx_data.write();
      match written {
        Ok(()) => info!(line_id = %line.id, quantity = line.quantity + 1, "Cart line incremented."),
        Err(e) => {
          error!(line_id = %line.id, error = %e, "Cart line increment failed.");
          guard.write_error = Some(e);
        }
      }
      Ok::<_, StorefrontError>(StepControl::Continue)
    })
  });

  w.on_step("create_cart_line", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let (cart, user_id, product_id) = {
        let guard = ctx_data.read();
        (guard.cart.clone(), guard.user_id.clone(), guard.product_id.clone())
      };
      let Some(user_id) = user_id else {
        return Err(StorefrontError::AuthRequired { operation: "add to cart" });
      };
      let written = cart.write_new_line(&user_id, &product_id).await;

      let mut guard = ctx_data.write();
      match written {
        Ok(line) => info!(line_id = %line.id, %product_id, "Cart line created."),
        Err(e) => {
          error!(%product_id, error = %e, "Cart line creation failed.");
          guard.write_error = Some(e);
        }
      }
      Ok(StepControl::Continue)
    })
  });

  // The store is the source of truth: reload whatever the write did.
  w.on_step("reload_cart", |ctx_data: ContextData<AddToCartCtxData>| {
    Box::pin(async move {
      let cart = ctx_data.read().cart.clone();
      if let Err(e) = cart.reload().await {
        warn!(error = %e, "Cart reload after add failed.");
      }
      Ok::<_, StorefrontError>(StepControl::Continue)
    })
  });

  w
}

/// require_user → require_cart_lines → place_order
///
/// Payment is not implemented; `place_order` always fails and writes nothing.
pub fn checkout_workflow() -> Workflow<CheckoutCtxData, StorefrontError> {
  let mut w = Workflow::<CheckoutCtxData, StorefrontError>::new(
    "checkout",
    &[
      ("require_user", false, None),
      ("require_cart_lines", false, None),
      ("place_order", false, None),
    ],
  );

  w.on_step("require_user", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      if ctx_data.read().user_id.is_none() {
        warn!("Checkout attempted without a signed-in user.");
        return Err(StorefrontError::AuthRequired { operation: "check out" });
      }
      Ok(StepControl::Continue)
    })
  });

  w.on_step("require_cart_lines", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let (line_count, total) = (guard.cart.items().len(), guard.cart.calculate_total());
      guard.line_count = line_count;
      guard.total = total;
      if line_count == 0 {
        return Err(StorefrontError::EmptyCart);
      }
      Ok(StepControl::Continue)
    })
  });

  w.on_step("place_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (lines, total) = {
        let guard = ctx_data.read();
        (guard.line_count, guard.total)
      };
      warn!(lines, total, "Checkout requested but payment processing is not available.");
      Err::<StepControl, _>(StorefrontError::CheckoutUnavailable)
    })
  });

  w
}
