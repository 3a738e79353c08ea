// tests/controller_tests.rs
mod common;

use common::*;
use serial_test::serial;
use storefront::{AuthSession, AuthState, Collection, Operation, SessionPhase, SortKey, StorefrontError, User};

async fn signed_in_fixture() -> Fixture {
  let fx = fixture();
  fx.controller.catalog().load().await.unwrap();
  fx.controller
    .handle_auth_state(AuthState::signed_in(shopper()))
    .await
    .unwrap();
  fx
}

#[tokio::test]
#[serial]
async fn test_adding_twice_yields_one_line_with_quantity_two() {
  setup_tracing();
  let fx = signed_in_fixture().await;

  fx.controller.add_to_cart("p2").await.unwrap();
  fx.controller.add_to_cart("p2").await.unwrap();

  let lines = fx.controller.cart_lines();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].item.quantity, 2);
  assert_eq!(lines[0].item.user_id, "u1");
  assert_eq!(fx.client.records(Collection::CartItems).len(), 1);
  assert_eq!(fx.client.calls_of(Operation::Create, Collection::CartItems), 1);
  assert_eq!(fx.client.calls_of(Operation::Update, Collection::CartItems), 1);
}

#[tokio::test]
#[serial]
async fn test_add_existing_line_increments_and_totals() {
  setup_tracing();
  let fx = fixture();
  fx.client
    .seed(Collection::CartItems, to_values(&[cart_line("c1", "u1", "p1", 1)]));
  fx.controller
    .handle_auth_state(AuthState::signed_in(shopper()))
    .await
    .unwrap();

  fx.controller.add_to_cart("p1").await.unwrap();

  let lines = fx.controller.cart_lines();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].item.id, "c1");
  assert_eq!(lines[0].item.quantity, 2);
  assert!(approx_eq(fx.controller.cart_total(), 39.98));
  assert_eq!(fx.controller.cart_item_count(), 2);
}

#[tokio::test]
#[serial]
async fn test_created_line_has_fresh_id_and_matching_timestamps() {
  setup_tracing();
  let fx = signed_in_fixture().await;

  fx.controller.add_to_cart("p3").await.unwrap();

  let line = fx.controller.cart().find_line("p3").unwrap();
  assert_eq!(line.quantity, 1);
  assert_eq!(line.created_at, line.updated_at);
  assert!(uuid::Uuid::parse_str(&line.id).is_ok());
}

#[tokio::test]
#[serial]
async fn test_add_to_cart_without_user_makes_no_remote_calls() {
  setup_tracing();
  let fx = fixture();
  fx.controller
    .handle_auth_state(AuthState::signed_out())
    .await
    .unwrap();
  fx.client.clear_calls();

  let result = fx.controller.add_to_cart("p1").await;

  assert!(matches!(result, Err(StorefrontError::AuthRequired { operation: "add to cart" })));
  assert_eq!(fx.client.call_count(), 0);
  assert!(fx.controller.cart_lines().is_empty());
}

#[tokio::test]
#[serial]
async fn test_failed_add_still_reloads_and_reports_the_write_error() {
  setup_tracing();
  let fx = signed_in_fixture().await;
  fx.client.clear_calls();
  fx.client.fail_nth(Operation::Create, Collection::CartItems, 1);

  let result = fx.controller.add_to_cart("p1").await;

  assert!(matches!(result, Err(StorefrontError::Store { .. })));
  assert!(result.unwrap_err().is_remote());
  assert_eq!(fx.client.calls_of(Operation::List, Collection::CartItems), 1);
  assert!(fx.controller.cart_lines().is_empty());
}

#[tokio::test]
#[serial]
async fn test_auth_state_machine_transitions() {
  setup_tracing();
  let fx = fixture();
  fx.client
    .seed(Collection::CartItems, to_values(&[cart_line("c1", "u1", "p1", 1)]));
  assert_eq!(fx.controller.phase(), SessionPhase::Initializing);

  // Loading: nothing fetched.
  fx.controller.handle_auth_state(AuthState::loading()).await.unwrap();
  assert_eq!(fx.client.call_count(), 0);
  assert!(fx.controller.is_loading());

  fx.controller
    .handle_auth_state(AuthState::signed_in(shopper()))
    .await
    .unwrap();
  assert_eq!(
    fx.controller.phase(),
    SessionPhase::Authenticated {
      user_id: "u1".to_string()
    }
  );
  assert_eq!(fx.controller.current_user().map(|u| u.id), Some("u1".to_string()));
  assert_eq!(fx.controller.cart_lines().len(), 1);
  let reloads = fx.client.calls_of(Operation::List, Collection::CartItems);
  assert_eq!(reloads, 1);

  // Same user again: no reload.
  fx.controller
    .handle_auth_state(AuthState::signed_in(shopper()))
    .await
    .unwrap();
  assert_eq!(fx.client.calls_of(Operation::List, Collection::CartItems), reloads);

  // Anonymous clears without fetching.
  fx.client.clear_calls();
  fx.controller
    .handle_auth_state(AuthState::signed_out())
    .await
    .unwrap();
  assert_eq!(fx.controller.phase(), SessionPhase::Anonymous);
  assert!(fx.controller.current_user().is_none());
  assert!(fx.controller.cart_lines().is_empty());
  assert_eq!(fx.controller.cart_total(), 0.0);
  assert_eq!(fx.client.call_count(), 0);

  fx.controller
    .handle_auth_state(AuthState::signed_out())
    .await
    .unwrap();
  assert_eq!(fx.client.call_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_user_switch_replaces_cart_and_product_lookup() {
  setup_tracing();
  let fx = fixture();
  fx.client.seed(
    Collection::CartItems,
    to_values(&[cart_line("c1", "u1", "p1", 1), cart_line("c2", "u2", "p2", 3)]),
  );
  fx.controller
    .handle_auth_state(AuthState::signed_in(shopper()))
    .await
    .unwrap();
  assert!(fx.controller.cart().product("p1").is_some());

  fx.controller
    .handle_auth_state(AuthState::signed_in(User::new("u2", "other@example.com")))
    .await
    .unwrap();

  let lines = fx.controller.cart_lines();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].item.id, "c2");
  assert!(fx.controller.cart().product("p1").is_none());
  assert!(approx_eq(fx.controller.cart_total(), 3600.0));
}

#[tokio::test]
#[serial]
async fn test_start_follows_the_session_until_shutdown() {
  setup_tracing();
  let fx = fixture();
  fx.client
    .seed(Collection::CartItems, to_values(&[cart_line("c1", "u1", "p4", 2)]));

  let handle = fx.controller.start().await;
  assert!(handle.is_running());
  assert_eq!(fx.controller.catalog().products().len(), 4);
  assert_eq!(fx.controller.phase(), SessionPhase::Initializing);
  assert_eq!(fx.client.calls_of(Operation::List, Collection::CartItems), 0);

  fx.auth.finish_loading(None);
  assert!(wait_until(|| fx.controller.phase() == SessionPhase::Anonymous).await);

  fx.controller.login().await.unwrap();
  assert!(wait_until(|| approx_eq(fx.controller.cart_total(), 1300.0)).await);
  assert_eq!(fx.controller.cart_item_count(), 2);

  fx.controller.logout().await.unwrap();
  assert!(wait_until(|| fx.controller.phase() == SessionPhase::Anonymous).await);
  assert!(fx.controller.cart_lines().is_empty());

  handle.shutdown().await;
  fx.auth.login().await.unwrap();
  tokio::time::sleep(std::time::Duration::from_millis(50)).await;
  assert_eq!(fx.controller.phase(), SessionPhase::Anonymous);
}

#[tokio::test]
#[serial]
async fn test_start_applies_an_already_restored_session() {
  setup_tracing();
  let fx = fixture();
  fx.auth.finish_loading(Some(shopper()));

  let _handle = fx.controller.start().await;

  assert_eq!(
    fx.controller.phase(),
    SessionPhase::Authenticated {
      user_id: "u1".to_string()
    }
  );
  assert_eq!(fx.client.calls_of(Operation::List, Collection::CartItems), 1);
}

#[tokio::test]
#[serial]
async fn test_start_survives_catalog_failure() {
  setup_tracing();
  let fx = fixture();
  fx.client.fail_always(Operation::List, Collection::Categories);

  let handle = fx.controller.start().await;

  assert!(handle.is_running());
  assert!(fx.controller.visible_products().is_empty());
  assert!(fx.controller.catalog().last_error().is_some());
  assert!(!fx.controller.catalog().is_loading());
}

#[tokio::test]
#[serial]
async fn test_view_state_drives_visible_products() {
  setup_tracing();
  let fx = signed_in_fixture().await;

  let ids = |fx: &Fixture| fx.controller.visible_products().into_iter().map(|p| p.id).collect::<Vec<_>>();
  assert_eq!(ids(&fx), vec!["p4", "p2", "p3", "p1"]);

  fx.controller.set_search("north");
  assert_eq!(ids(&fx), vec!["p4", "p2"]);

  fx.controller.set_sort("price-high");
  assert_eq!(fx.controller.filter().sort, SortKey::PriceHigh);
  assert_eq!(ids(&fx), vec!["p2", "p4"]);

  fx.controller.set_price_range("", "1000");
  assert_eq!(ids(&fx), vec!["p4"]);

  fx.controller.set_search("");
  fx.controller.set_price_range("", "");
  fx.controller.select_category(Some("Electronics"));
  fx.controller.set_sort("no-such-key");
  assert_eq!(fx.controller.filter().sort, SortKey::Featured);
  assert_eq!(ids(&fx), vec!["p4", "p2"]);

  fx.controller.select_category(Some("All"));
  assert_eq!(ids(&fx).len(), 4);

  // A cleared dropdown reports an empty selection.
  fx.controller.select_category(Some(""));
  assert_eq!(ids(&fx).len(), 4);

  assert_eq!(
    fx.controller.category_options(),
    vec!["All", "Electronics", "Home & Garden", "Sports"]
  );
}

#[tokio::test]
#[serial]
async fn test_cart_panel_toggles() {
  setup_tracing();
  let fx = fixture();
  assert!(!fx.controller.is_cart_open());
  assert!(fx.controller.toggle_cart());
  assert!(fx.controller.ui_state().cart_open);
  assert!(!fx.controller.toggle_cart());
  fx.controller.open_cart();
  assert!(fx.controller.is_cart_open());
  fx.controller.close_cart();
  assert!(!fx.controller.is_cart_open());
}

#[tokio::test]
#[serial]
async fn test_checkout_is_gated_and_stubbed() {
  setup_tracing();
  let fx = fixture();
  fx.controller
    .handle_auth_state(AuthState::signed_out())
    .await
    .unwrap();
  assert!(matches!(
    fx.controller.checkout().await,
    Err(StorefrontError::AuthRequired { operation: "check out" })
  ));

  fx.controller
    .handle_auth_state(AuthState::signed_in(shopper()))
    .await
    .unwrap();
  assert!(matches!(fx.controller.checkout().await, Err(StorefrontError::EmptyCart)));

  fx.controller.add_to_cart("p1").await.unwrap();
  fx.client.clear_calls();
  assert!(matches!(
    fx.controller.checkout().await,
    Err(StorefrontError::CheckoutUnavailable)
  ));
  assert_eq!(fx.client.call_count(), 0);
  assert_eq!(fx.controller.cart_item_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_controller_cart_pass_throughs() {
  setup_tracing();
  let fx = signed_in_fixture().await;
  fx.controller.add_to_cart("p1").await.unwrap();
  fx.controller.add_to_cart("p3").await.unwrap();
  let p1_line = fx.controller.cart().find_line("p1").unwrap();

  fx.controller.update_quantity(&p1_line.id, 3).await.unwrap();
  assert_eq!(fx.controller.cart_item_count(), 4);

  fx.controller.update_quantity(&p1_line.id, 0).await.unwrap();
  assert_eq!(fx.controller.cart_item_count(), 1);

  let p3_line = fx.controller.cart().find_line("p3").unwrap();
  fx.controller.remove_item(&p3_line.id).await.unwrap();
  assert!(fx.controller.cart_lines().is_empty());

  fx.controller.add_to_cart("p2").await.unwrap();
  fx.controller.clear_cart().await.unwrap();
  assert_eq!(fx.controller.cart_item_count(), 0);
  assert!(fx.client.records(Collection::CartItems).is_empty());
}

#[tokio::test]
#[serial]
async fn test_session_trait_object_is_usable_directly() {
  setup_tracing();
  let fx = fixture();
  let mut subscription = fx.auth.subscribe();
  assert_eq!(subscription.current(), AuthState::loading());

  fx.auth.login().await.unwrap();
  assert_eq!(subscription.next().await, Some(AuthState::signed_in(shopper())));
}
