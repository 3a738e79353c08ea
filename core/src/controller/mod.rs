// storefront/src/controller/mod.rs

//! `AppController`: composes the auth session, the catalog and the cart, and
//! owns the top-level view state.
//!
//! Lifecycle: construct with an explicit session and client, then
//! `start()` loads the catalog, subscribes to the session and feeds every
//! auth transition into `handle_auth_state`. The returned `SessionHandle`
//! unsubscribes when shut down or dropped.

pub mod commands;
pub mod ui;

use crate::auth::{AuthSession, AuthState};
use crate::cart::{CartLine, CartStore};
use crate::catalog::{CatalogView, ProductFilter, SortKey};
use crate::error::Result;
use crate::models::{Category, Product, User};
use crate::options::StorefrontOptions;
use crate::remote::RemoteCollectionClient;
use crate::workflow::ContextData;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{event, instrument, Level};

pub use commands::{AddToCartCtxData, CartCommands, CheckoutCtxData};
pub use ui::{SessionPhase, UiState};

#[derive(Clone)]
pub struct AppController {
  session: Arc<dyn AuthSession>,
  catalog: CatalogView,
  cart: CartStore,
  commands: Arc<CartCommands>,
  ui: ContextData<UiState>,
  phase: ContextData<SessionPhase>,
  user: ContextData<Option<User>>,
}

/// The running auth subscription. Shutting it down, or dropping it, stops
/// the controller from receiving further auth transitions.
pub struct SessionHandle {
  task: Option<JoinHandle<()>>,
}

impl SessionHandle {
  pub fn is_running(&self) -> bool {
    self.task.as_ref().map_or(false, |t| !t.is_finished())
  }

  pub async fn shutdown(mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
      let _ = task.await;
      event!(Level::DEBUG, "Auth subscription closed.");
    }
  }
}

impl Drop for SessionHandle {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

impl AppController {
  pub fn new(
    session: Arc<dyn AuthSession>,
    client: Arc<dyn RemoteCollectionClient>,
    options: StorefrontOptions,
  ) -> Self {
    Self {
      session,
      catalog: CatalogView::new(client.clone(), options.page_size),
      cart: CartStore::new(client),
      commands: Arc::new(CartCommands::new()),
      ui: ContextData::new(UiState::default()),
      phase: ContextData::new(SessionPhase::Initializing),
      user: ContextData::new(None),
    }
  }

  pub fn catalog(&self) -> &CatalogView {
    &self.catalog
  }

  pub fn cart(&self) -> &CartStore {
    &self.cart
  }

  /// Loads the catalog, applies the session's current state, then follows
  /// the session from a background task.
  ///
  /// A failed catalog load is recorded on the catalog and does not stop the
  /// session from starting.
  pub async fn start(&self) -> SessionHandle {
    if let Err(e) = self.catalog.load().await {
      event!(Level::WARN, error = %e, "Catalog unavailable; starting the session anyway.");
    }

    let mut subscription = self.session.subscribe();
    let initial = subscription.current();
    if let Err(e) = self.handle_auth_state(initial).await {
      event!(Level::WARN, error = %e, "Initial auth state handling failed.");
    }

    let controller = self.clone();
    let task = tokio::spawn(async move {
      while let Some(state) = subscription.next().await {
        if let Err(e) = controller.handle_auth_state(state).await {
          event!(Level::WARN, error = %e, "Auth transition handling failed.");
        }
      }
      event!(Level::DEBUG, "Auth session closed its channel.");
    });
    SessionHandle { task: Some(task) }
  }

  /// Drives the session state machine.
  ///
  /// Entering `Authenticated` reloads the cart; entering `Anonymous` clears it
  /// without a fetch; `Initializing` does nothing. Re-entering the current
  /// phase is a no-op.
  #[instrument(
    name = "AppController::handle_auth_state",
    skip_all,
    fields(user_id = ?state.user.as_ref().map(|u| &u.id), is_loading = state.is_loading)
  )]
  pub async fn handle_auth_state(&self, state: AuthState) -> Result<()> {
    let next = match (&state.user, state.is_loading) {
      (_, true) => SessionPhase::Initializing,
      (Some(user), false) => SessionPhase::Authenticated {
        user_id: user.id.clone(),
      },
      (None, false) => SessionPhase::Anonymous,
    };

    let changed = self.phase.update(|phase| {
      if *phase == next {
        false
      } else {
        *phase = next.clone();
        true
      }
    });
    if !changed {
      event!(Level::TRACE, "Auth phase unchanged.");
      return Ok(());
    }
    event!(Level::INFO, phase = ?next, "Auth phase changed.");

    match next {
      SessionPhase::Initializing => Ok(()),
      SessionPhase::Authenticated { user_id } => {
        *self.user.write() = state.user;
        self.cart.set_user(Some(&user_id));
        self.cart.reload().await
      }
      SessionPhase::Anonymous => {
        *self.user.write() = None;
        self.cart.set_user(None);
        Ok(())
      }
    }
  }

  pub fn phase(&self) -> SessionPhase {
    self.phase.read().clone()
  }

  pub fn current_user(&self) -> Option<User> {
    self.user.read().clone()
  }

  pub async fn login(&self) -> Result<()> {
    self.session.login().await
  }

  pub async fn logout(&self) -> Result<()> {
    self.session.logout().await
  }

  // --- View state ---

  pub fn ui_state(&self) -> UiState {
    self.ui.read().clone()
  }

  pub fn filter(&self) -> ProductFilter {
    self.ui.read().filter.clone()
  }

  pub fn set_search(&self, query: &str) {
    self.ui.write().filter.search = query.to_string();
  }

  /// `None` (or `"All"`) shows every category.
  pub fn select_category(&self, category: Option<&str>) {
    self.ui.write().filter.category = category.map(str::to_string);
  }

  pub fn set_price_range(&self, min: &str, max: &str) {
    let mut ui = self.ui.write();
    ui.filter.min_price = min.to_string();
    ui.filter.max_price = max.to_string();
  }

  /// Accepts the UI sort keys (`price-low`, `newest`, ...). Unknown keys
  /// select `featured`.
  pub fn set_sort(&self, key: &str) {
    self.set_sort_key(SortKey::from_key(key));
  }

  pub fn set_sort_key(&self, sort: SortKey) {
    self.ui.write().filter.sort = sort;
  }

  pub fn open_cart(&self) {
    self.ui.write().cart_open = true;
  }

  pub fn close_cart(&self) {
    self.ui.write().cart_open = false;
  }

  pub fn toggle_cart(&self) -> bool {
    self.ui.update(|ui| {
      ui.cart_open = !ui.cart_open;
      ui.cart_open
    })
  }

  pub fn is_cart_open(&self) -> bool {
    self.ui.read().cart_open
  }

  /// The catalog filtered and sorted by the current view state.
  pub fn visible_products(&self) -> Vec<Product> {
    let filter = self.filter();
    self.catalog.visible(&filter)
  }

  pub fn categories(&self) -> Vec<Category> {
    self.catalog.categories()
  }

  pub fn category_options(&self) -> Vec<String> {
    self.catalog.category_options()
  }

  pub fn is_loading(&self) -> bool {
    self.phase() == SessionPhase::Initializing || self.catalog.is_loading()
  }

  // --- Cart ---

  pub fn cart_lines(&self) -> Vec<CartLine> {
    self.cart.lines()
  }

  pub fn cart_item_count(&self) -> i64 {
    self.cart.item_count()
  }

  pub fn cart_total(&self) -> f64 {
    self.cart.calculate_total()
  }

  /// Adds one unit of `product_id`: increments the loaded line for it, or
  /// creates a line, then reloads the cart. Requires a signed-in user.
  ///
  /// A failed write is returned after the reload has run.
  #[instrument(name = "AppController::add_to_cart", skip(self), err(Display))]
  pub async fn add_to_cart(&self, product_id: &str) -> Result<()> {
    let ctx = ContextData::new(AddToCartCtxData::new(self.cart.clone(), self.cart.user_id(), product_id));
    self.commands.add_to_cart.run(ctx.clone()).await?;
    let parked = ctx.write().write_error.take();
    match parked {
      Some(e) => Err(e),
      None => Ok(()),
    }
  }

  pub async fn update_quantity(&self, item_id: &str, quantity: i64) -> Result<()> {
    self.cart.update_quantity(item_id, quantity).await
  }

  pub async fn remove_item(&self, item_id: &str) -> Result<()> {
    self.cart.remove_item(item_id).await
  }

  pub async fn clear_cart(&self) -> Result<()> {
    self.cart.clear_cart().await
  }

  /// Checkout is stubbed: after the sign-in and non-empty-cart checks it
  /// always fails with `CheckoutUnavailable`.
  #[instrument(name = "AppController::checkout", skip(self), err(Display))]
  pub async fn checkout(&self) -> Result<()> {
    let ctx = ContextData::new(CheckoutCtxData {
      cart: self.cart.clone(),
      user_id: self.cart.user_id(),
      line_count: 0,
      total: 0.0,
    });
    self.commands.checkout.run(ctx).await?;
    Ok(())
  }
}
