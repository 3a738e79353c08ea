// storefront/src/auth/mod.rs

//! The contract the core consumes from the authentication provider.

pub mod local;

use crate::error::StorefrontError;
use crate::models::User;
use async_trait::async_trait;
use tokio::sync::watch;

pub use local::LocalAuthSession;

/// A snapshot of the provider's sign-in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
  pub user: Option<User>,
  pub is_loading: bool,
}

impl AuthState {
  pub fn loading() -> Self {
    Self {
      user: None,
      is_loading: true,
    }
  }

  pub fn signed_in(user: User) -> Self {
    Self {
      user: Some(user),
      is_loading: false,
    }
  }

  pub fn signed_out() -> Self {
    Self {
      user: None,
      is_loading: false,
    }
  }
}

/// A live view of the session's state. Dropping it unsubscribes.
#[derive(Debug)]
pub struct AuthSubscription {
  rx: watch::Receiver<AuthState>,
}

impl AuthSubscription {
  pub fn new(rx: watch::Receiver<AuthState>) -> Self {
    Self { rx }
  }

  /// The latest state, marking it as seen.
  pub fn current(&mut self) -> AuthState {
    self.rx.borrow_and_update().clone()
  }

  /// Waits for the next transition. `None` once the session is gone.
  pub async fn next(&mut self) -> Option<AuthState> {
    self.rx.changed().await.ok()?;
    Some(self.rx.borrow_and_update().clone())
  }
}

/// Authentication provider handle.
///
/// `login` and `logout` are fire-and-forget: their effect is observed through
/// a subscription, never through the return value.
#[async_trait]
pub trait AuthSession: Send + Sync {
  fn subscribe(&self) -> AuthSubscription;

  async fn login(&self) -> Result<(), StorefrontError>;

  async fn logout(&self) -> Result<(), StorefrontError>;
}
