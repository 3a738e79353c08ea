// storefront/src/auth/local.rs

use crate::auth::{AuthSession, AuthState, AuthSubscription};
use crate::error::StorefrontError;
use crate::models::User;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{event, Level};

/// An in-process session that signs in a fixed account.
///
/// Starts in the loading state; `finish_loading` plays the part of the
/// provider restoring (or not) a previous session.
pub struct LocalAuthSession {
  account: User,
  tx: watch::Sender<AuthState>,
}

impl LocalAuthSession {
  pub fn new(account: User) -> Self {
    let (tx, _rx) = watch::channel(AuthState::loading());
    Self { account, tx }
  }

  pub fn account(&self) -> &User {
    &self.account
  }

  /// Ends the loading phase, signed in as `restored` or signed out.
  pub fn finish_loading(&self, restored: Option<User>) {
    let state = match restored {
      Some(user) => AuthState::signed_in(user),
      None => AuthState::signed_out(),
    };
    self.publish(state);
  }

  pub fn state(&self) -> AuthState {
    self.tx.borrow().clone()
  }

  /// Publishes `state` to every subscriber.
  pub fn publish(&self, state: AuthState) {
    event!(Level::DEBUG, user = ?state.user.as_ref().map(|u| &u.id), is_loading = state.is_loading, "Auth state published.");
    self.tx.send_replace(state);
  }
}

#[async_trait]
impl AuthSession for LocalAuthSession {
  fn subscribe(&self) -> AuthSubscription {
    AuthSubscription::new(self.tx.subscribe())
  }

  async fn login(&self) -> Result<(), StorefrontError> {
    event!(Level::INFO, user_id = %self.account.id, "Signing in.");
    self.publish(AuthState::signed_in(self.account.clone()));
    Ok(())
  }

  async fn logout(&self) -> Result<(), StorefrontError> {
    event!(Level::INFO, "Signing out.");
    self.publish(AuthState::signed_out());
    Ok(())
  }
}
