// storefront/src/controller/ui.rs

use crate::catalog::ProductFilter;

/// Top-level view state owned by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
  pub filter: ProductFilter,
  pub cart_open: bool,
}

/// Where the controller stands relative to the auth session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
  /// The provider has not reported yet. Render a placeholder, load nothing.
  #[default]
  Initializing,
  Authenticated { user_id: String },
  Anonymous,
}
