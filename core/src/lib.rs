// storefront/src/lib.rs

//! Storefront: the cart synchronization and catalog view model of a
//! storefront client.
//!
//! The crate keeps cart state, sign-in state and a remote collection store
//! consistent across asynchronous operations:
//!  - `CatalogView` fetches products and categories once and derives the
//!    searched, filtered and sorted projection.
//!  - `CartStore` owns the signed-in user's cart lines and the product
//!    lookup used to price them; every mutation writes, then reloads.
//!  - `AppController` composes both with an `AuthSession`, owns the view
//!    state and sequences loads against auth transitions.
//!  - Multi-step commands run on a small ordered-step `Workflow` engine.
//!
//! The hosted store and the auth provider are consumed through the
//! `RemoteCollectionClient` and `AuthSession` traits. In-process
//! implementations of both ship for tests and demos.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod models;
pub mod options;
pub mod remote;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::auth::{AuthSession, AuthState, AuthSubscription, LocalAuthSession};
pub use crate::cart::{CartLine, CartStore};
pub use crate::catalog::{normalize_category_slug, CatalogView, PriceRange, ProductFilter, SortKey, ALL_CATEGORIES};
pub use crate::controller::{AppController, SessionHandle, SessionPhase, UiState};
pub use crate::error::{Result, StoreError, StorefrontError, WorkflowError};
pub use crate::models::{CartItem, Category, Product, User};
pub use crate::options::StorefrontOptions;
pub use crate::remote::{Collection, ListOptions, MemoryCollectionClient, Operation, RemoteCollectionClient};
pub use crate::workflow::{ContextData, StepControl, Workflow, WorkflowOutcome};
