// storefront/src/models/mod.rs

//! Records stored in the remote collections.
//!
//! Field names are camelCase on the wire. Identifiers are opaque strings.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use cart_item::CartItem;
pub use category::Category;
pub use order::{Address, Order, OrderItem, OrderStatus, Review};
pub use product::Product;
pub use user::User;
