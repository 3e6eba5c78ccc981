//! # styler-core
//!
//! The storefront's rules with no I/O: account and order types, money,
//! order assembly, cart filtering and password reset tokens. Clocks are
//! passed in, so everything here is deterministic under test.
//!
//! ```text
//! apps/api ──► styler-core ◄── styler-db
//!  (axum)      (this crate)     (sqlx, SQLite)
//! ```
//!
//! | Module | Holds |
//! |--------|-------|
//! | [`types`] | `User`, `CartItem`, `Order`, `ShippingAddress`, `OrderStatus` |
//! | [`money`] | `Money` in integer cents |
//! | [`order`] | Order ids and the itemized / simplified pricing paths |
//! | [`cart`] | Filtering of incoming cart lines |
//! | [`reset_token`] | Single-use reset tokens |
//! | [`credentials`] | Password check seam |
//! | [`validation`], [`error`] | Input checks and their messages |
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use styler_core::order::NewOrder;
//! use styler_core::{Money, OrderItem, ShippingAddress};
//!
//! let item = OrderItem {
//!     product_id: 1,
//!     product_name: "Linen Shirt".to_string(),
//!     price: Money::from_cents(1000),
//!     quantity: 2,
//!     ..OrderItem::default()
//! };
//! let address = ShippingAddress {
//!     address_line_1: "12 Market Road".to_string(),
//!     ..ShippingAddress::default()
//! };
//!
//! let order = NewOrder::simplified(7, vec![item], address, None, None, Utc::now()).unwrap();
//! assert_eq!(order.totals.total_amount, Money::from_cents(2000));
//! ```

pub mod cart;
pub mod credentials;
pub mod error;
pub mod money;
pub mod order;
pub mod reset_token;
pub mod types;
pub mod validation;

pub use credentials::{CredentialVerifier, PlaintextCredentials};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reset_token::ResetTokenRegistry;
pub use types::*;

/// Days added to the order date to estimate delivery.
pub const ESTIMATED_DELIVERY_DAYS: i64 = 5;

/// Payment method recorded when a simplified order names none.
pub const DEFAULT_PAYMENT_METHOD: &str = "COD";

/// Lifetime of a password reset token, in minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;
