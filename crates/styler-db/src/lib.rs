//! # styler-db
//!
//! SQLite persistence for accounts, carts and orders over sqlx.
//!
//! [`Database`] owns the pool and hands out one repository per table group:
//! [`UserRepository`], [`CartRepository`] and [`OrderRepository`]. The schema
//! is embedded from `migrations/sqlite/` and applied on open.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use styler_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./styler.db")).await?;
//! let user = db.users().find_by_email("a@x.com").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::CartRepository;
pub use repository::order::OrderRepository;
pub use repository::user::UserRepository;
