//! # Repository Module
//!
//! Database repository implementations for the Styler backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (apps/api)                                                    │
//! │       │                                                                 │
//! │       │  db.carts().replace(user_id, &items)                           │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── list(&self, user_id)                                              │
//! │  ├── replace(&self, user_id, items)   ← one transaction                │
//! │  └── clear(&self, user_id)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and account analytics
//! - [`CartRepository`](cart::CartRepository) - Full-replace carts
//! - [`OrderRepository`](order::OrderRepository) - Orders, items, addresses

pub mod cart;
pub mod order;
pub mod user;
