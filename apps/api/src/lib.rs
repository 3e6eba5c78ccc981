//! # Styler API
//!
//! HTTP server for the Styler storefront: accounts, carts and orders over
//! JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Styler API Server                              │
//! │                                                                         │
//! │  Browser ───► axum (8080) ───► routes ───► services ───► SQLite        │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                        reset tokens                     │
//! │                                        (in memory)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
