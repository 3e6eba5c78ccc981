//! Domain errors.
//!
//! [`ValidationError`] describes a single bad input. [`CoreError`] adds the
//! lookups and rule failures the services raise. The API layer turns both
//! into `{success:false, message}` using their `Display` text unchanged:
//!
//! ```text
//! ValidationError ─► CoreError ─► ServiceError ─► ApiError ─► client
//!                                      ▲
//!                         DbError ─────┘  (styler-db)
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

/// Clients read the `Display` text verbatim in the `message` field.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("User not found with ID: {0}")]
    UserNotFoundById(i64),

    #[error("User not found with email: {0}")]
    UserNotFoundByEmail(String),

    /// Answered with 409 rather than 400.
    #[error("User with email {0} already exists")]
    EmailTaken(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Raised by `OrderStatus::from_str`, e.g. for `{"status": "LOST"}`.
    #[error("Invalid order status: {0} (expected one of {allowed})", allowed = OrderStatus::allowed_list())]
    InvalidStatus(String),

    /// One bad line rejects the whole order before anything is written.
    #[error("Invalid order item at position {index}: {reason}")]
    InvalidOrderItem { index: usize, reason: String },

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// A request field that failed a check. `field` is the client-facing label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Absent, or blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Registration reports its mandatory fields as one group.
    #[error("{fields} are required")]
    RequiredAll { fields: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} must not be negative")]
    Negative { field: String },

    /// A computed amount no longer fits in `i64` cents.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Unparsable amount, malformed email, non-numeric user id.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
