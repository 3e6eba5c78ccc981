//! Service layer.
//!
//! Services own the request-independent logic: they resolve users, run the
//! core rules from `styler-core` and persist through `styler-db`. Handlers in
//! [`crate::routes`] only translate between JSON and these calls.
//!
//! ```text
//! routes::orders::create_order ──► OrderService::create_simple_order
//!                                    ├── require_user              (user must exist)
//!                                    ├── NewOrder::simplified      (styler-core)
//!                                    └── OrderRepository::create   (styler-db)
//! ```

pub mod account;
pub mod cart;
pub mod orders;

pub use account::AccountService;
pub use cart::CartService;
pub use orders::OrderService;

use styler_core::CoreError;
use styler_db::{Database, DbError};

/// Errors raised by services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<styler_core::ValidationError> for ServiceError {
    fn from(err: styler_core::ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Loads a user by id or fails with `UserNotFoundById`.
pub(crate) async fn require_user(db: &Database, id: i64) -> ServiceResult<styler_core::User> {
    db.users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::UserNotFoundById(id).into())
}
