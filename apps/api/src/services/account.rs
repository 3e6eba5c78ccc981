//! Account service: registration, login, profile and password reset.
//!
//! ## Password Reset Flow
//! ```text
//! forgot-password(email)
//!   └── user exists? ──no──► UserNotFoundByEmail
//!         │yes
//!         ▼
//!       ResetTokenRegistry::issue  (overwrites any earlier token)
//!
//! reset-password(email, token, new)
//!   └── ResetTokenRegistry::consume ──false──► Ok(false)
//!         │true
//!         ▼
//!       UserRepository::update_password(prepare(new))
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use styler_core::validation::validate_registration;
use styler_core::{CoreError, CredentialVerifier, ProfileUpdate, ResetTokenRegistry, User};
use styler_db::{Database, DbError};

use super::{require_user, ServiceResult};

/// Registration input as it arrives from the client.
#[derive(Debug, Clone, Default)]
pub struct Registration<'a> {
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
}

/// Account operations.
#[derive(Debug, Clone)]
pub struct AccountService {
    db: Database,
    tokens: Arc<ResetTokenRegistry>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AccountService {
    /// Create a new account service.
    pub fn new(
        db: Database,
        tokens: Arc<ResetTokenRegistry>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        AccountService {
            db,
            tokens,
            credentials,
        }
    }

    /// Creates an account.
    ///
    /// ## Errors
    /// * `Validation(RequiredAll)` - any of the four fields missing
    /// * `EmailTaken` - the email is already registered
    pub async fn register(&self, input: Registration<'_>) -> ServiceResult<User> {
        let mut new_user =
            validate_registration(input.email, input.password, input.name, input.phone)?;

        if self.db.users().exists_by_email(&new_user.email).await? {
            return Err(CoreError::EmailTaken(new_user.email).into());
        }

        new_user.password = self.credentials.prepare(&new_user.password);

        let user = self
            .db
            .users()
            .insert(&new_user, Utc::now())
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                DbError::UniqueViolation { .. } => CoreError::EmailTaken(new_user.email.clone()).into(),
                other => super::ServiceError::from(other),
            })?;

        info!(user_id = user.id, email = %user.email, "User registered");
        Ok(user)
    }

    /// Checks credentials. On success the login time is recorded.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<Option<User>> {
        let Some(mut user) = self.db.users().find_by_email(email).await? else {
            return Ok(None);
        };

        if !self.credentials.verify(password, &user.password) {
            warn!(user_id = user.id, "Rejected login attempt");
            return Ok(None);
        }

        let now = Utc::now();
        self.db.users().record_login(user.id, now).await?;
        user.last_login = Some(now);

        Ok(Some(user))
    }

    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self.db.users().find_by_email(email).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        Ok(self.db.users().find_by_id(id).await?)
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing user is an error.
    pub async fn require_user(&self, id: i64) -> ServiceResult<User> {
        require_user(&self.db, id).await
    }

    /// Applies a partial profile update. `None` when no such account exists.
    pub async fn update_profile(
        &self,
        email: &str,
        update: &ProfileUpdate,
    ) -> ServiceResult<Option<User>> {
        let Some(user) = self.db.users().find_by_email(email).await? else {
            return Ok(None);
        };
        if update.is_empty() {
            return Ok(Some(user));
        }

        let updated = self.db.users().update_profile(user.id, update).await?;
        Ok(Some(updated))
    }

    pub async fn all_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.db.users().list_all().await?)
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// Accounts created between `since` and now.
    pub async fn new_users(&self, since: DateTime<Utc>) -> ServiceResult<Vec<User>> {
        Ok(self.db.users().joined_between(since, Utc::now()).await?)
    }

    /// Accounts with no login since `before`, including those that never logged in.
    pub async fn inactive_users(&self, before: DateTime<Utc>) -> ServiceResult<Vec<User>> {
        Ok(self.db.users().inactive_since(before).await?)
    }

    pub async fn new_user_count(&self, since: DateTime<Utc>) -> ServiceResult<i64> {
        Ok(self.db.users().count_joined_after(since).await?)
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Issues a reset token for an existing account.
    pub async fn issue_reset_token(&self, email: &str) -> ServiceResult<String> {
        if !self.db.users().exists_by_email(email).await? {
            return Err(CoreError::UserNotFoundByEmail(email.to_string()).into());
        }

        let token = self.tokens.issue(email, Utc::now());
        info!(email = %email, "Password reset token issued");
        Ok(token)
    }

    /// Consumes the token and, when it was valid, stores the new password.
    ///
    /// Returns `false` for a missing, wrong or expired token. The token is
    /// burned either way.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> ServiceResult<bool> {
        if !self.tokens.consume(email, token, Utc::now()) {
            warn!(email = %email, "Invalid or expired reset token");
            return Ok(false);
        }

        let Some(user) = self.db.users().find_by_email(email).await? else {
            return Ok(false);
        };

        let stored = self.credentials.prepare(new_password);
        self.db.users().update_password(user.id, &stored).await?;

        info!(user_id = user.id, "Password reset");
        Ok(true)
    }
}
