//! # User Repository
//!
//! Keyed persistence for accounts plus the read-only account analytics.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use styler_core::{NewUser, ProfileUpdate, User};

const USER_COLUMNS: &str =
    "id, email, password, first_name, last_name, phone, join_date, last_login";

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by numeric ID.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by email (exact match).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks whether an account already uses `email`.
    pub async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Inserts a new account.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - the email is taken
    pub async fn insert(&self, user: &NewUser, join_date: DateTime<Utc>) -> DbResult<User> {
        debug!(email = %user.email, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password, first_name, last_name, phone, join_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(join_date)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", &user.email),
            other => other,
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: user.email.clone(),
            password: user.password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            join_date,
            last_login: None,
        })
    }

    /// Applies a partial profile update and returns the stored row.
    pub async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> DbResult<User> {
        debug!(user_id = id, "Updating profile");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = COALESCE(?2, first_name),
                last_name  = COALESCE(?3, last_name),
                phone      = COALESCE(?4, phone)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id.to_string()))
    }

    /// Overwrites the stored password value.
    pub async fn update_password(&self, id: i64, password: &str) -> DbResult<()> {
        debug!(user_id = id, "Updating password");

        let result = sqlx::query("UPDATE users SET password = ?2 WHERE id = ?1")
            .bind(id)
            .bind(password)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        Ok(())
    }

    /// Stamps `last_login`.
    pub async fn record_login(&self, id: i64, at: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET last_login = ?2 WHERE id = ?1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id.to_string()));
        }

        Ok(())
    }

    /// All accounts, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Accounts whose join date falls in `[since, until]`.
    pub async fn joined_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE join_date BETWEEN ?1 AND ?2 ORDER BY join_date"
        ))
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Accounts that never logged in or last logged in before `before`.
    pub async fn inactive_since(&self, before: DateTime<Utc>) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE last_login IS NULL OR last_login < ?1 ORDER BY id"
        ))
        .bind(before)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Number of accounts that joined strictly after `since`.
    pub async fn count_joined_after(&self, since: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE join_date > ?1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;
    use chrono::Duration;

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_support::database().await;
        let user = test_support::user(&db, "a@x.com").await;

        let by_email = db.users().find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password, "pw123456");
        assert_eq!(by_email.last_login, None);

        let by_id = db.users().find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(db.users().exists_by_email("a@x.com").await.unwrap());
        assert!(!db.users().exists_by_email("b@x.com").await.unwrap());
        assert!(db.users().find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = test_support::database().await;
        let user = test_support::user(&db, "a@x.com").await;

        let again = NewUser {
            email: user.email.clone(),
            password: "other".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
        };
        let err = db.users().insert(&again, Utc::now()).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value } if field == "email" && value == "a@x.com"
        ));
    }

    #[tokio::test]
    async fn test_partial_profile_update() {
        let db = test_support::database().await;
        let user = test_support::user(&db, "a@x.com").await;

        let update = ProfileUpdate {
            phone: Some("1234".to_string()),
            ..ProfileUpdate::default()
        };
        let updated = db.users().update_profile(user.id, &update).await.unwrap();

        assert_eq!(updated.phone.as_deref(), Some("1234"));
        assert_eq!(updated.first_name, "Asha");
        assert_eq!(updated.last_name, "Rao");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let db = test_support::database().await;
        let err = db.users().update_password(42, "x").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_activity_queries() {
        let db = test_support::database().await;
        let now = Utc::now();

        let active = test_support::user(&db, "active@x.com").await;
        let _never = test_support::user(&db, "never@x.com").await;
        let stale = test_support::user(&db, "stale@x.com").await;

        db.users().record_login(active.id, now).await.unwrap();
        db.users()
            .record_login(stale.id, now - Duration::days(90))
            .await
            .unwrap();

        let inactive = db
            .users()
            .inactive_since(now - Duration::days(30))
            .await
            .unwrap();
        let emails: Vec<_> = inactive.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["never@x.com", "stale@x.com"]);

        let joined = db
            .users()
            .joined_between(now - Duration::hours(1), Utc::now())
            .await
            .unwrap();
        assert_eq!(joined.len(), 3);

        let count = db
            .users()
            .count_joined_after(now - Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            db.users().count_joined_after(Utc::now() + Duration::hours(1)).await.unwrap(),
            0
        );
        assert_eq!(db.users().list_all().await.unwrap().len(), 3);
    }
}
