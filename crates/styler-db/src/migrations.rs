//! Schema migrations, compiled into the binary from `migrations/sqlite/`.
//!
//! Files are named `NNN_description.sql` and applied in order. An applied
//! file is never edited; schema changes go in a new file.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever is pending. A no-op on an up-to-date schema.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = applied_count(pool).await;
    MIGRATOR.run(pool).await?;
    let after = applied_count(pool).await;

    if after > before {
        info!(applied = after - before, version = after, "Schema migrated");
    } else {
        debug!(version = after, "Schema up to date");
    }
    Ok(())
}

/// Number of migrations recorded in `_sqlx_migrations`. Zero on a fresh file,
/// where the bookkeeping table does not exist yet.
pub async fn applied_count(pool: &SqlitePool) -> usize {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .map(|n| n.max(0) as usize)
        .unwrap_or(0)
}

/// Number of migrations embedded in this build.
pub fn known_count() -> usize {
    MIGRATOR.iter().count()
}
