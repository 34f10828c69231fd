//! Scopes repository - one selected scope per username

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::debug;
use weblog_core::{Error, Result, ScopeStore};

/// Repository for scope operations
#[derive(Clone)]
pub struct ScopesRepository {
    pool: SqlitePool,
}

impl ScopesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of users with a stored scope, unset ones included
    pub async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM scopes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        let n: i64 = row.get("n");
        Ok(n as u64)
    }
}

#[async_trait]
impl ScopeStore for ScopesRepository {
    async fn get_scope(&self, username: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT scope FROM scopes WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(row
            .map(|row| row.get::<String, _>("scope"))
            .filter(|scope| !scope.is_empty()))
    }

    async fn set_scope(&self, username: &str, scope: &str) -> Result<()> {
        debug!("Storing scope {:?} for {}", scope, username);

        sqlx::query(
            r#"
            INSERT INTO scopes (username, scope, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(username) DO UPDATE SET
                scope = excluded.scope,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(username)
        .bind(scope)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::DbError(e.to_string()))?;

        Ok(())
    }
}
