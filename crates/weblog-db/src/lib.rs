//! SQLite storage for each user's selected scope

pub mod schema;
pub mod scopes;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{info, warn};
use weblog_core::{Error, Result};

pub use scopes::ScopesRepository;

/// Scope reads and writes are single-row, a small pool is plenty
const MAX_CONNECTIONS: u32 = 4;

/// Handle to the scope database
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create the database at `path`, creating parent directories
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::db(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| Error::db(e.to_string()))?;

        // Maps usernames to their networks
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
                warn!("Could not restrict {}: {}", path.display(), e);
            }
        }

        sqlx::query(schema::SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| Error::db(e.to_string()))?;

        info!("Opened scope database {}", path.display());
        Ok(Self { pool })
    }

    pub fn scopes(&self) -> ScopesRepository {
        ScopesRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use weblog_core::ScopeStore;

    #[tokio::test]
    async fn test_creates_nested_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("scopes.db");

        let db = Database::new(&db_path).await.unwrap();
        assert!(db_path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_scopes_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("scopes.db");

        let db = Database::new(&db_path).await.unwrap();
        db.scopes().set_scope("alice", "libera").await.unwrap();
        db.close().await;

        let db = Database::new(&db_path).await.unwrap();
        assert_eq!(
            db.scopes().get_scope("alice").await.unwrap(),
            Some("libera".to_string())
        );
        db.close().await;
    }
}
