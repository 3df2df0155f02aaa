//! Embedded SurrealDB connection helpers.

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};

use super::{DatabaseConfig, DatabaseError, Result};

pub const NAMESPACE: &str = "kindred";
pub const DATABASE: &str = "kindred";

/// Connect according to configuration and select the namespace/database.
///
/// Does not run migrations; callers pair this with
/// [`super::migration::MigrationRunner::run`].
pub async fn connect(config: &DatabaseConfig) -> Result<Surreal<Any>> {
    let endpoint = match config {
        DatabaseConfig::Memory => "memory".to_string(),
        DatabaseConfig::Embedded { path } => {
            // Ensure the parent directory exists for file-based storage.
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DatabaseError::Other(format!("failed to create database directory: {e}"))
                    })?;
                }
            }
            format!("surrealkv://{path}")
        }
    };

    tracing::info!(%endpoint, "connecting to embedded database");
    let db = any::connect(endpoint)
        .await
        .map_err(DatabaseError::ConnectionFailed)?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(DatabaseError::ConnectionFailed)?;
    Ok(db)
}

/// Fresh in-memory database with migrations applied, for tests.
pub async fn create_test_db() -> Result<Surreal<Any>> {
    let db = connect(&DatabaseConfig::Memory).await?;
    super::migration::MigrationRunner::run(&db).await?;
    Ok(db)
}
