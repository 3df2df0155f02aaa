//! Simplified database migration system for schema versioning

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use super::schema::Schema;
use super::{DatabaseError, Result};

/// Version the code expects; bump alongside each new migration step.
pub const SCHEMA_VERSION: u32 = 1;

/// Database migration runner
pub struct MigrationRunner;

impl MigrationRunner {
    /// Run all outstanding migrations.
    pub async fn run(db: &Surreal<Any>) -> Result<()> {
        let current_version = Self::schema_version(db).await?;

        if current_version < 1 {
            tracing::info!("running migration v1: initial schema");
            Self::migrate_v1(db).await?;
            Self::update_schema_version(db, 1).await?;
        }

        // Add more migrations here as needed

        Ok(())
    }

    /// Migration v1: initial schema
    async fn migrate_v1(db: &Surreal<Any>) -> Result<()> {
        for table in Schema::tables() {
            db.query(table.schema.as_str())
                .await
                .map_err(DatabaseError::QueryFailed)?;

            for index in &table.indexes {
                db.query(index.as_str())
                    .await
                    .map_err(DatabaseError::QueryFailed)?;
            }
        }

        Ok(())
    }

    /// Get the schema version recorded in the database (0 when fresh).
    pub async fn schema_version(db: &Surreal<Any>) -> Result<u32> {
        let mut result = db
            .query("SELECT schema_version FROM system_metadata LIMIT 1")
            .await
            .map_err(DatabaseError::QueryFailed)?;

        #[derive(serde::Deserialize)]
        struct SchemaVersion {
            schema_version: u32,
        }

        let versions: Vec<SchemaVersion> = result.take(0).unwrap_or_default();

        Ok(versions.first().map(|v| v.schema_version).unwrap_or(0))
    }

    /// Update schema version
    async fn update_schema_version(db: &Surreal<Any>, version: u32) -> Result<()> {
        // Try to update an existing record first
        let updated: Vec<serde_json::Value> = db
            .query("UPDATE system_metadata SET schema_version = $version, updated_at = time::now()")
            .bind(("version", version))
            .await
            .map_err(DatabaseError::QueryFailed)?
            .take(0)
            .unwrap_or_default();

        // If no record was updated, create a new one
        if updated.is_empty() {
            db.query("CREATE system_metadata SET schema_version = $version, created_at = time::now(), updated_at = time::now()")
                .bind(("version", version))
                .await
                .map_err(DatabaseError::QueryFailed)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::client;

    #[tokio::test]
    async fn migration_runner_is_idempotent() {
        // Initialize the database (which runs migrations)
        let db = client::create_test_db().await.unwrap();

        // Check schema version
        let version = MigrationRunner::schema_version(&db).await.unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        // Running migrations again should be idempotent
        MigrationRunner::run(&db).await.unwrap();
        let version = MigrationRunner::schema_version(&db).await.unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }
}
