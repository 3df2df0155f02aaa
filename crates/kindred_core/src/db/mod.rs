//! Embedded database layer backing the durable stores.
//!
//! The engine owns two small tables (requester profiles and decisions) plus a
//! metadata table for schema versioning. Everything runs on the embedded
//! SurrealDB engine: in-memory for tests, a surrealkv file store otherwise.

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

pub mod client;
pub mod migration;
pub mod models;
pub mod ops;
pub mod schema;

pub use client::{connect, create_test_db};

/// Core database error type
#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("Connection failed")]
    #[diagnostic(help(
        "Check the database path and ensure no other process holds the store open"
    ))]
    ConnectionFailed(#[source] surrealdb::Error),

    #[error("Query failed")]
    #[diagnostic(help("Check the query syntax and table schema"))]
    QueryFailed(#[source] surrealdb::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Configuration for the database backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatabaseConfig {
    /// Ephemeral in-memory store; nothing survives the process.
    Memory,

    /// On-disk surrealkv store.
    Embedded {
        #[serde(default = "default_db_path")]
        path: String,
    },
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::Embedded {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    "./kindred.db".to_string()
}
