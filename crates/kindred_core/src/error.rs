//! Error taxonomy for the matchmaking engine.
//!
//! Four failure classes cross the engine boundary: transient upstream search
//! failures, user-correctable criteria problems, transient storage failures,
//! and plain user errors (a decision with nothing pending). The engine maps
//! each to an error plan without mutating session state, so a retried command
//! is always safe.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Diagnostic, Debug)]
pub enum CoreError {
    #[error("Social graph search failed")]
    #[diagnostic(
        code(kindred_core::upstream_unavailable),
        help("The upstream search capability errored; retry the command in a little while")
    )]
    UpstreamUnavailable {
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Social graph search timed out after {limit:?}")]
    #[diagnostic(
        code(kindred_core::upstream_timeout),
        help("The upstream search capability did not answer within the per-call budget")
    )]
    UpstreamTimedOut { limit: Duration },

    #[error("Invalid search criteria: {reason}")]
    #[diagnostic(
        code(kindred_core::invalid_criteria),
        help("Correct the criteria and issue the search again")
    )]
    InvalidCriteria { reason: String },

    #[error("Decision storage is unavailable")]
    #[diagnostic(
        code(kindred_core::storage_unavailable),
        help("Check database connectivity; nothing was recorded and the command can be retried")
    )]
    StorageUnavailable {
        #[source]
        cause: DatabaseError,
    },

    #[error("No candidate is awaiting a decision")]
    #[diagnostic(
        code(kindred_core::nothing_pending),
        help("Start a search first; decisions apply to the currently presented candidate")
    )]
    NothingPending,

    #[error("Photo limit must be at least 1, got {limit}")]
    #[diagnostic(code(kindred_core::invalid_photo_limit))]
    InvalidPhotoLimit { limit: usize },
}

impl CoreError {
    /// Wrap an arbitrary upstream failure as a transient search error.
    pub fn upstream(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::UpstreamUnavailable {
            cause: cause.into(),
        }
    }

    pub fn invalid_criteria(reason: impl Into<String>) -> Self {
        Self::InvalidCriteria {
            reason: reason.into(),
        }
    }
}

impl From<DatabaseError> for CoreError {
    fn from(cause: DatabaseError) -> Self {
        Self::StorageUnavailable { cause }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
