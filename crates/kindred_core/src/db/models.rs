//! Database model wrappers.
//!
//! These mirror the domain types but carry the SurrealDB record id. Record
//! keys are derived from the externally-assigned ids (profile keyed by user
//! id, decision keyed by the (user, candidate) pair) so key-addressed upserts
//! replace an existing record of the opposite kind atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::decision::{Decision, DecisionKind};
use crate::id::{CandidateId, UserId};
use crate::profile::{RequesterProfile, Sex};

use super::schema::{DECISION_TABLE, PROFILE_TABLE};

/// Record key of a decision: the composite (user, candidate) pair.
pub fn decision_key(user_id: &UserId, candidate_id: &CandidateId) -> String {
    format!("{user_id}:{candidate_id}")
}

/// Database representation of a RequesterProfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbProfile {
    /// Populated on read; never sent on write (the key is addressed
    /// explicitly in the upsert call).
    #[serde(skip_serializing)]
    pub id: RecordId,
    pub user_id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database representation of a Decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbDecision {
    #[serde(skip_serializing)]
    pub id: RecordId,
    pub user_id: String,
    pub candidate_id: String,
    pub kind: DecisionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

// Conversion implementations

impl From<&RequesterProfile> for DbProfile {
    fn from(profile: &RequesterProfile) -> Self {
        Self {
            id: RecordId::from_table_key(PROFILE_TABLE, profile.user_id.as_str()),
            user_id: profile.user_id.to_string(),
            display_name: profile.display_name.clone(),
            age: profile.age,
            sex: profile.sex,
            city: profile.city.clone(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

impl From<DbProfile> for RequesterProfile {
    fn from(db: DbProfile) -> Self {
        Self {
            user_id: UserId::new(db.user_id),
            display_name: db.display_name,
            age: db.age,
            sex: db.sex,
            city: db.city,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<&Decision> for DbDecision {
    fn from(decision: &Decision) -> Self {
        Self {
            id: RecordId::from_table_key(
                DECISION_TABLE,
                decision_key(&decision.user_id, &decision.candidate_id),
            ),
            user_id: decision.user_id.to_string(),
            candidate_id: decision.candidate_id.to_string(),
            kind: decision.kind,
            display_name: decision.display_name.clone(),
            profile_url: decision.profile_url.clone(),
            recorded_at: decision.recorded_at,
        }
    }
}

impl From<DbDecision> for Decision {
    fn from(db: DbDecision) -> Self {
        Self {
            user_id: UserId::new(db.user_id),
            candidate_id: CandidateId::new(db.candidate_id),
            kind: db.kind,
            display_name: db.display_name,
            profile_url: db.profile_url,
            recorded_at: db.recorded_at,
        }
    }
}
