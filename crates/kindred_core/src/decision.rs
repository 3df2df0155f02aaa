//! Durable user verdicts on candidates.
//!
//! A decision is keyed by (user, candidate) and carries exactly one kind;
//! recording the opposite kind replaces the existing record, so the
//! both-favorite-and-blacklisted state is unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CandidateId, UserId};
use crate::profile::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Favorite,
    Blacklist,
}

impl DecisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionKind::Favorite => "favorite",
            DecisionKind::Blacklist => "blacklist",
        }
    }
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One durable verdict. Favorite decisions denormalize the candidate's name
/// and profile URL at record time so the favorites listing renders without
/// another social-graph round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub user_id: UserId,
    pub candidate_id: CandidateId,
    pub kind: DecisionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl Decision {
    pub fn favorite(user_id: UserId, candidate: &Candidate) -> Self {
        Self {
            user_id,
            candidate_id: candidate.id.clone(),
            kind: DecisionKind::Favorite,
            display_name: Some(candidate.display_name.clone()),
            profile_url: Some(candidate.profile_url.clone()),
            recorded_at: Utc::now(),
        }
    }

    pub fn blacklist(user_id: UserId, candidate: &Candidate) -> Self {
        Self {
            user_id,
            candidate_id: candidate.id.clone(),
            kind: DecisionKind::Blacklist,
            display_name: None,
            profile_url: None,
            recorded_at: Utc::now(),
        }
    }
}

/// Favorites listing entry, most-recent-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub candidate_id: CandidateId,
    pub display_name: String,
    pub profile_url: String,
    pub added_at: DateTime<Utc>,
}

impl From<Decision> for Favorite {
    fn from(decision: Decision) -> Self {
        Self {
            display_name: decision.display_name.unwrap_or_default(),
            profile_url: decision.profile_url.unwrap_or_default(),
            candidate_id: decision.candidate_id,
            added_at: decision.recorded_at,
        }
    }
}
