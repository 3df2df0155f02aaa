//! Database operations - direct, simple, no repository layer.

use async_trait::async_trait;
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::decision::{Decision, DecisionKind};
use crate::id::{CandidateId, UserId};
use crate::profile::RequesterProfile;

use super::models::{DbDecision, DbProfile, decision_key};
use super::schema::{DECISION_TABLE, PROFILE_TABLE};
use super::{DatabaseError, Result};

#[async_trait]
pub trait StoreExt {
    /// Insert or refresh the requester profile keyed by user id. The original
    /// creation time survives a refresh.
    async fn upsert_profile(&self, profile: RequesterProfile) -> Result<RequesterProfile>;

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<RequesterProfile>>;

    /// Upsert a decision at its composite (user, candidate) key. An existing
    /// record of the opposite kind is replaced wholesale.
    async fn upsert_decision(&self, decision: Decision) -> Result<Decision>;

    async fn find_decision(
        &self,
        user_id: &UserId,
        candidate_id: &CandidateId,
    ) -> Result<Option<Decision>>;

    /// All favorite decisions for a user, most recent first.
    async fn favorites_for(&self, user_id: &UserId) -> Result<Vec<Decision>>;
}

#[async_trait]
impl StoreExt for Surreal<Any> {
    async fn upsert_profile(&self, profile: RequesterProfile) -> Result<RequesterProfile> {
        let created_at = self
            .get_profile(&profile.user_id)
            .await?
            .map(|existing| existing.created_at)
            .unwrap_or(profile.created_at);

        let db_profile = DbProfile {
            created_at,
            updated_at: Utc::now(),
            ..DbProfile::from(&profile)
        };

        let stored: Option<DbProfile> = self
            .upsert((PROFILE_TABLE, profile.user_id.as_str()))
            .content(db_profile)
            .await
            .map_err(DatabaseError::QueryFailed)?;

        stored
            .map(RequesterProfile::from)
            .ok_or_else(|| DatabaseError::Other("profile upsert returned no record".into()))
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<RequesterProfile>> {
        let db_profile: Option<DbProfile> = self
            .select((PROFILE_TABLE, user_id.as_str()))
            .await
            .map_err(DatabaseError::QueryFailed)?;

        Ok(db_profile.map(RequesterProfile::from))
    }

    async fn upsert_decision(&self, decision: Decision) -> Result<Decision> {
        let key = decision_key(&decision.user_id, &decision.candidate_id);

        let stored: Option<DbDecision> = self
            .upsert((DECISION_TABLE, key.as_str()))
            .content(DbDecision::from(&decision))
            .await
            .map_err(DatabaseError::QueryFailed)?;

        stored
            .map(Decision::from)
            .ok_or_else(|| DatabaseError::Other("decision upsert returned no record".into()))
    }

    async fn find_decision(
        &self,
        user_id: &UserId,
        candidate_id: &CandidateId,
    ) -> Result<Option<Decision>> {
        let key = decision_key(user_id, candidate_id);

        let db_decision: Option<DbDecision> = self
            .select((DECISION_TABLE, key.as_str()))
            .await
            .map_err(DatabaseError::QueryFailed)?;

        Ok(db_decision.map(Decision::from))
    }

    async fn favorites_for(&self, user_id: &UserId) -> Result<Vec<Decision>> {
        let mut response = self
            .query(format!(
                "SELECT * FROM {DECISION_TABLE} WHERE user_id = $user AND kind = $kind"
            ))
            .bind(("user", user_id.to_string()))
            .bind(("kind", DecisionKind::Favorite.as_str().to_string()))
            .await
            .map_err(DatabaseError::QueryFailed)?;

        let rows: Vec<DbDecision> = response.take(0).map_err(DatabaseError::QueryFailed)?;

        let mut favorites: Vec<Decision> = rows.into_iter().map(Decision::from).collect();
        favorites.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(favorites)
    }
}
