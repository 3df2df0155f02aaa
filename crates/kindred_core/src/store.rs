//! Durable stores: decisions and requester profiles.
//!
//! Thin facades over the database operations that translate storage failures
//! into the engine's `StorageUnavailable` error class. Both outlive any
//! search session.

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::db::ops::StoreExt;
use crate::decision::{Decision, Favorite};
use crate::error::Result;
use crate::id::{CandidateId, UserId};
use crate::profile::RequesterProfile;

/// Sole authority over decision records.
#[derive(Clone)]
pub struct DecisionStore {
    db: Surreal<Any>,
}

impl DecisionStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// Upsert a decision. Recording one kind replaces an existing record of
    /// the opposite kind for the same (user, candidate) pair; re-recording
    /// the same kind only refreshes the timestamp.
    pub async fn record(&self, decision: Decision) -> Result<Decision> {
        tracing::debug!(
            user = %decision.user_id,
            candidate = %decision.candidate_id,
            kind = %decision.kind,
            "recording decision"
        );
        Ok(self.db.upsert_decision(decision).await?)
    }

    /// True if any decision exists for the pair. Both kinds exclude a
    /// candidate from future search results.
    pub async fn is_excluded(&self, user_id: &UserId, candidate_id: &CandidateId) -> Result<bool> {
        Ok(self.db.find_decision(user_id, candidate_id).await?.is_some())
    }

    /// The user's favorites, most recently added first.
    pub async fn list_favorites(&self, user_id: &UserId) -> Result<Vec<Favorite>> {
        let decisions = self.db.favorites_for(user_id).await?;
        Ok(decisions.into_iter().map(Favorite::from).collect())
    }
}

/// Durable registry of requester profiles.
#[derive(Clone)]
pub struct ProfileRegistry {
    db: Surreal<Any>,
}

impl ProfileRegistry {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub async fn upsert(&self, profile: RequesterProfile) -> Result<RequesterProfile> {
        Ok(self.db.upsert_profile(profile).await?)
    }

    pub async fn get(&self, user_id: &UserId) -> Result<Option<RequesterProfile>> {
        Ok(self.db.get_profile(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::create_test_db;
    use crate::decision::DecisionKind;
    use crate::profile::Sex;

    fn decision(user: &str, candidate: &str, kind: DecisionKind, at_secs: i64) -> Decision {
        Decision {
            user_id: UserId::new(user),
            candidate_id: CandidateId::new(candidate),
            kind,
            display_name: Some(format!("Candidate {candidate}")),
            profile_url: Some(format!("https://graph.example/{candidate}")),
            recorded_at: Utc.timestamp_opt(at_secs, 0).unwrap(),
        }
    }

    async fn store() -> DecisionStore {
        DecisionStore::new(create_test_db().await.unwrap())
    }

    #[tokio::test]
    async fn opposite_kind_replaces_existing_decision() {
        let store = store().await;
        let user = UserId::new("u1");
        let candidate = CandidateId::new("c1");

        store
            .record(decision("u1", "c1", DecisionKind::Favorite, 100))
            .await
            .unwrap();
        store
            .record(decision("u1", "c1", DecisionKind::Blacklist, 200))
            .await
            .unwrap();

        // The pair is still excluded, but no longer listed as a favorite.
        assert!(store.is_excluded(&user, &candidate).await.unwrap());
        assert!(store.list_favorites(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn both_kinds_exclude() {
        let store = store().await;
        store
            .record(decision("u1", "liked", DecisionKind::Favorite, 100))
            .await
            .unwrap();
        store
            .record(decision("u1", "blocked", DecisionKind::Blacklist, 101))
            .await
            .unwrap();

        let user = UserId::new("u1");
        assert!(
            store
                .is_excluded(&user, &CandidateId::new("liked"))
                .await
                .unwrap()
        );
        assert!(
            store
                .is_excluded(&user, &CandidateId::new("blocked"))
                .await
                .unwrap()
        );
        assert!(
            !store
                .is_excluded(&user, &CandidateId::new("unseen"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn favorites_are_listed_most_recent_first() {
        let store = store().await;
        store
            .record(decision("u1", "older", DecisionKind::Favorite, 100))
            .await
            .unwrap();
        store
            .record(decision("u1", "newer", DecisionKind::Favorite, 200))
            .await
            .unwrap();
        store
            .record(decision("u2", "other-user", DecisionKind::Favorite, 300))
            .await
            .unwrap();

        let favorites = store.list_favorites(&UserId::new("u1")).await.unwrap();
        let ids: Vec<&str> = favorites.iter().map(|f| f.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
        assert_eq!(favorites[0].display_name, "Candidate newer");
    }

    #[tokio::test]
    async fn rerecording_same_kind_keeps_a_single_record() {
        let store = store().await;
        store
            .record(decision("u1", "c1", DecisionKind::Favorite, 100))
            .await
            .unwrap();
        store
            .record(decision("u1", "c1", DecisionKind::Favorite, 500))
            .await
            .unwrap();

        let favorites = store.list_favorites(&UserId::new("u1")).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].added_at, Utc.timestamp_opt(500, 0).unwrap());
    }

    #[tokio::test]
    async fn profile_upsert_keeps_creation_time() {
        let registry = ProfileRegistry::new(create_test_db().await.unwrap());
        let user = UserId::new("u1");

        let first = registry
            .upsert(RequesterProfile::new(
                user.clone(),
                "Sam",
                Sex::Male,
                Some(29),
                Some("Riga".into()),
            ))
            .await
            .unwrap();

        let second = registry
            .upsert(RequesterProfile::new(
                user.clone(),
                "Samuel",
                Sex::Male,
                Some(30),
                Some("Riga".into()),
            ))
            .await
            .unwrap();

        assert_eq!(second.display_name, "Samuel");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        let fetched = registry.get(&user).await.unwrap().unwrap();
        assert_eq!(fetched.display_name, "Samuel");
        assert_eq!(fetched.age, Some(30));
    }

    #[tokio::test]
    async fn missing_profile_reads_back_as_none() {
        let registry = ProfileRegistry::new(create_test_db().await.unwrap());
        assert!(
            registry
                .get(&UserId::new("nobody"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
