//! The conversation state machine.
//!
//! `handle` is the single entry point: one inbound command in, one outbound
//! plan out. The engine owns all session transitions, serializes commands per
//! user via the session slot lock, and never renders user-facing text — each
//! plan variant carries the data the transport needs to do that.

use serde::{Deserialize, Serialize};

use crate::decision::{Decision, DecisionKind, Favorite};
use crate::error::{CoreError, Result};
use crate::id::UserId;
use crate::profile::{Candidate, CriteriaSpec, RequesterProfile, Sex};
use crate::ranker;
use crate::session::{SearchSession, SessionRegistry, SessionState};
use crate::source::CandidateSource;
use crate::store::{DecisionStore, ProfileRegistry};

/// Payload of the introduce command; the registry adds the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introduction {
    pub display_name: String,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Structured inbound commands. Parsing raw transport messages into these is
/// the transport's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Introduce(Introduction),
    StartSearch(CriteriaSpec),
    DecideFavorite,
    DecideBlacklist,
    Skip,
    ShowFavorites,
    Help,
}

/// Error classes the transport distinguishes when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanErrorKind {
    UpstreamUnavailable,
    InvalidCriteria,
    StorageUnavailable,
    InvalidState,
}

impl From<&CoreError> for PlanErrorKind {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::UpstreamUnavailable { .. } | CoreError::UpstreamTimedOut { .. } => {
                Self::UpstreamUnavailable
            }
            CoreError::InvalidCriteria { .. } | CoreError::InvalidPhotoLimit { .. } => {
                Self::InvalidCriteria
            }
            CoreError::StorageUnavailable { .. } => Self::StorageUnavailable,
            CoreError::NothingPending => Self::InvalidState,
        }
    }
}

/// What the transport should say next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plan", rename_all = "snake_case")]
pub enum OutboundPlan {
    /// Present a candidate: summary plus the most popular photo URLs.
    Presentation {
        candidate: Candidate,
        photo_urls: Vec<String>,
    },
    /// No further candidates match the current criteria.
    Exhaustion,
    FavoritesList {
        favorites: Vec<Favorite>,
    },
    Registered {
        profile: RequesterProfile,
    },
    Help,
    Error {
        kind: PlanErrorKind,
        message: String,
    },
}

impl OutboundPlan {
    fn from_error(err: CoreError) -> Self {
        Self::Error {
            kind: PlanErrorKind::from(&err),
            message: err.to_string(),
        }
    }
}

/// Drives the search → present → decide → next loop for every user.
pub struct ConversationEngine {
    sessions: SessionRegistry,
    source: CandidateSource,
    decisions: DecisionStore,
    profiles: ProfileRegistry,
    photo_limit: usize,
}

impl ConversationEngine {
    pub fn new(
        source: CandidateSource,
        decisions: DecisionStore,
        profiles: ProfileRegistry,
        photo_limit: usize,
    ) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            source,
            decisions,
            profiles,
            photo_limit,
        }
    }

    /// Handle one inbound command.
    ///
    /// Commands for the same user are serialized by the session slot lock,
    /// held for exactly the duration of this call. Errors map to an error
    /// plan without touching session state, so retrying a failed command is
    /// always safe.
    pub async fn handle(&self, user_id: UserId, command: Command) -> OutboundPlan {
        let slot = self.sessions.slot(&user_id);
        let mut session = slot.lock().await;

        match self.dispatch(&user_id, command, &mut session).await {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(user = %user_id, error = %err, "command failed");
                OutboundPlan::from_error(err)
            }
        }
    }

    /// Administrative clear: forget the user's session entirely.
    pub async fn clear_session(&self, user_id: &UserId) {
        let slot = self.sessions.slot(user_id);
        *slot.lock().await = None;
        tracing::info!(user = %user_id, "session cleared");
    }

    async fn dispatch(
        &self,
        user_id: &UserId,
        command: Command,
        session: &mut Option<SearchSession>,
    ) -> Result<OutboundPlan> {
        match command {
            Command::Introduce(intro) => self.introduce(user_id, intro).await,
            Command::StartSearch(spec) => self.start_search(user_id, spec, session).await,
            Command::DecideFavorite => {
                self.decide(user_id, DecisionKind::Favorite, session).await
            }
            Command::DecideBlacklist => {
                self.decide(user_id, DecisionKind::Blacklist, session).await
            }
            Command::Skip => self.skip(session).await,
            Command::ShowFavorites => self.show_favorites(user_id).await,
            Command::Help => Ok(OutboundPlan::Help),
        }
    }

    async fn introduce(&self, user_id: &UserId, intro: Introduction) -> Result<OutboundPlan> {
        let profile = RequesterProfile::new(
            user_id.clone(),
            intro.display_name,
            intro.sex,
            intro.age,
            intro.city,
        );
        let stored = self.profiles.upsert(profile).await?;
        tracing::info!(user = %user_id, "requester profile registered");
        Ok(OutboundPlan::Registered { profile: stored })
    }

    async fn start_search(
        &self,
        user_id: &UserId,
        spec: CriteriaSpec,
        session: &mut Option<SearchSession>,
    ) -> Result<OutboundPlan> {
        // Resolve and validate before touching the session: rejected criteria
        // leave the previous session intact.
        let profile = if spec.needs_profile() {
            self.profiles.get(user_id).await?
        } else {
            None
        };
        let criteria = spec.resolve(user_id, profile.as_ref())?;

        // A repeated search with the same criteria re-enters the live session
        // so it re-presents the pending candidate instead of skipping it.
        let session = match session.take() {
            Some(existing) if existing.criteria == criteria => session.insert(existing),
            _ => {
                tracing::info!(
                    user = %user_id,
                    city = %criteria.city,
                    min_age = criteria.min_age,
                    max_age = criteria.max_age,
                    target_sex = %criteria.target_sex,
                    "starting search"
                );
                session.insert(SearchSession::new(criteria))
            }
        };

        self.advance(session).await
    }

    async fn decide(
        &self,
        user_id: &UserId,
        kind: DecisionKind,
        session: &mut Option<SearchSession>,
    ) -> Result<OutboundPlan> {
        let session = session.as_mut().ok_or(CoreError::NothingPending)?;
        let candidate = session.pending.clone().ok_or(CoreError::NothingPending)?;

        let decision = match kind {
            DecisionKind::Favorite => Decision::favorite(user_id.clone(), &candidate),
            DecisionKind::Blacklist => Decision::blacklist(user_id.clone(), &candidate),
        };

        // Record before clearing: a storage failure keeps the candidate
        // pending so the user can retry the same decision.
        self.decisions.record(decision).await?;
        tracing::info!(
            user = %user_id,
            candidate = %candidate.id,
            kind = %kind,
            "decision recorded"
        );

        session.pending = None;
        self.advance(session).await
    }

    async fn skip(&self, session: &mut Option<SearchSession>) -> Result<OutboundPlan> {
        let session = session.as_mut().ok_or(CoreError::NothingPending)?;
        if session.pending.take().is_none() {
            return Err(CoreError::NothingPending);
        }
        self.advance(session).await
    }

    async fn show_favorites(&self, user_id: &UserId) -> Result<OutboundPlan> {
        let favorites = self.decisions.list_favorites(user_id).await?;
        Ok(OutboundPlan::FavoritesList { favorites })
    }

    /// Fetch-and-present step shared by every advancing command.
    ///
    /// Session fields are only written after every fallible call has
    /// succeeded, which keeps a failed advance retryable.
    async fn advance(&self, session: &mut SearchSession) -> Result<OutboundPlan> {
        // Re-presenting the pending candidate is idempotent: the same command
        // twice must not silently skip anyone.
        if let Some(pending) = &session.pending {
            return self.present(pending);
        }

        if session.state == SessionState::Exhausted {
            return Ok(OutboundPlan::Exhaustion);
        }
        let Some(cursor) = session.cursor else {
            session.state = SessionState::Exhausted;
            return Ok(OutboundPlan::Exhaustion);
        };

        let (candidates, next) = self.source.next_page(&session.criteria, cursor).await?;

        match candidates.into_iter().next() {
            Some(candidate) => {
                let plan = self.present(&candidate)?;
                session.cursor = next;
                session.pending = Some(candidate);
                Ok(plan)
            }
            None => {
                session.cursor = next;
                session.state = SessionState::Exhausted;
                Ok(OutboundPlan::Exhaustion)
            }
        }
    }

    fn present(&self, candidate: &Candidate) -> Result<OutboundPlan> {
        let ranked = ranker::rank(&candidate.photos, self.photo_limit)?;
        Ok(OutboundPlan::Presentation {
            candidate: candidate.clone(),
            photo_urls: ranked.into_iter().map(|photo| photo.url).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_error_maps_to_a_plan_kind() {
        let cases = [
            (
                CoreError::upstream(std::io::Error::other("down")),
                PlanErrorKind::UpstreamUnavailable,
            ),
            (
                CoreError::invalid_criteria("bad city"),
                PlanErrorKind::InvalidCriteria,
            ),
            (CoreError::NothingPending, PlanErrorKind::InvalidState),
        ];
        for (err, expected) in cases {
            assert_eq!(PlanErrorKind::from(&err), expected);
        }
    }

    #[test]
    fn commands_round_trip_through_serde() {
        let command = Command::StartSearch(CriteriaSpec {
            min_age: 20,
            max_age: 30,
            target_sex: None,
            city: Some("Riga".into()),
        });
        let json = serde_json::to_string(&command).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }
}
