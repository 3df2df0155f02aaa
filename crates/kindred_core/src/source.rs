//! Candidate sourcing: the seam to the social graph plus exclusion filtering.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::id::UserId;
use crate::profile::{Candidate, SearchCriteria};
use crate::store::DecisionStore;

/// Opaque pagination token. Monotonically advancing and never reused; only
/// social-graph implementations look inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor(u64);

impl PageCursor {
    pub const START: PageCursor = PageCursor(0);

    /// Upstream offset this cursor stands for.
    pub fn offset(self) -> u64 {
        self.0
    }

    /// Cursor positioned `count` results further along.
    pub fn advanced_by(self, count: u64) -> PageCursor {
        PageCursor(self.0 + count)
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One upstream result page. `next: None` marks the end of results.
#[derive(Debug, Clone)]
pub struct Page {
    pub candidates: Vec<Candidate>,
    pub next: Option<PageCursor>,
}

/// The external search capability. Implementations are expected to be
/// rate-limited and credential-bearing out of band; they report transient
/// failures as `UpstreamUnavailable` and rejected criteria as
/// `InvalidCriteria`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraph: Send + Sync {
    async fn search(
        &self,
        criteria: &SearchCriteria,
        cursor: PageCursor,
        batch: usize,
    ) -> Result<Page>;
}

/// Upper bound on upstream page fetches per `next_page` call, so a fully
/// excluded result space cannot trigger an unbounded scan.
pub const MAX_UPSTREAM_FETCHES: usize = 5;

/// Wraps the social graph with per-user exclusion filtering and a bounded
/// automatic re-fetch when filtering empties a batch.
pub struct CandidateSource {
    graph: Arc<dyn SocialGraph>,
    decisions: DecisionStore,
    batch: usize,
    call_timeout: Duration,
}

impl CandidateSource {
    pub fn new(
        graph: Arc<dyn SocialGraph>,
        decisions: DecisionStore,
        batch: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            graph,
            decisions,
            batch,
            call_timeout,
        }
    }

    /// Next page of presentable candidates for the requesting user.
    ///
    /// Returns the filtered batch and the cursor to continue from; `None`
    /// means the results are exhausted. An empty batch is always paired with
    /// the end marker.
    pub async fn next_page(
        &self,
        criteria: &SearchCriteria,
        cursor: PageCursor,
    ) -> Result<(Vec<Candidate>, Option<PageCursor>)> {
        let mut cursor = Some(cursor);

        for attempt in 0..MAX_UPSTREAM_FETCHES {
            let Some(current) = cursor else { break };

            let page = tokio::time::timeout(
                self.call_timeout,
                self.graph.search(criteria, current, self.batch),
            )
            .await
            .map_err(|_| CoreError::UpstreamTimedOut {
                limit: self.call_timeout,
            })??;

            let kept = self.filter_page(&criteria.user_id, page.candidates).await?;
            cursor = page.next;

            if !kept.is_empty() {
                return Ok((kept, cursor));
            }
            tracing::debug!(
                attempt = attempt + 1,
                cursor = %current,
                "batch fully excluded, fetching next page"
            );
        }

        Ok((Vec::new(), None))
    }

    /// Drop the requesting user and anyone they already decided on.
    async fn filter_page(
        &self,
        user_id: &UserId,
        candidates: Vec<Candidate>,
    ) -> Result<Vec<Candidate>> {
        let mut kept = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.id.as_str() == user_id.as_str() {
                continue;
            }
            if self.decisions.is_excluded(user_id, &candidate.id).await? {
                continue;
            }
            kept.push(candidate);
        }
        Ok(kept)
    }
}
