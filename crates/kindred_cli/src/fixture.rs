//! Fixture-backed social graph for local runs.
//!
//! Serves candidates from a JSON dataset so the engine can be driven without
//! any network credentials. Filtering mirrors what a real search capability
//! would do server-side: sex, age range, and city.

use std::path::Path;

use async_trait::async_trait;
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use kindred_core::{Candidate, Page, PageCursor, Result, SearchCriteria, SocialGraph};

#[derive(Error, Debug, Diagnostic)]
pub enum FixtureError {
    #[error("Failed to read dataset {path}")]
    #[diagnostic(help("Pass an existing dataset file with --data"))]
    Read {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("Failed to parse dataset {path}")]
    #[diagnostic(help("The dataset is a JSON object with a `candidates` array"))]
    Parse {
        path: String,
        #[source]
        cause: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Dataset {
    candidates: Vec<Candidate>,
}

/// In-process stand-in for the external search capability.
#[derive(Debug)]
pub struct FixtureGraph {
    candidates: Vec<Candidate>,
}

impl FixtureGraph {
    pub fn load(path: &Path) -> std::result::Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path).map_err(|cause| FixtureError::Read {
            path: path.display().to_string(),
            cause,
        })?;
        let dataset: Dataset = serde_json::from_str(&raw).map_err(|cause| FixtureError::Parse {
            path: path.display().to_string(),
            cause,
        })?;
        tracing::info!(
            count = dataset.candidates.len(),
            path = %path.display(),
            "loaded candidate dataset"
        );
        Ok(Self {
            candidates: dataset.candidates,
        })
    }

    fn matches(candidate: &Candidate, criteria: &SearchCriteria) -> bool {
        candidate.sex == criteria.target_sex
            && candidate.age >= criteria.min_age
            && candidate.age <= criteria.max_age
            && candidate.city.eq_ignore_ascii_case(&criteria.city)
    }
}

#[async_trait]
impl SocialGraph for FixtureGraph {
    async fn search(
        &self,
        criteria: &SearchCriteria,
        cursor: PageCursor,
        batch: usize,
    ) -> Result<Page> {
        let matching: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|candidate| Self::matches(candidate, criteria))
            .collect();

        let start = cursor.offset() as usize;
        let page: Vec<Candidate> = matching
            .iter()
            .skip(start)
            .take(batch)
            .map(|candidate| (*candidate).clone())
            .collect();

        let consumed = start + page.len();
        let next = (consumed < matching.len()).then(|| cursor.advanced_by(page.len() as u64));

        Ok(Page {
            candidates: page,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use kindred_core::{Sex, UserId};

    use super::*;

    const DATASET: &str = r#"{
        "candidates": [
            {"id": "1", "display_name": "Ada", "age": 24, "city": "Riga",
             "sex": "female", "profile_url": "https://graph.example/1", "photos": []},
            {"id": "2", "display_name": "Beth", "age": 28, "city": "riga",
             "sex": "female", "profile_url": "https://graph.example/2", "photos": []},
            {"id": "3", "display_name": "Cara", "age": 40, "city": "Riga",
             "sex": "female", "profile_url": "https://graph.example/3", "photos": []},
            {"id": "4", "display_name": "Dan", "age": 25, "city": "Riga",
             "sex": "male", "profile_url": "https://graph.example/4", "photos": []}
        ]
    }"#;

    fn graph() -> FixtureGraph {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();
        FixtureGraph::load(file.path()).unwrap()
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            user_id: UserId::new("u1"),
            target_sex: Sex::Female,
            min_age: 20,
            max_age: 30,
            city: "Riga".to_string(),
        }
    }

    #[tokio::test]
    async fn filters_by_sex_age_and_city() {
        let page = graph()
            .search(&criteria(), PageCursor::START, 10)
            .await
            .unwrap();
        let ids: Vec<&str> = page.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(page.next, None);
    }

    #[tokio::test]
    async fn pages_advance_the_cursor_until_the_end() {
        let graph = graph();
        let first = graph
            .search(&criteria(), PageCursor::START, 1)
            .await
            .unwrap();
        assert_eq!(first.candidates[0].id.as_str(), "1");
        let next = first.next.expect("one more page behind the first");

        let second = graph.search(&criteria(), next, 1).await.unwrap();
        assert_eq!(second.candidates[0].id.as_str(), "2");
        assert_eq!(second.next, None);
    }

    #[test]
    fn malformed_dataset_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"candidates\": 7}").unwrap();
        let err = FixtureGraph::load(file.path()).unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }
}
