//! Domain types: candidates, photos, requester profiles, and search criteria.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::id::{CandidateId, PhotoId, UserId};

/// Youngest age the search accepts, inclusive.
pub const MIN_SEARCH_AGE: u32 = 18;

/// Oldest age the search accepts, inclusive.
pub const MAX_SEARCH_AGE: u32 = 100;

/// Stated sex of a profile, as reported by the social graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Unspecified,
}

impl Sex {
    /// The sex searched for by default: the opposite of the requester's.
    ///
    /// `Unspecified` has no opposite; callers must then require an explicit
    /// target sex in the criteria.
    pub fn opposite(self) -> Option<Sex> {
        match self {
            Sex::Male => Some(Sex::Female),
            Sex::Female => Some(Sex::Male),
            Sex::Unspecified => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single photo on a candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,

    /// Popularity signal used for ranking.
    pub likes: u32,

    /// Access URL of the largest available rendition.
    pub url: String,
}

/// A candidate profile returned by the social graph.
///
/// Immutable once fetched within a session; a later fetch may return updated
/// data for the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub display_name: String,
    pub age: u32,
    pub city: String,
    pub sex: Sex,
    pub profile_url: String,

    /// Photos in the order the source returned them.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Durable profile of a requesting user, recorded when the transport
/// introduces them. Consulted to derive default search criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterProfile {
    pub user_id: UserId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequesterProfile {
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        sex: Sex,
        age: Option<u32>,
        city: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            display_name: display_name.into(),
            age,
            sex,
            city,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Criteria as supplied by the transport: the age range is mandatory, target
/// sex and city may be omitted and derived from the requester's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaSpec {
    pub min_age: u32,
    pub max_age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sex: Option<Sex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl CriteriaSpec {
    /// Whether resolution will need the requester's stored profile.
    pub fn needs_profile(&self) -> bool {
        self.target_sex.is_none() || self.city.is_none()
    }

    /// Validate the spec and fill the gaps from the requester's profile.
    ///
    /// Fails with `InvalidCriteria` before any session state is touched, so a
    /// rejected search leaves the previous session intact.
    pub fn resolve(
        self,
        user_id: &UserId,
        profile: Option<&RequesterProfile>,
    ) -> Result<SearchCriteria> {
        if self.min_age > self.max_age {
            return Err(CoreError::invalid_criteria(format!(
                "minimum age {} exceeds maximum age {}",
                self.min_age, self.max_age
            )));
        }
        if self.min_age < MIN_SEARCH_AGE {
            return Err(CoreError::invalid_criteria(format!(
                "minimum age must be at least {MIN_SEARCH_AGE}"
            )));
        }
        if self.max_age > MAX_SEARCH_AGE {
            return Err(CoreError::invalid_criteria(format!(
                "maximum age must not exceed {MAX_SEARCH_AGE}"
            )));
        }

        let target_sex = match self.target_sex {
            Some(sex) => sex,
            None => profile
                .ok_or_else(|| {
                    CoreError::invalid_criteria(
                        "target sex not given and no profile is registered to derive it from",
                    )
                })?
                .sex
                .opposite()
                .ok_or_else(|| {
                    CoreError::invalid_criteria(
                        "target sex not given and the registered profile leaves sex unspecified",
                    )
                })?,
        };

        let city = match self.city {
            Some(city) if !city.trim().is_empty() => city,
            Some(_) => {
                return Err(CoreError::invalid_criteria("city must not be blank"));
            }
            None => profile
                .and_then(|p| p.city.clone())
                .ok_or_else(|| {
                    CoreError::invalid_criteria(
                        "city not given and no home city is registered to derive it from",
                    )
                })?,
        };

        Ok(SearchCriteria {
            user_id: user_id.clone(),
            target_sex,
            min_age: self.min_age,
            max_age: self.max_age,
            city,
        })
    }
}

/// Fully resolved criteria handed to the social graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub user_id: UserId,
    pub target_sex: Sex,
    pub min_age: u32,
    pub max_age: u32,
    pub city: String,
}
