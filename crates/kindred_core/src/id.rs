//! Opaque identifier newtypes shared across the engine.
//!
//! Ids are assigned by external systems (the bot transport for users, the
//! social graph for candidates and photos) and are treated as opaque tokens:
//! the engine never parses them or fabricates new ones.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(CompactString);

        impl $name {
            pub fn new(raw: impl Into<CompactString>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.into())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw.into())
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.into()))
            }
        }
    };
}

opaque_id! {
    /// Identifier of a requesting user, assigned by the bot transport.
    UserId
}

opaque_id! {
    /// Identifier of a candidate profile, assigned by the social graph.
    CandidateId
}

opaque_id! {
    /// Identifier of a single photo within a candidate profile.
    PhotoId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_serde() {
        let id = CandidateId::new("910245");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"910245\"");
        let back: CandidateId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_matches_raw_token() {
        let id = UserId::new("tg-42");
        assert_eq!(id.to_string(), "tg-42");
        assert_eq!(id.as_str(), "tg-42");
    }
}
