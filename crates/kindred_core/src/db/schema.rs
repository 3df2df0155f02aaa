//! Schema definitions for the durable tables.
//!
//! Timestamps on the data tables are stored as RFC 3339 strings because the
//! Rust side reads and writes them through serde; the metadata table keeps
//! native datetimes since only the version number crosses into Rust.

pub const PROFILE_TABLE: &str = "profile";
pub const DECISION_TABLE: &str = "decision";

/// One table plus its indexes.
pub struct TableDefinition {
    pub name: String,
    pub schema: String,
    pub indexes: Vec<String>,
}

pub struct Schema;

impl Schema {
    /// All table definitions, applied in order by the migration runner.
    pub fn tables() -> Vec<TableDefinition> {
        vec![Self::system_metadata(), Self::profiles(), Self::decisions()]
    }

    /// Schema-version bookkeeping.
    pub fn system_metadata() -> TableDefinition {
        TableDefinition {
            name: "system_metadata".to_string(),
            schema: r#"
                DEFINE TABLE system_metadata SCHEMAFULL;
                DEFINE FIELD schema_version ON system_metadata TYPE int;
                DEFINE FIELD created_at ON system_metadata TYPE datetime;
                DEFINE FIELD updated_at ON system_metadata TYPE datetime;
            "#
            .to_string(),
            indexes: vec![],
        }
    }

    /// Requester profiles, keyed by the transport-assigned user id.
    pub fn profiles() -> TableDefinition {
        TableDefinition {
            name: PROFILE_TABLE.to_string(),
            schema: r#"
                DEFINE TABLE profile SCHEMAFULL;
                DEFINE FIELD user_id ON profile TYPE string;
                DEFINE FIELD display_name ON profile TYPE string;
                DEFINE FIELD age ON profile TYPE option<int>;
                DEFINE FIELD sex ON profile TYPE string;
                DEFINE FIELD city ON profile TYPE option<string>;
                DEFINE FIELD created_at ON profile TYPE string;
                DEFINE FIELD updated_at ON profile TYPE string;
            "#
            .to_string(),
            indexes: vec![
                "DEFINE INDEX profile_user ON profile FIELDS user_id UNIQUE".to_string(),
            ],
        }
    }

    /// Decisions, keyed by the composite (user, candidate) pair so at most
    /// one kind can exist per pair.
    pub fn decisions() -> TableDefinition {
        TableDefinition {
            name: DECISION_TABLE.to_string(),
            schema: r#"
                DEFINE TABLE decision SCHEMAFULL;
                DEFINE FIELD user_id ON decision TYPE string;
                DEFINE FIELD candidate_id ON decision TYPE string;
                DEFINE FIELD kind ON decision TYPE string
                    ASSERT $value INSIDE ["favorite", "blacklist"];
                DEFINE FIELD display_name ON decision TYPE option<string>;
                DEFINE FIELD profile_url ON decision TYPE option<string>;
                DEFINE FIELD recorded_at ON decision TYPE string;
            "#
            .to_string(),
            indexes: vec![
                "DEFINE INDEX decision_user ON decision FIELDS user_id".to_string(),
                "DEFINE INDEX decision_user_kind ON decision FIELDS user_id, kind".to_string(),
            ],
        }
    }
}
