// Domain value objects
pub mod entity_type;
pub mod identifiers;
pub mod package_status;
pub mod trace_direction;

pub use entity_type::*;
pub use identifiers::*;
pub use package_status::*;
pub use trace_direction::*;

use thiserror::Error;

/// A string that does not name a member of one of the closed vocabularies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}'")]
pub struct InvalidValue {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidValue {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Open key-value payload attached to entities and events.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
