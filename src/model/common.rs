use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Guid = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    #[default]
    Active,
    Deleted,
    Purged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    Verified,
    Draft,
    Deprecated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    Information,
    Warning,
    Issue,
}

/// How a delete request treats the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteType {
    /// Archive: the entity stays retrievable with status DELETED
    Soft,
    /// Purge: the entity is removed for good
    Hard,
}

/// A classification (tag) attached to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_guid: Option<Guid>,
    #[serde(default)]
    pub propagate: bool,
    #[serde(default = "default_true")]
    pub remove_propagations_on_entity_delete: bool,
}

fn default_true() -> bool {
    true
}

impl Classification {
    pub fn new(type_name: impl Into<String>, propagate: bool) -> Self {
        Self {
            type_name: type_name.into(),
            entity_guid: None,
            propagate,
            remove_propagations_on_entity_delete: true,
        }
    }
}

/// Placeholder GUID for an entity that does not exist yet.
/// The catalog replaces it and reports the mapping in `guidAssignments`.
pub fn generate_placeholder_guid() -> Guid {
    let (high, _) = Uuid::new_v4().as_u64_pair();
    format!("-{}", high >> 1)
}

pub fn is_placeholder_guid(guid: &str) -> bool {
    guid.starts_with('-')
}

pub fn generate_guid() -> Guid {
    Uuid::new_v4().to_string()
}
