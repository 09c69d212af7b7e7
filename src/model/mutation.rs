use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Asset, Guid, Identifiable, QualifiedName, TypeName};

/// Entities touched by a save or delete, grouped by operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutatedEntities {
    #[serde(rename = "CREATE", default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<Asset>,
    #[serde(rename = "UPDATE", default, skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<Asset>,
    #[serde(rename = "PARTIAL_UPDATE", default, skip_serializing_if = "Vec::is_empty")]
    pub partially_updated: Vec<Asset>,
    #[serde(rename = "DELETE", default, skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<Asset>,
    #[serde(rename = "PURGE", default, skip_serializing_if = "Vec::is_empty")]
    pub purged: Vec<Asset>,
}

/// Response of the bulk entity endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    #[serde(default)]
    pub mutated_entities: MutatedEntities,
    /// Placeholder GUID -> assigned GUID
    #[serde(default)]
    pub guid_assignments: HashMap<Guid, Guid>,
}

impl MutationResponse {
    pub fn created(&self) -> &[Asset] {
        &self.mutated_entities.created
    }

    /// Updated entities, including partial updates
    pub fn updated(&self) -> impl Iterator<Item = &Asset> {
        self.mutated_entities
            .updated
            .iter()
            .chain(self.mutated_entities.partially_updated.iter())
    }

    pub fn deleted(&self) -> impl Iterator<Item = &Asset> {
        self.mutated_entities
            .deleted
            .iter()
            .chain(self.mutated_entities.purged.iter())
    }

    pub fn assigned_guid(&self, placeholder: &str) -> Option<&Guid> {
        self.guid_assignments.get(placeholder)
    }

    /// The updated entity with the given type and qualifiedName, if the save touched it
    pub fn updated_asset(&self, type_name: TypeName, qualified_name: &QualifiedName) -> Option<&Asset> {
        self.updated()
            .find(|a| a.type_name() == type_name && a.qualified_name() == qualified_name)
    }
}
