use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{
    generate_placeholder_guid, is_placeholder_guid, AnnouncementType, CertificateStatus,
    Classification, ConnectorType, EntityStatus, Guid, QualifiedName, Reference, TypeName,
};

/// Relationship attribute holding the glossary terms assigned to an asset
pub const MEANINGS: &str = "meanings";

/// Anything that can be pointed at
pub trait Identifiable {
    fn guid(&self) -> &str;
    fn qualified_name(&self) -> &QualifiedName;
    fn type_name(&self) -> TypeName;

    /// Reference through the GUID when the catalog has assigned one,
    /// otherwise through the typed qualifiedName.
    fn to_reference(&self) -> Reference {
        let guid = self.guid();
        if guid.is_empty() || is_placeholder_guid(guid) {
            Reference::by_qualified_name(self.type_name(), self.qualified_name().clone())
        } else {
            Reference::by_guid(self.type_name(), guid)
        }
    }
}

/// Entities that live under a parent in the qualifiedName namespace
pub trait Hierarchical: Identifiable {
    /// Explicit parent reference carried by the entity, if any
    fn parent_reference(&self) -> Option<&Reference>;

    fn parent_qualified_name(&self) -> Result<Option<QualifiedName>> {
        self.qualified_name().parent_for(self.type_name())
    }

    fn connector_type(&self) -> Result<ConnectorType> {
        self.qualified_name().connector_type()
    }
}

/// Entities that can carry classifications and glossary terms
pub trait Classifiable: Identifiable {
    fn classification_names(&self) -> Vec<&str>;
    fn assigned_terms(&self) -> Vec<&Reference>;
}

/// Value of a relationship attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation {
    One(Reference),
    Many(Vec<Reference>),
    /// Explicit `null`, used to clear a relationship on update
    Cleared,
}

/// Attributes shared by every kind. Anything kind-specific lives in `other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttributes {
    #[serde(default)]
    pub qualified_name: QualifiedName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_name: Option<ConnectorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_qualified_name: Option<QualifiedName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_status: Option<CertificateStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_type: Option<AnnouncementType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_roles: Vec<String>,

    /// Kind-specific and denormalised attributes (e.g. `schemaQualifiedName`).
    /// An explicit `null` here clears the attribute on update.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl AssetAttributes {
    /// Drop the value of an attribute, typed or not
    pub fn unset(&mut self, key: &str) {
        match key {
            "name" => self.name = None,
            "description" => self.description = None,
            "userDescription" => self.user_description = None,
            "certificateStatus" => self.certificate_status = None,
            "certificateStatusMessage" => self.certificate_status_message = None,
            "announcementType" => self.announcement_type = None,
            "announcementTitle" => self.announcement_title = None,
            "announcementMessage" => self.announcement_message = None,
            _ => {
                self.other.remove(key);
            }
        }
    }

    /// Overlay the values present in `update`; explicit `null`s unset.
    pub fn merge_from(&mut self, update: &AssetAttributes) {
        fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        overlay(&mut self.name, &update.name);
        overlay(&mut self.connector_name, &update.connector_name);
        overlay(&mut self.connection_qualified_name, &update.connection_qualified_name);
        overlay(&mut self.description, &update.description);
        overlay(&mut self.user_description, &update.user_description);
        overlay(&mut self.certificate_status, &update.certificate_status);
        overlay(&mut self.certificate_status_message, &update.certificate_status_message);
        overlay(&mut self.announcement_type, &update.announcement_type);
        overlay(&mut self.announcement_title, &update.announcement_title);
        overlay(&mut self.announcement_message, &update.announcement_message);
        if !update.admin_users.is_empty() {
            self.admin_users.clone_from(&update.admin_users);
        }
        if !update.admin_groups.is_empty() {
            self.admin_groups.clone_from(&update.admin_groups);
        }
        if !update.admin_roles.is_empty() {
            self.admin_roles.clone_from(&update.admin_roles);
        }
        for (key, value) in &update.other {
            if value.is_null() {
                self.unset(key);
                self.other.remove(key);
            } else {
                self.other.insert(key.clone(), value.clone());
            }
        }
    }
}

/// A catalog entity of any registered kind.
///
/// One flat record for every kind; the `type_name` discriminator selects the
/// naming strategy and parent rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub type_name: TypeName,
    #[serde(default)]
    pub guid: Guid,
    #[serde(default)]
    pub status: EntityStatus,
    #[serde(default)]
    pub attributes: AssetAttributes,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationship_attributes: BTreeMap<String, Relation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
}

impl Asset {
    /// A new, unsaved entity with a placeholder GUID
    pub fn new(type_name: TypeName, qualified_name: QualifiedName, name: impl Into<String>) -> Self {
        Self {
            type_name,
            guid: generate_placeholder_guid(),
            status: EntityStatus::Active,
            attributes: AssetAttributes {
                qualified_name,
                name: Some(name.into()),
                ..AssetAttributes::default()
            },
            relationship_attributes: BTreeMap::new(),
            classifications: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.status == EntityStatus::Active
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.other.get(key)
    }

    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(|v| v.as_str())
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.attributes.other.insert(key.into(), value.into());
    }

    /// Clear an attribute so the update sends an explicit `null` for it
    pub fn clear_attribute(&mut self, key: &str) {
        self.attributes.unset(key);
        self.attributes
            .other
            .insert(key.to_string(), serde_json::Value::Null);
    }

    pub fn relation(&self, attribute: &str) -> Option<&Relation> {
        self.relationship_attributes.get(attribute)
    }

    pub fn set_relation(&mut self, attribute: impl Into<String>, relation: Relation) {
        self.relationship_attributes.insert(attribute.into(), relation);
    }
}

impl Identifiable for Asset {
    fn guid(&self) -> &str {
        &self.guid
    }

    fn qualified_name(&self) -> &QualifiedName {
        &self.attributes.qualified_name
    }

    fn type_name(&self) -> TypeName {
        self.type_name
    }
}

impl Hierarchical for Asset {
    fn parent_reference(&self) -> Option<&Reference> {
        let attribute = self.type_name.parent_attribute()?;
        match self.relationship_attributes.get(attribute) {
            Some(Relation::One(reference)) => Some(reference),
            _ => None,
        }
    }
}

impl Classifiable for Asset {
    fn classification_names(&self) -> Vec<&str> {
        self.classifications
            .iter()
            .map(|c| c.type_name.as_str())
            .collect()
    }

    fn assigned_terms(&self) -> Vec<&Reference> {
        match self.relationship_attributes.get(MEANINGS) {
            Some(Relation::Many(terms)) => terms.iter().collect(),
            Some(Relation::One(term)) => vec![term],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_known_type_with_extra_attributes() {
        let json = json!({
            "typeName": "Table",
            "guid": "7d9c1c1e-0000-0000-0000-000000000001",
            "status": "ACTIVE",
            "attributes": {
                "qualifiedName": "default/snowflake/1700000000/DB/SCHEMA/ORDERS",
                "name": "ORDERS",
                "connectorName": "snowflake",
                "certificateStatus": "VERIFIED",
                "rowCount": 42
            },
            "relationshipAttributes": {
                "atlanSchema": {"typeName": "Schema", "guid": "s-1"}
            },
            "classifications": [{"typeName": "PII", "propagate": true}]
        });

        let asset: Asset = serde_json::from_value(json).unwrap();
        assert_eq!(asset.type_name(), TypeName::Table);
        assert_eq!(asset.name(), Some("ORDERS"));
        assert_eq!(asset.attributes.connector_name, Some(ConnectorType::Snowflake));
        assert_eq!(asset.attributes.certificate_status, Some(CertificateStatus::Verified));
        assert_eq!(asset.attribute("rowCount"), Some(&json!(42)));
        assert_eq!(
            asset.parent_reference(),
            Some(&Reference::by_guid(TypeName::Schema, "s-1"))
        );
        assert_eq!(asset.classification_names(), vec!["PII"]);
        assert_eq!(
            asset.parent_qualified_name().unwrap().unwrap().as_str(),
            "default/snowflake/1700000000/DB/SCHEMA"
        );
        assert_eq!(asset.connector_type().unwrap(), ConnectorType::Snowflake);
    }

    #[test]
    fn unknown_type_name_is_rejected_at_decode() {
        let json = json!({"typeName": "Process", "guid": "x", "attributes": {"qualifiedName": "q"}});
        assert!(serde_json::from_value::<Asset>(json).is_err());
    }

    #[test]
    fn to_reference_uses_guid_only_once_assigned() {
        let mut asset = Asset::new(TypeName::AtlasGlossary, QualifiedName::from("g"), "Sales");
        assert_eq!(
            asset.to_reference(),
            Reference::by_qualified_name(TypeName::AtlasGlossary, "g")
        );
        asset.guid = "real-guid".to_string();
        assert_eq!(asset.to_reference(), Reference::by_guid(TypeName::AtlasGlossary, "real-guid"));
    }

    #[test]
    fn cleared_attributes_serialize_as_null() {
        let mut asset = Asset::new(TypeName::Table, QualifiedName::from("a/b/c/d/e/f"), "f");
        asset.attributes.certificate_status = Some(CertificateStatus::Draft);
        asset.clear_attribute("certificateStatus");
        asset.set_relation(MEANINGS, Relation::Cleared);

        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["attributes"]["certificateStatus"], serde_json::Value::Null);
        assert!(value["attributes"]
            .as_object()
            .unwrap()
            .contains_key("certificateStatus"));
        assert_eq!(value["relationshipAttributes"][MEANINGS], serde_json::Value::Null);
    }

    #[test]
    fn assigned_terms_reads_meanings() {
        let mut asset = Asset::new(TypeName::Column, QualifiedName::from("a/b/c/d/e/f/g"), "g");
        assert!(asset.assigned_terms().is_empty());
        asset.set_relation(
            MEANINGS,
            Relation::Many(vec![
                Reference::by_guid(TypeName::AtlasGlossaryTerm, "t1"),
                Reference::by_guid(TypeName::AtlasGlossaryTerm, "t2"),
            ]),
        );
        assert_eq!(asset.assigned_terms().len(), 2);
    }
}
