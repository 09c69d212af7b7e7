use serde::{Deserialize, Serialize};

use crate::model::{QualifiedName, TypeName};

/// The single identity channel a [`Reference`] resolves through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Guid(String),
    QualifiedName(QualifiedName),
}

/// Minimal, unresolved pointer to an entity.
///
/// Carries exactly one identity channel and no other entity data. Building a
/// reference never validates that the target exists; the remote catalog does
/// that when the reference is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawReference", try_from = "RawReference")]
pub struct Reference {
    type_name: TypeName,
    identity: Identity,
}

impl Reference {
    pub fn by_guid(type_name: TypeName, guid: impl Into<String>) -> Self {
        Self {
            type_name,
            identity: Identity::Guid(guid.into()),
        }
    }

    pub fn by_qualified_name(type_name: TypeName, qualified_name: impl Into<QualifiedName>) -> Self {
        Self {
            type_name,
            identity: Identity::QualifiedName(qualified_name.into()),
        }
    }

    /// Reference to a mandatory parent from whichever identifier the caller has.
    ///
    /// The GUID wins when both are given. When neither is given the anchor is
    /// omitted; whether that is acceptable is decided at the save boundary.
    pub fn anchor(
        type_name: TypeName,
        guid: Option<&str>,
        qualified_name: Option<&QualifiedName>,
    ) -> Option<Self> {
        match (guid, qualified_name) {
            (Some(guid), _) => Some(Self::by_guid(type_name, guid)),
            (None, Some(qn)) => Some(Self::by_qualified_name(type_name, qn.clone())),
            (None, None) => None,
        }
    }

    pub fn type_name(&self) -> TypeName {
        self.type_name
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn guid(&self) -> Option<&str> {
        match &self.identity {
            Identity::Guid(guid) => Some(guid),
            Identity::QualifiedName(_) => None,
        }
    }

    pub fn qualified_name(&self) -> Option<&QualifiedName> {
        match &self.identity {
            Identity::QualifiedName(qn) => Some(qn),
            Identity::Guid(_) => None,
        }
    }
}

/// Wire form: `{"typeName", "guid"}` or `{"typeName", "uniqueAttributes": {"qualifiedName"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReference {
    type_name: TypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unique_attributes: Option<UniqueAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniqueAttributes {
    qualified_name: QualifiedName,
}

impl From<Reference> for RawReference {
    fn from(reference: Reference) -> Self {
        match reference.identity {
            Identity::Guid(guid) => RawReference {
                type_name: reference.type_name,
                guid: Some(guid),
                unique_attributes: None,
            },
            Identity::QualifiedName(qualified_name) => RawReference {
                type_name: reference.type_name,
                guid: None,
                unique_attributes: Some(UniqueAttributes { qualified_name }),
            },
        }
    }
}

impl TryFrom<RawReference> for Reference {
    type Error = String;

    // The catalog echoes both identifiers on reads; keep only the GUID then.
    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        let qualified_name = raw.unique_attributes.map(|u| u.qualified_name);
        Reference::anchor(raw.type_name, raw.guid.as_deref(), qualified_name.as_ref()).ok_or_else(
            || {
                format!(
                    "reference to {} has neither a guid nor a qualifiedName",
                    raw.type_name
                )
            },
        )
    }
}
