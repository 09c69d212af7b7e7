use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

/// How a kind builds its qualifiedName
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStrategy {
    /// `default/{connector}/{epoch}`
    Connection,
    /// `{parentQN}/{name}`
    Hierarchy,
    /// `{connectionQN}/{opaqueId}`; the opaque id may itself contain `/`
    EmbeddedId,
    /// Server-independent unique id with no hierarchy
    Generated,
}

/// Closed registry of entity types understood by this model.
///
/// Decoding any other `typeName` fails; there is no base-type fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeName {
    Connection,
    Database,
    Schema,
    Table,
    View,
    MaterialisedView,
    Column,
    S3Bucket,
    S3Object,
    PresetWorkspace,
    PresetDashboard,
    PresetChart,
    AtlasGlossary,
    AtlasGlossaryTerm,
    AtlasGlossaryCategory,
}

impl TypeName {
    pub const ALL: [TypeName; 15] = [
        Self::Connection,
        Self::Database,
        Self::Schema,
        Self::Table,
        Self::View,
        Self::MaterialisedView,
        Self::Column,
        Self::S3Bucket,
        Self::S3Object,
        Self::PresetWorkspace,
        Self::PresetDashboard,
        Self::PresetChart,
        Self::AtlasGlossary,
        Self::AtlasGlossaryTerm,
        Self::AtlasGlossaryCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connection => "Connection",
            Self::Database => "Database",
            Self::Schema => "Schema",
            Self::Table => "Table",
            Self::View => "View",
            Self::MaterialisedView => "MaterialisedView",
            Self::Column => "Column",
            Self::S3Bucket => "S3Bucket",
            Self::S3Object => "S3Object",
            Self::PresetWorkspace => "PresetWorkspace",
            Self::PresetDashboard => "PresetDashboard",
            Self::PresetChart => "PresetChart",
            Self::AtlasGlossary => "AtlasGlossary",
            Self::AtlasGlossaryTerm => "AtlasGlossaryTerm",
            Self::AtlasGlossaryCategory => "AtlasGlossaryCategory",
        }
    }

    pub fn naming_strategy(&self) -> NamingStrategy {
        match self {
            Self::Connection => NamingStrategy::Connection,
            Self::S3Bucket | Self::S3Object => NamingStrategy::EmbeddedId,
            Self::AtlasGlossary | Self::AtlasGlossaryTerm | Self::AtlasGlossaryCategory => {
                NamingStrategy::Generated
            }
            _ => NamingStrategy::Hierarchy,
        }
    }

    /// Kinds whose qualifiedName starts with a connection prefix
    pub fn is_connection_bound(&self) -> bool {
        !matches!(
            self,
            Self::AtlasGlossary | Self::AtlasGlossaryTerm | Self::AtlasGlossaryCategory
        )
    }

    /// Kinds allowed as the direct parent of this kind, in preference order
    pub fn parent_types(&self) -> &'static [TypeName] {
        match self {
            Self::Connection | Self::AtlasGlossary => &[],
            Self::Database | Self::S3Bucket | Self::PresetWorkspace => &[Self::Connection],
            Self::Schema => &[Self::Database],
            Self::Table | Self::View | Self::MaterialisedView => &[Self::Schema],
            Self::Column => &[Self::Table, Self::View, Self::MaterialisedView],
            Self::S3Object => &[Self::S3Bucket],
            Self::PresetDashboard => &[Self::PresetWorkspace],
            Self::PresetChart => &[Self::PresetDashboard],
            Self::AtlasGlossaryTerm | Self::AtlasGlossaryCategory => &[Self::AtlasGlossary],
        }
    }

    /// Relationship attribute that carries the parent reference
    pub fn parent_attribute(&self) -> Option<&'static str> {
        match self {
            Self::Connection | Self::AtlasGlossary => None,
            Self::Database | Self::S3Bucket | Self::PresetWorkspace => Some("connection"),
            Self::Schema => Some("database"),
            Self::Table | Self::View | Self::MaterialisedView => Some("atlanSchema"),
            Self::Column => Some("parent"),
            Self::S3Object => Some("bucket"),
            Self::PresetDashboard => Some("presetWorkspace"),
            Self::PresetChart => Some("presetDashboard"),
            Self::AtlasGlossaryTerm | Self::AtlasGlossaryCategory => Some("anchor"),
        }
    }

    /// Prefix used for denormalised ancestor attributes on descendants,
    /// e.g. `schema` for `schemaName` / `schemaQualifiedName`.
    pub fn ancestor_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Database => Some("database"),
            Self::Schema => Some("schema"),
            Self::Table => Some("table"),
            Self::View => Some("view"),
            Self::MaterialisedView => Some("materialisedView"),
            Self::S3Bucket => Some("s3Bucket"),
            Self::PresetWorkspace => Some("presetWorkspace"),
            Self::PresetDashboard => Some("presetDashboard"),
            _ => None,
        }
    }

    /// Glossary members carry a mandatory anchor on every save
    pub fn requires_anchor(&self) -> bool {
        matches!(self, Self::AtlasGlossaryTerm | Self::AtlasGlossaryCategory)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| CatalogError::UnknownTypeName {
                type_name: s.to_string(),
            })
    }
}
