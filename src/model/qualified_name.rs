use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CatalogError, Result};
use crate::model::{connector_type_of, ConnectorType, NamingStrategy, TypeName};

pub const SEPARATOR: char = '/';

/// Namespace token every connection qualifiedName starts with
pub const CONNECTION_NAMESPACE: &str = "default";

/// Number of leading segments that make up a connection prefix:
/// `default/{connector}/{epoch}`
pub const CONNECTION_SEGMENTS: usize = 3;

/// Hierarchical, `/`-delimited unique identifier of an entity.
///
/// Composition is plain concatenation and decomposition strips exactly one
/// trailing segment, so `parent(compose(p, n)) == p` and `name(compose(p, n)) == n`
/// whenever `n` contains no `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `{parent}/{local_name}`. The local name is not inspected.
    pub fn compose(parent: &QualifiedName, local_name: &str) -> Self {
        Self(format!("{}{}{}", parent.0, SEPARATOR, local_name))
    }

    /// `default/{connector}/{epoch_seconds}`
    pub fn connection(connector: ConnectorType, epoch_seconds: i64) -> Self {
        Self(
            [
                CONNECTION_NAMESPACE.to_string(),
                connector.token().to_string(),
                epoch_seconds.to_string(),
            ]
            .iter()
            .join("/"),
        )
    }

    /// `{connection}/{opaque_id}` for kinds that embed an external id (ARNs)
    /// instead of nesting further `/` levels.
    pub fn embedded(connection: &QualifiedName, opaque_id: &str) -> Self {
        Self::compose(connection, opaque_id)
    }

    /// Unique name with no hierarchy, for kinds that are not connection-bound
    pub fn generated() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn segments(&self) -> Vec<&str> {
        self.0.split(SEPARATOR).collect()
    }

    /// All segments except the last, or `None` for a single-segment name.
    pub fn parent(&self) -> Option<QualifiedName> {
        self.0
            .rsplit_once(SEPARATOR)
            .map(|(parent, _)| QualifiedName(parent.to_string()))
    }

    /// The last segment
    pub fn name(&self) -> &str {
        match self.0.rsplit_once(SEPARATOR) {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    /// The first `depth` segments, if the name has at least that many.
    pub fn ancestor(&self, depth: usize) -> Option<QualifiedName> {
        let segments = self.segments();
        if depth == 0 || depth > segments.len() {
            return None;
        }
        Some(QualifiedName(segments[..depth].iter().join("/")))
    }

    /// `default/{connector}/{epoch}` prefix of a connection-bound name
    pub fn connection_prefix(&self) -> Option<QualifiedName> {
        self.ancestor(CONNECTION_SEGMENTS)
    }

    pub fn connector_type(&self) -> Result<ConnectorType> {
        connector_type_of(&self.segments())
    }

    /// Split an embedded-id name into its connection prefix and the opaque id,
    /// which keeps any `/` it contains.
    pub fn split_embedded(&self) -> Result<(QualifiedName, &str)> {
        let mut offset = 0;
        for _ in 0..CONNECTION_SEGMENTS {
            match self.0[offset..].find(SEPARATOR) {
                Some(pos) => offset += pos + 1,
                None => {
                    return Err(CatalogError::InvalidQualifiedName {
                        qualified_name: self.0.clone(),
                        reason: "no opaque id after the connection prefix".to_string(),
                    })
                }
            }
        }
        let opaque = &self.0[offset..];
        if opaque.is_empty() {
            return Err(CatalogError::InvalidQualifiedName {
                qualified_name: self.0.clone(),
                reason: "empty opaque id".to_string(),
            });
        }
        Ok((QualifiedName(self.0[..offset - 1].to_string()), opaque))
    }

    /// Parent qualifiedName according to the naming strategy of `type_name`.
    ///
    /// Embedded-id kinds never strip at the last `/`: a bucket's parent is its
    /// connection and an object's parent is the bucket named by the leading
    /// component of its ARN.
    pub fn parent_for(&self, type_name: TypeName) -> Result<Option<QualifiedName>> {
        match type_name.naming_strategy() {
            NamingStrategy::Connection | NamingStrategy::Generated => Ok(None),
            NamingStrategy::Hierarchy => Ok(self.parent()),
            NamingStrategy::EmbeddedId => {
                let (connection, opaque) = self.split_embedded()?;
                match (type_name, opaque.split_once(SEPARATOR)) {
                    (TypeName::S3Object, Some((bucket_arn, _))) => {
                        Ok(Some(QualifiedName::embedded(&connection, bucket_arn)))
                    }
                    (TypeName::S3Object, None) => Err(CatalogError::InvalidQualifiedName {
                        qualified_name: self.0.clone(),
                        reason: "object ARN has no key component".to_string(),
                    }),
                    _ => Ok(Some(connection)),
                }
            }
        }
    }

    /// Local part according to the naming strategy of `type_name`.
    pub fn local_name_for(&self, type_name: TypeName) -> Result<&str> {
        match type_name.naming_strategy() {
            NamingStrategy::EmbeddedId => self.split_embedded().map(|(_, opaque)| opaque),
            _ => Ok(self.name()),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for QualifiedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
