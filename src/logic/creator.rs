use chrono::Utc;

use crate::error::{CatalogError, Result};
use crate::model::{
    Asset, ConnectorCategory, ConnectorType, NamingStrategy, QualifiedName, Reference, Relation,
    TypeName,
};

/// Users, groups and roles that administer a new connection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionAdmins {
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
}

impl ConnectionAdmins {
    pub fn users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty() && self.roles.is_empty()
    }
}

pub fn connection(name: &str, connector: ConnectorType, admins: ConnectionAdmins) -> Asset {
    let qualified_name = QualifiedName::connection(connector, Utc::now().timestamp());
    let mut asset = Asset::new(TypeName::Connection, qualified_name, name);
    asset.attributes.connector_name = Some(connector);
    asset.attributes.admin_users = admins.users;
    asset.attributes.admin_groups = admins.groups;
    asset.attributes.admin_roles = admins.roles;
    asset
}

pub fn database(name: &str, connection_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::Database, name, TypeName::Connection, connection_qn)
}

pub fn schema(name: &str, database_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::Schema, name, TypeName::Database, database_qn)
}

pub fn table(name: &str, schema_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::Table, name, TypeName::Schema, schema_qn)
}

pub fn view(name: &str, schema_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::View, name, TypeName::Schema, schema_qn)
}

pub fn materialised_view(name: &str, schema_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::MaterialisedView, name, TypeName::Schema, schema_qn)
}

/// Column under a table, view or materialised view. `order` is 1-based.
pub fn column(
    name: &str,
    parent_type: TypeName,
    parent_qn: &QualifiedName,
    order: u32,
) -> Result<Asset> {
    let mut asset = child(TypeName::Column, name, parent_type, parent_qn)?;
    asset.set_attribute("order", order);
    Ok(asset)
}

pub fn preset_workspace(name: &str, connection_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::PresetWorkspace, name, TypeName::Connection, connection_qn)
}

pub fn preset_dashboard(name: &str, workspace_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::PresetDashboard, name, TypeName::PresetWorkspace, workspace_qn)
}

pub fn preset_chart(name: &str, dashboard_qn: &QualifiedName) -> Result<Asset> {
    child(TypeName::PresetChart, name, TypeName::PresetDashboard, dashboard_qn)
}

/// Bucket named by its ARN, directly under an object-store connection
pub fn s3_bucket(name: &str, connection_qn: &QualifiedName, aws_arn: &str) -> Result<Asset> {
    if connection_qn.connection_prefix().as_ref() != Some(connection_qn) {
        return Err(CatalogError::InvalidQualifiedName {
            qualified_name: connection_qn.to_string(),
            reason: "not a connection qualifiedName".to_string(),
        });
    }
    let connector = connection_qn.connector_type()?;
    if connector.category() != ConnectorCategory::ObjectStore {
        return Err(CatalogError::InvalidQualifiedName {
            qualified_name: connection_qn.to_string(),
            reason: format!("{} connections cannot hold buckets", connector),
        });
    }
    let qualified_name = QualifiedName::embedded(connection_qn, aws_arn);
    let mut asset = Asset::new(TypeName::S3Bucket, qualified_name, name);
    asset.attributes.connector_name = Some(connector);
    asset.attributes.connection_qualified_name = Some(connection_qn.clone());
    asset.set_attribute("awsArn", aws_arn);
    asset.set_relation(
        "connection",
        Relation::One(Reference::by_qualified_name(TypeName::Connection, connection_qn.clone())),
    );
    Ok(asset)
}

/// Object named by its ARN. The ARN must belong to the given bucket so the
/// bucket's qualifiedName can be re-derived from the object's.
pub fn s3_object(name: &str, bucket_qn: &QualifiedName, aws_arn: &str) -> Result<Asset> {
    let (connection_qn, _) = bucket_qn.split_embedded()?;
    let qualified_name = QualifiedName::embedded(&connection_qn, aws_arn);
    if qualified_name.parent_for(TypeName::S3Object)?.as_ref() != Some(bucket_qn) {
        return Err(CatalogError::InvalidQualifiedName {
            qualified_name: qualified_name.into_string(),
            reason: format!("object ARN does not belong to bucket '{}'", bucket_qn),
        });
    }

    let mut asset = Asset::new(TypeName::S3Object, qualified_name, name);
    asset.attributes.connector_name = Some(connection_qn.connector_type()?);
    asset.attributes.connection_qualified_name = Some(connection_qn);
    asset.set_attribute("awsArn", aws_arn);
    denormalise_ancestors(&mut asset, TypeName::S3Bucket, bucket_qn)?;
    asset.set_relation(
        "bucket",
        Relation::One(Reference::by_qualified_name(TypeName::S3Bucket, bucket_qn.clone())),
    );
    Ok(asset)
}

pub fn glossary(name: &str) -> Asset {
    Asset::new(TypeName::AtlasGlossary, QualifiedName::generated(), name)
}

/// Term anchored to a glossary given by GUID or qualifiedName (GUID wins).
/// With neither the anchor is left off and the save is rejected later.
pub fn glossary_term(
    name: &str,
    glossary_guid: Option<&str>,
    glossary_qn: Option<&QualifiedName>,
) -> Asset {
    anchored(TypeName::AtlasGlossaryTerm, name, glossary_guid, glossary_qn)
}

pub fn glossary_category(
    name: &str,
    glossary_guid: Option<&str>,
    glossary_qn: Option<&QualifiedName>,
) -> Asset {
    anchored(TypeName::AtlasGlossaryCategory, name, glossary_guid, glossary_qn)
}

/// Minimal body for updating an existing entity
pub fn updater(type_name: TypeName, qualified_name: &QualifiedName, name: &str) -> Asset {
    Asset::new(type_name, qualified_name.clone(), name)
}

pub fn glossary_term_updater(qualified_name: &QualifiedName, name: &str, glossary_guid: &str) -> Asset {
    let mut asset = updater(TypeName::AtlasGlossaryTerm, qualified_name, name);
    asset.set_relation(
        "anchor",
        Relation::One(Reference::by_guid(TypeName::AtlasGlossary, glossary_guid)),
    );
    asset
}

/// Category updates are only accepted with the glossary GUID; a qualifiedName
/// anchor is enough to create a category but not to update one.
pub fn glossary_category_updater(
    qualified_name: &QualifiedName,
    name: &str,
    glossary_guid: &str,
) -> Asset {
    let mut asset = updater(TypeName::AtlasGlossaryCategory, qualified_name, name);
    asset.set_relation(
        "anchor",
        Relation::One(Reference::by_guid(TypeName::AtlasGlossary, glossary_guid)),
    );
    asset
}

fn anchored(
    type_name: TypeName,
    name: &str,
    glossary_guid: Option<&str>,
    glossary_qn: Option<&QualifiedName>,
) -> Asset {
    let mut asset = Asset::new(type_name, QualifiedName::generated(), name);
    if let Some(anchor) = Reference::anchor(TypeName::AtlasGlossary, glossary_guid, glossary_qn) {
        asset.set_relation("anchor", Relation::One(anchor));
    }
    asset
}

/// Entity named `{parent_qn}/{name}` with its parent reference and the
/// connection and ancestor attributes derived from the parent's name.
fn child(
    type_name: TypeName,
    name: &str,
    parent_type: TypeName,
    parent_qn: &QualifiedName,
) -> Result<Asset> {
    debug_assert_eq!(type_name.naming_strategy(), NamingStrategy::Hierarchy);
    if !type_name.parent_types().contains(&parent_type) {
        return Err(CatalogError::InvalidAnchor {
            type_name,
            message: format!("{} cannot be the parent of a {}", parent_type, type_name),
        });
    }
    let connection_qn = parent_qn
        .connection_prefix()
        .ok_or_else(|| CatalogError::InvalidQualifiedName {
            qualified_name: parent_qn.to_string(),
            reason: "no connection prefix".to_string(),
        })?;
    let connector = connection_qn.connector_type()?;

    let mut asset = Asset::new(type_name, QualifiedName::compose(parent_qn, name), name);
    asset.attributes.connector_name = Some(connector);
    asset.attributes.connection_qualified_name = Some(connection_qn);
    denormalise_ancestors(&mut asset, parent_type, parent_qn)?;

    if let Some(attribute) = type_name.parent_attribute() {
        asset.set_relation(
            attribute,
            Relation::One(Reference::by_qualified_name(parent_type, parent_qn.clone())),
        );
    }
    Ok(asset)
}

/// Walk from the parent up to the connection, recording `{prefix}Name` and
/// `{prefix}QualifiedName` for each ancestor kind that has a prefix.
fn denormalise_ancestors(
    asset: &mut Asset,
    parent_type: TypeName,
    parent_qn: &QualifiedName,
) -> Result<()> {
    let mut current = Some((parent_type, parent_qn.clone()));
    while let Some((type_name, qn)) = current {
        let Some(prefix) = type_name.ancestor_prefix() else {
            break;
        };
        let local = qn.local_name_for(type_name)?;
        let display = match type_name {
            // arn:aws:s3:::bucket-name
            TypeName::S3Bucket => local.rsplit(':').next().unwrap_or(local),
            _ => local,
        };
        asset.set_attribute(format!("{}Name", prefix), display);
        asset.set_attribute(format!("{}QualifiedName", prefix), qn.as_str());

        current = match (type_name.parent_types().first(), qn.parent_for(type_name)?) {
            (Some(next_type), Some(next_qn)) => Some((*next_type, next_qn)),
            _ => None,
        };
    }
    Ok(())
}
