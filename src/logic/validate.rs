use crate::error::{CatalogError, Result};
use crate::model::{Asset, Hierarchical, Identifiable, Identity, Relation, TypeName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update,
}

fn missing(type_name: TypeName, attribute: &str) -> CatalogError {
    CatalogError::MissingRequiredAttribute {
        type_name,
        attribute: attribute.to_string(),
    }
}

/// Check an entity at the create/update boundary.
///
/// Reference construction never fails, so this is where an omitted parent or
/// anchor is caught.
pub fn validate_for_save(asset: &Asset, mode: SaveMode) -> Result<()> {
    let type_name = asset.type_name;

    if asset.qualified_name().as_str().is_empty() {
        return Err(missing(type_name, "qualifiedName"));
    }
    if asset.name().map_or(true, str::is_empty) {
        return Err(missing(type_name, "name"));
    }

    if type_name.requires_anchor() {
        validate_anchor(asset, mode)?;
    } else if mode == SaveMode::Create {
        if let Some(attribute) = type_name.parent_attribute() {
            validate_parent(asset, attribute)?;
        }
    }

    if mode == SaveMode::Create && type_name == TypeName::Connection {
        let attrs = &asset.attributes;
        if attrs.admin_users.is_empty() && attrs.admin_groups.is_empty() && attrs.admin_roles.is_empty() {
            return Err(missing(type_name, "adminUsers|adminGroups|adminRoles"));
        }
        asset.connector_type()?;
    }

    Ok(())
}

pub fn validate_all(assets: &[Asset], mode: SaveMode) -> Result<()> {
    assets.iter().try_for_each(|a| validate_for_save(a, mode))
}

fn validate_anchor(asset: &Asset, mode: SaveMode) -> Result<()> {
    let type_name = asset.type_name;
    let anchor = match asset.relation("anchor") {
        Some(Relation::One(anchor)) => anchor,
        _ => return Err(missing(type_name, "anchor")),
    };
    if anchor.type_name() != TypeName::AtlasGlossary {
        return Err(CatalogError::InvalidAnchor {
            type_name,
            message: format!("anchor must be an AtlasGlossary, got {}", anchor.type_name()),
        });
    }
    if mode == SaveMode::Update
        && type_name == TypeName::AtlasGlossaryCategory
        && anchor.guid().is_none()
    {
        return Err(CatalogError::InvalidAnchor {
            type_name,
            message: "updating a category requires the glossary GUID".to_string(),
        });
    }
    Ok(())
}

/// The parent reference must exist, be of an allowed kind and, when given by
/// qualifiedName, agree with the parent re-derived from the entity's own name.
fn validate_parent(asset: &Asset, attribute: &str) -> Result<()> {
    let type_name = asset.type_name;
    let parent = asset
        .parent_reference()
        .ok_or_else(|| missing(type_name, attribute))?;

    if !type_name.parent_types().contains(&parent.type_name()) {
        return Err(CatalogError::InvalidAnchor {
            type_name,
            message: format!("{} cannot be the parent of a {}", parent.type_name(), type_name),
        });
    }

    if let Identity::QualifiedName(parent_qn) = parent.identity() {
        let derived = asset.parent_qualified_name()?;
        if derived.as_ref() != Some(parent_qn) {
            return Err(CatalogError::InvalidQualifiedName {
                qualified_name: asset.qualified_name().to_string(),
                reason: format!("does not descend from parent '{}'", parent_qn),
            });
        }
    }
    Ok(())
}
