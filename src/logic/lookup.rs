use std::collections::HashSet;

use crate::error::{CatalogError, Result};
use crate::model::{
    decode_hit, Asset, ConnectorType, EntityStatus, QualifiedName, SearchRequest, TermFilter,
    TypeName,
};
use crate::store::traits::{EntityService, SearchService};

/// Page size for name lookups: enough to notice a second match, no more
pub const LOOKUP_PAGE_SIZE: usize = 2;

/// Page size when collecting every match of a connection name
pub const CONNECTION_PAGE_SIZE: usize = 50;

fn active_by_name(type_name: TypeName, name: &str) -> SearchRequest {
    SearchRequest::new()
        .filter(TermFilter::TypeName(type_name))
        .filter(TermFilter::Name(name.to_string()))
        .filter(TermFilter::Status(EntityStatus::Active))
}

/// Resolve a human-readable name to one active entity of the given type.
///
/// When several entities share the name the first one in the index's default
/// order is returned and a warning is logged. An entity of another type
/// coming back from a type-filtered query is a `Logic` error, not `NotFound`,
/// whether or not that type is registered. Only the first hit is decoded.
pub async fn find_by_name<S>(
    search: &S,
    type_name: TypeName,
    name: &str,
    attributes: &[&str],
) -> Result<Asset>
where
    S: SearchService + ?Sized,
{
    let request = active_by_name(type_name, name)
        .page(0, LOOKUP_PAGE_SIZE)
        .attributes(attributes.iter().copied());

    let response = search.search(&request).await?;
    if response.approximate_count > 1 {
        log::warn!(
            "Multiple {} found with the name '{}', returning only the first.",
            type_name,
            name
        );
    }

    let first = response
        .entities
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::not_found(format!("no active {} named '{}'", type_name, name)))?;

    decode_hit(first, type_name)
}

/// Every active connection with the given name and connector
pub async fn find_connections_by_name<S>(
    search: &S,
    name: &str,
    connector: ConnectorType,
    attributes: &[&str],
) -> Result<Vec<Asset>>
where
    S: SearchService + ?Sized,
{
    let base = active_by_name(TypeName::Connection, name)
        .filter(TermFilter::ConnectorName(connector))
        .attributes(attributes.iter().copied());

    let mut connections: Vec<Asset> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    loop {
        let request = base.clone().page(connections.len(), CONNECTION_PAGE_SIZE);
        let response = search.search(&request).await?;
        let before = connections.len();
        for hit in response.entities {
            let connection = decode_hit(hit, TypeName::Connection)?;
            if seen.insert(connection.guid.clone()) {
                connections.push(connection);
            }
        }
        // An index that ignores `from` keeps returning the same page
        if connections.len() == before || connections.len() as u64 >= response.approximate_count {
            break;
        }
    }

    if connections.is_empty() {
        return Err(CatalogError::not_found(format!(
            "no active {} connection named '{}'",
            connector, name
        )));
    }
    Ok(connections)
}

/// Retrieve an entity by GUID, requiring it to be of the expected type
pub async fn retrieve_by_guid<S>(service: &S, expected: TypeName, guid: &str) -> Result<Asset>
where
    S: EntityService + ?Sized,
{
    let asset = service
        .get_by_guid(guid)
        .await?
        .ok_or_else(|| CatalogError::not_found(format!("no entity with guid {}", guid)))?;
    if asset.type_name != expected {
        return Err(CatalogError::not_found(format!(
            "entity {} is a {}, not the requested {}",
            guid, asset.type_name, expected
        )));
    }
    Ok(asset)
}

pub async fn retrieve_by_qualified_name<S>(
    service: &S,
    type_name: TypeName,
    qualified_name: &QualifiedName,
) -> Result<Asset>
where
    S: EntityService + ?Sized,
{
    service
        .get_by_qualified_name(type_name, qualified_name)
        .await?
        .ok_or_else(|| {
            CatalogError::not_found(format!("no {} with qualifiedName '{}'", type_name, qualified_name))
        })
}
