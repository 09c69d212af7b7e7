use parking_lot::RwLock;

use crate::error::{CatalogError, Result};
use crate::model::{
    generate_guid, is_placeholder_guid, Asset, Classification, DeleteType, EntityStatus, Guid,
    Identifiable, MutationResponse, QualifiedName, Relation, SearchRequest, SearchResponse,
    TypeName,
};
use crate::store::traits::{EntityService, SearchService};

/// In-process catalog holding entities in insertion order.
///
/// Search results follow insertion order, which stands in for the remote
/// index's default ordering.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entities: RwLock<Vec<Asset>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: impl IntoIterator<Item = Asset>) -> Self {
        let catalog = Self::new();
        for asset in assets {
            catalog.insert(asset);
        }
        catalog
    }

    /// Store an entity as-is, assigning a GUID if it only has a placeholder
    pub fn insert(&self, mut asset: Asset) -> Guid {
        if asset.guid.is_empty() || is_placeholder_guid(&asset.guid) {
            asset.guid = generate_guid();
        }
        let guid = asset.guid.clone();
        self.entities.write().push(asset);
        guid
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Asset> {
        self.entities.read().clone()
    }

    fn position(entities: &[Asset], type_name: TypeName, qualified_name: &QualifiedName) -> Option<usize> {
        entities
            .iter()
            .position(|a| a.type_name == type_name && a.qualified_name() == qualified_name)
    }

    fn with_entity_mut<T>(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        f: impl FnOnce(&mut Asset) -> T,
    ) -> Result<T> {
        let mut entities = self.entities.write();
        let index = Self::position(&entities, type_name, qualified_name).ok_or_else(|| {
            CatalogError::not_found(format!("{} '{}' does not exist", type_name, qualified_name))
        })?;
        Ok(f(&mut entities[index]))
    }
}

#[async_trait::async_trait]
impl SearchService for InMemoryCatalog {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let entities = self.entities.read();
        let matched: Vec<&Asset> = entities.iter().filter(|a| request.matches(a)).collect();
        SearchResponse::from_assets(
            matched.len() as u64,
            matched.into_iter().skip(request.from).take(request.size),
        )
    }
}

#[async_trait::async_trait]
impl EntityService for InMemoryCatalog {
    async fn get_by_guid(&self, guid: &str) -> Result<Option<Asset>> {
        Ok(self.entities.read().iter().find(|a| a.guid == guid).cloned())
    }

    async fn get_by_qualified_name(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
    ) -> Result<Option<Asset>> {
        let entities = self.entities.read();
        Ok(Self::position(&entities, type_name, qualified_name).map(|i| entities[i].clone()))
    }

    async fn save(&self, assets: &[Asset]) -> Result<MutationResponse> {
        let mut response = MutationResponse::default();
        let mut entities = self.entities.write();

        for asset in assets {
            match Self::position(&entities, asset.type_name, asset.qualified_name()) {
                Some(index) => {
                    let existing = &mut entities[index];
                    existing.attributes.merge_from(&asset.attributes);
                    for (attribute, relation) in &asset.relationship_attributes {
                        match relation {
                            Relation::Cleared => {
                                existing.relationship_attributes.remove(attribute);
                            }
                            other => {
                                existing
                                    .relationship_attributes
                                    .insert(attribute.clone(), other.clone());
                            }
                        }
                    }
                    existing.status = EntityStatus::Active;
                    response.mutated_entities.updated.push(existing.clone());
                }
                None => {
                    let mut created = asset.clone();
                    created.relationship_attributes.retain(|_, r| *r != Relation::Cleared);
                    if created.guid.is_empty() || is_placeholder_guid(&created.guid) {
                        let assigned = generate_guid();
                        if !created.guid.is_empty() {
                            response
                                .guid_assignments
                                .insert(created.guid.clone(), assigned.clone());
                        }
                        created.guid = assigned;
                    }
                    created.status = EntityStatus::Active;
                    response.mutated_entities.created.push(created.clone());
                    entities.push(created);
                }
            }
        }

        Ok(response)
    }

    async fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse> {
        let mut response = MutationResponse::default();
        let mut entities = self.entities.write();

        for guid in guids {
            let Some(index) = entities.iter().position(|a| &a.guid == guid) else {
                return Err(CatalogError::not_found(format!("no entity with guid {}", guid)));
            };
            match delete_type {
                DeleteType::Soft => {
                    entities[index].status = EntityStatus::Deleted;
                    response.mutated_entities.deleted.push(entities[index].clone());
                }
                DeleteType::Hard => {
                    let mut purged = entities.remove(index);
                    purged.status = EntityStatus::Purged;
                    response.mutated_entities.purged.push(purged);
                }
            }
        }

        Ok(response)
    }

    async fn add_classifications(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        classifications: &[Classification],
    ) -> Result<()> {
        self.with_entity_mut(type_name, qualified_name, |asset| {
            for classification in classifications {
                if asset
                    .classifications
                    .iter()
                    .any(|c| c.type_name == classification.type_name)
                {
                    continue;
                }
                let mut attached = classification.clone();
                attached.entity_guid = Some(asset.guid.clone());
                asset.classifications.push(attached);
            }
        })
    }

    async fn remove_classification(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        classification: &str,
    ) -> Result<()> {
        self.with_entity_mut(type_name, qualified_name, |asset| {
            asset.classifications.retain(|c| c.type_name != classification);
        })
    }
}
