use crate::error::Result;
use crate::model::{
    Asset, Classification, DeleteType, Guid, MutationResponse, QualifiedName, SearchRequest,
    SearchResponse, TypeName,
};

/// The remote catalog's search index
#[async_trait::async_trait]
pub trait SearchService: Send + Sync {
    /// Run a bounded, filtered query. Transport and service failures are returned unchanged.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// The remote catalog's entity CRUD endpoints
#[async_trait::async_trait]
pub trait EntityService: Send + Sync {
    /// Get an entity by GUID, `None` if the catalog does not know it
    async fn get_by_guid(&self, guid: &str) -> Result<Option<Asset>>;
    /// Get an entity by its unique (typeName, qualifiedName) pair
    async fn get_by_qualified_name(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
    ) -> Result<Option<Asset>>;
    /// Create or update entities, matched on (typeName, qualifiedName)
    async fn save(&self, assets: &[Asset]) -> Result<MutationResponse>;
    async fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse>;
    async fn add_classifications(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        classifications: &[Classification],
    ) -> Result<()>;
    async fn remove_classification(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        classification: &str,
    ) -> Result<()>;
}

pub trait CatalogClient: SearchService + EntityService + Send + Sync {}
impl<T: SearchService + EntityService> CatalogClient for T {}
