use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{CatalogError, Result};
use crate::model::{
    Asset, Classification, DeleteType, Guid, MutationResponse, QualifiedName, SearchRequest,
    SearchResponse, TypeName,
};
use crate::store::traits::{EntityService, SearchService};

const SEARCH_PATH: &str = "/api/meta/search/indexsearch";
const ENTITY_BULK_PATH: &str = "/api/meta/entity/bulk";
const ENTITY_GUID_PATH: &str = "/api/meta/entity/guid";
const ENTITY_UNIQUE_PATH: &str = "/api/meta/entity/uniqueAttribute/type";
const QUALIFIED_NAME_PARAM: &str = "attr:qualifiedName";

/// Envelope of the single-entity retrieval endpoints
#[derive(Debug, Deserialize)]
struct EntityEnvelope {
    entity: Asset,
}

/// Catalog client speaking the REST API over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn unique_attribute_url(&self, type_name: TypeName, suffix: &str) -> String {
        self.url(&format!("{}/{}{}", ENTITY_UNIQUE_PATH, type_name, suffix))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(service_error(response).await)
        }
    }

    /// Like `send`, but a 404 becomes `None`
    async fn send_optional(&self, request: RequestBuilder) -> Result<Option<Response>> {
        let response = self.authorize(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if response.status().is_success() {
            Ok(Some(response))
        } else {
            Err(service_error(response).await)
        }
    }
}

async fn service_error(response: Response) -> CatalogError {
    let status = response.status().as_u16();
    let message = match response.text().await {
        Ok(body) if !body.is_empty() => body,
        _ => "no response body".to_string(),
    };
    CatalogError::Service { status, message }
}

/// Read the whole body, then decode it. A body that does not decode is a
/// `Serialization` error; only failing to read it is a transport error.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn delete_type_param(delete_type: DeleteType) -> &'static str {
    match delete_type {
        DeleteType::Soft => "SOFT",
        DeleteType::Hard => "PURGE",
    }
}

#[async_trait::async_trait]
impl SearchService for HttpCatalogClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        log::debug!("index search: {}", request.to_body());
        let response = self
            .send(self.client.post(self.url(SEARCH_PATH)).json(&request.to_body()))
            .await?;
        decode::<SearchResponse>(response).await
    }
}

#[async_trait::async_trait]
impl EntityService for HttpCatalogClient {
    async fn get_by_guid(&self, guid: &str) -> Result<Option<Asset>> {
        let request = self
            .client
            .get(self.url(&format!("{}/{}", ENTITY_GUID_PATH, guid)))
            .query(&[("ignoreRelationships", "true"), ("minExtInfo", "true")]);
        match self.send_optional(request).await? {
            Some(response) => Ok(Some(decode::<EntityEnvelope>(response).await?.entity)),
            None => Ok(None),
        }
    }

    async fn get_by_qualified_name(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
    ) -> Result<Option<Asset>> {
        let request = self.client.get(self.unique_attribute_url(type_name, "")).query(&[
            (QUALIFIED_NAME_PARAM, qualified_name.as_str()),
            ("ignoreRelationships", "true"),
            ("minExtInfo", "true"),
        ]);
        match self.send_optional(request).await? {
            Some(response) => Ok(Some(decode::<EntityEnvelope>(response).await?.entity)),
            None => Ok(None),
        }
    }

    async fn save(&self, assets: &[Asset]) -> Result<MutationResponse> {
        let response = self
            .send(
                self.client
                    .post(self.url(ENTITY_BULK_PATH))
                    .json(&json!({ "entities": assets })),
            )
            .await?;
        decode::<MutationResponse>(response).await
    }

    async fn delete(&self, guids: &[Guid], delete_type: DeleteType) -> Result<MutationResponse> {
        let mut query: Vec<(&str, &str)> = guids.iter().map(|g| ("guid", g.as_str())).collect();
        query.push(("deleteType", delete_type_param(delete_type)));
        let response = self
            .send(self.client.delete(self.url(ENTITY_BULK_PATH)).query(&query))
            .await?;
        decode::<MutationResponse>(response).await
    }

    async fn add_classifications(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        classifications: &[Classification],
    ) -> Result<()> {
        let request = self
            .client
            .post(self.unique_attribute_url(type_name, "/classifications"))
            .query(&[(QUALIFIED_NAME_PARAM, qualified_name.as_str())])
            .json(classifications);
        self.send(request).await?;
        Ok(())
    }

    async fn remove_classification(
        &self,
        type_name: TypeName,
        qualified_name: &QualifiedName,
        classification: &str,
    ) -> Result<()> {
        let request = self
            .client
            .delete(self.unique_attribute_url(type_name, &format!("/classification/{}", classification)))
            .query(&[(QUALIFIED_NAME_PARAM, qualified_name.as_str())]);
        self.send(request).await?;
        Ok(())
    }
}
