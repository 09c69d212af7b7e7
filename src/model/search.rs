use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{CatalogError, Result};
use crate::model::{Asset, ConnectorType, EntityStatus, QualifiedName, TypeName};

/// Exact-match filter clause of an index search
#[derive(Debug, Clone, PartialEq)]
pub enum TermFilter {
    TypeName(TypeName),
    Name(String),
    Status(EntityStatus),
    QualifiedName(QualifiedName),
    ConnectorName(ConnectorType),
}

impl TermFilter {
    /// Index field the clause matches against
    pub fn field(&self) -> &'static str {
        match self {
            Self::TypeName(_) => "__typeName.keyword",
            Self::Name(_) => "name.keyword",
            Self::Status(_) => "__state",
            Self::QualifiedName(_) => "qualifiedName",
            Self::ConnectorName(_) => "connectorName",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Self::TypeName(t) => json!(t.as_str()),
            Self::Name(name) => json!(name),
            Self::Status(status) => json!(status),
            Self::QualifiedName(qn) => json!(qn.as_str()),
            Self::ConnectorName(connector) => json!(connector.token()),
        }
    }

    /// Whether an entity satisfies this clause, for in-process evaluation
    pub fn matches(&self, asset: &Asset) -> bool {
        match self {
            Self::TypeName(t) => asset.type_name == *t,
            Self::Name(name) => asset.attributes.name.as_deref() == Some(name.as_str()),
            Self::Status(status) => asset.status == *status,
            Self::QualifiedName(qn) => asset.attributes.qualified_name == *qn,
            Self::ConnectorName(connector) => asset.attributes.connector_name == Some(*connector),
        }
    }

    fn to_dsl(&self) -> Value {
        let mut term = serde_json::Map::new();
        term.insert(self.field().to_string(), self.value());
        json!({ "term": term })
    }
}

/// Bounded, filtered query against the catalog's search index
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub filters: Vec<TermFilter>,
    pub from: usize,
    pub size: usize,
    pub attributes: Vec<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            from: 0,
            size: 20,
            attributes: Vec::new(),
        }
    }
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: TermFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn page(mut self, from: usize, size: usize) -> Self {
        self.from = from;
        self.size = size;
        self
    }

    pub fn attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn matches(&self, asset: &Asset) -> bool {
        self.filters.iter().all(|f| f.matches(asset))
    }

    /// Request body for the index search endpoint
    pub fn to_body(&self) -> Value {
        let filters: Vec<Value> = self.filters.iter().map(TermFilter::to_dsl).collect();
        json!({
            "dsl": {
                "from": self.from,
                "size": self.size,
                "track_total_hits": true,
                "query": { "bool": { "filter": filters } }
            },
            "attributes": self.attributes,
            "suppressLogs": true
        })
    }
}

/// Result envelope of an index search.
///
/// Hits are kept as raw JSON: the index may return kinds outside the type
/// registry, so a hit is only decoded once its `typeName` has been checked
/// (see [`decode_hit`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub approximate_count: u64,
    #[serde(default)]
    pub entities: Vec<Value>,
}

impl SearchResponse {
    /// Envelope holding already-typed entities, as an in-process index returns them
    pub fn from_assets<'a>(
        approximate_count: u64,
        assets: impl IntoIterator<Item = &'a Asset>,
    ) -> Result<Self> {
        let entities = assets
            .into_iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            approximate_count,
            entities,
        })
    }
}

/// The `typeName` of a raw hit exactly as the index sent it
pub fn hit_type_name(hit: &Value) -> Option<&str> {
    hit.get("typeName").and_then(Value::as_str)
}

/// Decode a raw hit that must be of the `expected` kind.
///
/// A hit of any other kind, registered or not, is a `Logic` error: the query
/// filtered on `expected`. Only a correctly typed hit that still fails to
/// decode is a `Serialization` error.
pub fn decode_hit(hit: Value, expected: TypeName) -> Result<Asset> {
    let found = hit_type_name(&hit).unwrap_or_default();
    if found != expected.as_str() {
        let guid = hit.get("guid").and_then(Value::as_str).unwrap_or("?");
        return Err(CatalogError::logic(format!(
            "search filtered on {} returned a '{}' ({})",
            expected, found, guid
        )));
    }
    Ok(serde_json::from_value(hit)?)
}
