use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

/// Position of the connector token within a connection-bound qualifiedName
/// (`default/{connector}/{epoch}/...`).
pub const CONNECTOR_SEGMENT: usize = 1;

/// Broad family a connector belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorCategory {
    Database,
    Warehouse,
    Lake,
    ObjectStore,
    Bi,
    Saas,
    Elt,
    Orchestration,
    EventBus,
}

/// Closed set of external systems a connection can point at.
/// The serialized form is the token used inside qualifiedNames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorType {
    Snowflake,
    Postgres,
    Mysql,
    Oracle,
    Redshift,
    Bigquery,
    Databricks,
    Athena,
    Glue,
    S3,
    Gcs,
    Adls,
    Tableau,
    Powerbi,
    Looker,
    Metabase,
    Preset,
    Mode,
    Sigma,
    Salesforce,
    Dbt,
    Airflow,
    Kafka,
}

impl ConnectorType {
    pub const ALL: [ConnectorType; 23] = [
        Self::Snowflake,
        Self::Postgres,
        Self::Mysql,
        Self::Oracle,
        Self::Redshift,
        Self::Bigquery,
        Self::Databricks,
        Self::Athena,
        Self::Glue,
        Self::S3,
        Self::Gcs,
        Self::Adls,
        Self::Tableau,
        Self::Powerbi,
        Self::Looker,
        Self::Metabase,
        Self::Preset,
        Self::Mode,
        Self::Sigma,
        Self::Salesforce,
        Self::Dbt,
        Self::Airflow,
        Self::Kafka,
    ];

    /// Token used for this connector inside qualifiedNames
    pub fn token(&self) -> &'static str {
        match self {
            Self::Snowflake => "snowflake",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::Redshift => "redshift",
            Self::Bigquery => "bigquery",
            Self::Databricks => "databricks",
            Self::Athena => "athena",
            Self::Glue => "glue",
            Self::S3 => "s3",
            Self::Gcs => "gcs",
            Self::Adls => "adls",
            Self::Tableau => "tableau",
            Self::Powerbi => "powerbi",
            Self::Looker => "looker",
            Self::Metabase => "metabase",
            Self::Preset => "preset",
            Self::Mode => "mode",
            Self::Sigma => "sigma",
            Self::Salesforce => "salesforce",
            Self::Dbt => "dbt",
            Self::Airflow => "airflow",
            Self::Kafka => "kafka",
        }
    }

    pub fn category(&self) -> ConnectorCategory {
        match self {
            Self::Postgres | Self::Mysql | Self::Oracle => ConnectorCategory::Database,
            Self::Snowflake | Self::Redshift | Self::Bigquery => ConnectorCategory::Warehouse,
            Self::Databricks | Self::Athena | Self::Glue => ConnectorCategory::Lake,
            Self::S3 | Self::Gcs | Self::Adls => ConnectorCategory::ObjectStore,
            Self::Tableau
            | Self::Powerbi
            | Self::Looker
            | Self::Metabase
            | Self::Preset
            | Self::Mode
            | Self::Sigma => ConnectorCategory::Bi,
            Self::Salesforce => ConnectorCategory::Saas,
            Self::Dbt => ConnectorCategory::Elt,
            Self::Airflow => ConnectorCategory::Orchestration,
            Self::Kafka => ConnectorCategory::EventBus,
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ConnectorType {
    type Err = CatalogError;

    fn from_str(token: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|connector| connector.token() == token)
            .copied()
            .ok_or_else(|| CatalogError::UnrecognizedConnectorType {
                token: token.to_string(),
            })
    }
}

/// Derive the connector type from the split segments of a qualifiedName.
///
/// Only the token at [`CONNECTOR_SEGMENT`] is inspected. A missing or unknown
/// token is an error; there is no fallback connector.
pub fn connector_type_of(segments: &[&str]) -> Result<ConnectorType> {
    match segments.get(CONNECTOR_SEGMENT) {
        Some(token) => token.parse(),
        None => Err(CatalogError::UnrecognizedConnectorType {
            token: String::new(),
        }),
    }
}
