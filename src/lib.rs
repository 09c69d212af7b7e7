pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

pub use error::{CatalogError, Result};

// Export logic entry points
pub use logic::{
    find_by_name, find_connections_by_name, retrieve_by_guid, retrieve_by_qualified_name,
    validate_for_save, ConnectionAdmins, SaveMode,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{CatalogClient, EntityService, HttpCatalogClient, InMemoryCatalog, SearchService};

/// Build an HTTP catalog client from configuration
pub fn client_from_config(config: &config::AppConfig) -> Result<HttpCatalogClient> {
    HttpCatalogClient::new(&config.base_url(), config.api_token(), config.timeout())
}
