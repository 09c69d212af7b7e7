use catalog_model::{
    find_by_name, Asset, CatalogError, EntityStatus, InMemoryCatalog, QualifiedName, SearchRequest,
    SearchResponse, SearchService, TypeName,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, OnceLock};

/// Logger that keeps every record so tests can assert on warnings
struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

fn logger() -> &'static CapturingLogger {
    static LOGGER: OnceLock<CapturingLogger> = OnceLock::new();
    let logger = LOGGER.get_or_init(|| CapturingLogger {
        records: Mutex::new(Vec::new()),
    });
    // Only the first call installs it; later calls are no-ops
    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
    logger
}

/// Warnings that mention `needle`; tests run in parallel so filter by name
fn warnings_mentioning(needle: &str) -> Vec<String> {
    logger()
        .records
        .lock()
        .map(|records| {
            records
                .iter()
                .filter(|(level, message)| *level == Level::Warn && message.contains(needle))
                .map(|(_, message)| message.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn glossary(name: &str, guid: &str) -> Asset {
    let mut asset = Asset::new(TypeName::AtlasGlossary, QualifiedName::generated(), name);
    asset.guid = guid.to_string();
    asset
}

/// Index that ignores the type filter and returns whatever hits it was given
struct MisbehavingIndex {
    hits: Vec<serde_json::Value>,
}

impl MisbehavingIndex {
    fn with_assets(assets: &[Asset]) -> Self {
        Self {
            hits: SearchResponse::from_assets(0, assets).unwrap().entities,
        }
    }
}

#[async_trait::async_trait]
impl SearchService for MisbehavingIndex {
    async fn search(&self, _request: &SearchRequest) -> catalog_model::Result<SearchResponse> {
        Ok(SearchResponse {
            approximate_count: self.hits.len() as u64,
            entities: self.hits.clone(),
        })
    }
}

#[tokio::test]
async fn nonexistent_glossary_is_not_found() {
    logger();
    let catalog = InMemoryCatalog::with_assets(vec![glossary("Sales Glossary", "g-1")]);

    let err = find_by_name(&catalog, TypeName::AtlasGlossary, "Nonexistent Glossary", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound { .. }));
    assert!(warnings_mentioning("Nonexistent Glossary").is_empty());
}

#[tokio::test]
async fn single_glossary_is_returned_unchanged() {
    logger();
    let sales = glossary("Sales Glossary", "g-1");
    let catalog = InMemoryCatalog::with_assets(vec![sales.clone(), glossary("Marketing", "g-2")]);

    let found = find_by_name(&catalog, TypeName::AtlasGlossary, "Sales Glossary", &[])
        .await
        .unwrap();

    assert_eq!(found, sales);
    assert!(warnings_mentioning("Sales Glossary").is_empty());
}

#[tokio::test]
async fn shared_name_returns_first_and_warns() {
    logger();
    let first = glossary("Shared Name", "g-first");
    let second = glossary("Shared Name", "g-second");
    let catalog = InMemoryCatalog::with_assets(vec![first.clone(), second]);

    let found = find_by_name(&catalog, TypeName::AtlasGlossary, "Shared Name", &[])
        .await
        .unwrap();

    assert_eq!(found.guid, first.guid);
    let warnings = warnings_mentioning("Shared Name");
    assert_eq!(warnings.len(), 1, "expected one warning, got {:?}", warnings);
    assert!(warnings[0].contains("AtlasGlossary"));
}

#[tokio::test]
async fn archived_duplicates_do_not_count() {
    logger();
    let mut archived = glossary("Half Archived", "g-old");
    archived.status = EntityStatus::Deleted;
    let live = glossary("Half Archived", "g-live");
    let catalog = InMemoryCatalog::with_assets(vec![archived, live.clone()]);

    let found = find_by_name(&catalog, TypeName::AtlasGlossary, "Half Archived", &[])
        .await
        .unwrap();

    assert_eq!(found.guid, live.guid);
    assert!(warnings_mentioning("Half Archived").is_empty());
}

#[tokio::test]
async fn wrongly_typed_hit_is_a_logic_error() {
    logger();
    let mut term = glossary("Type Bypass", "t-1");
    term.type_name = TypeName::AtlasGlossaryTerm;
    let index = MisbehavingIndex::with_assets(&[term]);

    let err = find_by_name(&index, TypeName::AtlasGlossary, "Type Bypass", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Logic { .. }), "got {:?}", err);
}

#[tokio::test]
async fn unregistered_type_from_the_index_is_a_logic_error() {
    logger();
    let body = r#"{"approximateCount": 1, "entities": [
        {"typeName": "Process", "guid": "p-1", "attributes": {"qualifiedName": "default/dbt/1/run", "name": "Nightly"}}
    ]}"#;
    let response: SearchResponse = serde_json::from_str(body).unwrap();
    let index = MisbehavingIndex {
        hits: response.entities,
    };

    let err = find_by_name(&index, TypeName::AtlasGlossary, "Nightly", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Logic { .. }), "got {:?}", err);
}
