//! Mutation helpers shared by every entity kind.
//!
//! Each helper takes an updater body (see [`crate::logic::creator::updater`])
//! that carries the type name, qualifiedName and name of the target, adds the
//! one concern it changes, validates and saves it.

use crate::error::{CatalogError, Result};
use crate::logic::validate::{validate_all, validate_for_save, SaveMode};
use crate::model::{
    AnnouncementType, Asset, CertificateStatus, Classifiable, Classification, Identifiable,
    MutationResponse, QualifiedName, Reference, Relation, TypeName, MEANINGS,
};
use crate::store::traits::EntityService;

/// Validate new entities and save them
pub async fn create<S>(service: &S, assets: &[Asset]) -> Result<MutationResponse>
where
    S: EntityService + ?Sized,
{
    validate_all(assets, SaveMode::Create)?;
    service.save(assets).await
}

/// Validate and save a single update, returning the entity as updated by the catalog
pub async fn update<S>(service: &S, asset: Asset) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    validate_for_save(&asset, SaveMode::Update)?;
    let response = service.save(std::slice::from_ref(&asset)).await?;
    Ok(response
        .updated_asset(asset.type_name(), asset.qualified_name())
        .cloned())
}

pub async fn update_certificate<S>(
    service: &S,
    mut target: Asset,
    status: CertificateStatus,
    message: Option<&str>,
) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    target.attributes.certificate_status = Some(status);
    target.attributes.certificate_status_message = message.map(str::to_string);
    update(service, target).await
}

pub async fn remove_certificate<S>(service: &S, mut target: Asset) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    target.clear_attribute("certificateStatus");
    target.clear_attribute("certificateStatusMessage");
    update(service, target).await
}

pub async fn update_announcement<S>(
    service: &S,
    mut target: Asset,
    announcement_type: AnnouncementType,
    title: &str,
    message: Option<&str>,
) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    target.attributes.announcement_type = Some(announcement_type);
    target.attributes.announcement_title = Some(title.to_string());
    target.attributes.announcement_message = message.map(str::to_string);
    update(service, target).await
}

pub async fn remove_announcement<S>(service: &S, mut target: Asset) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    target.clear_attribute("announcementType");
    target.clear_attribute("announcementTitle");
    target.clear_attribute("announcementMessage");
    update(service, target).await
}

pub async fn update_description<S>(
    service: &S,
    mut target: Asset,
    description: &str,
) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    target.attributes.user_description = Some(description.to_string());
    update(service, target).await
}

/// Current term assignments of the target, read from the catalog
async fn current_terms<S>(service: &S, target: &Asset) -> Result<Vec<Reference>>
where
    S: EntityService + ?Sized,
{
    let existing = service
        .get_by_qualified_name(target.type_name(), target.qualified_name())
        .await?
        .ok_or_else(|| {
            CatalogError::not_found(format!(
                "no {} with qualifiedName '{}'",
                target.type_name(),
                target.qualified_name()
            ))
        })?;
    Ok(existing.assigned_terms().into_iter().cloned().collect())
}

/// Assign terms on top of those already assigned
pub async fn append_terms<S>(
    service: &S,
    mut target: Asset,
    terms: &[Reference],
) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    let mut assigned = current_terms(service, &target).await?;
    for term in terms {
        if !assigned.contains(term) {
            assigned.push(term.clone());
        }
    }
    target.set_relation(MEANINGS, Relation::Many(assigned));
    update(service, target).await
}

/// Unassign the given terms, keeping any others
pub async fn remove_terms<S>(
    service: &S,
    mut target: Asset,
    terms: &[Reference],
) -> Result<Option<Asset>>
where
    S: EntityService + ?Sized,
{
    let mut assigned = current_terms(service, &target).await?;
    assigned.retain(|term| !terms.contains(term));
    target.set_relation(MEANINGS, Relation::Many(assigned));
    update(service, target).await
}

pub async fn add_classifications<S>(
    service: &S,
    type_name: TypeName,
    qualified_name: &QualifiedName,
    classification_names: &[&str],
    propagate: bool,
) -> Result<()>
where
    S: EntityService + ?Sized,
{
    let classifications: Vec<Classification> = classification_names
        .iter()
        .map(|name| Classification::new(*name, propagate))
        .collect();
    service
        .add_classifications(type_name, qualified_name, &classifications)
        .await
}

pub async fn remove_classification<S>(
    service: &S,
    type_name: TypeName,
    qualified_name: &QualifiedName,
    classification_name: &str,
) -> Result<()>
where
    S: EntityService + ?Sized,
{
    service
        .remove_classification(type_name, qualified_name, classification_name)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::creator;
    use crate::store::memory::InMemoryCatalog;

    async fn catalog_with_table() -> (InMemoryCatalog, Asset) {
        let catalog = InMemoryCatalog::new();
        let schema_qn = QualifiedName::from("default/snowflake/1700000000/DB/SALES");
        let table = creator::table("ORDERS", &schema_qn).unwrap();
        create(&catalog, &[table.clone()]).await.unwrap();
        (catalog, table)
    }

    fn table_updater(table: &Asset) -> Asset {
        creator::updater(TypeName::Table, table.qualified_name(), "ORDERS")
    }

    #[tokio::test]
    async fn certificate_set_and_cleared() {
        let (catalog, table) = catalog_with_table().await;

        let updated = update_certificate(
            &catalog,
            table_updater(&table),
            CertificateStatus::Verified,
            Some("Reviewed"),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.attributes.certificate_status, Some(CertificateStatus::Verified));
        assert_eq!(updated.attributes.certificate_status_message.as_deref(), Some("Reviewed"));

        let cleared = remove_certificate(&catalog, table_updater(&table))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.attributes.certificate_status, None);
        assert_eq!(cleared.attributes.certificate_status_message, None);
    }

    #[tokio::test]
    async fn announcement_set_and_cleared() {
        let (catalog, table) = catalog_with_table().await;

        let updated = update_announcement(
            &catalog,
            table_updater(&table),
            AnnouncementType::Warning,
            "Migrating",
            None,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.attributes.announcement_type, Some(AnnouncementType::Warning));
        assert_eq!(updated.attributes.announcement_title.as_deref(), Some("Migrating"));

        let cleared = remove_announcement(&catalog, table_updater(&table))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.attributes.announcement_type, None);
        assert_eq!(cleared.attributes.announcement_title, None);
    }

    #[tokio::test]
    async fn terms_append_without_duplicates_and_remove_selectively() {
        let (catalog, table) = catalog_with_table().await;
        let revenue = Reference::by_guid(TypeName::AtlasGlossaryTerm, "t-revenue");
        let margin = Reference::by_guid(TypeName::AtlasGlossaryTerm, "t-margin");

        append_terms(&catalog, table_updater(&table), &[revenue.clone()])
            .await
            .unwrap();
        let updated = append_terms(&catalog, table_updater(&table), &[revenue.clone(), margin.clone()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.assigned_terms(), vec![&revenue, &margin]);

        let updated = remove_terms(&catalog, table_updater(&table), &[revenue])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.assigned_terms(), vec![&margin]);
    }

    #[tokio::test]
    async fn terms_on_missing_entity_are_not_found() {
        let catalog = InMemoryCatalog::new();
        let target = creator::updater(TypeName::Table, &QualifiedName::from("default/snowflake/1/DB/S/T"), "T");
        let err = append_terms(&catalog, target, &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn classifications_round_trip_through_the_service() {
        let (catalog, table) = catalog_with_table().await;
        add_classifications(&catalog, TypeName::Table, table.qualified_name(), &["PII", "Finance"], true)
            .await
            .unwrap();
        remove_classification(&catalog, TypeName::Table, table.qualified_name(), "PII")
            .await
            .unwrap();

        let stored = catalog
            .get_by_qualified_name(TypeName::Table, table.qualified_name())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.classification_names(), vec!["Finance"]);
    }

    #[tokio::test]
    async fn invalid_updates_never_reach_the_service() {
        let catalog = InMemoryCatalog::new();
        let orphan_term = creator::updater(TypeName::AtlasGlossaryTerm, &QualifiedName::from("t"), "Revenue");
        let err = update_description(&catalog, orphan_term, "Money in").await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingRequiredAttribute { .. }));
        assert!(catalog.is_empty());
    }
}
