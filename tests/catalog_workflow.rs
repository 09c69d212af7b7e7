use catalog_model::logic::{creator, mutate};
use catalog_model::{
    find_by_name, find_connections_by_name, retrieve_by_guid, retrieve_by_qualified_name,
    CatalogError, CertificateStatus, Classifiable, ConnectionAdmins, ConnectorType, DeleteType, EntityService,
    Hierarchical, Identifiable, InMemoryCatalog, Reference, TypeName,
};

#[tokio::test]
async fn test_sql_hierarchy_workflow() {
    let catalog = InMemoryCatalog::new();

    println!("1. Creating connection");
    let connection = creator::connection(
        "production",
        ConnectorType::Snowflake,
        ConnectionAdmins::users(["data-admin"]),
    );
    let response = mutate::create(&catalog, &[connection.clone()]).await.unwrap();
    let connection_guid = response.assigned_guid(&connection.guid).unwrap().clone();

    println!("2. Creating database, schema and table under it");
    let database = creator::database("ANALYTICS", connection.qualified_name()).unwrap();
    let schema = creator::schema("SALES", database.qualified_name()).unwrap();
    let table = creator::table("ORDERS", schema.qualified_name()).unwrap();
    let response = mutate::create(&catalog, &[database.clone(), schema.clone(), table.clone()])
        .await
        .unwrap();
    assert_eq!(response.created().len(), 3);

    println!("3. Resolving the table by name and walking back up");
    let found = find_by_name(&catalog, TypeName::Table, "ORDERS", &[]).await.unwrap();
    assert_eq!(found.qualified_name(), table.qualified_name());
    assert_eq!(found.connector_type().unwrap(), ConnectorType::Snowflake);

    let schema_qn = found.parent_qualified_name().unwrap().unwrap();
    let stored_schema = retrieve_by_qualified_name(&catalog, TypeName::Schema, &schema_qn)
        .await
        .unwrap();
    assert_eq!(stored_schema.name(), Some("SALES"));

    let database_qn = stored_schema.parent_qualified_name().unwrap().unwrap();
    let connection_qn = retrieve_by_qualified_name(&catalog, TypeName::Database, &database_qn)
        .await
        .unwrap()
        .parent_qualified_name()
        .unwrap()
        .unwrap();
    let stored_connection = retrieve_by_guid(&catalog, TypeName::Connection, &connection_guid)
        .await
        .unwrap();
    assert_eq!(stored_connection.qualified_name(), &connection_qn);

    let connections = find_connections_by_name(&catalog, "production", ConnectorType::Snowflake, &[])
        .await
        .unwrap();
    assert_eq!(connections.len(), 1);

    println!("4. Certifying the table");
    let updater = creator::updater(TypeName::Table, table.qualified_name(), "ORDERS");
    let certified = mutate::update_certificate(&catalog, updater, CertificateStatus::Verified, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(certified.guid, found.guid);
    assert_eq!(certified.attributes.certificate_status, Some(CertificateStatus::Verified));

    println!("5. Archiving the table hides it from name lookups");
    catalog.delete(&[found.guid.clone()], DeleteType::Soft).await.unwrap();
    let err = find_by_name(&catalog, TypeName::Table, "ORDERS", &[]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_glossary_workflow() {
    let catalog = InMemoryCatalog::new();

    let glossary = creator::glossary("Business Terms");
    let response = mutate::create(&catalog, &[glossary.clone()]).await.unwrap();
    let glossary_guid = response.assigned_guid(&glossary.guid).unwrap().clone();

    // Creating by qualifiedName anchor is accepted
    let category = creator::glossary_category("Finance", None, Some(glossary.qualified_name()));
    let term = creator::glossary_term("Revenue", Some(&glossary_guid), None);
    mutate::create(&catalog, &[category.clone(), term.clone()])
        .await
        .unwrap();

    // A term without any anchor is rejected before reaching the catalog
    let orphan = creator::glossary_term("Orphan", None, None);
    let err = mutate::create(&catalog, &[orphan]).await.unwrap_err();
    assert!(matches!(err, CatalogError::MissingRequiredAttribute { .. }));

    // Category updates need the glossary GUID, not its qualifiedName
    let by_qn = creator::glossary_category("Finance", None, Some(glossary.qualified_name()));
    let mut by_qn_update = creator::updater(TypeName::AtlasGlossaryCategory, category.qualified_name(), "Finance");
    by_qn_update.relationship_attributes = by_qn.relationship_attributes.clone();
    let err = mutate::update_description(&catalog, by_qn_update, "Money matters")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidAnchor { .. }));

    let by_guid = creator::glossary_category_updater(category.qualified_name(), "Finance", &glossary_guid);
    let updated = mutate::update_description(&catalog, by_guid, "Money matters")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.attributes.user_description.as_deref(), Some("Money matters"));

    // Link the term to a table
    let schema_qn = catalog_model::QualifiedName::from("default/postgres/1700000000/erp/public");
    let table = creator::table("invoices", &schema_qn).unwrap();
    mutate::create(&catalog, &[table.clone()]).await.unwrap();

    let stored_term = find_by_name(&catalog, TypeName::AtlasGlossaryTerm, "Revenue", &[])
        .await
        .unwrap();
    let term_ref = Reference::by_guid(TypeName::AtlasGlossaryTerm, stored_term.guid.clone());
    let linked = mutate::append_terms(
        &catalog,
        creator::updater(TypeName::Table, table.qualified_name(), "invoices"),
        &[term_ref.clone()],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(linked.assigned_terms(), vec![&term_ref]);
}
