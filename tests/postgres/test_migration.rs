use retable::{
    config::Settings,
    postgres::{PgClient, TargetDatabase},
    services::MigrationService,
    types::{QueryOutcome, TableRef},
    utils::RunContext,
};
use uuid::Uuid;

use crate::common::{create_test_client, script_file, test_database_config};

/// Builds a licenses table with 42 rows, 6 foreign keys and 5 indexes in a
/// throwaway schema.
fn fixture_sql(schema: &str) -> String {
    format!(
        r#"
CREATE SCHEMA {schema};
SET search_path TO {schema};

CREATE TABLE organizations (id int PRIMARY KEY);
CREATE TABLE vendors (id int PRIMARY KEY);
CREATE TABLE users (id int PRIMARY KEY);
CREATE TABLE contracts (id int PRIMARY KEY);
INSERT INTO organizations VALUES (1);
INSERT INTO vendors VALUES (1);
INSERT INTO users VALUES (1);
INSERT INTO contracts VALUES (1);

CREATE TABLE software_licenses (
    id int PRIMARY KEY,
    organization_id int REFERENCES organizations(id),
    vendor_id int REFERENCES vendors(id),
    owner_id int REFERENCES users(id),
    contract_id int REFERENCES contracts(id),
    status text,
    renewal_date date
);
INSERT INTO software_licenses
SELECT g, 1, 1, 1, 1, 'active', DATE '2026-01-01' + g FROM generate_series(1, 42) AS g;

CREATE TABLE license_assignments (id int PRIMARY KEY, license_id int REFERENCES software_licenses(id));
CREATE TABLE license_renewals (id int PRIMARY KEY, license_id int REFERENCES software_licenses(id));

CREATE INDEX idx_licenses_organization ON software_licenses (organization_id);
CREATE INDEX idx_licenses_vendor ON software_licenses (vendor_id);
CREATE INDEX idx_licenses_owner ON software_licenses (owner_id);
CREATE INDEX idx_licenses_status ON software_licenses (status);
CREATE INDEX idx_licenses_renewal_date ON software_licenses (renewal_date);
"#
    )
}

fn rename_sql(schema: &str) -> String {
    format!(
        r#"
CREATE TABLE {schema}.software_licenses_backup AS TABLE {schema}.software_licenses;
ALTER TABLE {schema}.software_licenses RENAME TO accounts;
"#
    )
}

async fn drop_schema(client: &mut PgClient, schema: &str) {
    let _ = client
        .execute_script(&format!("DROP SCHEMA IF EXISTS {} CASCADE;", schema), true)
        .await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL, see TEST_PG_* variables"]
async fn test_rename_against_postgres() {
    let schema = format!("retable_it_{}", Uuid::new_v4().simple());
    let mut client = create_test_client().await.unwrap();
    client
        .execute_script(&fixture_sql(&schema), true)
        .await
        .unwrap();

    let script = script_file(&rename_sql(&schema));
    let mut settings = Settings::default();
    settings.database = test_database_config();
    settings.migration.schema = schema.clone();

    let service = MigrationService::new(&settings, Some(script.path().to_path_buf()));
    let report = service.run(RunContext::default()).await;

    let pre = report.pre_migration_state.as_ref().unwrap();
    assert_eq!(pre.source.row_count, Some(42));
    assert_eq!(pre.source.foreign_key_count(), Some(6));
    assert_eq!(pre.source.index_count(), Some(5));

    assert!(report.success, "issues: {:?}", report.issues);
    assert_eq!(report.validation_tests.get("foreign_keys_exist"), Some(true));
    assert_eq!(report.validation_tests.get("indexes_exist"), Some(true));
    assert_eq!(report.validation_tests.get("record_count_match"), Some(true));
    assert_eq!(report.exit_code(), 0);

    let old = TableRef::new(&schema, "software_licenses");
    assert_eq!(client.row_count(&old).await, QueryOutcome::NotFound);
    let backup = TableRef::new(&schema, "software_licenses_backup");
    assert_eq!(client.row_count(&backup).await, QueryOutcome::Ok(42));

    drop_schema(&mut client, &schema).await;
    client.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL, see TEST_PG_* variables"]
async fn test_failing_script_leaves_source_intact() {
    let schema = format!("retable_it_{}", Uuid::new_v4().simple());
    let mut client = create_test_client().await.unwrap();
    client
        .execute_script(&fixture_sql(&schema), true)
        .await
        .unwrap();

    let broken = format!(
        "CREATE TABLE {schema}.software_licenses_backup AS TABLE {schema}.software_licenses;\nALTER TABLE {schema}.software_licenses RENAM TO accounts;\n"
    );
    let script = script_file(&broken);
    let mut settings = Settings::default();
    settings.database = test_database_config();
    settings.migration.schema = schema.clone();

    let report = MigrationService::new(&settings, Some(script.path().to_path_buf()))
        .run(RunContext::default())
        .await;

    assert_eq!(report.exit_code(), 1);
    let source = TableRef::new(&schema, "software_licenses");
    let target = TableRef::new(&schema, "accounts");
    let backup = TableRef::new(&schema, "software_licenses_backup");
    assert_eq!(client.row_count(&source).await, QueryOutcome::Ok(42));
    assert_eq!(client.table_exists(&target).await, QueryOutcome::Ok(false));
    assert_eq!(client.table_exists(&backup).await, QueryOutcome::Ok(false));

    drop_schema(&mut client, &schema).await;
    client.close().await;
}
