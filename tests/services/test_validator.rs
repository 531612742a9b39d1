use retable::{
    services::{MigrationExecutor, StateCollector, Validator, checklist},
    types::{LogLevel, PostMigrationState, PreMigrationState, RenamePlan},
    utils::RunContext,
};

use crate::common::{FakeDatabase, fixtures::RENAME_SCRIPT, plan_with_script, script_file};

/// Collects, migrates and collects again, returning both states.
async fn migrated(
    db: &mut FakeDatabase,
    plan: &RenamePlan,
    ctx: &mut RunContext,
) -> (PreMigrationState, PostMigrationState) {
    let pre = StateCollector::new(db)
        .pre_migration(plan, ctx)
        .await
        .unwrap();
    MigrationExecutor::new(db)
        .execute(&plan.script_path, ctx)
        .await
        .unwrap();
    let post = StateCollector::new(db).post_migration(plan, ctx).await;
    (pre, post)
}

#[tokio::test]
async fn test_check_outcomes_are_order_independent() {
    let script = script_file(RENAME_SCRIPT);
    let plan = plan_with_script(script.path());
    let mut db = FakeDatabase::with_licenses(&plan);
    if let Some(table) = db.table_mut(&plan.source) {
        table.duplicate_ids = 3;
    }

    let mut ctx = RunContext::default();
    let (pre, post) = migrated(&mut db, &plan, &mut ctx).await;

    let (forward, forward_counts) = Validator::new(&mut db)
        .run(&plan, &pre, &post, &mut ctx)
        .await;

    let mut reversed_order = checklist();
    reversed_order.reverse();
    let (reversed, reversed_counts) = Validator::new(&mut db)
        .run_with_order(&reversed_order, &plan, &pre, &post, &mut ctx)
        .await;

    assert_eq!(forward.len(), reversed.len());
    for check in forward.iter() {
        assert_eq!(
            reversed.get(&check.name),
            Some(check.passed),
            "{}",
            check.name
        );
    }
    assert_eq!(forward_counts, reversed_counts);
    assert_eq!(forward.get("no_duplicate_ids"), Some(false));
}

#[tokio::test]
async fn test_check_outcomes_are_order_independent_without_target() {
    let script = script_file(RENAME_SCRIPT);
    let plan = plan_with_script(script.path());
    let mut db = FakeDatabase::new(&plan);

    let mut ctx = RunContext::default();
    let pre = StateCollector::new(&mut db)
        .pre_migration(&plan, &mut ctx)
        .await
        .unwrap();
    let post = StateCollector::new(&mut db)
        .post_migration(&plan, &mut ctx)
        .await;

    let (forward, _) = Validator::new(&mut db)
        .run(&plan, &pre, &post, &mut ctx)
        .await;

    let mut reversed_order = checklist();
    reversed_order.reverse();
    let (reversed, _) = Validator::new(&mut db)
        .run_with_order(&reversed_order, &plan, &pre, &post, &mut ctx)
        .await;

    for check in forward.iter() {
        assert_eq!(
            reversed.get(&check.name),
            Some(check.passed),
            "{}",
            check.name
        );
    }
    assert_eq!(forward.get("query_accounts_works"), Some(false));
    assert_eq!(forward.get("old_table_inaccessible"), Some(true));
    assert_eq!(reversed.get("old_table_inaccessible"), Some(true));
}

#[tokio::test]
async fn test_results_keep_checklist_order() {
    let script = script_file(RENAME_SCRIPT);
    let plan = plan_with_script(script.path());
    let mut db = FakeDatabase::with_licenses(&plan);

    let mut ctx = RunContext::default();
    let (pre, post) = migrated(&mut db, &plan, &mut ctx).await;
    let (results, _) = Validator::new(&mut db)
        .run(&plan, &pre, &post, &mut ctx)
        .await;

    let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "accounts_table_exists",
            "old_table_removed",
            "backup_table_exists",
            "record_count_match",
            "record_count_preserved",
            "query_accounts_works",
            "old_table_inaccessible",
            "no_null_ids",
            "no_duplicate_ids",
            "foreign_keys_exist",
            "indexes_exist",
            "policies_preserved",
            "triggers_preserved",
        ]
    );

    let json = serde_json::to_string(&results).unwrap();
    assert!(json.starts_with(r#"{"accounts_table_exists":true,"old_table_removed":true"#));
}

#[tokio::test]
async fn test_failing_query_does_not_stop_later_checks() {
    let script = script_file(RENAME_SCRIPT);
    let plan = plan_with_script(script.path());
    let mut db = FakeDatabase::with_licenses(&plan).failing("null_count", &plan.target);

    let mut ctx = RunContext::default();
    let (pre, post) = migrated(&mut db, &plan, &mut ctx).await;
    let (results, _) = Validator::new(&mut db)
        .run(&plan, &pre, &post, &mut ctx)
        .await;

    assert_eq!(results.get("no_null_ids"), Some(false));
    assert_eq!(results.get("no_duplicate_ids"), Some(true));
    assert_eq!(results.get("triggers_preserved"), Some(true));
    assert_eq!(results.len(), 13);

    assert!(ctx.entries().iter().any(|e| {
        e.level == LogLevel::Error
            && e.message.contains("NULL id count")
            && e.message.contains("injected failure")
    }));
    // the failed NULL count and the expected missing old table
    assert_eq!(db.resets, 2);
}

#[tokio::test]
async fn test_old_table_still_queryable_fails() {
    let script = script_file(RENAME_SCRIPT);
    let plan = plan_with_script(script.path());
    let mut db = FakeDatabase::with_licenses(&plan);

    let mut ctx = RunContext::default();
    let (pre, mut post) = migrated(&mut db, &plan, &mut ctx).await;

    // a view left behind under the old name
    db = db.with_table(
        &plan.source,
        crate::common::FakeTable {
            rows: 42,
            is_view: true,
            ..Default::default()
        },
    );
    post.source_still_exists = Some(false);

    let (results, _) = Validator::new(&mut db)
        .run(&plan, &pre, &post, &mut ctx)
        .await;

    assert_eq!(results.get("old_table_removed"), Some(true));
    assert_eq!(results.get("old_table_inaccessible"), Some(false));
    assert_eq!(db.resets, 0);
}
