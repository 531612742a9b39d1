use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::postgres::TargetDatabase;
use crate::types::{
    DataCounts, LogLevel, PostMigrationState, PreMigrationState, QueryOutcome, RenamePlan,
    TableRef, ValidationResults,
};
use crate::utils::{RunContext, or_na, title_case};

/// A single post-migration check. Declaration order is the checklist order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Check {
    TargetTableExists,
    OldTableRemoved,
    BackupTableExists,
    RecordCountMatch,
    RecordCountPreserved,
    QueryTargetWorks,
    OldTableInaccessible,
    NoNullIds,
    NoDuplicateIds,
    ForeignKeysExist,
    IndexesExist,
    PoliciesPreserved,
    TriggersPreserved,
}

/// Checks in the order they run and are reported.
pub fn checklist() -> Vec<Check> {
    Check::iter().collect()
}

impl Check {
    /// Result key, e.g. `accounts_table_exists` for a rename to `accounts`.
    pub fn name(&self, plan: &RenamePlan) -> String {
        match self {
            Check::TargetTableExists => format!("{}_table_exists", plan.target.name),
            Check::OldTableRemoved => "old_table_removed".to_string(),
            Check::BackupTableExists => "backup_table_exists".to_string(),
            Check::RecordCountMatch => "record_count_match".to_string(),
            Check::RecordCountPreserved => "record_count_preserved".to_string(),
            Check::QueryTargetWorks => format!("query_{}_works", plan.target.name),
            Check::OldTableInaccessible => "old_table_inaccessible".to_string(),
            Check::NoNullIds => "no_null_ids".to_string(),
            Check::NoDuplicateIds => "no_duplicate_ids".to_string(),
            Check::ForeignKeysExist => "foreign_keys_exist".to_string(),
            Check::IndexesExist => "indexes_exist".to_string(),
            Check::PoliciesPreserved => "policies_preserved".to_string(),
            Check::TriggersPreserved => "triggers_preserved".to_string(),
        }
    }
}

/// Both sides were collected and agree.
fn same<T: PartialEq>(post: Option<T>, pre: Option<T>) -> bool {
    matches!((post, pre), (Some(post), Some(pre)) if post == pre)
}

fn counts_detail(post: Option<usize>, pre: Option<usize>) -> Option<String> {
    Some(format!("{} found, {} expected", or_na(post), or_na(pre)))
}

pub struct Validator<'a, D: TargetDatabase + ?Sized> {
    db: &'a mut D,
}

impl<'a, D: TargetDatabase + ?Sized> Validator<'a, D> {
    pub fn new(db: &'a mut D) -> Self {
        Self { db }
    }

    pub async fn run(
        &mut self,
        plan: &RenamePlan,
        pre: &PreMigrationState,
        post: &PostMigrationState,
        ctx: &mut RunContext,
    ) -> (ValidationResults, DataCounts) {
        self.run_with_order(&checklist(), plan, pre, post, ctx).await
    }

    /// Runs the given checks in the given order. A failing check never stops
    /// the ones after it.
    pub async fn run_with_order(
        &mut self,
        order: &[Check],
        plan: &RenamePlan,
        pre: &PreMigrationState,
        post: &PostMigrationState,
        ctx: &mut RunContext,
    ) -> (ValidationResults, DataCounts) {
        ctx.info("Running validation tests...");

        let mut results = ValidationResults::new();
        for check in order {
            let name = check.name(plan);
            let (passed, detail) = self.evaluate(*check, plan, pre, post, ctx).await;

            let level = if passed {
                LogLevel::Info
            } else {
                LogLevel::Warning
            };
            let detail = detail.map(|d| format!(" ({})", d)).unwrap_or_default();
            ctx.log(
                level,
                format!("  {}: {}{}", title_case(&name), passed, detail),
            );

            results.record(name, passed);
        }

        let data_counts = DataCounts {
            target_table: plan.target.name.clone(),
            target: post.target.row_count,
            backup: post.backup.row_count,
        };

        ctx.info(format!(
            "Validation complete: {}/{} tests passed",
            results.passed_count(),
            results.len()
        ));

        (results, data_counts)
    }

    async fn evaluate(
        &mut self,
        check: Check,
        plan: &RenamePlan,
        pre: &PreMigrationState,
        post: &PostMigrationState,
        ctx: &mut RunContext,
    ) -> (bool, Option<String>) {
        let source = &pre.source;
        let target = &post.target;

        match check {
            Check::TargetTableExists => (target.exists, None),
            Check::OldTableRemoved => (post.source_still_exists == Some(false), None),
            Check::BackupTableExists => (post.backup.exists, None),
            Check::RecordCountMatch => (
                same(target.row_count, post.backup.row_count),
                Some(format!(
                    "{} vs {} in backup",
                    or_na(target.row_count),
                    or_na(post.backup.row_count)
                )),
            ),
            Check::RecordCountPreserved => (
                same(target.row_count, source.row_count),
                Some(format!(
                    "{} vs {} before migration",
                    or_na(target.row_count),
                    or_na(source.row_count)
                )),
            ),
            Check::QueryTargetWorks => {
                let outcome = self.db.row_count(&plan.target).await;
                match self.settle(outcome, "row count", &plan.target, false, ctx).await {
                    QueryOutcome::Ok(count) => (true, Some(format!("{} records", count))),
                    other => (false, other.failure_detail()),
                }
            }
            Check::OldTableInaccessible => self.old_table_inaccessible(plan, ctx).await,
            Check::NoNullIds => {
                let outcome = self.db.null_count(&plan.target, &plan.id_column).await;
                let outcome = self.settle(outcome, "NULL id count", &plan.target, false, ctx).await;
                zero_rows(outcome, "NULL ids")
            }
            Check::NoDuplicateIds => {
                let outcome = self.db.duplicate_count(&plan.target, &plan.id_column).await;
                let outcome = self
                    .settle(outcome, "duplicate id count", &plan.target, false, ctx)
                    .await;
                zero_rows(outcome, "duplicated ids")
            }
            Check::ForeignKeysExist => (
                same(target.foreign_key_count(), source.foreign_key_count()),
                counts_detail(target.foreign_key_count(), source.foreign_key_count()),
            ),
            Check::IndexesExist => (
                same(target.index_count(), source.index_count()),
                counts_detail(target.index_count(), source.index_count()),
            ),
            Check::PoliciesPreserved => (
                same(target.policy_count(), source.policy_count()),
                counts_detail(target.policy_count(), source.policy_count()),
            ),
            Check::TriggersPreserved => (
                same(target.trigger_count(), source.trigger_count()),
                counts_detail(target.trigger_count(), source.trigger_count()),
            ),
        }
    }

    /// Querying the old name must fail with "relation does not exist".
    async fn old_table_inaccessible(
        &mut self,
        plan: &RenamePlan,
        ctx: &mut RunContext,
    ) -> (bool, Option<String>) {
        let outcome = self.db.row_count(&plan.source).await;
        match self.settle(outcome, "row count", &plan.source, true, ctx).await {
            QueryOutcome::NotFound => (true, Some("relation does not exist".to_string())),
            QueryOutcome::Ok(count) => (false, Some(format!("still answers with {} records", count))),
            QueryOutcome::Error(detail) => (false, Some(detail)),
        }
    }

    /// A failed statement leaves the session unusable until it is reset, so
    /// every non-`Ok` data query is followed by a reset. Failures are logged as
    /// errors unless `missing_expected` and the relation is gone.
    async fn settle<T>(
        &mut self,
        outcome: QueryOutcome<T>,
        query: &str,
        table: &TableRef,
        missing_expected: bool,
        ctx: &mut RunContext,
    ) -> QueryOutcome<T> {
        if outcome.is_ok() {
            return outcome;
        }

        if !(missing_expected && outcome.is_not_found()) {
            ctx.error(format!(
                "Validation query failed ({} on {}): {}",
                query,
                table,
                or_na(outcome.failure_detail())
            ));
        }

        if let QueryOutcome::Error(detail) = self.db.reset().await {
            ctx.error(format!("Failed to reset session after query error: {}", detail));
        }

        outcome
    }
}

fn zero_rows(outcome: QueryOutcome<i64>, what: &str) -> (bool, Option<String>) {
    match outcome {
        QueryOutcome::Ok(count) => (count == 0, Some(format!("{} {}", count, what))),
        other => (false, other.failure_detail()),
    }
}
