use crate::postgres::TargetDatabase;
use crate::types::{
    PostMigrationState, PreMigrationState, QueryOutcome, RenamePlan, Snapshot, TableRef,
};
use crate::utils::RunContext;

/// Captures catalog snapshots of the tables involved in the rename.
pub struct StateCollector<'a, D: TargetDatabase + ?Sized> {
    db: &'a mut D,
}

impl<'a, D: TargetDatabase + ?Sized> StateCollector<'a, D> {
    pub fn new(db: &'a mut D) -> Self {
        Self { db }
    }

    /// Snapshot of one table.
    ///
    /// Returns `Err` only when the existence check itself fails. A missing
    /// table yields a snapshot with `exists == false`, and a failed member
    /// query is logged and leaves that member empty.
    pub async fn snapshot(
        &mut self,
        table: &TableRef,
        ctx: &mut RunContext,
    ) -> Result<Snapshot, String> {
        let exists = match self.db.table_exists(table).await {
            QueryOutcome::Ok(exists) => exists,
            QueryOutcome::NotFound => false,
            QueryOutcome::Error(detail) => {
                ctx.error(format!(
                    "Failed to check whether {} exists: {}",
                    table, detail
                ));
                return Err(detail);
            }
        };
        ctx.info(format!("  {} table exists: {}", table.name, exists));

        let mut snapshot = Snapshot::missing(table.clone());
        if !exists {
            return Ok(snapshot);
        }
        snapshot.exists = true;

        snapshot.row_count = member(ctx, table, "record count", self.db.row_count(table).await);
        if let Some(count) = snapshot.row_count {
            ctx.info(format!("  Records in {}: {}", table.name, count));
        }

        snapshot.column_count =
            member(ctx, table, "column count", self.db.column_count(table).await);

        snapshot.foreign_keys =
            member(ctx, table, "foreign keys", self.db.foreign_keys(table).await);
        if let Some(count) = snapshot.foreign_key_count() {
            ctx.info(format!("  Foreign keys on {}: {}", table.name, count));
        }

        snapshot.indexes = member(ctx, table, "indexes", self.db.indexes(table).await);
        if let Some(count) = snapshot.index_count() {
            ctx.info(format!("  Indexes on {}: {}", table.name, count));
        }

        snapshot.policies = member(ctx, table, "RLS policies", self.db.policies(table).await);
        if let Some(count) = snapshot.policy_count() {
            ctx.info(format!("  RLS policies on {}: {}", table.name, count));
        }

        snapshot.triggers = member(ctx, table, "triggers", self.db.triggers(table).await);
        if let Some(count) = snapshot.trigger_count() {
            ctx.info(format!("  Triggers on {}: {}", table.name, count));
        }

        Ok(snapshot)
    }

    /// Source snapshot plus whether the target name is already taken.
    pub async fn pre_migration(
        &mut self,
        plan: &RenamePlan,
        ctx: &mut RunContext,
    ) -> Result<PreMigrationState, String> {
        ctx.info("Collecting pre-migration state...");

        let source = self.snapshot(&plan.source, ctx).await?;

        let target_exists = member(
            ctx,
            &plan.target,
            "existence",
            self.db.table_exists(&plan.target).await,
        );
        if target_exists == Some(true) {
            ctx.warning(format!(
                "Target table {} already exists, the migration script is expected to fail",
                plan.target
            ));
        }

        Ok(PreMigrationState {
            source,
            target_exists,
        })
    }

    pub async fn post_migration(
        &mut self,
        plan: &RenamePlan,
        ctx: &mut RunContext,
    ) -> PostMigrationState {
        ctx.info("Collecting post-migration state...");

        let target = self
            .snapshot(&plan.target, ctx)
            .await
            .unwrap_or_else(|_| Snapshot::missing(plan.target.clone()));

        let source_still_exists = member(
            ctx,
            &plan.source,
            "base table existence",
            self.db.base_table_exists(&plan.source).await,
        );
        if let Some(still_exists) = source_still_exists {
            ctx.info(format!(
                "  {} table still exists: {}",
                plan.source.name, still_exists
            ));
        }

        let backup = self
            .snapshot(&plan.backup, ctx)
            .await
            .unwrap_or_else(|_| Snapshot::missing(plan.backup.clone()));

        PostMigrationState {
            target,
            backup,
            source_still_exists,
        }
    }
}

fn member<T>(
    ctx: &mut RunContext,
    table: &TableRef,
    what: &str,
    outcome: QueryOutcome<T>,
) -> Option<T> {
    match outcome {
        QueryOutcome::Ok(value) => Some(value),
        other => {
            let detail = other.failure_detail().unwrap_or_default();
            ctx.error(format!("Failed to collect {} of {}: {}", what, table, detail));
            None
        }
    }
}
