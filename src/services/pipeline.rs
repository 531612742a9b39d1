use crate::postgres::TargetDatabase;
use crate::services::{MigrationExecutor, StateCollector, Validator};
use crate::types::{RenamePlan, RunOutcome};
use crate::utils::RunContext;

/// Runs collect, execute, collect, validate against an open session.
///
/// Stops after pre-collection when the source table is missing or its
/// existence cannot be determined, and after execution when the script
/// fails or the run is a dry run.
pub async fn run_pipeline<D: TargetDatabase + ?Sized>(
    db: &mut D,
    plan: &RenamePlan,
    ctx: &mut RunContext,
) -> RunOutcome {
    let mut outcome = RunOutcome::default();

    let pre = match StateCollector::new(db).pre_migration(plan, ctx).await {
        Ok(pre) => pre,
        Err(detail) => {
            ctx.issue(format!("Failed to collect pre-migration state: {}", detail));
            ctx.error("Pre-migration state could not be collected. Aborting migration.");
            outcome.aborted = true;
            return outcome;
        }
    };

    let source_exists = pre.source.exists;
    outcome.pre = Some(pre);

    if !source_exists {
        ctx.issue(format!("Source table {} does not exist", plan.source));
        ctx.error(format!(
            "{} table does not exist. Aborting migration.",
            plan.source.name
        ));
        outcome.aborted = true;
        return outcome;
    }

    if MigrationExecutor::new(db)
        .execute(&plan.script_path, ctx)
        .await
        .is_err()
    {
        ctx.error("Migration script execution failed. Aborting.");
        outcome.aborted = true;
        return outcome;
    }

    if ctx.is_dry_run() {
        ctx.info("Dry run: changes rolled back, skipping post-migration state and validation");
        return outcome;
    }

    let post = StateCollector::new(db).post_migration(plan, ctx).await;

    if let Some(pre) = &outcome.pre {
        let (validation, data_counts) = Validator::new(db).run(plan, pre, &post, ctx).await;
        outcome.validation = validation;
        outcome.data_counts = data_counts;
    }
    outcome.post = Some(post);

    outcome
}
