use std::path::PathBuf;

use chrono::Local;
use tracing::info;
use uuid::Uuid;

use crate::config::{DatabaseConfig, Settings};
use crate::postgres::{PgClient, TargetDatabase};
use crate::services::run_pipeline;
use crate::types::{QueryOutcome, RenamePlan, Report, RunOutcome};
use crate::utils::RunContext;

/// Service layer for one migration run: connect, run the pipeline, build the report.
pub struct MigrationService {
    run_id: Uuid,
    database: DatabaseConfig,
    plan: RenamePlan,
}

impl MigrationService {
    pub fn new(settings: &Settings, script_path: Option<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            database: settings.database.clone(),
            plan: settings.migration.to_plan(script_path),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn plan(&self) -> &RenamePlan {
        &self.plan
    }

    /// Runs the migration against the configured database.
    ///
    /// Never fails: connection errors, missing tables and script failures all
    /// end up as issues in the returned report.
    pub async fn run(&self, mut ctx: RunContext) -> Report {
        info!(run_id = %self.run_id, "Starting migration run");
        ctx.info(format!(
            "Attempting to connect to database {}...",
            self.database.identifier()
        ));

        let outcome = match PgClient::connect(&self.database).await {
            Ok(mut client) => {
                ctx.success("Successfully connected to database");
                let outcome = self.run_connected(&mut client, &mut ctx).await;
                client.close().await;
                ctx.info("Database connection closed");
                outcome
            }
            Err(err) => {
                ctx.fatal(err.to_string());
                ctx.issue(err.to_string());
                RunOutcome {
                    aborted: true,
                    ..Default::default()
                }
            }
        };

        self.report(ctx, outcome)
    }

    /// Runs the migration over an already open session.
    pub async fn run_on<D: TargetDatabase + ?Sized>(
        &self,
        db: &mut D,
        mut ctx: RunContext,
    ) -> Report {
        let outcome = self.run_connected(db, &mut ctx).await;
        self.report(ctx, outcome)
    }

    async fn run_connected<D: TargetDatabase + ?Sized>(
        &self,
        db: &mut D,
        ctx: &mut RunContext,
    ) -> RunOutcome {
        match db.server_version().await {
            QueryOutcome::Ok(version) => ctx.info(format!("Server version: {}", version)),
            other => ctx.warning(format!(
                "Failed to read server version: {}",
                other.failure_detail().unwrap_or_default()
            )),
        }

        run_pipeline(db, &self.plan, ctx).await
    }

    fn report(&self, ctx: RunContext, outcome: RunOutcome) -> Report {
        Report::new(
            self.run_id,
            self.database.identifier(),
            &self.plan,
            ctx.into_record(),
            outcome,
            Local::now(),
        )
    }
}
