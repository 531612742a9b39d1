use std::fmt::Write as _;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer, ser::SerializeMap};
use uuid::Uuid;

use crate::{
    types::{
        LogEntry, PostMigrationState, PreMigrationState, RenamePlan, RunStatus, Snapshot,
        ValidationResults,
    },
    utils::{RunRecord, duration_seconds, or_na, title_case},
};

const HEAVY_RULE: &str =
    "================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Post-migration row counts, serialized as `{"<target table>": n, "backup": m}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataCounts {
    pub target_table: String,
    pub target: Option<i64>,
    pub backup: Option<i64>,
}

impl Serialize for DataCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.target_table, &self.target)?;
        map.serialize_entry("backup", &self.backup)?;
        map.end()
    }
}

/// Everything the pipeline produced apart from the run log.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub pre: Option<PreMigrationState>,
    pub post: Option<PostMigrationState>,
    pub data_counts: DataCounts,
    pub validation: ValidationResults,
    /// True when the pipeline stopped before validation.
    pub aborted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: Uuid,
    pub migration_timestamp: DateTime<Local>,
    pub database: String,
    pub migration_type: String,
    pub plan: RenamePlan,
    pub dry_run: bool,
    pub status: RunStatus,
    pub success: bool,
    pub pre_migration_state: Option<PreMigrationState>,
    pub post_migration_state: Option<PostMigrationState>,
    pub data_counts: DataCounts,
    pub validation_tests: ValidationResults,
    pub issues: Vec<String>,
    pub migration_log: Vec<LogEntry>,
    pub rollback_instructions: Vec<String>,
    pub migration_duration_seconds: f64,
}

impl Report {
    pub fn new(
        run_id: Uuid,
        database: String,
        plan: &RenamePlan,
        record: RunRecord,
        outcome: RunOutcome,
        finished_at: DateTime<Local>,
    ) -> Self {
        let success =
            !outcome.aborted && record.issues.is_empty() && outcome.validation.all_passed();

        Self {
            run_id,
            migration_timestamp: record.started_at,
            database,
            migration_type: plan.migration_type(),
            plan: plan.clone(),
            dry_run: record.dry_run,
            status: RunStatus::new(success, record.dry_run),
            success,
            pre_migration_state: outcome.pre,
            post_migration_state: outcome.post,
            data_counts: DataCounts {
                target_table: plan.target.name.clone(),
                ..outcome.data_counts
            },
            validation_tests: outcome.validation,
            issues: record.issues,
            migration_log: record.log,
            rollback_instructions: plan.rollback_instructions(),
            migration_duration_seconds: duration_seconds(record.started_at, finished_at),
        }
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }

    /// Timestamp used in report file names.
    pub fn file_stamp(&self) -> String {
        self.migration_timestamp
            .format("%Y-%m-%d_%H-%M-%S")
            .to_string()
    }
}

fn write_list(out: &mut String, label: &str, items: Option<Vec<String>>) -> std::fmt::Result {
    match items {
        Some(items) => {
            writeln!(out, "{}: {}", label, items.len())?;
            for item in items {
                writeln!(out, "    - {}", item)?;
            }
            Ok(())
        }
        None => writeln!(out, "{}: N/A", label),
    }
}

fn write_snapshot_members(out: &mut String, snapshot: &Snapshot) -> std::fmt::Result {
    writeln!(out, "Record Count: {}", or_na(snapshot.row_count))?;
    writeln!(out, "Columns: {}", or_na(snapshot.column_count))?;
    match &snapshot.foreign_keys {
        Some(fks) => {
            writeln!(
                out,
                "Foreign Keys: {}",
                or_na(snapshot.foreign_key_count())
            )?;
            for fk in fks {
                writeln!(out, "    - {}", fk)?;
            }
        }
        None => writeln!(out, "Foreign Keys: N/A")?,
    }
    write_list(out, "Indexes", snapshot.indexes.clone())?;
    write_list(out, "RLS Policies", snapshot.policies.clone())?;
    write_list(out, "Triggers", snapshot.triggers.clone())
}

impl Report {
    fn render_text(&self) -> Result<String, std::fmt::Error> {
        let source = &self.plan.source.name;
        let target = &self.plan.target.name;
        let mut out = String::new();

        writeln!(out, "{}", HEAVY_RULE)?;
        writeln!(out, "MIGRATION REPORT: {} -> {}", source, target)?;
        writeln!(out, "{}", HEAVY_RULE)?;

        writeln!(out, "\nMIGRATION DETAILS\n{}", LIGHT_RULE)?;
        writeln!(out, "Run ID: {}", self.run_id)?;
        writeln!(out, "Timestamp: {}", self.migration_timestamp.to_rfc3339())?;
        writeln!(out, "Database: {}", self.database)?;
        writeln!(out, "Migration Type: {}", self.migration_type)?;
        writeln!(out, "Script: {}", self.plan.script_path.display())?;
        writeln!(out, "Dry Run: {}", self.dry_run)?;
        writeln!(out, "Status: {}", self.status)?;
        writeln!(out, "Duration: {:.3}s", self.migration_duration_seconds)?;

        writeln!(out, "\nPRE-MIGRATION STATE\n{}", LIGHT_RULE)?;
        match &self.pre_migration_state {
            Some(pre) => {
                writeln!(out, "{} Table Exists: {}", title_case(source), pre.source.exists)?;
                writeln!(
                    out,
                    "{} Table Already Exists: {}",
                    title_case(target),
                    or_na(pre.target_exists)
                )?;
                write_snapshot_members(&mut out, &pre.source)?;
            }
            None => writeln!(out, "Not collected")?,
        }

        writeln!(out, "\nPOST-MIGRATION STATE\n{}", LIGHT_RULE)?;
        match &self.post_migration_state {
            Some(post) => {
                writeln!(out, "{} Table Exists: {}", title_case(target), post.target.exists)?;
                writeln!(
                    out,
                    "{} Table Still Exists: {}",
                    title_case(source),
                    or_na(post.source_still_exists)
                )?;
                write_snapshot_members(&mut out, &post.target)?;
                writeln!(out, "Backup Table Exists: {}", post.backup.exists)?;
                writeln!(
                    out,
                    "Backup Table Record Count: {}",
                    or_na(post.backup.row_count)
                )?;
            }
            None => writeln!(out, "Not collected")?,
        }

        writeln!(out, "\nDATA VALIDATION\n{}", LIGHT_RULE)?;
        writeln!(out, "Records in {}: {}", target, or_na(self.data_counts.target))?;
        writeln!(out, "Records in backup: {}", or_na(self.data_counts.backup))?;

        writeln!(out, "\nVALIDATION TESTS\n{}", LIGHT_RULE)?;
        if self.validation_tests.is_empty() {
            writeln!(out, "No validation tests were run")?;
        } else {
            for check in self.validation_tests.iter() {
                let status = if check.passed { "PASS" } else { "FAIL" };
                writeln!(out, "{}: {}", title_case(&check.name), status)?;
            }
            writeln!(
                out,
                "\nTotal: {}/{} tests passed",
                self.validation_tests.passed_count(),
                self.validation_tests.len()
            )?;
        }

        if !self.issues.is_empty() {
            writeln!(out, "\nISSUES ENCOUNTERED\n{}", LIGHT_RULE)?;
            for issue in &self.issues {
                writeln!(out, "- {}", issue)?;
            }
        }

        writeln!(out, "\nMIGRATION LOG\n{}", LIGHT_RULE)?;
        for entry in &self.migration_log {
            writeln!(out, "{}", entry)?;
        }

        writeln!(out, "\nROLLBACK INSTRUCTIONS\n{}", LIGHT_RULE)?;
        writeln!(out, "To rollback this migration:")?;
        for (i, step) in self.rollback_instructions.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, step)?;
        }

        writeln!(out, "\n{}", HEAVY_RULE)?;
        Ok(out)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_text()?)
    }
}
