mod log_entry;
mod query_outcome;
mod rename_plan;
mod report;
mod run_status;
mod snapshot;
mod table_ref;
mod validation;

pub use log_entry::{LogEntry, LogLevel};
pub use query_outcome::QueryOutcome;
pub use rename_plan::RenamePlan;
pub use report::{DataCounts, Report, RunOutcome};
pub use run_status::RunStatus;
pub use snapshot::{ForeignKey, PostMigrationState, PreMigrationState, Snapshot};
pub use table_ref::TableRef;
pub use validation::{CheckResult, ValidationResults};
