pub mod init;
pub mod logger;
pub mod progress;
pub mod queries;
pub mod report_writer;
pub mod run_context;
pub mod time;
pub mod utils;

pub use progress::ProgressReporter;
pub use queries::{get_query, table_context};
pub use report_writer::{ReportPaths, ReportWriter};
pub use run_context::{RunContext, RunContextOptions, RunRecord};
pub use time::duration_seconds;
pub use utils::{or_na, quote_ident, quote_literal, title_case};
