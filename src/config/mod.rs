pub mod database;
pub mod log;
pub mod migration;
pub mod report;
pub mod settings;

pub use database::DatabaseConfig;
pub use log::LogConfig;
pub use migration::MigrationConfig;
pub use report::ReportConfig;
pub use settings::Settings;
