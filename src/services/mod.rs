pub mod collector;
pub mod executor;
pub mod migration_service;
pub mod pipeline;
pub mod validator;

pub use collector::StateCollector;
pub use executor::{MigrationExecutor, load_script};
pub use migration_service::MigrationService;
pub use pipeline::run_pipeline;
pub use validator::{Check, Validator, checklist};
