pub mod client;

pub use client::PgClient;

use async_trait::async_trait;

use crate::errors::ScriptError;
use crate::types::{ForeignKey, QueryOutcome, TableRef};

/// Catalog and data access the migration pipeline needs from the target database.
///
/// Every read returns a [`QueryOutcome`]; a query against a relation that does
/// not exist yields `NotFound` rather than an error.
#[async_trait]
pub trait TargetDatabase: Send {
    async fn server_version(&mut self) -> QueryOutcome<String>;

    /// True if a table or view with this name exists.
    async fn table_exists(&mut self, table: &TableRef) -> QueryOutcome<bool>;

    /// True only for ordinary tables; views and other relation kinds are ignored.
    async fn base_table_exists(&mut self, table: &TableRef) -> QueryOutcome<bool>;

    async fn row_count(&mut self, table: &TableRef) -> QueryOutcome<i64>;

    async fn column_count(&mut self, table: &TableRef) -> QueryOutcome<i64>;

    async fn foreign_keys(&mut self, table: &TableRef) -> QueryOutcome<Vec<ForeignKey>>;

    /// Non primary key indexes.
    async fn indexes(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>>;

    async fn policies(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>>;

    async fn triggers(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>>;

    async fn null_count(&mut self, table: &TableRef, column: &str) -> QueryOutcome<i64>;

    /// Number of values of `column` that occur more than once.
    async fn duplicate_count(&mut self, table: &TableRef, column: &str) -> QueryOutcome<i64>;

    /// Runs the whole script inside one transaction.
    ///
    /// The transaction is committed when `commit` is true and the script
    /// succeeded, and rolled back otherwise.
    async fn execute_script(&mut self, script: &str, commit: bool) -> Result<(), ScriptError>;

    /// Clears an aborted transaction state left behind by a failed statement.
    async fn reset(&mut self) -> QueryOutcome<()>;
}
