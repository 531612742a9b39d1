use async_trait::async_trait;
use sqlx::{Connection, Executor, PgConnection};
use tera::Context;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::errors::{ConnectError, ScriptError};
use crate::postgres::TargetDatabase;
use crate::types::{ForeignKey, QueryOutcome, TableRef};
use crate::utils::{get_query, table_context};

/// SQLSTATE raised when a relation does not exist.
const UNDEFINED_TABLE: &str = "42P01";

impl<T> From<Result<T, sqlx::Error>> for QueryOutcome<T> {
    fn from(result: Result<T, sqlx::Error>) -> Self {
        match result {
            Ok(value) => QueryOutcome::Ok(value),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNDEFINED_TABLE) => {
                QueryOutcome::NotFound
            }
            Err(err) => QueryOutcome::Error(err.to_string()),
        }
    }
}

/// A single PostgreSQL session.
pub struct PgClient {
    conn: PgConnection,
}

impl PgClient {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ConnectError> {
        let options = config.connect_options()?;

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|source| ConnectError::Unreachable {
                host: config.host.clone(),
                port: config.port,
                database: config.name.clone(),
                user: config.user.clone(),
                source,
            })?;

        Ok(Self { conn })
    }

    /// Terminates the session. Errors are logged, never raised.
    pub async fn close(self) {
        if let Err(err) = self.conn.close().await {
            debug!("Failed to close connection cleanly: {}", err);
        }
    }

    fn render(template: &str, context: &Context) -> Result<String, String> {
        let query = get_query(template, context).map_err(|e| format!("{:#}", e))?;
        debug!("Query: {}", query);
        Ok(query)
    }

    async fn scalar<T>(&mut self, template: &str, context: &Context) -> QueryOutcome<T>
    where
        T: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + Unpin,
    {
        let query = match Self::render(template, context) {
            Ok(query) => query,
            Err(detail) => return QueryOutcome::Error(detail),
        };

        sqlx::query_scalar::<_, T>(&query)
            .fetch_one(&mut self.conn)
            .await
            .into()
    }

    async fn names(&mut self, template: &str, table: &TableRef) -> QueryOutcome<Vec<String>> {
        let query = match Self::render(template, &table_context(table, None)) {
            Ok(query) => query,
            Err(detail) => return QueryOutcome::Error(detail),
        };

        sqlx::query_scalar::<_, String>(&query)
            .fetch_all(&mut self.conn)
            .await
            .into()
    }

    async fn exists(&mut self, table: &TableRef, base_only: bool) -> QueryOutcome<bool> {
        let mut context = table_context(table, None);
        context.insert("base_only", &base_only);
        self.scalar("table_exists.sql.jinja", &context).await
    }
}

#[async_trait]
impl TargetDatabase for PgClient {
    async fn server_version(&mut self) -> QueryOutcome<String> {
        sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&mut self.conn)
            .await
            .into()
    }

    async fn table_exists(&mut self, table: &TableRef) -> QueryOutcome<bool> {
        self.exists(table, false).await
    }

    async fn base_table_exists(&mut self, table: &TableRef) -> QueryOutcome<bool> {
        self.exists(table, true).await
    }

    async fn row_count(&mut self, table: &TableRef) -> QueryOutcome<i64> {
        self.scalar("row_count.sql.jinja", &table_context(table, None))
            .await
    }

    async fn column_count(&mut self, table: &TableRef) -> QueryOutcome<i64> {
        self.scalar("column_count.sql.jinja", &table_context(table, None))
            .await
    }

    async fn foreign_keys(&mut self, table: &TableRef) -> QueryOutcome<Vec<ForeignKey>> {
        let query = match Self::render("foreign_keys.sql.jinja", &table_context(table, None)) {
            Ok(query) => query,
            Err(detail) => return QueryOutcome::Error(detail),
        };

        let rows: QueryOutcome<Vec<(String, String, String)>> = sqlx::query_as(&query)
            .fetch_all(&mut self.conn)
            .await
            .into();

        rows.map(|rows| {
            rows.into_iter()
                .map(|(name, table, column)| ForeignKey {
                    name,
                    table,
                    column,
                })
                .collect()
        })
    }

    async fn indexes(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>> {
        self.names("indexes.sql.jinja", table).await
    }

    async fn policies(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>> {
        self.names("policies.sql.jinja", table).await
    }

    async fn triggers(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>> {
        self.names("triggers.sql.jinja", table).await
    }

    async fn null_count(&mut self, table: &TableRef, column: &str) -> QueryOutcome<i64> {
        self.scalar("null_ids.sql.jinja", &table_context(table, Some(column)))
            .await
    }

    async fn duplicate_count(&mut self, table: &TableRef, column: &str) -> QueryOutcome<i64> {
        self.scalar("duplicate_ids.sql.jinja", &table_context(table, Some(column)))
            .await
    }

    async fn execute_script(&mut self, script: &str, commit: bool) -> Result<(), ScriptError> {
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| ScriptError::Begin(e.to_string()))?;

        // Multi-statement scripts need the simple query protocol
        if let Err(err) = (&mut *tx).execute(sqlx::raw_sql(script)).await {
            if let Err(rollback_err) = tx.rollback().await {
                debug!("Rollback after failed script also failed: {}", rollback_err);
            }
            return Err(ScriptError::Execution(err.to_string()));
        }

        if commit {
            tx.commit()
                .await
                .map_err(|e| ScriptError::Finish(e.to_string()))
        } else {
            tx.rollback()
                .await
                .map_err(|e| ScriptError::Finish(e.to_string()))
        }
    }

    async fn reset(&mut self) -> QueryOutcome<()> {
        (&mut self.conn)
            .execute(sqlx::raw_sql("ROLLBACK"))
            .await
            .map(|_| ())
            .into()
    }
}
