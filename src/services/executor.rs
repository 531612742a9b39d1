use std::path::Path;

use crate::errors::ScriptError;
use crate::postgres::TargetDatabase;
use crate::utils::RunContext;

/// Reads the migration script, rejecting missing and blank files.
pub async fn load_script(path: &Path) -> Result<String, ScriptError> {
    let script = match tokio::fs::read_to_string(path).await {
        Ok(script) => script,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScriptError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ScriptError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if script.trim().is_empty() {
        return Err(ScriptError::Empty(path.to_path_buf()));
    }

    Ok(script)
}

/// True if a line of the script ends or opens a transaction on its own.
pub fn has_transaction_control(script: &str) -> bool {
    script.lines().any(|line| {
        let statement = line
            .split("--")
            .next()
            .unwrap_or_default()
            .trim()
            .trim_end_matches(';')
            .trim()
            .to_uppercase();
        matches!(
            statement.as_str(),
            "BEGIN" | "BEGIN TRANSACTION" | "START TRANSACTION" | "COMMIT" | "END" | "ROLLBACK"
        )
    })
}

pub struct MigrationExecutor<'a, D: TargetDatabase + ?Sized> {
    db: &'a mut D,
}

impl<'a, D: TargetDatabase + ?Sized> MigrationExecutor<'a, D> {
    pub fn new(db: &'a mut D) -> Self {
        Self { db }
    }

    /// Loads and runs the script in a single transaction.
    ///
    /// In a dry run the transaction is rolled back after the script succeeds.
    /// Failures are logged and recorded as issues before being returned.
    pub async fn execute(&mut self, path: &Path, ctx: &mut RunContext) -> Result<(), ScriptError> {
        ctx.info("Starting migration execution...");

        let result = self.run(path, ctx).await;
        match &result {
            Ok(()) if ctx.is_dry_run() => {
                ctx.success("Migration script executed successfully and rolled back (dry run)")
            }
            Ok(()) => ctx.success("Migration script executed successfully"),
            Err(err) => {
                ctx.error(err.to_string());
                ctx.issue(err.to_string());
            }
        }
        result
    }

    async fn run(&mut self, path: &Path, ctx: &mut RunContext) -> Result<(), ScriptError> {
        let script = load_script(path).await?;
        ctx.info(format!(
            "Loaded migration script {} ({} bytes)",
            path.display(),
            script.len()
        ));
        if has_transaction_control(&script) {
            ctx.warning(
                "Migration script contains its own transaction control; it runs inside the executor's transaction",
            );
        }

        self.db.execute_script(&script, !ctx.is_dry_run()).await
    }
}
