use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{RenamePlan, TableRef};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MigrationConfig {
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_source_table")]
    pub source_table: String,

    #[serde(default = "default_target_table")]
    pub target_table: String,

    #[serde(default = "default_backup_table")]
    pub backup_table: String,

    #[serde(default = "default_id_column")]
    pub id_column: String,

    #[serde(default = "default_script_path")]
    pub script_path: PathBuf,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            source_table: default_source_table(),
            target_table: default_target_table(),
            backup_table: default_backup_table(),
            id_column: default_id_column(),
            script_path: default_script_path(),
        }
    }
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_source_table() -> String {
    "software_licenses".to_string()
}

fn default_target_table() -> String {
    "accounts".to_string()
}

fn default_backup_table() -> String {
    "software_licenses_backup".to_string()
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_script_path() -> PathBuf {
    PathBuf::from("./scripts/migration_software_licenses_to_accounts.sql")
}

impl MigrationConfig {
    /// Builds the rename plan, optionally overriding the configured script path.
    pub fn to_plan(&self, script_path: Option<PathBuf>) -> RenamePlan {
        RenamePlan {
            source: TableRef::new(&self.schema, &self.source_table),
            target: TableRef::new(&self.schema, &self.target_table),
            backup: TableRef::new(&self.schema, &self.backup_table),
            id_column: self.id_column.clone(),
            script_path: script_path.unwrap_or_else(|| self.script_path.clone()),
        }
    }
}
