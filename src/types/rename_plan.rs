use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::TableRef;

/// The tables involved in a single rename and the script that performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub source: TableRef,
    pub target: TableRef,
    pub backup: TableRef,
    pub id_column: String,
    pub script_path: PathBuf,
}

impl RenamePlan {
    pub fn migration_type(&self) -> String {
        format!("Rename {} to {}", self.source.name, self.target.name)
    }

    /// Manual steps printed in the report. They are never executed.
    pub fn rollback_instructions(&self) -> Vec<String> {
        vec![
            format!("Run: DROP TABLE {} CASCADE;", self.target),
            format!(
                "Run: ALTER TABLE {} RENAME TO {};",
                self.backup, self.source.name
            ),
            "Recreate any dropped objects (triggers, policies, etc.)".to_string(),
        ]
    }
}
