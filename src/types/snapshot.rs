use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::types::TableRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub table: String,
    pub column: String,
}

impl std::fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}.{}", self.name, self.table, self.column)
    }
}

/// Schema and data metadata of one table at a point in time.
///
/// Members are `None` when the table does not exist or when the query that
/// collects them failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub table: TableRef,
    pub exists: bool,
    pub row_count: Option<i64>,
    pub column_count: Option<i64>,
    pub foreign_keys: Option<Vec<ForeignKey>>,
    pub indexes: Option<Vec<String>>,
    pub policies: Option<Vec<String>>,
    pub triggers: Option<Vec<String>>,
}

impl Snapshot {
    pub fn missing(table: TableRef) -> Self {
        Self {
            table,
            exists: false,
            row_count: None,
            column_count: None,
            foreign_keys: None,
            indexes: None,
            policies: None,
            triggers: None,
        }
    }

    /// Number of distinct constraints; multi-column keys list one entry per column.
    /// Constraint names are only unique per table, so the owning table is part
    /// of the key.
    pub fn foreign_key_count(&self) -> Option<usize> {
        self.foreign_keys.as_ref().map(|fks| {
            fks.iter()
                .map(|fk| (fk.table.as_str(), fk.name.as_str()))
                .unique()
                .count()
        })
    }

    pub fn index_count(&self) -> Option<usize> {
        self.indexes.as_ref().map(Vec::len)
    }

    pub fn policy_count(&self) -> Option<usize> {
        self.policies.as_ref().map(Vec::len)
    }

    pub fn trigger_count(&self) -> Option<usize> {
        self.triggers.as_ref().map(Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreMigrationState {
    pub source: Snapshot,
    pub target_exists: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMigrationState {
    pub target: Snapshot,
    pub backup: Snapshot,
    /// Whether the source name still resolves to a base table.
    pub source_still_exists: Option<bool>,
}
