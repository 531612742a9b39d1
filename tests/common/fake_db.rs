use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use retable::{
    errors::ScriptError,
    postgres::TargetDatabase,
    types::{ForeignKey, QueryOutcome, RenamePlan, TableRef},
};

#[derive(Debug, Clone, Default)]
pub struct FakeTable {
    pub rows: i64,
    pub columns: i64,
    pub foreign_keys: Vec<ForeignKey>,
    pub indexes: Vec<String>,
    pub policies: Vec<String>,
    pub triggers: Vec<String>,
    pub null_ids: i64,
    pub duplicate_ids: i64,
    pub is_view: bool,
}

/// In-memory catalog that behaves like a PostgreSQL session for the pipeline.
///
/// Executing a script applies the rename described by the plan: the source
/// is copied to the backup (data only), then renamed to the target carrying
/// its keys, indexes, policies and triggers along.
///
/// Like a session inside a transaction, a query against a missing relation
/// poisons the session until `reset` is called.
pub struct FakeDatabase {
    plan: RenamePlan,
    tables: BTreeMap<TableRef, FakeTable>,
    failing_queries: HashSet<(&'static str, TableRef)>,
    script_error: Option<String>,
    poisoned: bool,

    pub scripts_executed: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub resets: usize,
}

impl FakeDatabase {
    pub fn new(plan: &RenamePlan) -> Self {
        Self {
            plan: plan.clone(),
            tables: BTreeMap::new(),
            failing_queries: HashSet::new(),
            script_error: None,
            poisoned: false,
            scripts_executed: 0,
            commits: 0,
            rollbacks: 0,
            resets: 0,
        }
    }

    /// 42 licenses, 6 foreign keys (4 declared, 2 referencing), 5 indexes,
    /// 2 policies and 3 triggers.
    pub fn with_licenses(plan: &RenamePlan) -> Self {
        let source = &plan.source.name;
        let fk = |name: &str, table: &str, column: &str| ForeignKey {
            name: name.to_string(),
            table: table.to_string(),
            column: column.to_string(),
        };

        let table = FakeTable {
            rows: 42,
            columns: 14,
            foreign_keys: vec![
                fk("fk_licenses_organization", source, "organization_id"),
                fk("fk_licenses_vendor", source, "vendor_id"),
                fk("fk_licenses_owner", source, "owner_id"),
                fk("fk_licenses_contract", source, "contract_id"),
                // composite key, still one constraint
                fk("fk_licenses_contract", source, "organization_id"),
                fk("fk_assignments_license", "license_assignments", "license_id"),
                fk("fk_renewals_license", "license_renewals", "license_id"),
            ],
            indexes: vec![
                "idx_licenses_organization".to_string(),
                "idx_licenses_vendor".to_string(),
                "idx_licenses_owner".to_string(),
                "idx_licenses_renewal_date".to_string(),
                "idx_licenses_status".to_string(),
            ],
            policies: vec![
                "licenses_tenant_isolation".to_string(),
                "licenses_admin_all".to_string(),
            ],
            triggers: vec![
                "trg_licenses_updated_at".to_string(),
                "trg_licenses_audit".to_string(),
                "trg_licenses_search".to_string(),
            ],
            ..Default::default()
        };

        Self::new(plan).with_table(&plan.source, table)
    }

    pub fn with_table(mut self, table: &TableRef, contents: FakeTable) -> Self {
        self.tables.insert(table.clone(), contents);
        self
    }

    /// Makes one kind of query (`row_count`, `indexes`, ...) fail for one table.
    pub fn failing(mut self, query: &'static str, table: &TableRef) -> Self {
        self.failing_queries.insert((query, table.clone()));
        self
    }

    pub fn failing_script(mut self, message: &str) -> Self {
        self.script_error = Some(message.to_string());
        self
    }

    pub fn table(&self, table: &TableRef) -> Option<&FakeTable> {
        self.tables.get(table)
    }

    pub fn table_mut(&mut self, table: &TableRef) -> Option<&mut FakeTable> {
        self.tables.get_mut(table)
    }

    fn guard<T>(&self, query: &'static str, table: &TableRef) -> Option<QueryOutcome<T>> {
        if self.poisoned {
            return Some(QueryOutcome::Error(
                "current transaction is aborted, commands ignored until end of transaction block"
                    .to_string(),
            ));
        }
        if self.failing_queries.contains(&(query, table.clone())) {
            return Some(QueryOutcome::Error(format!(
                "injected failure: {} on {}",
                query, table
            )));
        }
        None
    }

    fn catalog<T>(
        &self,
        query: &'static str,
        table: &TableRef,
        read: impl FnOnce(&FakeTable) -> T,
        missing: T,
    ) -> QueryOutcome<T> {
        if let Some(outcome) = self.guard(query, table) {
            return outcome;
        }
        QueryOutcome::Ok(self.tables.get(table).map(read).unwrap_or(missing))
    }

    fn data<T>(
        &mut self,
        query: &'static str,
        table: &TableRef,
        read: impl FnOnce(&FakeTable) -> T,
    ) -> QueryOutcome<T> {
        if let Some(outcome) = self.guard(query, table) {
            return outcome;
        }
        match self.tables.get(table) {
            Some(contents) => QueryOutcome::Ok(read(contents)),
            None => {
                self.poisoned = true;
                QueryOutcome::NotFound
            }
        }
    }

    fn apply_rename(&self) -> Result<BTreeMap<TableRef, FakeTable>, String> {
        let RenamePlan {
            source,
            target,
            backup,
            ..
        } = &self.plan;

        let mut tables = self.tables.clone();
        if tables.contains_key(target) {
            return Err(format!("relation \"{}\" already exists", target.name));
        }
        let mut renamed = tables
            .remove(source)
            .ok_or_else(|| format!("relation \"{}\" does not exist", source.name))?;

        tables.insert(
            backup.clone(),
            FakeTable {
                rows: renamed.rows,
                columns: renamed.columns,
                ..Default::default()
            },
        );

        for fk in renamed.foreign_keys.iter_mut() {
            if fk.table == source.name {
                fk.table = target.name.clone();
            }
        }
        tables.insert(target.clone(), renamed);

        Ok(tables)
    }
}

#[async_trait]
impl TargetDatabase for FakeDatabase {
    async fn server_version(&mut self) -> QueryOutcome<String> {
        QueryOutcome::Ok("PostgreSQL 16.4 (fake)".to_string())
    }

    async fn table_exists(&mut self, table: &TableRef) -> QueryOutcome<bool> {
        self.catalog("table_exists", table, |_| true, false)
    }

    async fn base_table_exists(&mut self, table: &TableRef) -> QueryOutcome<bool> {
        self.catalog("base_table_exists", table, |t| !t.is_view, false)
    }

    async fn row_count(&mut self, table: &TableRef) -> QueryOutcome<i64> {
        self.data("row_count", table, |t| t.rows)
    }

    async fn column_count(&mut self, table: &TableRef) -> QueryOutcome<i64> {
        self.catalog("column_count", table, |t| t.columns, 0)
    }

    async fn foreign_keys(&mut self, table: &TableRef) -> QueryOutcome<Vec<ForeignKey>> {
        self.catalog("foreign_keys", table, |t| t.foreign_keys.clone(), vec![])
    }

    async fn indexes(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>> {
        self.catalog("indexes", table, |t| t.indexes.clone(), vec![])
    }

    async fn policies(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>> {
        self.catalog("policies", table, |t| t.policies.clone(), vec![])
    }

    async fn triggers(&mut self, table: &TableRef) -> QueryOutcome<Vec<String>> {
        self.catalog("triggers", table, |t| t.triggers.clone(), vec![])
    }

    async fn null_count(&mut self, table: &TableRef, _column: &str) -> QueryOutcome<i64> {
        self.data("null_count", table, |t| t.null_ids)
    }

    async fn duplicate_count(&mut self, table: &TableRef, _column: &str) -> QueryOutcome<i64> {
        self.data("duplicate_count", table, |t| t.duplicate_ids)
    }

    async fn execute_script(&mut self, _script: &str, commit: bool) -> Result<(), ScriptError> {
        self.scripts_executed += 1;

        let applied = match &self.script_error {
            Some(message) => Err(message.clone()),
            None => self.apply_rename(),
        };

        match applied {
            Ok(tables) if commit => {
                self.tables = tables;
                self.commits += 1;
                Ok(())
            }
            Ok(_) => {
                self.rollbacks += 1;
                Ok(())
            }
            Err(message) => {
                self.rollbacks += 1;
                Err(ScriptError::Execution(message))
            }
        }
    }

    async fn reset(&mut self) -> QueryOutcome<()> {
        self.resets += 1;
        self.poisoned = false;
        QueryOutcome::Ok(())
    }
}
