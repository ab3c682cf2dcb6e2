use std::collections::HashSet;

use crate::domain::persistence::Persistence;
use crate::domain::tables::{Column, Index, Table, workflow_tables};

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

pub struct CreateTableStep {
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        Self { ddls }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &'static str {
        "CREATE TABLE"
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

/// Brings database schema in line with the tables the workflow needs.
/// Existing tables are left untouched.
pub struct Migration<P: Persistence> {
    persistence: P,
}

impl<P: Persistence> Migration<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    pub async fn migrate(&self) -> Result<usize, anyhow::Error> {
        let existing = self.persistence.load().await?;
        let steps = migration_steps(
            self.persistence.database_schema(),
            &workflow_tables(),
            &existing,
        );

        let count = steps.len();
        self.persistence.apply_migration_steps(steps).await?;
        Ok(count)
    }
}

pub fn migration_steps(
    database_schema: &str,
    needed: &[Table],
    existing: &HashSet<String>,
) -> Vec<CreateTableStep> {
    needed
        .iter()
        .filter(|table| !existing.contains(&table.name))
        .map(|table| CreateTableStep::new(database_schema, table))
        .collect()
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(format!("\"{}\"", column.name));
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(",");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    if let Some(check) = &column.check {
        sql.push_str(format!(" CHECK ({})", check).as_str());
    }
    sql
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    let columns_sql = index
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!(
        "CREATE {}INDEX \"{}\" ON \"{}\".\"{}\" ({})",
        if index.unique { "UNIQUE " } else { "" },
        index.name,
        schema,
        index.table_name,
        columns_sql
    );
    if let Some(predicate) = &index.predicate {
        sql.push_str(format!(" WHERE {}", predicate).as_str());
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ddls_for(name: &str) -> Vec<String> {
        let tables = workflow_tables();
        let table = tables.iter().find(|t| t.name == name).unwrap();
        create_table_ddl("workflow", table)
    }

    #[test]
    fn test_only_missing_tables_are_created() {
        let existing = HashSet::from(["entries".to_string()]);
        let steps = migration_steps("workflow", &workflow_tables(), &existing);
        assert_eq!(steps.len(), 2);

        let ddls = steps.into_iter().flat_map(|s| s.ddls()).collect::<Vec<_>>();
        assert!(ddls.iter().all(|ddl| !ddl.contains("\"workflow\".\"entries\" (")));
    }

    #[test]
    fn test_nothing_to_do() {
        let existing = workflow_tables().into_iter().map(|t| t.name).collect::<HashSet<_>>();
        assert!(migration_steps("workflow", &workflow_tables(), &existing).is_empty());
    }

    #[test]
    fn test_entries_composite_key() {
        let ddls = ddls_for("entries");
        assert!(ddls[0].starts_with("CREATE TABLE \"workflow\".\"entries\""));
        assert!(ddls[0].contains("PRIMARY KEY(\"owner_id\",\"site_id\",\"draft_id\")"));
        assert!(ddls[0].contains("\"fields\" JSONB NOT NULL DEFAULT '{}'::jsonb"));
    }

    #[test]
    fn test_single_active_submission_index() {
        let ddls = ddls_for("submissions");
        assert!(ddls[0].contains("\"status\" TEXT NOT NULL CHECK (status IN ('submitted', 'approved', 'rejected'))"));
        assert!(ddls.contains(
            &"CREATE UNIQUE INDEX \"submissions_owner_id_owner_site_id_draft_id_active_idx\" ON \"workflow\".\"submissions\" (\"owner_id\", \"owner_site_id\", \"draft_id\") WHERE status = 'submitted'"
                .to_string()
        ));
    }
}
