//! Schema statements: CREATE TABLE (with its auxiliary index and comment
//! statements), DROP TABLE and TRUNCATE.

use crate::error::{SqlError, SqlResult};
use crate::schema::{ColumnType, IndexKind, TableDef};

use super::traits::SqlDialect;

/// Build the CREATE TABLE statement for `table`, followed by any statements
/// the dialect cannot express inline (secondary indexes, column comments).
/// The returned list is in execution order, table first.
pub fn build_create_table(dialect: &dyn SqlDialect, table: &TableDef) -> SqlResult<Vec<String>> {
    if table.columns.is_empty() {
        return Err(SqlError::query(format!(
            "table `{}` has no columns",
            table.name
        )));
    }
    for column in &table.columns {
        if !column.autoincrement {
            continue;
        }
        if column.ty != ColumnType::Int {
            return Err(SqlError::query(format!(
                "autoincrement column `{}` must be an INT column",
                column.name
            )));
        }
        let in_primary = table.indexes.iter().any(|index| {
            index.kind == IndexKind::Primary
                && index.columns.iter().any(|ic| ic.name == column.name)
        });
        if !in_primary {
            return Err(SqlError::query(format!(
                "autoincrement column `{}` must be part of a primary index",
                column.name
            )));
        }
    }

    let mut defs = Vec::new();
    for column in &table.columns {
        defs.push(format!("{} {}", column.name, dialect.declare_type(column)?));
    }
    defs.extend(dialect.create_table_inline_indexes(table)?);

    let mut statement = format!("CREATE TABLE {} (\n  {}\n)", table.name, defs.join(",\n  "));
    let options = dialect.create_table_options(table);
    if !options.is_empty() {
        statement.push(' ');
        statement.push_str(&options);
    }

    let mut statements = vec![statement];
    statements.extend(dialect.create_table_aux_statements(table)?);
    Ok(statements)
}

pub fn build_drop_table(dialect: &dyn SqlDialect, table: &str) -> String {
    dialect.drop_table_sql(table)
}

pub fn build_truncate(dialect: &dyn SqlDialect, table: &str) -> Vec<String> {
    dialect.truncate_sql(table)
}
