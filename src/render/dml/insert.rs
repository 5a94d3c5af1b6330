//! INSERT statement builder.

use crate::ast::Operand;
use crate::error::{SqlError, SqlResult};
use crate::schema::FieldRef;

use super::super::traits::SqlDialect;

/// Generate INSERT SQL from (field, value) assignments.
///
/// All fields must come from one table. Autoincrement columns are excluded
/// from the column list even when a value was supplied: the database owns
/// those.
pub fn build_insert(
    dialect: &dyn SqlDialect,
    values: &[(FieldRef, Operand)],
) -> SqlResult<String> {
    if values.is_empty() {
        return Err(SqlError::query("INSERT needs at least one (field, value) pair"));
    }
    let table = &values[0].0.table;
    for (field, _) in values {
        if &field.table != table {
            return Err(SqlError::query(format!(
                "INSERT fields span more than one table: `{}` and `{}`",
                table, field.table
            )));
        }
    }

    let assignable: Vec<&(FieldRef, Operand)> = values
        .iter()
        .filter(|(field, _)| !field.column.autoincrement)
        .collect();
    if assignable.is_empty() {
        return Err(SqlError::query(format!(
            "INSERT into `{}` has no insertable columns",
            table
        )));
    }

    let columns: Vec<&str> = assignable
        .iter()
        .map(|(field, _)| field.column.name.as_str())
        .collect();
    let rendered: Vec<String> = assignable
        .iter()
        .map(|(field, value)| dialect.render(value, Some(field)))
        .collect::<SqlResult<_>>()?;

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}){}",
        table,
        columns.join(", "),
        rendered.join(", "),
        dialect.insert_suffix()
    ))
}
