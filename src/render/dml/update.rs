//! UPDATE statement builder.

use serde::{Deserialize, Serialize};

use crate::ast::Operand;
use crate::error::{SqlError, SqlResult};
use crate::schema::FieldRef;

use super::super::traits::SqlDialect;
use super::{Filter, Limit, dml_limit_clause, render_filter};

/// An UPDATE statement description: assignments, optional WHERE, optional
/// LIMIT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuery {
    pub values: Vec<(FieldRef, Operand)>,
    pub filter: Option<Filter>,
    pub limit: Option<Limit>,
}

impl UpdateQuery {
    pub fn new(values: impl IntoIterator<Item = (FieldRef, Operand)>) -> Self {
        UpdateQuery {
            values: values.into_iter().collect(),
            filter: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

/// Generate UPDATE SQL. Values may be plain literals or expressions over the
/// updated table (`price = (price + 1)`).
pub fn build_update(dialect: &dyn SqlDialect, query: &UpdateQuery) -> SqlResult<String> {
    if query.values.is_empty() {
        return Err(SqlError::query("UPDATE needs at least one (field, value) pair"));
    }
    let table = &query.values[0].0.table;
    for (field, _) in &query.values {
        if &field.table != table {
            return Err(SqlError::query(format!(
                "UPDATE fields span more than one table: `{}` and `{}`",
                table, field.table
            )));
        }
    }

    let assignments: Vec<String> = query
        .values
        .iter()
        .map(|(field, value)| {
            Ok(format!(
                "{} = {}",
                field.column.name,
                dialect.render(value, Some(field))?
            ))
        })
        .collect::<SqlResult<_>>()?;

    let where_clause = match &query.filter {
        None => String::new(),
        Some(filter) => format!(" WHERE {}", render_filter(dialect, filter)?),
    };
    let limit_clause = dml_limit_clause(dialect, query.limit.as_ref(), "UPDATE")?;

    Ok(format!(
        "UPDATE {} SET {}{}{}",
        table,
        assignments.join(", "),
        where_clause,
        limit_clause
    ))
}
