//! DELETE statement builder.

use serde::{Deserialize, Serialize};

use crate::error::SqlResult;

use super::super::traits::SqlDialect;
use super::{Filter, Limit, dml_limit_clause, render_filter};

/// A DELETE statement description: target table, optional WHERE, optional
/// LIMIT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub table: String,
    pub filter: Option<Filter>,
    pub limit: Option<Limit>,
}

impl DeleteQuery {
    pub fn new(table: impl Into<String>) -> Self {
        DeleteQuery {
            table: table.into(),
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

/// Generate DELETE SQL.
pub fn build_delete(dialect: &dyn SqlDialect, query: &DeleteQuery) -> SqlResult<String> {
    let where_clause = match &query.filter {
        None => String::new(),
        Some(filter) => format!(" WHERE {}", render_filter(dialect, filter)?),
    };
    let limit_clause = dml_limit_clause(dialect, query.limit.as_ref(), "DELETE")?;

    Ok(format!(
        "DELETE FROM {}{}{}",
        query.table, where_clause, limit_clause
    ))
}
