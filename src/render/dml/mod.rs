//! DML statement builders: SELECT, INSERT, UPDATE, DELETE.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::{DeleteQuery, build_delete};
pub use insert::build_insert;
pub use select::{Distinct, OrderBy, SelectQuery, Source, build_select};
pub use update::{UpdateQuery, build_update};

use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Value};
use crate::error::{SqlError, SqlResult};

use super::traits::SqlDialect;

/// The WHERE shape: an expression tree, a raw SQL fragment, or ordered
/// column = value equality pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Expr(Expr),
    Sql(String),
    Pairs(Vec<(String, Value)>),
}

impl From<Expr> for Filter {
    fn from(e: Expr) -> Self {
        Filter::Expr(e)
    }
}

impl From<&Expr> for Filter {
    fn from(e: &Expr) -> Self {
        Filter::Expr(e.clone())
    }
}

impl From<&str> for Filter {
    fn from(sql: &str) -> Self {
        Filter::Sql(sql.to_string())
    }
}

/// LIMIT as a plain count or an (offset, count) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Limit {
    Count(u64),
    OffsetCount(u64, u64),
}

impl From<u64> for Limit {
    fn from(count: u64) -> Self {
        Limit::Count(count)
    }
}

impl From<(u64, u64)> for Limit {
    fn from((offset, count): (u64, u64)) -> Self {
        Limit::OffsetCount(offset, count)
    }
}

pub(crate) fn render_filter(dialect: &dyn SqlDialect, filter: &Filter) -> SqlResult<String> {
    match filter {
        Filter::Expr(e) => dialect.render_expr(e),
        Filter::Sql(sql) => Ok(sql.clone()),
        Filter::Pairs(pairs) => {
            if pairs.is_empty() {
                return Err(SqlError::query("empty column = value filter"));
            }
            let parts: Vec<String> = pairs
                .iter()
                .map(|(column, value)| {
                    Ok(format!("({} = {})", column, dialect.render_value(value, None)?))
                })
                .collect::<SqlResult<_>>()?;
            Ok(parts.join(" AND "))
        }
    }
}

/// ` LIMIT n` for UPDATE/DELETE on dialects whose SQL accepts it; nothing on
/// the rest. The (offset, count) form never applies to DML.
pub(crate) fn dml_limit_clause(
    dialect: &dyn SqlDialect,
    limit: Option<&Limit>,
    statement: &str,
) -> SqlResult<String> {
    match limit {
        Some(Limit::OffsetCount(_, _)) => Err(SqlError::query(format!(
            "{} LIMIT takes a plain count, not (offset, count)",
            statement
        ))),
        Some(limit @ Limit::Count(_)) if dialect.supports_dml_limit() => {
            Ok(dialect.limit_clause(Some(limit)))
        }
        _ => Ok(String::new()),
    }
}
