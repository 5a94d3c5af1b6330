use std::sync::{PoisonError, RwLock};

use crate::ast::{Expr, Operand};
use crate::error::SqlResult;
use crate::schema::{FieldRef, TableDef};

use super::dml::{DeleteQuery, SelectQuery, UpdateQuery, build_delete, build_insert, build_select, build_update};
use super::mysql::MySqlDialect;
use super::postgres::PostgresDialect;
use super::sqlite::SqliteDialect;
use super::traits::{GenericDialect, SqlDialect};
use super::ddl;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Generic,
    Sqlite,
    Postgres,
    MySql,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::Generic
    }
}

impl Dialect {
    pub fn renderer(&self) -> Box<dyn SqlDialect> {
        match self {
            Dialect::Generic => Box::new(GenericDialect),
            Dialect::Sqlite => Box::new(SqliteDialect),
            Dialect::Postgres => Box::new(PostgresDialect),
            Dialect::MySql => Box::new(MySqlDialect),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgresql",
            Dialect::MySql => "mysql",
        }
    }

    /// Render one expression.
    pub fn render_expr(&self, expr: &Expr) -> SqlResult<String> {
        self.renderer().render_expr(expr)
    }

    /// Build a SELECT statement.
    pub fn select(&self, query: &SelectQuery) -> SqlResult<String> {
        build_select(&*self.renderer(), query)
    }

    /// Build an INSERT statement from (field, value) assignments.
    pub fn insert(&self, values: &[(FieldRef, Operand)]) -> SqlResult<String> {
        build_insert(&*self.renderer(), values)
    }

    /// Build an UPDATE statement.
    pub fn update(&self, query: &UpdateQuery) -> SqlResult<String> {
        build_update(&*self.renderer(), query)
    }

    /// Build a DELETE statement.
    pub fn delete(&self, query: &DeleteQuery) -> SqlResult<String> {
        build_delete(&*self.renderer(), query)
    }

    /// Build the CREATE TABLE statement plus any auxiliary statements, in
    /// execution order.
    pub fn create_table(&self, table: &TableDef) -> SqlResult<Vec<String>> {
        ddl::build_create_table(&*self.renderer(), table)
    }

    pub fn drop_table(&self, table: &str) -> String {
        ddl::build_drop_table(&*self.renderer(), table)
    }

    pub fn truncate(&self, table: &str) -> Vec<String> {
        ddl::build_truncate(&*self.renderer(), table)
    }
}

static DEFAULT_DIALECT: RwLock<Dialect> = RwLock::new(Dialect::Generic);

/// Swap the process-wide dialect used by `Display` implementations for debug
/// rendering. Real rendering always takes an explicit dialect.
pub fn set_default_dialect(dialect: Dialect) {
    *DEFAULT_DIALECT
        .write()
        .unwrap_or_else(PoisonError::into_inner) = dialect;
}

/// The process-wide debug-rendering dialect.
pub fn default_dialect() -> Dialect {
    *DEFAULT_DIALECT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}
