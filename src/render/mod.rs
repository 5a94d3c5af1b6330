//! Multi-dialect SQL rendering: the dialect trait, the four dialects, and
//! the DDL/DML statement builders.

pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod mysql;
pub mod postgres;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod tests;

pub use dialect::{Dialect, default_dialect, set_default_dialect};
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use traits::{GenericDialect, SqlDialect};
