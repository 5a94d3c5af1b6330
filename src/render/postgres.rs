//! PostgreSQL dialect.
//!
//! PostgreSQL has native types for almost everything the generic baseline
//! fakes with integers: BOOLEAN, DATE, DECIMAL and a microsecond-precision
//! timestamp. Autoincrement integers become SERIAL/BIGSERIAL and INSERT
//! grows a `RETURNING id` clause.

use crate::ast::Value;
use crate::error::{SqlError, SqlResult};
use crate::schema::{Column, ColumnType, IndexKind, TableDef};

use super::traits::{SqlDialect, index_column_sql, int_byte_width};

pub struct PostgresDialect;

const PG_INT_WIDTHS: &[(u32, &str)] = &[(2, "SMALLINT"), (4, "INTEGER"), (8, "BIGINT")];

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    /// Column comments are emitted as COMMENT ON COLUMN statements, not
    /// inline.
    fn declare_suffix(&self, column: &Column) -> SqlResult<String> {
        let mut sql = String::new();
        if !column.nullable {
            sql.push_str(" NOT");
        }
        sql.push_str(" NULL");
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_value(default, None)?);
        }
        Ok(sql)
    }

    fn declare_int(&self, column: &Column) -> SqlResult<String> {
        let digits = column.precision.ok_or_else(|| {
            SqlError::query(format!("INT column `{}` needs a precision", column.name))
        })?;
        let bytes = int_byte_width(digits, &column.name)?;
        let mut keyword = "BIGINT";
        for (width, candidate) in PG_INT_WIDTHS {
            if bytes <= *width {
                keyword = candidate;
                break;
            }
        }
        if column.autoincrement {
            return Ok(if keyword == "BIGINT" { "BIGSERIAL" } else { "SERIAL" }.to_string());
        }
        Ok(format!("{}{}", keyword, self.declare_suffix(column)?))
    }

    fn declare_bool(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("BOOLEAN{}", self.declare_suffix(column)?))
    }

    fn declare_datetime(&self, column: &Column) -> SqlResult<String> {
        Ok(format!(
            "timestamp(6) without time zone{}",
            self.declare_suffix(column)?
        ))
    }

    fn encode_bool(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Bool(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Bool,
                "expected a boolean",
            )),
        }
    }

    fn decode_bool(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::Int(n) => Ok(Value::Bool(n != 0)),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Bool,
                "expected a boolean",
            )),
        }
    }

    fn encode_datetime(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::DateTime(dt) => {
                Ok(format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.6f")))
            }
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::DateTime,
                "expected a datetime",
            )),
        }
    }

    /// The driver already hands back a native timestamp.
    fn decode_datetime(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::DateTime(dt) => Ok(Value::DateTime(dt)),
            Value::Str(s) => {
                chrono::NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                    .map(Value::DateTime)
                    .map_err(|e| SqlError::decoding(s, ColumnType::DateTime, e.to_string()))
            }
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::DateTime,
                "expected a timestamp",
            )),
        }
    }

    /// Only the primary key goes inside CREATE TABLE, without sort orders.
    fn create_table_inline_indexes(&self, table: &TableDef) -> SqlResult<Vec<String>> {
        let mut clauses = Vec::new();
        for index in &table.indexes {
            if index.kind != IndexKind::Primary {
                continue;
            }
            let columns: Vec<String> = index
                .columns
                .iter()
                .map(|c| index_column_sql(c, false))
                .collect();
            clauses.push(format!("PRIMARY KEY ({})", columns.join(", ")));
        }
        Ok(clauses)
    }

    /// Secondary indexes and column comments follow as separate statements.
    fn create_table_aux_statements(&self, table: &TableDef) -> SqlResult<Vec<String>> {
        let mut statements = Vec::new();
        for index in &table.indexes {
            let kind = match index.kind {
                IndexKind::Primary => continue,
                IndexKind::Unique => "UNIQUE INDEX",
                IndexKind::Plain => "INDEX",
            };
            let columns: Vec<String> = index
                .columns
                .iter()
                .map(|c| format!("{} {}", c.name, c.sort.as_sql()))
                .collect();
            statements.push(format!(
                "CREATE {} {} ON {} ({})",
                kind,
                index.name,
                table.name,
                columns.join(", ")
            ));
        }
        for column in &table.columns {
            if !column.comment.is_empty() {
                statements.push(format!(
                    "COMMENT ON COLUMN {}.{} IS {}",
                    table.name,
                    column.name,
                    self.escape(&column.comment)
                ));
            }
        }
        Ok(statements)
    }

    fn insert_suffix(&self) -> &'static str {
        " RETURNING id"
    }

    fn supports_distinct_on(&self) -> bool {
        true
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", table)
    }
}
