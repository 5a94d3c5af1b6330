//! SQLite dialect.
//!
//! SQLite has a tiny native type system, so most logical types land in an
//! INTEGER column: dates as days since the Unix epoch, datetimes as
//! microseconds, decimals as value * 10^scale, booleans as 0/1.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::ast::Value;
use crate::error::{SqlError, SqlResult};
use crate::schema::{Column, ColumnType, IndexKind, TableDef};

use super::traits::{SqlDialect, index_column_sql, int_byte_width};

pub struct SqliteDialect;

/// Scale factor for decimal storage, bounded by what `Decimal` can carry.
fn decimal_factor(column: &Column) -> SqlResult<(u32, Decimal)> {
    let scale = column.scale.unwrap_or(0);
    let factor = if scale <= 19 {
        10u64.pow(scale)
    } else {
        return Err(SqlError::query(format!(
            "DECIMAL column `{}` scale {} is too large for scaled-integer storage",
            column.name, scale
        )));
    };
    Ok((scale, Decimal::from(factor)))
}

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    /// All integer widths map to the single INTEGER type; the precision is
    /// still validated against the 8-byte range.
    fn declare_int(&self, column: &Column) -> SqlResult<String> {
        let digits = column.precision.ok_or_else(|| {
            SqlError::query(format!("INT column `{}` needs a precision", column.name))
        })?;
        int_byte_width(digits, &column.name)?;
        Ok("INTEGER".to_string())
    }

    fn declare_char(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("TEXT{}", self.declare_suffix(column)?))
    }

    /// Dates are stored as the integer number of days since 1970-01-01.
    fn declare_date(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("INTEGER{}", self.declare_suffix(column)?))
    }

    /// Decimals are stored as value * 10^scale integers.
    fn declare_decimal(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("INTEGER{}", self.declare_suffix(column)?))
    }

    fn encode_date(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Date(d) => Ok((*d - NaiveDate::default()).num_days().to_string()),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Date,
                "expected a date",
            )),
        }
    }

    fn decode_date(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Int(days) => Duration::try_days(days)
                .and_then(|d| NaiveDate::default().checked_add_signed(d))
                .map(Value::Date)
                .ok_or_else(|| {
                    SqlError::decoding(days, ColumnType::Date, "day count out of range")
                }),
            Value::Date(d) => Ok(Value::Date(d)),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Date,
                "expected a day count",
            )),
        }
    }

    fn encode_decimal(&self, value: &Value, column: &Column) -> SqlResult<String> {
        let d = match value {
            Value::Decimal(d) => *d,
            other => {
                return Err(SqlError::encoding(
                    other.plain_text(),
                    ColumnType::Decimal,
                    "expected a decimal",
                ));
            }
        };
        let (scale, factor) = decimal_factor(column)?;
        let scaled = d.checked_mul(factor).ok_or_else(|| {
            SqlError::encoding(d, ColumnType::Decimal, "value overflows scaled storage")
        })?;
        if !scaled.fract().is_zero() {
            return Err(SqlError::encoding(
                d,
                ColumnType::Decimal,
                format!("more fractional digits than the column scale {}", scale),
            ));
        }
        Ok(scaled.trunc().to_string())
    }

    fn decode_decimal(&self, raw: Value, column: &Column) -> SqlResult<Value> {
        let (scale, factor) = decimal_factor(column)?;
        match raw {
            Value::Int(n) => Ok(Value::Decimal(Decimal::new(n, scale))),
            Value::Str(s) => s
                .parse::<i64>()
                .map(|n| Value::Decimal(Decimal::new(n, scale)))
                .map_err(|e| SqlError::decoding(s, ColumnType::Decimal, e.to_string())),
            Value::Decimal(d) => d
                .checked_div(factor)
                .map(Value::Decimal)
                .ok_or_else(|| {
                    SqlError::decoding(d, ColumnType::Decimal, "cannot unscale value")
                }),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Decimal,
                "expected a scaled integer",
            )),
        }
    }

    /// Only the primary key goes inside CREATE TABLE.
    fn create_table_inline_indexes(&self, table: &TableDef) -> SqlResult<Vec<String>> {
        let mut clauses = Vec::new();
        for index in &table.indexes {
            if index.kind != IndexKind::Primary {
                continue;
            }
            let columns: Vec<String> = index
                .columns
                .iter()
                .map(|c| index_column_sql(c, true))
                .collect();
            clauses.push(format!("PRIMARY KEY ({})", columns.join(", ")));
        }
        Ok(clauses)
    }

    /// Everything else becomes a separate CREATE INDEX statement.
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
                "CREATE {} \"{}\" ON \"{}\" ({})",
                kind,
                index.name,
                table.name,
                columns.join(", ")
            ));
        }
        Ok(statements)
    }

    fn supports_dml_limit(&self) -> bool {
        true
    }

    /// SQLite has no TRUNCATE; delete all rows and reset the rowid sequence.
    fn truncate_sql(&self, table: &str) -> Vec<String> {
        vec![
            format!("DELETE FROM {}", table),
            format!("DELETE FROM sqlite_sequence WHERE name='{}'", table),
        ]
    }
}
