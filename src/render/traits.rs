//! The dialect trait. Default method bodies implement the generic SQL-92
//! baseline; concrete dialects override only the methods where they diverge.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::DateTime;

use crate::ast::{Expr, ExprOp, Operand, Value};
use crate::error::{SqlError, SqlResult};
use crate::schema::{Column, ColumnType, FieldRef, IndexColumn, IndexKind, TableDef};

use super::dml::Limit;

/// Integer keyword per storage width in bytes, smallest first.
const GENERIC_INT_WIDTHS: &[(u32, &str)] = &[
    (1, "TINYINT"),
    (2, "SMALLINT"),
    (3, "MEDIUMINT"),
    (4, "INT"),
    (8, "BIGINT"),
];

/// Storage width in bytes of a signed integer holding `10^digits - 1`.
pub(crate) fn int_byte_width(digits: u32, column_name: &str) -> SqlResult<u32> {
    let too_big = || {
        SqlError::query(format!(
            "INT column `{}` precision {} exceeds the 8-byte integer range",
            column_name, digits
        ))
    };
    let max = 10u128
        .checked_pow(digits)
        .and_then(|p| p.checked_sub(1))
        .ok_or_else(too_big)?;
    let bits = 128 - max.leading_zeros();
    // one bit reserved for the sign
    let bytes = (bits + 6) / 8;
    if bytes > 8 { Err(too_big()) } else { Ok(bytes) }
}

/// `name(prefix) SORT` fragment of an index column.
pub(crate) fn index_column_sql(column: &IndexColumn, with_sort: bool) -> String {
    let mut sql = column.name.clone();
    if let Some(length) = column.prefix_length {
        sql.push_str(&format!("({})", length));
    }
    if with_sort {
        sql.push(' ');
        sql.push_str(column.sort.as_sql());
    }
    sql
}

fn operands<'a>(expr: &'a Expr) -> SqlResult<(&'a Operand, &'a Operand)> {
    match (&expr.left, &expr.right) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(SqlError::query(format!(
            "{} expression needs two operands",
            expr.op.name()
        ))),
    }
}

fn left_operand<'a>(expr: &'a Expr) -> SqlResult<&'a Operand> {
    expr.left.as_ref().ok_or_else(|| {
        SqlError::query(format!("{} expression needs an operand", expr.op.name()))
    })
}

/// SQL rendering rules for one database product.
///
/// Stateless: one instance serves any number of renders. Every operation tag
/// and every column type is handled by an exhaustive `match` in
/// [`render_expr`](SqlDialect::render_expr) /
/// [`declare_type`](SqlDialect::declare_type), so a missing hook is a
/// compile error rather than a runtime fallback.
pub trait SqlDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    // ---- rendering entry points --------------------------------------

    /// Render any operand. `cast` is the column whose declared type governs
    /// literal encoding; expressions ignore it and render themselves.
    fn render(&self, operand: &Operand, cast: Option<&FieldRef>) -> SqlResult<String> {
        match operand {
            Operand::Expr(e) => self.render_expr(e),
            Operand::Field(f) => Ok(f.qualified()),
            Operand::Value(v) => self.render_value(v, cast),
            Operand::List(_) => Err(SqlError::query(
                "an operand list can only appear inside IN or CONCAT",
            )),
        }
    }

    /// Render an expression node by dispatching on its operation.
    fn render_expr(&self, expr: &Expr) -> SqlResult<String> {
        match &expr.op {
            ExprOp::Raw(token) => Ok(token.clone()),
            ExprOp::Field => match &expr.left {
                Some(Operand::Field(f)) => Ok(f.qualified()),
                _ => Err(SqlError::query("field expression without a column reference")),
            },
            ExprOp::And => {
                let (l, r) = operands(expr)?;
                self.op_and(l, r)
            }
            ExprOp::Or => {
                let (l, r) = operands(expr)?;
                self.op_or(l, r)
            }
            ExprOp::Eq => {
                let (l, r) = operands(expr)?;
                self.op_eq(l, r)
            }
            ExprOp::Ne => {
                let (l, r) = operands(expr)?;
                self.op_ne(l, r)
            }
            ExprOp::Gt => {
                let (l, r) = operands(expr)?;
                self.infix(">", l, r)
            }
            ExprOp::Ge => {
                let (l, r) = operands(expr)?;
                self.infix(">=", l, r)
            }
            ExprOp::Lt => {
                let (l, r) = operands(expr)?;
                self.infix("<", l, r)
            }
            ExprOp::Le => {
                let (l, r) = operands(expr)?;
                self.infix("<=", l, r)
            }
            ExprOp::Add => {
                let (l, r) = operands(expr)?;
                self.infix("+", l, r)
            }
            ExprOp::Like => {
                let (l, r) = operands(expr)?;
                self.op_like(l, r)
            }
            ExprOp::Concat => match &expr.left {
                Some(Operand::List(parts)) => self.op_concat(parts),
                _ => Err(SqlError::query("CONCAT expression without a part list")),
            },
            ExprOp::In => {
                let (l, r) = operands(expr)?;
                self.op_in(l, r)
            }
            ExprOp::Count => self.op_count(expr.left.as_ref(), expr.distinct),
            ExprOp::Max => self.op_aggregate("MAX", left_operand(expr)?),
            ExprOp::Min => self.op_aggregate("MIN", left_operand(expr)?),
            ExprOp::Sum => self.op_aggregate("SUM", left_operand(expr)?),
            ExprOp::Avg => self.op_aggregate("AVG", left_operand(expr)?),
            ExprOp::Lower => self.op_aggregate("LOWER", left_operand(expr)?),
            ExprOp::Upper => self.op_aggregate("UPPER", left_operand(expr)?),
        }
    }

    /// Render a literal. With a cast target the value is coerced to the
    /// column type and encoded; without one it falls back to generic
    /// quote-and-escape.
    fn render_value(&self, value: &Value, cast: Option<&FieldRef>) -> SqlResult<String> {
        if value.is_null() {
            return Ok(self.null_literal().to_string());
        }
        match cast {
            Some(field) => {
                let coerced = field.column.ty.coerce(value.clone())?;
                self.encode_value(&coerced, &field.column)
            }
            None => Ok(self.escape(&value.plain_text())),
        }
    }

    /// Quote a string literal, doubling embedded single quotes.
    fn escape(&self, raw: &str) -> String {
        format!("'{}'", raw.replace('\'', "''"))
    }

    // ---- operation renderers -----------------------------------------

    /// `(left SYMBOL right)`, propagating the left operand's column as the
    /// cast target for the right operand.
    fn infix(&self, symbol: &str, left: &Operand, right: &Operand) -> SqlResult<String> {
        Ok(format!(
            "({} {} {})",
            self.render(left, None)?,
            symbol,
            self.render(right, left.cast_source())?
        ))
    }

    fn op_and(&self, left: &Operand, right: &Operand) -> SqlResult<String> {
        self.infix("AND", left, right)
    }

    fn op_or(&self, left: &Operand, right: &Operand) -> SqlResult<String> {
        self.infix("OR", left, right)
    }

    /// Equality; comparison against NULL renders `IS NULL`.
    fn op_eq(&self, left: &Operand, right: &Operand) -> SqlResult<String> {
        if matches!(right, Operand::Value(Value::Null)) {
            return Ok(format!("({} IS NULL)", self.render(left, None)?));
        }
        self.infix("=", left, right)
    }

    /// Inequality; comparison against NULL renders `IS NOT NULL`.
    fn op_ne(&self, left: &Operand, right: &Operand) -> SqlResult<String> {
        if matches!(right, Operand::Value(Value::Null)) {
            return Ok(format!("({} IS NOT NULL)", self.render(left, None)?));
        }
        self.infix("<>", left, right)
    }

    fn op_like(&self, left: &Operand, pattern: &Operand) -> SqlResult<String> {
        let rendered = match pattern {
            Operand::Value(Value::Str(p)) => self.escape(p),
            other => self.render(other, None)?,
        };
        Ok(format!("({} LIKE {})", self.render(left, None)?, rendered))
    }

    /// `((part1) || (part2) || ...)`
    fn op_concat(&self, parts: &[Operand]) -> SqlResult<String> {
        let rendered: Vec<String> = parts
            .iter()
            .map(|p| Ok(format!("({})", self.render(p, None)?)))
            .collect::<SqlResult<_>>()?;
        Ok(format!("({})", rendered.join(" || ")))
    }

    /// `(left IN (items))` with items cast against the left operand, or
    /// `(left IN (sub-select))`.
    fn op_in(&self, left: &Operand, right: &Operand) -> SqlResult<String> {
        let target = self.render(left, None)?;
        match right {
            Operand::List(items) => {
                if items.is_empty() {
                    return Err(SqlError::query("IN with an empty item list"));
                }
                let cast = left.cast_source();
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| self.render(item, cast))
                    .collect::<SqlResult<_>>()?;
                Ok(format!("({} IN ({}))", target, rendered.join(", ")))
            }
            other => Ok(format!("({} IN ({}))", target, self.render(other, None)?)),
        }
    }

    fn op_count(&self, expr: Option<&Operand>, distinct: bool) -> SqlResult<String> {
        match expr {
            None => Ok("COUNT(*)".to_string()),
            Some(operand) => {
                let rendered = self.render(operand, None)?;
                Ok(if distinct {
                    format!("COUNT(DISTINCT {})", rendered)
                } else {
                    format!("COUNT({})", rendered)
                })
            }
        }
    }

    fn op_aggregate(&self, function: &str, operand: &Operand) -> SqlResult<String> {
        Ok(format!("{}({})", function, self.render(operand, None)?))
    }

    fn null_literal(&self) -> &'static str {
        "NULL"
    }

    fn random_function(&self) -> &'static str {
        "RANDOM()"
    }

    /// ` LIMIT n` / ` LIMIT n OFFSET m`, or nothing.
    fn limit_clause(&self, limit: Option<&Limit>) -> String {
        match limit {
            None => String::new(),
            Some(Limit::Count(count)) => format!(" LIMIT {}", count),
            Some(Limit::OffsetCount(offset, count)) => {
                format!(" LIMIT {} OFFSET {}", count, offset)
            }
        }
    }

    // ---- column type declaration -------------------------------------

    /// The column-definition fragment after the column name.
    fn declare_type(&self, column: &Column) -> SqlResult<String> {
        match column.ty {
            ColumnType::Int => self.declare_int(column),
            ColumnType::Bool => self.declare_bool(column),
            ColumnType::Char => self.declare_char(column),
            ColumnType::Text => self.declare_text(column),
            ColumnType::Decimal => self.declare_decimal(column),
            ColumnType::Date => self.declare_date(column),
            ColumnType::DateTime => self.declare_datetime(column),
            ColumnType::Blob => self.declare_blob(column),
        }
    }

    /// ` NULL`/` NOT NULL`, then DEFAULT, then COMMENT.
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
        if !column.comment.is_empty() {
            sql.push_str(" COMMENT ");
            sql.push_str(&self.escape(&column.comment));
        }
        Ok(sql)
    }

    fn declare_int(&self, column: &Column) -> SqlResult<String> {
        let digits = column.precision.ok_or_else(|| {
            SqlError::query(format!("INT column `{}` needs a precision", column.name))
        })?;
        let bytes = int_byte_width(digits, &column.name)?;
        let mut keyword = "BIGINT";
        for (width, candidate) in GENERIC_INT_WIDTHS {
            if bytes <= *width {
                keyword = candidate;
                break;
            }
        }
        let mut sql = format!("{}({})", keyword, digits);
        if column.unsigned {
            sql.push_str(" UNSIGNED");
        }
        if !column.nullable {
            sql.push_str(" NOT");
        }
        sql.push_str(" NULL");
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_value(default, None)?);
        }
        if column.autoincrement {
            sql.push_str(" AUTO_INCREMENT");
        }
        if !column.comment.is_empty() {
            sql.push_str(" COMMENT ");
            sql.push_str(&self.escape(&column.comment));
        }
        Ok(sql)
    }

    /// Booleans are stored as a 0/1 TINYINT.
    fn declare_bool(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("TINYINT{}", self.declare_suffix(column)?))
    }

    fn declare_char(&self, column: &Column) -> SqlResult<String> {
        let length = column.precision.ok_or_else(|| {
            SqlError::query(format!("CHAR column `{}` needs a max length", column.name))
        })?;
        Ok(format!("VARCHAR({}){}", length, self.declare_suffix(column)?))
    }

    fn declare_text(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("TEXT{}", self.declare_suffix(column)?))
    }

    fn declare_decimal(&self, column: &Column) -> SqlResult<String> {
        let (precision, scale) = match (column.precision, column.scale) {
            (Some(p), Some(s)) => (p, s),
            _ => {
                return Err(SqlError::query(format!(
                    "DECIMAL column `{}` needs precision and scale",
                    column.name
                )));
            }
        };
        Ok(format!(
            "DECIMAL({}, {}){}",
            precision,
            scale,
            self.declare_suffix(column)?
        ))
    }

    fn declare_date(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("DATE{}", self.declare_suffix(column)?))
    }

    /// Not every backend keeps microseconds in its native datetime type, so
    /// the baseline stores datetimes as microseconds since the Unix epoch.
    fn declare_datetime(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("INTEGER{}", self.declare_suffix(column)?))
    }

    fn declare_blob(&self, column: &Column) -> SqlResult<String> {
        Ok(format!("BLOB{}", self.declare_suffix(column)?))
    }

    // ---- value encoding ----------------------------------------------

    /// Encode a coerced literal as a SQL fragment for the column type.
    fn encode_value(&self, value: &Value, column: &Column) -> SqlResult<String> {
        match column.ty {
            ColumnType::Int => self.encode_int(value, column),
            ColumnType::Bool => self.encode_bool(value, column),
            ColumnType::Char | ColumnType::Text => self.encode_str(value, column),
            ColumnType::Decimal => self.encode_decimal(value, column),
            ColumnType::Date => self.encode_date(value, column),
            ColumnType::DateTime => self.encode_datetime(value, column),
            ColumnType::Blob => self.encode_blob(value, column),
        }
    }

    fn encode_int(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Int(n) => Ok(n.to_string()),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Int,
                "expected an integer",
            )),
        }
    }

    fn encode_bool(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Bool,
                "expected a boolean",
            )),
        }
    }

    fn encode_str(&self, value: &Value, column: &Column) -> SqlResult<String> {
        match value {
            Value::Str(s) => Ok(self.escape(s)),
            other => Err(SqlError::encoding(
                other.plain_text(),
                column.ty,
                "expected a string",
            )),
        }
    }

    fn encode_decimal(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Decimal(d) => Ok(d.to_string()),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Decimal,
                "expected a decimal",
            )),
        }
    }

    fn encode_date(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Date(d) => Ok(self.escape(&d.format("%Y-%m-%d").to_string())),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Date,
                "expected a date",
            )),
        }
    }

    /// Microseconds since the Unix epoch, taking the naive value as UTC.
    fn encode_datetime(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::DateTime(dt) => Ok(dt.and_utc().timestamp_micros().to_string()),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::DateTime,
                "expected a datetime",
            )),
        }
    }

    fn encode_blob(&self, value: &Value, _column: &Column) -> SqlResult<String> {
        match value {
            Value::Bytes(b) => Ok(format!("'{}'", BASE64.encode(b))),
            other => Err(SqlError::encoding(
                other.plain_text(),
                ColumnType::Blob,
                "expected bytes",
            )),
        }
    }

    // ---- value decoding ----------------------------------------------

    /// Decode a raw value coming back from the executor. The exact inverse
    /// of [`encode_value`](SqlDialect::encode_value) for every type; NULL
    /// passes through unchanged.
    fn decode_value(&self, raw: Value, column: &Column) -> SqlResult<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        match column.ty {
            ColumnType::Int => self.decode_int(raw, column),
            ColumnType::Bool => self.decode_bool(raw, column),
            ColumnType::Char | ColumnType::Text => self.decode_str(raw, column),
            ColumnType::Decimal => self.decode_decimal(raw, column),
            ColumnType::Date => self.decode_date(raw, column),
            ColumnType::DateTime => self.decode_datetime(raw, column),
            ColumnType::Blob => self.decode_blob(raw, column),
        }
    }

    fn decode_int(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Int(n) => Ok(Value::Int(n)),
            Value::Str(s) => s
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| SqlError::decoding(s, ColumnType::Int, e.to_string())),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Int,
                "expected an integer",
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
                "expected a 0/1 integer",
            )),
        }
    }

    fn decode_str(&self, raw: Value, column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Str(s) => Ok(Value::Str(s)),
            Value::Bytes(b) => String::from_utf8(b)
                .map(Value::Str)
                .map_err(|e| SqlError::decoding("<bytes>", column.ty, e.to_string())),
            other => Err(SqlError::decoding(
                other.plain_text(),
                column.ty,
                "expected a string",
            )),
        }
    }

    fn decode_decimal(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Decimal(d) => Ok(Value::Decimal(d)),
            Value::Int(n) => Ok(Value::Decimal(n.into())),
            Value::Str(s) => s
                .parse()
                .map(Value::Decimal)
                .map_err(|e: rust_decimal::Error| {
                    SqlError::decoding(s, ColumnType::Decimal, e.to_string())
                }),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Decimal,
                "expected a decimal",
            )),
        }
    }

    fn decode_date(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Date(d) => Ok(Value::Date(d)),
            Value::Str(s) => chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|e| SqlError::decoding(s, ColumnType::Date, e.to_string())),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Date,
                "expected a date",
            )),
        }
    }

    fn decode_datetime(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::DateTime(dt) => Ok(Value::DateTime(dt)),
            Value::Int(micros) => DateTime::from_timestamp_micros(micros)
                .map(|dt| Value::DateTime(dt.naive_utc()))
                .ok_or_else(|| {
                    SqlError::decoding(
                        micros,
                        ColumnType::DateTime,
                        "microsecond timestamp out of range",
                    )
                }),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::DateTime,
                "expected a microsecond timestamp",
            )),
        }
    }

    fn decode_blob(&self, raw: Value, _column: &Column) -> SqlResult<Value> {
        match raw {
            Value::Bytes(b) => Ok(Value::Bytes(b)),
            Value::Str(s) => BASE64
                .decode(s.as_bytes())
                .map(Value::Bytes)
                .map_err(|e| SqlError::decoding(s, ColumnType::Blob, e.to_string())),
            other => Err(SqlError::decoding(
                other.plain_text(),
                ColumnType::Blob,
                "expected base64 text or bytes",
            )),
        }
    }

    // ---- statement hooks ---------------------------------------------

    /// Appended to INSERT statements (PostgreSQL: ` RETURNING id`).
    fn insert_suffix(&self) -> &'static str {
        ""
    }

    /// Whether `DISTINCT ON (columns)` is valid syntax.
    fn supports_distinct_on(&self) -> bool {
        false
    }

    /// Whether UPDATE/DELETE accept a LIMIT clause.
    fn supports_dml_limit(&self) -> bool {
        false
    }

    /// Index clauses placed inside the CREATE TABLE statement. The baseline
    /// inlines every index kind.
    fn create_table_inline_indexes(&self, table: &TableDef) -> SqlResult<Vec<String>> {
        let mut clauses = Vec::new();
        for index in &table.indexes {
            let kind = match index.kind {
                IndexKind::Primary => "PRIMARY KEY",
                IndexKind::Unique => "UNIQUE KEY",
                IndexKind::Plain => "KEY",
            };
            let columns: Vec<String> = index
                .columns
                .iter()
                .map(|c| index_column_sql(c, true))
                .collect();
            clauses.push(format!("{} {} ({})", kind, index.name, columns.join(", ")));
        }
        Ok(clauses)
    }

    /// Statements executed after CREATE TABLE (separate CREATE INDEX,
    /// COMMENT ON, ...).
    fn create_table_aux_statements(&self, _table: &TableDef) -> SqlResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Trailing options appended to the CREATE TABLE statement (MySQL
    /// engine/charset clause).
    fn create_table_options(&self, _table: &TableDef) -> String {
        String::new()
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE {}", table)
    }

    fn truncate_sql(&self, table: &str) -> Vec<String> {
        vec![format!("DELETE FROM {}", table)]
    }
}

/// The common SQL-92-ish baseline: every trait default, no overrides.
pub struct GenericDialect;

impl SqlDialect for GenericDialect {}
