//! Schema descriptors: column types, columns, field references, indexes and
//! table definitions.
//!
//! How these descriptors are produced is not this crate's concern; a table
//! is only a name, an ordered set of typed columns and a set of indexes.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Operand, SortOrder, Value};
use crate::error::{SqlError, SqlResult};

/// Logical column type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int,
    Bool,
    Char,
    Text,
    Decimal,
    Date,
    DateTime,
    Blob,
}

impl ColumnType {
    pub const fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::Bool => "BOOL",
            ColumnType::Char => "CHAR",
            ColumnType::Text => "TEXT",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Blob => "BLOB",
        }
    }

    /// Coerce a literal to this type before encoding, so `price > "15"`
    /// compares numbers and `published == "2020-01-01"` compares dates.
    pub fn coerce(&self, value: Value) -> SqlResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self {
            ColumnType::Int => match value {
                Value::Int(n) => Ok(Value::Int(n)),
                Value::Bool(b) => Ok(Value::Int(b as i64)),
                Value::Float(f) => Ok(Value::Int(f as i64)),
                Value::Str(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| SqlError::encoding(s, *self, e.to_string())),
                other => Err(SqlError::encoding(other.plain_text(), *self, "not an integer")),
            },
            ColumnType::Bool => match value {
                Value::Bool(b) => Ok(Value::Bool(b)),
                Value::Int(0) => Ok(Value::Bool(false)),
                Value::Int(1) => Ok(Value::Bool(true)),
                Value::Str(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "1" => Ok(Value::Bool(true)),
                    "false" | "0" => Ok(Value::Bool(false)),
                    _ => Err(SqlError::encoding(s, *self, "not a boolean")),
                },
                other => Err(SqlError::encoding(other.plain_text(), *self, "not a boolean")),
            },
            ColumnType::Char | ColumnType::Text => match value {
                Value::Str(s) => Ok(Value::Str(s)),
                Value::Bytes(_) => Err(SqlError::encoding("<bytes>", *self, "not a string")),
                other => Ok(Value::Str(other.plain_text())),
            },
            ColumnType::Decimal => match value {
                Value::Decimal(d) => Ok(Value::Decimal(d)),
                Value::Int(n) => Ok(Value::Decimal(Decimal::from(n))),
                Value::Float(f) => Decimal::try_from(f)
                    .map(Value::Decimal)
                    .map_err(|e| SqlError::encoding(f, *self, e.to_string())),
                Value::Str(s) => Decimal::from_str(s.trim())
                    .map(Value::Decimal)
                    .map_err(|e| SqlError::encoding(s, *self, e.to_string())),
                other => Err(SqlError::encoding(other.plain_text(), *self, "not a decimal")),
            },
            ColumnType::Date => match value {
                Value::Date(d) => Ok(Value::Date(d)),
                Value::Str(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map(Value::Date)
                    .map_err(|e| SqlError::encoding(s, *self, e.to_string())),
                other => Err(SqlError::encoding(
                    other.plain_text(),
                    *self,
                    "expected a date or a \"YYYY-MM-DD\" string",
                )),
            },
            ColumnType::DateTime => match value {
                Value::DateTime(dt) => Ok(Value::DateTime(dt)),
                Value::Str(s) => {
                    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%.f")
                        .map(Value::DateTime)
                        .map_err(|e| SqlError::encoding(s, *self, e.to_string()))
                }
                other => Err(SqlError::encoding(
                    other.plain_text(),
                    *self,
                    "expected a datetime or a \"YYYY-MM-DD HH:MM:SS.ffffff\" string",
                )),
            },
            ColumnType::Blob => match value {
                Value::Bytes(b) => Ok(Value::Bytes(b)),
                other => Err(SqlError::encoding(other.plain_text(), *self, "not a byte blob")),
            },
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Description of one stored table column. Pure data: constructed once when
/// a table definition is assembled and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub ty: ColumnType,
    pub name: String,
    /// `None` means "no default", which is distinct from an explicit NULL
    /// default (`Some(Value::Null)`).
    pub default: Option<Value>,
    /// Char max length, or max digits for decimals and integers.
    pub precision: Option<u32>,
    /// Digits right of the decimal point.
    pub scale: Option<u32>,
    pub unsigned: bool,
    pub nullable: bool,
    pub autoincrement: bool,
    pub comment: String,
}

impl Column {
    pub fn new(ty: ColumnType, name: impl Into<String>) -> Self {
        Column {
            ty,
            name: name.into(),
            default: None,
            precision: None,
            scale: None,
            unsigned: false,
            nullable: true,
            autoincrement: false,
            comment: String::new(),
        }
    }

    /// Primary autoincrement integer key: 9 digits is int32-sized.
    pub fn id(name: impl Into<String>) -> Self {
        Column::new(ColumnType::Int, name)
            .precision(9)
            .unsigned()
            .autoincrement()
    }

    pub fn integer(name: impl Into<String>, max_digits: u32) -> Self {
        Column::new(ColumnType::Int, name).precision(max_digits)
    }

    pub fn varchar(name: impl Into<String>, max_length: u32) -> Self {
        Column::new(ColumnType::Char, name).precision(max_length)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Column::new(ColumnType::Text, name)
    }

    pub fn decimal(name: impl Into<String>, max_digits: u32, decimal_places: u32) -> Self {
        Column::new(ColumnType::Decimal, name)
            .precision(max_digits)
            .scale(decimal_places)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Column::new(ColumnType::Date, name)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Column::new(ColumnType::DateTime, name)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Column::new(ColumnType::Bool, name)
    }

    pub fn blob(name: impl Into<String>) -> Self {
        Column::new(ColumnType::Blob, name)
    }

    pub fn precision(mut self, digits: u32) -> Self {
        self.precision = Some(digits);
        self
    }

    pub fn scale(mut self, digits: u32) -> Self {
        self.scale = Some(digits);
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Only meaningful on INT columns that belong to a primary index.
    pub fn autoincrement(mut self) -> Self {
        debug_assert_eq!(self.ty, ColumnType::Int, "autoincrement requires an INT column");
        self.autoincrement = true;
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = text.into();
        self
    }
}

/// A column together with its owning table: the queryable, class-level view
/// of a field. Renders as `table.column`. Concrete row values are plain
/// [`Value`]s — the two never share a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRef {
    pub table: String,
    pub column: Column,
}

impl FieldRef {
    pub fn new(table: impl Into<String>, column: Column) -> Self {
        FieldRef {
            table: table.into(),
            column,
        }
    }

    /// The `table.column` token.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.column.name)
    }

    /// This field as an expression node.
    pub fn expr(&self) -> Expr {
        Expr::field(self.clone())
    }

    /// An INSERT/UPDATE assignment pair. The value may be a literal or an
    /// expression (`price.assign(price.expr().add(1))`).
    pub fn assign(&self, value: impl Into<Operand>) -> (FieldRef, Operand) {
        (self.clone(), value.into())
    }
}

/// Index kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Primary,
    Unique,
    Plain,
}

/// One column of an index, with sort order and optional prefix length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub sort: SortOrder,
    pub prefix_length: Option<u32>,
}

impl IndexColumn {
    pub fn new(name: impl Into<String>) -> Self {
        IndexColumn {
            name: name.into(),
            sort: SortOrder::Asc,
            prefix_length: None,
        }
    }

    pub fn desc(mut self) -> Self {
        self.sort = SortOrder::Desc;
        self
    }

    pub fn prefix(mut self, length: u32) -> Self {
        self.prefix_length = Some(length);
        self
    }
}

/// An index over columns of a single table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub kind: IndexKind,
    pub name: String,
    pub columns: Vec<IndexColumn>,
}

impl Index {
    pub fn new(
        kind: IndexKind,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = IndexColumn>,
    ) -> Self {
        Index {
            kind,
            name: name.into(),
            columns: columns.into_iter().collect(),
        }
    }

    pub fn primary<'a>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Index::new(
            IndexKind::Primary,
            name,
            columns.into_iter().map(IndexColumn::new),
        )
    }

    pub fn unique<'a>(name: impl Into<String>, columns: impl IntoIterator<Item = &'a str>) -> Self {
        Index::new(
            IndexKind::Unique,
            name,
            columns.into_iter().map(IndexColumn::new),
        )
    }

    pub fn plain<'a>(name: impl Into<String>, columns: impl IntoIterator<Item = &'a str>) -> Self {
        Index::new(
            IndexKind::Plain,
            name,
            columns.into_iter().map(IndexColumn::new),
        )
    }
}

/// A table: a name, an ordered set of typed columns, a set of indexes and an
/// optional table comment. However the surrounding system produced this
/// (hand-written, derived, reflected), the rendering core only sees this
/// shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub comment: String,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        TableDef {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            comment: String::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = text.into();
        self
    }

    /// Look up a column by name as a [`FieldRef`].
    pub fn field(&self, name: &str) -> SqlResult<FieldRef> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| FieldRef::new(self.name.clone(), c.clone()))
            .ok_or_else(|| {
                SqlError::query(format!("table `{}` has no column `{}`", self.name, name))
            })
    }

    /// All columns as field references, in declaration order.
    pub fn fields(&self) -> Vec<FieldRef> {
        self.columns
            .iter()
            .map(|c| FieldRef::new(self.name.clone(), c.clone()))
            .collect()
    }
}
