//! Decoded results of a SELECT.

use std::collections::HashMap;

use crate::ast::{Expr, ExprOp, Operand, Value};
use crate::error::{SqlError, SqlResult};
use crate::render::Dialect;

/// Results of a SELECT: the queried field expressions (defining column
/// order) and the decoded row values, indexable by ordinal or by field.
#[derive(Debug, Clone)]
pub struct Rows {
    dialect: Dialect,
    fields: Vec<Expr>,
    /// Canonical rendered string per field; the lookup key.
    keys: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Rows {
    /// Decode raw executor rows. Each value of a plain field expression is
    /// passed through the originating column's decoder; NULLs and values of
    /// computed expressions pass through unchanged.
    pub fn decode(
        dialect: Dialect,
        fields: Vec<Expr>,
        raw_rows: Vec<Vec<Value>>,
    ) -> SqlResult<Rows> {
        let renderer = dialect.renderer();
        let keys: Vec<String> = fields
            .iter()
            .map(|f| renderer.render_expr(f))
            .collect::<SqlResult<_>>()?;
        let index: HashMap<String, usize> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), i))
            .collect();

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw_row in raw_rows {
            if raw_row.len() != fields.len() {
                return Err(SqlError::query(format!(
                    "row width {} does not match the {} selected fields",
                    raw_row.len(),
                    fields.len()
                )));
            }
            let mut row = Vec::with_capacity(raw_row.len());
            for (field, value) in fields.iter().zip(raw_row) {
                let decoded = match field_column(field) {
                    Some(column) if !value.is_null() => {
                        renderer.decode_value(value, column)?
                    }
                    _ => value,
                };
                row.push(decoded);
            }
            rows.push(row);
        }

        Ok(Rows {
            dialect,
            fields,
            keys,
            index,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn fields(&self) -> &[Expr] {
        &self.fields
    }

    pub fn row(&self, row: usize) -> Option<&[Value]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Value by ordinal position.
    pub fn value_at(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Value by field expression. Two structurally-equal expressions resolve
    /// to the same column because lookup goes through the canonical rendered
    /// string.
    pub fn value(&self, row: usize, field: &Expr) -> SqlResult<&Value> {
        let key = self.dialect.renderer().render_expr(field)?;
        let column = *self
            .index
            .get(&key)
            .ok_or_else(|| SqlError::query(format!("field `{}` is not in the result set", key)))?;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .ok_or_else(|| SqlError::query(format!("row {} is out of range", row)))
    }

    /// Rows as canonical-key → value maps.
    pub fn named(&self) -> impl Iterator<Item = HashMap<&str, &Value>> {
        self.rows.iter().map(|row| {
            self.keys
                .iter()
                .map(|k| k.as_str())
                .zip(row.iter())
                .collect()
        })
    }
}

/// The column behind a plain field expression. Computed expressions return
/// None and their values pass through undecoded.
fn field_column(field: &Expr) -> Option<&crate::schema::Column> {
    if field.op != ExprOp::Field {
        return None;
    }
    match &field.left {
        Some(Operand::Field(f)) => Some(&f.column),
        _ => None,
    }
}
