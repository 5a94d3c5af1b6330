use serde::{Deserialize, Serialize};

use crate::error::{SqlError, SqlResult};
use crate::schema::FieldRef;

use super::{ExprOp, SortOrder, Value};

/// One operand of an expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// A nested expression
    Expr(Box<Expr>),
    /// A column reference
    Field(FieldRef),
    /// A literal value
    Value(Value),
    /// A list of operands (IN items, CONCAT parts)
    List(Vec<Operand>),
}

impl Operand {
    /// The column whose declared type governs how a literal on the other
    /// side of a binary operation is encoded.
    pub fn cast_source(&self) -> Option<&FieldRef> {
        match self {
            Operand::Expr(e) => e.cast_source(),
            Operand::Field(f) => Some(f),
            Operand::Value(_) | Operand::List(_) => None,
        }
    }

    fn collect_tables(&self, out: &mut Vec<String>) {
        match self {
            Operand::Expr(e) => e.collect_tables(out),
            Operand::Field(f) => {
                if !out.contains(&f.table) {
                    out.push(f.table.clone());
                }
            }
            Operand::Value(_) => {}
            Operand::List(items) => {
                for item in items {
                    item.collect_tables(out);
                }
            }
        }
    }
}

impl From<Expr> for Operand {
    fn from(e: Expr) -> Self {
        Operand::Expr(Box::new(e))
    }
}

impl From<&Expr> for Operand {
    fn from(e: &Expr) -> Self {
        Operand::Expr(Box::new(e.clone()))
    }
}

impl From<FieldRef> for Operand {
    fn from(f: FieldRef) -> Self {
        Operand::Field(f)
    }
}

impl From<&FieldRef> for Operand {
    fn from(f: &FieldRef) -> Self {
        Operand::Field(f.clone())
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Value(v.into())
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Value(v.into())
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Value(v.into())
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Value(v.into())
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Value(v.into())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Value(v.into())
    }
}

impl From<rust_decimal::Decimal> for Operand {
    fn from(v: rust_decimal::Decimal) -> Self {
        Operand::Value(v.into())
    }
}

impl From<chrono::NaiveDate> for Operand {
    fn from(v: chrono::NaiveDate) -> Self {
        Operand::Value(v.into())
    }
}

impl From<chrono::NaiveDateTime> for Operand {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Operand::Value(v.into())
    }
}

/// An immutable expression node: an operation over up to two operands,
/// plus a sort direction and a distinct flag.
///
/// Every combinator returns a new node; nothing mutates the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub op: ExprOp,
    pub left: Option<Operand>,
    pub right: Option<Operand>,
    /// Direction used when this expression appears in ORDER BY.
    #[serde(default)]
    pub sort: SortOrder,
    /// DISTINCT flag for COUNT.
    #[serde(default)]
    pub distinct: bool,
    /// Table attribution for expressions that reference no column
    /// (`COUNT(*)`), so source inference still works for them.
    #[serde(default)]
    pub table_hint: Option<String>,
}

impl Expr {
    fn node(op: ExprOp, left: Option<Operand>, right: Option<Operand>) -> Self {
        Expr {
            op,
            left,
            right,
            sort: SortOrder::Asc,
            distinct: false,
            table_hint: None,
        }
    }

    fn binary(op: ExprOp, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Expr::node(op, Some(left.into()), Some(right.into()))
    }

    fn unary(op: ExprOp, left: impl Into<Operand>) -> Self {
        Expr::node(op, Some(left.into()), None)
    }

    /// A column reference expression.
    pub fn field(field: FieldRef) -> Self {
        Expr::node(ExprOp::Field, Some(Operand::Field(field)), None)
    }

    /// A raw SQL token, rendered verbatim on every dialect.
    pub fn raw(token: impl Into<String>) -> Self {
        Expr::node(ExprOp::Raw(token.into()), None, None)
    }

    /// `COUNT(*)`, attributed to `table` for source inference.
    pub fn count_all(table: impl Into<String>) -> Self {
        let mut e = Expr::node(ExprOp::Count, None, None);
        e.table_hint = Some(table.into());
        e
    }

    pub fn eq(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Eq, self, other)
    }

    pub fn ne(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Ne, self, other)
    }

    pub fn gt(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Gt, self, other)
    }

    pub fn ge(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Ge, self, other)
    }

    pub fn lt(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Lt, self, other)
    }

    pub fn le(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Le, self, other)
    }

    pub fn add(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Add, self, other)
    }

    pub fn and(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::And, self, other)
    }

    pub fn or(&self, other: impl Into<Operand>) -> Expr {
        Expr::binary(ExprOp::Or, self, other)
    }

    /// `self LIKE pattern`.
    pub fn like(&self, pattern: impl Into<String>) -> Expr {
        Expr::binary(ExprOp::Like, self, Value::Str(pattern.into()))
    }

    /// `self IN (items)`. An empty item list is rejected: it is ambiguous
    /// SQL, not an empty result set.
    pub fn in_list<V: Into<Value>>(
        &self,
        items: impl IntoIterator<Item = V>,
    ) -> SqlResult<Expr> {
        let items: Vec<Operand> = items
            .into_iter()
            .map(|v| Operand::Value(v.into()))
            .collect();
        if items.is_empty() {
            return Err(SqlError::query("IN with an empty item list"));
        }
        Ok(Expr::binary(ExprOp::In, self, Operand::List(items)))
    }

    /// `self IN (sub-select)`, with a pre-rendered sub-select string.
    pub fn in_subquery(&self, subquery: impl Into<String>) -> Expr {
        Expr::binary(ExprOp::In, self, Expr::raw(subquery))
    }

    /// `COUNT(self)` or `COUNT(DISTINCT self)`.
    pub fn count(&self, distinct: bool) -> Expr {
        let mut e = Expr::unary(ExprOp::Count, self);
        e.distinct = distinct;
        e
    }

    pub fn max(&self) -> Expr {
        Expr::unary(ExprOp::Max, self)
    }

    pub fn min(&self) -> Expr {
        Expr::unary(ExprOp::Min, self)
    }

    pub fn sum(&self) -> Expr {
        Expr::unary(ExprOp::Sum, self)
    }

    pub fn avg(&self) -> Expr {
        Expr::unary(ExprOp::Avg, self)
    }

    pub fn lower(&self) -> Expr {
        Expr::unary(ExprOp::Lower, self)
    }

    pub fn upper(&self) -> Expr {
        Expr::unary(ExprOp::Upper, self)
    }

    /// Copy of this expression sorting ascending.
    pub fn asc(&self) -> Expr {
        let mut e = self.clone();
        e.sort = SortOrder::Asc;
        e
    }

    /// Copy of this expression sorting descending.
    pub fn desc(&self) -> Expr {
        let mut e = self.clone();
        e.sort = SortOrder::Desc;
        e
    }

    /// The column governing literal encoding for operands compared against
    /// this expression: the leftmost column reference in the tree.
    pub fn cast_source(&self) -> Option<&FieldRef> {
        match self.op {
            ExprOp::Field => match &self.left {
                Some(Operand::Field(f)) => Some(f),
                _ => None,
            },
            _ => self.left.as_ref().and_then(|o| o.cast_source()),
        }
    }

    /// Tables referenced by this expression, in first-seen order.
    pub fn source_tables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tables(&mut out);
        out
    }

    fn collect_tables(&self, out: &mut Vec<String>) {
        if let Some(hint) = &self.table_hint {
            if !out.contains(hint) {
                out.push(hint.clone());
            }
        }
        if let Some(left) = &self.left {
            left.collect_tables(out);
        }
        if let Some(right) = &self.right {
            right.collect_tables(out);
        }
    }
}

/// Concatenate expressions and literals: `((a) || (b) || ...)` on the
/// generic dialect, `CONCAT(...)` on MySQL.
pub fn concat<O: Into<Operand>>(parts: impl IntoIterator<Item = O>) -> Expr {
    let parts: Vec<Operand> = parts.into_iter().map(|p| p.into()).collect();
    Expr::node(ExprOp::Concat, Some(Operand::List(parts)), None)
}

/// Debug rendering through the process-wide default dialect. Real rendering
/// always takes an explicit dialect.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match crate::render::default_dialect().renderer().render_expr(self) {
            Ok(sql) => write!(f, "{}", sql),
            Err(err) => write!(f, "<unrenderable expression: {}>", err),
        }
    }
}
