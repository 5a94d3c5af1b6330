use serde::{Deserialize, Serialize};

/// The operation carried by an [`Expr`](crate::ast::Expr) node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprOp {
    /// A column reference (`table.column`). The field lives in the left
    /// operand.
    Field,
    /// A raw SQL token rendered verbatim. The escape hatch for fragments
    /// the AST does not model.
    Raw(String),
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Equal (=), or IS NULL when the right operand is NULL
    Eq,
    /// Not equal (<>), or IS NOT NULL when the right operand is NULL
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Addition (+)
    Add,
    /// LIKE pattern match
    Like,
    /// String concatenation; parts live in the left operand list
    Concat,
    /// IN list or IN (sub-select)
    In,
    /// COUNT(expr), COUNT(DISTINCT expr) or COUNT(*)
    Count,
    /// MAX aggregate
    Max,
    /// MIN aggregate
    Min,
    /// SUM aggregate
    Sum,
    /// AVG aggregate
    Avg,
    /// LOWER(expr)
    Lower,
    /// UPPER(expr)
    Upper,
}

impl ExprOp {
    /// Human-readable operation name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ExprOp::Field => "FIELD",
            ExprOp::Raw(_) => "RAW",
            ExprOp::And => "AND",
            ExprOp::Or => "OR",
            ExprOp::Eq => "EQ",
            ExprOp::Ne => "NE",
            ExprOp::Gt => "GT",
            ExprOp::Ge => "GE",
            ExprOp::Lt => "LT",
            ExprOp::Le => "LE",
            ExprOp::Add => "ADD",
            ExprOp::Like => "LIKE",
            ExprOp::Concat => "CONCAT",
            ExprOp::In => "IN",
            ExprOp::Count => "COUNT",
            ExprOp::Max => "MAX",
            ExprOp::Min => "MIN",
            ExprOp::Sum => "SUM",
            ExprOp::Avg => "AVG",
            ExprOp::Lower => "LOWER",
            ExprOp::Upper => "UPPER",
        }
    }
}

/// Sort order direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
        }
    }
}
