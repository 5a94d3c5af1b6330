use serde::{Deserialize, Serialize};

use super::{Expr, JoinKind};

/// A join source: target table, ON condition, join kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub table: String,
    pub on: Expr,
    pub kind: JoinKind,
}

impl Join {
    pub fn inner(table: impl Into<String>, on: Expr) -> Self {
        Join {
            table: table.into(),
            on,
            kind: JoinKind::Inner,
        }
    }

    pub fn left(table: impl Into<String>, on: Expr) -> Self {
        Join {
            table: table.into(),
            on,
            kind: JoinKind::Left,
        }
    }
}
