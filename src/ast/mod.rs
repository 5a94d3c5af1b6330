//! The expression AST: immutable nodes built by named combinators and
//! rendered to SQL by a dialect.

pub mod expr;
pub mod joins;
pub mod operators;
pub mod values;

pub use expr::{Expr, Operand, concat};
pub use joins::Join;
pub use operators::{ExprOp, JoinKind, SortOrder};
pub use values::Value;
