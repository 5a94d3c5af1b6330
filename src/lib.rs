pub mod ast;
pub mod error;
pub mod journal;
pub mod render;
pub mod rows;
pub mod schema;

pub mod prelude {
    pub use crate::ast::{Expr, Join, JoinKind, Operand, SortOrder, Value, concat};
    pub use crate::error::{SqlError, SqlResult};
    pub use crate::journal::StatementJournal;
    pub use crate::render::dml::{
        DeleteQuery, Distinct, Filter, Limit, OrderBy, SelectQuery, Source, UpdateQuery,
    };
    pub use crate::render::{Dialect, SqlDialect, default_dialect, set_default_dialect};
    pub use crate::rows::Rows;
    pub use crate::schema::{Column, ColumnType, FieldRef, Index, IndexColumn, IndexKind, TableDef};
}
