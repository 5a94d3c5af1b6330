//! Error types for query construction and rendering.

use thiserror::Error;

use crate::schema::ColumnType;

/// Errors raised while building or rendering SQL.
///
/// All of these surface synchronously at build/render time, before a
/// statement ever reaches an executor.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Malformed or ambiguous query construction (empty field list,
    /// mixed-table field sets, empty IN list, bad clause combination).
    #[error("query error: {0}")]
    Query(String),

    /// The dialect cannot render the requested operation.
    #[error("{dialect} dialect does not support {operation}")]
    UnsupportedOperation {
        dialect: &'static str,
        operation: String,
    },

    /// The dialect has no declare/encode/decode rules for the column type.
    #[error("{dialect} dialect does not support column type {ty}")]
    UnsupportedType {
        dialect: &'static str,
        ty: ColumnType,
    },

    /// A literal value cannot be coerced or encoded for the target column.
    #[error("cannot encode {value} as {ty}: {reason}")]
    Encoding {
        value: String,
        ty: ColumnType,
        reason: String,
    },

    /// A raw value coming back from the executor cannot be decoded.
    #[error("cannot decode {value} as {ty}: {reason}")]
    Decoding {
        value: String,
        ty: ColumnType,
        reason: String,
    },
}

impl SqlError {
    /// Shorthand for a [`SqlError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        SqlError::Query(message.into())
    }

    /// Shorthand for a [`SqlError::Encoding`].
    pub fn encoding(value: impl ToString, ty: ColumnType, reason: impl Into<String>) -> Self {
        SqlError::Encoding {
            value: value.to_string(),
            ty,
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`SqlError::Decoding`].
    pub fn decoding(value: impl ToString, ty: ColumnType, reason: impl Into<String>) -> Self {
        SqlError::Decoding {
            value: value.to_string(),
            ty,
            reason: reason.into(),
        }
    }
}

pub type SqlResult<T> = Result<T, SqlError>;
