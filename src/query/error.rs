//! Query errors
//!
//! Both predicate errors are programmer/config errors: the presentation layer
//! only ever offers field names and sort keys drawn from the schema itself.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while building or evaluating a query
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum QueryError {
    #[error("unknown field '{field}' for {entity} records")]
    #[diagnostic(
        code(ttk::query::unknown_field),
        help("valid fields: {valid}")
    )]
    UnknownField {
        entity: String,
        field: String,
        /// Comma-separated list of accepted names
        valid: String,
    },

    #[error("invalid sort key '{key}' for {entity} records")]
    #[diagnostic(
        code(ttk::query::invalid_sort_key),
        help("valid sort keys: {valid}")
    )]
    InvalidSortKey {
        entity: String,
        key: String,
        /// Comma-separated list of accepted names
        valid: String,
    },

    #[error("predicates were built for {expected} records but the store holds {found} records")]
    #[diagnostic(code(ttk::query::schema_mismatch))]
    SchemaMismatch { expected: String, found: String },
}

/// Result alias for query operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;
