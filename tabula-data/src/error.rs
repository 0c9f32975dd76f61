use crate::sql::QueryError;

/// Errors that can occur in the data layer.
#[derive(Debug)]
pub enum DataError {
    NotFound(String),
    /// A write was requested from a repository that cannot persist entities.
    UnsupportedOperation(String),
    /// A row could not be turned into an entity (or an entity into columns).
    Mapping(String),
    /// The table description is unusable (empty table name or identity column).
    InvalidTable(String),
    Query(QueryError),
    Database(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `tabula-data-sqlx`) to wrap driver-specific
    /// errors without altering them.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }

    pub fn mapping(msg: impl Into<String>) -> Self {
        DataError::Mapping(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        DataError::UnsupportedOperation(msg.into())
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotFound(msg) => write!(f, "Not found: {msg}"),
            DataError::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {msg}"),
            DataError::Mapping(msg) => write!(f, "Mapping error: {msg}"),
            DataError::InvalidTable(msg) => write!(f, "Invalid table description: {msg}"),
            DataError::Query(err) => write!(f, "Query error: {err}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
            DataError::Other(msg) => write!(f, "Data error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Database(err) => Some(err.as_ref()),
            DataError::Query(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueryError> for DataError {
    fn from(err: QueryError) -> Self {
        DataError::Query(err)
    }
}
