use std::future::Future;
use std::sync::Arc;

use crate::error::DataError;
use crate::value::{Row, SqlValue};

/// Runs SQL text against a database.
///
/// One call is one statement. Implementations must be safe to share between
/// concurrent callers; cancellation, timeouts, pooling and transactions all
/// live behind this trait. Errors are returned unmodified to the repository
/// caller.
///
/// Uses RPITIT (return-position `impl Trait` in traits); no `async-trait` needed.
pub trait SqlExecutor: Send + Sync {
    /// Run a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<u64, DataError>> + Send;

    /// Run an INSERT and return the key the database generated for `id_column`,
    /// or `None` if the driver cannot report one.
    ///
    /// `id_column` is already formatted by the generator's identifier policy.
    fn execute_returning_key(
        &self,
        sql: &str,
        params: &[SqlValue],
        id_column: &str,
    ) -> impl Future<Output = Result<Option<SqlValue>, DataError>> + Send;

    /// Run a query and return every row.
    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send;

    /// Run a query returning a single number (e.g. `COUNT(*)`).
    fn query_scalar(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<i64, DataError>> + Send;
}

impl<E: SqlExecutor> SqlExecutor for Arc<E> {
    fn execute(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<u64, DataError>> + Send {
        (**self).execute(sql, params)
    }

    fn execute_returning_key(
        &self,
        sql: &str,
        params: &[SqlValue],
        id_column: &str,
    ) -> impl Future<Output = Result<Option<SqlValue>, DataError>> + Send {
        (**self).execute_returning_key(sql, params, id_column)
    }

    fn query(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Row>, DataError>> + Send {
        (**self).query(sql, params)
    }

    fn query_scalar(
        &self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<i64, DataError>> + Send {
        (**self).query_scalar(sql, params)
    }
}
