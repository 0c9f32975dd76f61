use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tabula_data::{DataError, DataSourceConfig, Row, SqlExecutor, SqlValue};
use tracing::{trace, warn};

use crate::error::SqlxErrorExt;
use crate::row::{bind_params, decode_column, to_row};

/// A direct-connection [`SqlExecutor`] backed by an `sqlx::AnyPool`.
///
/// Each call checks a connection out of the pool for exactly one statement;
/// nothing is wrapped in a transaction (autocommit).
///
/// # Example
///
/// ```ignore
/// let executor = SqlxExecutor::connect(&config.datasource).await?;
/// let repo = TableRepository::new(executor.clone(), map_user, unmap_user, users);
/// ```
#[derive(Clone)]
pub struct SqlxExecutor {
    pool: AnyPool,
    returning_keys: bool,
}

impl SqlxExecutor {
    pub fn new(pool: AnyPool) -> Self {
        let scheme = pool.connect_options().database_url.scheme().to_string();
        Self {
            pool,
            returning_keys: matches!(scheme.as_str(), "postgres" | "postgresql"),
        }
    }

    /// Install the compiled-in sqlx drivers and open a pool for `config.url`.
    pub async fn connect(config: &DataSourceConfig) -> Result<Self, DataError> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect(&config.url)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(Self::new(pool))
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

impl SqlExecutor for SqlxExecutor {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DataError> {
        trace!(%sql, params = params.len(), "Executing statement");
        let result = bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        Ok(result.rows_affected())
    }

    async fn execute_returning_key(
        &self,
        sql: &str,
        params: &[SqlValue],
        id_column: &str,
    ) -> Result<Option<SqlValue>, DataError> {
        if self.returning_keys {
            let sql = format!("{sql} RETURNING {id_column}");
            trace!(%sql, params = params.len(), "Executing insert returning key");
            let row = bind_params(sqlx::query(&sql), params)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| e.into_data_error())?;
            return row.map(|row| decode_column(&row, 0)).transpose();
        }

        trace!(%sql, params = params.len(), "Executing insert");
        let result = bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        let key = result.last_insert_id().map(SqlValue::Integer);
        if key.is_none() {
            warn!(%sql, id_column, "Driver did not report a generated key");
        }
        Ok(key)
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DataError> {
        trace!(%sql, params = params.len(), "Running query");
        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        rows.iter().map(to_row).collect()
    }

    async fn query_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<i64, DataError> {
        trace!(%sql, params = params.len(), "Running scalar query");
        let row = bind_params(sqlx::query(sql), params)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| e.into_data_error())?;
        match row.map(|row| decode_column(&row, 0)).transpose()? {
            None | Some(SqlValue::Null) => Ok(0),
            Some(SqlValue::Integer(n)) => Ok(n),
            Some(SqlValue::Real(r)) => Ok(r as i64),
            Some(other) => Err(DataError::mapping(format!(
                "scalar query returned non-numeric value {other}"
            ))),
        }
    }
}
