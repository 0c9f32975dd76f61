#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tabula_data::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Execute {
        sql: String,
        params: Vec<SqlValue>,
    },
    ExecuteReturningKey {
        sql: String,
        params: Vec<SqlValue>,
        id_column: String,
    },
    Query {
        sql: String,
        params: Vec<SqlValue>,
    },
    QueryScalar {
        sql: String,
        params: Vec<SqlValue>,
    },
}

impl Call {
    pub fn sql(&self) -> &str {
        match self {
            Call::Execute { sql, .. }
            | Call::ExecuteReturningKey { sql, .. }
            | Call::Query { sql, .. }
            | Call::QueryScalar { sql, .. } => sql,
        }
    }
}

/// Executor that records every statement and answers from canned values.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    rows: Mutex<Vec<Row>>,
    scalar: Mutex<i64>,
    generated_key: Mutex<Option<SqlValue>>,
    fail_execute_at: Option<usize>,
    executes: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            scalar: Mutex::new(0),
            generated_key: Mutex::new(Some(SqlValue::Integer(1))),
            ..Default::default()
        }
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        *self.rows.lock().unwrap() = rows;
        self
    }

    pub fn with_scalar(self, value: i64) -> Self {
        *self.scalar.lock().unwrap() = value;
        self
    }

    pub fn with_generated_key(self, key: Option<SqlValue>) -> Self {
        *self.generated_key.lock().unwrap() = key;
        self
    }

    /// Make the n-th (1-based) `execute` call fail with a database error.
    pub fn failing_execute_at(mut self, n: usize) -> Self {
        self.fail_execute_at = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SqlExecutor for RecordingExecutor {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DataError> {
        let n = self.executes.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(Call::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        if self.fail_execute_at == Some(n) {
            return Err(DataError::database(std::io::Error::new(
                std::io::ErrorKind::Other,
                "constraint violated",
            )));
        }
        Ok(1)
    }

    async fn execute_returning_key(
        &self,
        sql: &str,
        params: &[SqlValue],
        id_column: &str,
    ) -> Result<Option<SqlValue>, DataError> {
        self.record(Call::ExecuteReturningKey {
            sql: sql.to_string(),
            params: params.to_vec(),
            id_column: id_column.to_string(),
        });
        Ok(self.generated_key.lock().unwrap().clone())
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, DataError> {
        self.record(Call::Query {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn query_scalar(&self, sql: &str, params: &[SqlValue]) -> Result<i64, DataError> {
        self.record(Call::QueryScalar {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        Ok(*self.scalar.lock().unwrap())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
}

impl User {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }

    pub fn with_id(id: i64, name: &str) -> Self {
        Self {
            id: Some(id),
            name: name.to_string(),
        }
    }
}

impl Persistable for User {
    type Id = i64;

    fn id(&self) -> Option<i64> {
        self.id
    }
}

pub fn map_user(row: &Row) -> Result<User, DataError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

pub fn unmap_user(user: &User) -> Result<ColumnMap, DataError> {
    Ok(columns([
        ("id", SqlValue::from(user.id)),
        ("name", SqlValue::from(user.name.as_str())),
    ]))
}

pub fn user_row(id: i64, name: &str) -> Row {
    Row::new().with_value("id", id).with_value("name", name)
}

pub fn users_table() -> TableDescription {
    TableDescription::new("users", "id").unwrap()
}

pub fn user_repository(executor: RecordingExecutor) -> TableRepository<User, RecordingExecutor> {
    TableRepository::new(executor, map_user, unmap_user, users_table()).with_hooks(
        stamp_generated_key(|mut user: User, key| {
            user.id = Some(i64::from_sql_value(&key, "id")?);
            Ok(user)
        }),
    )
}
