use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single SQL parameter or column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Bool(bool),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
            SqlValue::Bool(_) => "bool",
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Real(r) => write!(f, "{r}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
            SqlValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
            SqlValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

macro_rules! sql_value_from {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::$variant(<$conv>::from(v))
                }
            }
        )*
    };
}

sql_value_from! {
    i8 => Integer as i64,
    i16 => Integer as i64,
    i32 => Integer as i64,
    i64 => Integer as i64,
    u8 => Integer as i64,
    u16 => Integer as i64,
    u32 => Integer as i64,
    f32 => Real as f64,
    f64 => Real as f64,
    bool => Bool as bool,
    String => Text as String,
    Vec<u8> => Blob as Vec<u8>,
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Ordered column name → value mapping for one row.
///
/// Positional parameters are bound in iteration order, so the order of this
/// map must match the column order of the generated statement.
pub type ColumnMap = IndexMap<String, SqlValue>;

/// Build a [`ColumnMap`] from `(column, value)` pairs, keeping their order.
///
/// ```ignore
/// let columns = columns([("id", user.id.into()), ("name", user.name.clone().into())]);
/// ```
pub fn columns<K, I>(pairs: I) -> ColumnMap
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SqlValue)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// One fetched row, keyed by column name in select order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, SqlValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.values.insert(column.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: SqlValue) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    /// Get a typed value for the given column.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Mapping` if the column is absent or its value
    /// cannot be converted to `V`.
    pub fn try_get<V: FromSqlValue>(&self, column: &str) -> Result<V, DataError> {
        let value = self
            .values
            .get(column)
            .ok_or_else(|| DataError::mapping(format!("column '{column}' not present in row")))?;
        V::from_sql_value(value, column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<ColumnMap> for Row {
    fn from(values: ColumnMap) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Trait for converting a [`SqlValue`] into a concrete Rust type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be read from a SQL column",
    note = "built-in types: i64, i32, f64, bool, String, Vec<u8>, Option<T>. Implement `FromSqlValue` for custom types."
)]
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError>;
}

fn mismatch(value: &SqlValue, column: &str, expected: &str) -> DataError {
    DataError::mapping(format!(
        "column '{column}': expected {expected}, found {}",
        value.kind()
    ))
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        match value {
            SqlValue::Integer(i) => Ok(*i),
            SqlValue::Bool(b) => Ok(i64::from(*b)),
            other => Err(mismatch(other, column, "integer")),
        }
    }
}

impl FromSqlValue for i32 {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        let wide = i64::from_sql_value(value, column)?;
        i32::try_from(wide)
            .map_err(|_| DataError::mapping(format!("column '{column}': {wide} overflows i32")))
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        match value {
            SqlValue::Real(r) => Ok(*r),
            SqlValue::Integer(i) => Ok(*i as f64),
            other => Err(mismatch(other, column, "real")),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        match value {
            SqlValue::Bool(b) => Ok(*b),
            // SQLite and MySQL store booleans as 0/1 integers
            SqlValue::Integer(i) => Ok(*i != 0),
            other => Err(mismatch(other, column, "bool")),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            other => Err(mismatch(other, column, "text")),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        match value {
            SqlValue::Blob(b) => Ok(b.clone()),
            other => Err(mismatch(other, column, "blob")),
        }
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: &SqlValue, _column: &str) -> Result<Self, DataError> {
        Ok(value.clone())
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: &SqlValue, column: &str) -> Result<Self, DataError> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other, column).map(Some),
        }
    }
}

impl From<SqlValue> for serde_json::Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Integer(i) => serde_json::Value::from(i),
            SqlValue::Real(r) => serde_json::Value::from(r),
            SqlValue::Text(s) => serde_json::Value::String(s),
            SqlValue::Blob(b) => serde_json::Value::from(b),
            SqlValue::Bool(b) => serde_json::Value::Bool(b),
        }
    }
}
