//! Conversions between `SqlValue` parameters/rows and the sqlx `Any` driver.

use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};
use tabula_data::{DataError, Row, SqlValue};

use crate::error::SqlxErrorExt;

pub(crate) type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// Bind every value positionally, in slice order.
pub(crate) fn bind_params<'q>(mut query: AnyQuery<'q>, params: &[SqlValue]) -> AnyQuery<'q> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(r) => query.bind(*r),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Blob(b) => query.bind(b.clone()),
            SqlValue::Bool(b) => query.bind(*b),
        };
    }
    query
}

pub(crate) fn to_row(row: &AnyRow) -> Result<Row, DataError> {
    let mut out = Row::new();
    for column in row.columns() {
        out.insert(column.name(), decode_column(row, column.ordinal())?);
    }
    Ok(out)
}

/// Decode one column into the closest `SqlValue`.
///
/// The Any driver only reports a coarse type, so candidate Rust types are
/// tried from the narrowest match outwards.
pub(crate) fn decode_column(row: &AnyRow, idx: usize) -> Result<SqlValue, DataError> {
    let raw = row.try_get_raw(idx).map_err(|e| e.into_data_error())?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }
    let type_name = raw.type_info().name().to_string();

    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(SqlValue::Integer(v));
    }
    if let Ok(v) = row.try_get::<i32, _>(idx) {
        return Ok(SqlValue::Integer(v.into()));
    }
    if let Ok(v) = row.try_get::<i16, _>(idx) {
        return Ok(SqlValue::Integer(v.into()));
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(SqlValue::Real(v));
    }
    if let Ok(v) = row.try_get::<f32, _>(idx) {
        return Ok(SqlValue::Real(v.into()));
    }
    if let Ok(v) = row.try_get::<bool, _>(idx) {
        return Ok(SqlValue::Bool(v));
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Ok(SqlValue::Text(v));
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
        return Ok(SqlValue::Blob(v));
    }
    Err(DataError::mapping(format!(
        "column {idx} has unsupported type {type_name}"
    )))
}
