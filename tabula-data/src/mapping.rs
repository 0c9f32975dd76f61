//! Conversions between entities and table rows.
//!
//! [`RowMapper`] reads one fetched [`Row`] into an entity; [`RowUnmapper`]
//! turns an entity into the ordered [`ColumnMap`] that gets persisted. Plain
//! closures implement both traits:
//!
//! ```ignore
//! let mapper = |row: &Row| -> Result<User, DataError> {
//!     Ok(User { id: row.try_get("id")?, name: row.try_get("name")? })
//! };
//! let unmapper = |user: &User| -> Result<ColumnMap, DataError> {
//!     Ok(columns([("id", user.id.into()), ("name", user.name.as_str().into())]))
//! };
//! ```

use std::marker::PhantomData;

use crate::error::DataError;
use crate::value::{ColumnMap, Row};

/// Converts one fetched row into a fully populated entity.
///
/// Implementations must not touch the database.
pub trait RowMapper<T>: Send + Sync {
    fn map_row(&self, row: &Row) -> Result<T, DataError>;
}

impl<T, F> RowMapper<T> for F
where
    F: Fn(&Row) -> Result<T, DataError> + Send + Sync,
{
    fn map_row(&self, row: &Row) -> Result<T, DataError> {
        self(row)
    }
}

/// Converts an entity into the exact columns to persist, in a stable order.
///
/// Every key must be a column of the table, and the identity column must be
/// present (its value may be `SqlValue::Null` for not-yet-inserted entities).
pub trait RowUnmapper<T>: Send + Sync {
    fn map_columns(&self, entity: &T) -> Result<ColumnMap, DataError>;
}

impl<T, F> RowUnmapper<T> for F
where
    F: Fn(&T) -> Result<ColumnMap, DataError> + Send + Sync,
{
    fn map_columns(&self, entity: &T) -> Result<ColumnMap, DataError> {
        self(entity)
    }
}

/// Unmapper for read-only repositories: every write path fails with
/// `DataError::UnsupportedOperation`.
pub struct MissingRowUnmapper<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> MissingRowUnmapper<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for MissingRowUnmapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RowUnmapper<T> for MissingRowUnmapper<T> {
    fn map_columns(&self, _entity: &T) -> Result<ColumnMap, DataError> {
        Err(DataError::unsupported(
            "this repository has no RowUnmapper and cannot persist entities",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{columns, SqlValue};

    struct Tag {
        id: Option<i64>,
        label: String,
    }

    #[test]
    fn closures_act_as_mappers() {
        let mapper = |row: &Row| -> Result<Tag, DataError> {
            Ok(Tag {
                id: row.try_get("id")?,
                label: row.try_get("label")?,
            })
        };
        let row = Row::new().with_value("id", 3i64).with_value("label", "rust");
        let tag = mapper.map_row(&row).unwrap();
        assert_eq!(tag.id, Some(3));
        assert_eq!(tag.label, "rust");

        let unmapper = |tag: &Tag| -> Result<ColumnMap, DataError> {
            Ok(columns([
                ("id", SqlValue::from(tag.id)),
                ("label", SqlValue::from(tag.label.as_str())),
            ]))
        };
        let cols = unmapper.map_columns(&tag).unwrap();
        assert_eq!(cols["label"], SqlValue::Text("rust".into()));
    }

    #[test]
    fn missing_unmapper_is_unsupported() {
        let unmapper = MissingRowUnmapper::<Tag>::new();
        let tag = Tag {
            id: None,
            label: "x".into(),
        };
        assert!(matches!(
            unmapper.map_columns(&tag),
            Err(DataError::UnsupportedOperation(_))
        ));
    }
}
