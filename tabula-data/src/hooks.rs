use crate::error::DataError;
use crate::value::{ColumnMap, SqlValue};

/// Extension points around the write paths of a repository.
///
/// Every method defaults to passing its input through unchanged. Implement
/// only the ones you need and hand the value to
/// [`TableRepository::with_hooks`](crate::TableRepository::with_hooks).
pub trait RepositoryHooks<T>: Send + Sync {
    /// Adjust the columns of a new entity before the INSERT is generated.
    fn pre_create(&self, columns: ColumnMap, _entity: &T) -> Result<ColumnMap, DataError> {
        Ok(columns)
    }

    /// Called after a successful INSERT. `generated_key` is `Some` only when
    /// the identity was left to the database and the driver reported it.
    fn post_create(&self, entity: T, _generated_key: Option<SqlValue>) -> Result<T, DataError> {
        Ok(entity)
    }

    /// Adjust the columns of an existing entity before the UPDATE is generated.
    fn pre_update(&self, _entity: &T, columns: ColumnMap) -> Result<ColumnMap, DataError> {
        Ok(columns)
    }

    fn post_update(&self, entity: T) -> Result<T, DataError> {
        Ok(entity)
    }
}

/// Hooks that leave everything untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<T> RepositoryHooks<T> for NoHooks {}

/// Hooks that write the database-generated key back into the entity.
///
/// Built by [`stamp_generated_key`].
pub struct StampGeneratedKey<F> {
    stamp: F,
}

/// Stamp generated keys onto new entities in `post_create`.
///
/// ```ignore
/// let repo = TableRepository::new(executor, mapper, unmapper, users)
///     .with_hooks(stamp_generated_key(|mut user: User, key| {
///         user.id = Some(i64::from_sql_value(&key, "id")?);
///         Ok(user)
///     }));
/// ```
pub fn stamp_generated_key<T, F>(stamp: F) -> StampGeneratedKey<F>
where
    F: Fn(T, SqlValue) -> Result<T, DataError> + Send + Sync,
{
    StampGeneratedKey { stamp }
}

impl<T, F> RepositoryHooks<T> for StampGeneratedKey<F>
where
    F: Fn(T, SqlValue) -> Result<T, DataError> + Send + Sync,
{
    fn post_create(&self, entity: T, generated_key: Option<SqlValue>) -> Result<T, DataError> {
        match generated_key {
            Some(key) => (self.stamp)(entity, key),
            None => Ok(entity),
        }
    }
}
