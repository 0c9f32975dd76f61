use crate::error::DataError;
use crate::page::{Page, Pageable, Sort};
use std::future::Future;

/// Generic async repository trait for CRUD, sorting and paging.
///
/// Uses RPITIT (return-position `impl Trait` in traits); no `async-trait` needed.
///
/// Batch operations (`save_all`, `delete_all_entities`) issue one statement
/// per element and stop at the first failure; elements already written stay
/// written.
pub trait Repository<T, ID>: Send + Sync
where
    T: Send + Sync + 'static,
    ID: Send + Sync + 'static,
{
    /// Returns `Ok(None)` when no row has this identity.
    fn find_by_id(&self, id: &ID) -> impl Future<Output = Result<Option<T>, DataError>> + Send;
    fn exists_by_id(&self, id: &ID) -> impl Future<Output = Result<bool, DataError>> + Send;
    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;
    fn find_all_sorted(&self, sort: &Sort) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;
    fn find_all_paged(&self, pageable: &Pageable) -> impl Future<Output = Result<Page<T>, DataError>> + Send;
    fn count(&self) -> impl Future<Output = Result<u64, DataError>> + Send;
    /// Insert when the entity is new, update otherwise.
    fn save(&self, entity: T) -> impl Future<Output = Result<T, DataError>> + Send;
    fn save_all(&self, entities: Vec<T>) -> impl Future<Output = Result<Vec<T>, DataError>> + Send;
    /// Returns whether a row was deleted.
    fn delete(&self, id: &ID) -> impl Future<Output = Result<bool, DataError>> + Send;
    fn delete_entity(&self, entity: &T) -> impl Future<Output = Result<bool, DataError>> + Send;
    fn delete_all_entities(&self, entities: &[T]) -> impl Future<Output = Result<(), DataError>> + Send;
    fn delete_all(&self) -> impl Future<Output = Result<u64, DataError>> + Send;
}
