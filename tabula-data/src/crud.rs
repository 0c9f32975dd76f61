use std::sync::Arc;

use tracing::debug;

use crate::entity::Persistable;
use crate::error::DataError;
use crate::executor::SqlExecutor;
use crate::hooks::{NoHooks, RepositoryHooks};
use crate::mapping::{MissingRowUnmapper, RowMapper, RowUnmapper};
use crate::page::{Page, Pageable, Sort};
use crate::repository::Repository;
use crate::sql::{AnsiSqlGenerator, SqlGenerator};
use crate::table::TableDescription;
use crate::value::{ColumnMap, SqlValue};

/// A generic table-mapped repository implementation.
///
/// Combines a [`TableDescription`], a row mapper/unmapper pair, a
/// [`SqlGenerator`] and an executor into the full [`Repository`] contract.
/// It holds no mutable state: every call is one (or, for paging and
/// batches, a few) independent statements on the executor.
///
/// # Example
///
/// ```ignore
/// let users = TableDescription::new("users", "id")?;
/// let repo = TableRepository::new(executor, map_user, unmap_user, users)
///     .with_generator(AnsiSqlGenerator::new(Dialect::Postgres))
///     .with_hooks(stamp_generated_key(|mut user: User, key| {
///         user.id = Some(i64::from_sql_value(&key, "id")?);
///         Ok(user)
///     }));
///
/// let ann = repo.save(User { id: None, name: "Ann".into() }).await?;
/// let page = repo.find_all_paged(&Pageable::new(0, 20)).await?;
/// ```
pub struct TableRepository<T, E> {
    executor: E,
    table: TableDescription,
    generator: Arc<dyn SqlGenerator>,
    mapper: Arc<dyn RowMapper<T>>,
    unmapper: Arc<dyn RowUnmapper<T>>,
    hooks: Arc<dyn RepositoryHooks<T>>,
}

impl<T, E> TableRepository<T, E>
where
    T: Persistable,
    E: SqlExecutor,
{
    /// Build a read-write repository using the default [`AnsiSqlGenerator`].
    pub fn new(
        executor: E,
        mapper: impl RowMapper<T> + 'static,
        unmapper: impl RowUnmapper<T> + 'static,
        table: TableDescription,
    ) -> Self {
        Self {
            executor,
            table,
            generator: Arc::new(AnsiSqlGenerator::default()),
            mapper: Arc::new(mapper),
            unmapper: Arc::new(unmapper),
            hooks: Arc::new(NoHooks),
        }
    }

    /// Build a repository without an unmapper; `save`, `create` and `update`
    /// fail with `DataError::UnsupportedOperation`.
    pub fn read_only(executor: E, mapper: impl RowMapper<T> + 'static, table: TableDescription) -> Self {
        Self::new(executor, mapper, MissingRowUnmapper::new(), table)
    }

    /// Replace the SQL generator (e.g. for a different dialect).
    pub fn with_generator(mut self, generator: impl SqlGenerator + 'static) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    /// Share one generator between several repositories.
    pub fn with_shared_generator(mut self, generator: Arc<dyn SqlGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_hooks(mut self, hooks: impl RepositoryHooks<T> + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    pub fn table(&self) -> &TableDescription {
        &self.table
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    /// INSERT the entity.
    ///
    /// Without an identity the identity column is dropped from the statement
    /// and the generated key is requested from the database; with one, the
    /// identity is inserted like any other column.
    pub async fn create(&self, entity: T) -> Result<T, DataError> {
        let columns = self.hooks.pre_create(self.columns(&entity)?, &entity)?;
        if entity.id().is_none() {
            self.create_with_generated_key(entity, columns).await
        } else {
            self.create_with_assigned_key(entity, columns).await
        }
    }

    /// UPDATE the row identified by the entity's identity column.
    pub async fn update(&self, entity: T) -> Result<T, DataError> {
        let mut columns = self.hooks.pre_update(&entity, self.columns(&entity)?)?;
        // shift_remove keeps the remaining columns in unmapper order
        let id_value = columns.shift_remove(self.table.id_column()).ok_or_else(|| {
            DataError::mapping(format!(
                "columns of {} are missing identity column '{}'",
                self.table.name(),
                self.table.id_column()
            ))
        })?;
        let sql = self.generator.update(&self.table, &columns)?;
        let mut params: Vec<SqlValue> = columns.into_values().collect();
        params.push(id_value);

        debug!(table = self.table.name(), %sql, ?params, "Updating entity");
        self.executor.execute(&sql, &params).await?;
        self.hooks.post_update(entity)
    }

    async fn create_with_generated_key(&self, entity: T, mut columns: ColumnMap) -> Result<T, DataError> {
        columns.shift_remove(self.table.id_column());
        let sql = self.generator.create(&self.table, &columns)?;
        let key_column = self.generator.key_column(&self.table)?;
        let params: Vec<SqlValue> = columns.into_values().collect();

        debug!(table = self.table.name(), %sql, ?params, "Inserting entity with generated key");
        let key = self
            .executor
            .execute_returning_key(&sql, &params, &key_column)
            .await?;
        self.hooks.post_create(entity, key)
    }

    async fn create_with_assigned_key(&self, entity: T, columns: ColumnMap) -> Result<T, DataError> {
        let sql = self.generator.create(&self.table, &columns)?;
        let params: Vec<SqlValue> = columns.into_values().collect();

        debug!(table = self.table.name(), %sql, ?params, "Inserting entity with assigned key");
        self.executor.execute(&sql, &params).await?;
        self.hooks.post_create(entity, None)
    }

    fn columns(&self, entity: &T) -> Result<ColumnMap, DataError> {
        self.unmapper.map_columns(entity)
    }

    async fn query_entities(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<T>, DataError> {
        debug!(table = self.table.name(), %sql, ?params, "Querying entities");
        let rows = self.executor.query(sql, params).await?;
        rows.iter().map(|row| self.mapper.map_row(row)).collect()
    }

    async fn delete_row(&self, id: SqlValue) -> Result<bool, DataError> {
        let sql = self.generator.delete_by_id(&self.table)?;
        debug!(table = self.table.name(), %sql, ?id, "Deleting row");
        let affected = self.executor.execute(&sql, &[id]).await?;
        Ok(affected > 0)
    }
}

impl<T, E> Repository<T, T::Id> for TableRepository<T, E>
where
    T: Persistable,
    E: SqlExecutor,
{
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, DataError> {
        let sql = self.generator.select_by_id(&self.table)?;
        let params: [SqlValue; 1] = [id.clone().into()];
        debug!(table = self.table.name(), %sql, ?params, "Finding entity by id");
        let rows = self.executor.query(&sql, &params).await?;
        rows.first().map(|row| self.mapper.map_row(row)).transpose()
    }

    async fn exists_by_id(&self, id: &T::Id) -> Result<bool, DataError> {
        let sql = self.generator.count_by_id(&self.table)?;
        let params: [SqlValue; 1] = [id.clone().into()];
        debug!(table = self.table.name(), %sql, ?params, "Checking entity existence");
        Ok(self.executor.query_scalar(&sql, &params).await? > 0)
    }

    async fn find_all(&self) -> Result<Vec<T>, DataError> {
        let sql = self.generator.select_all(&self.table)?;
        self.query_entities(&sql, &[]).await
    }

    async fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<T>, DataError> {
        let sql = self.generator.select_all_sorted(&self.table, sort)?;
        self.query_entities(&sql, &[]).await
    }

    async fn find_all_paged(&self, pageable: &Pageable) -> Result<Page<T>, DataError> {
        let sql = self.generator.select_all_paged(&self.table, pageable)?;
        let content = self.query_entities(&sql, &[]).await?;
        let total = self.count().await?;
        Ok(Page::new(content, pageable, total))
    }

    async fn count(&self) -> Result<u64, DataError> {
        let sql = self.generator.count(&self.table)?;
        debug!(table = self.table.name(), %sql, "Counting rows");
        let count = self.executor.query_scalar(&sql, &[]).await?;
        u64::try_from(count).map_err(|_| DataError::mapping(format!("negative row count {count}")))
    }

    async fn save(&self, entity: T) -> Result<T, DataError> {
        if entity.is_new() {
            self.create(entity).await
        } else {
            self.update(entity).await
        }
    }

    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>, DataError> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save(entity).await?);
        }
        Ok(saved)
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, DataError> {
        self.delete_row(id.clone().into()).await
    }

    async fn delete_entity(&self, entity: &T) -> Result<bool, DataError> {
        match entity.id() {
            Some(id) => self.delete_row(id.into()).await,
            None => {
                debug!(table = self.table.name(), "Skipping delete of entity without identity");
                Ok(false)
            }
        }
    }

    async fn delete_all_entities(&self, entities: &[T]) -> Result<(), DataError> {
        for entity in entities {
            self.delete_entity(entity).await?;
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, DataError> {
        let sql = self.generator.delete_all(&self.table)?;
        debug!(table = self.table.name(), %sql, "Deleting all rows");
        self.executor.execute(&sql, &[]).await
    }
}
