//! # tabula-data: table-mapped repositories
//!
//! Maps typed entities to rows of one named table and implements the full
//! CRUD, sorting and paging contract on top of three collaborators:
//!
//! | Collaborator | Role |
//! |--------------|------|
//! | [`RowMapper`] / [`RowUnmapper`] | entity ↔ row conversion |
//! | [`SqlGenerator`] | SQL text for every operation ([`AnsiSqlGenerator`] by default) |
//! | [`SqlExecutor`] | runs the SQL (see `tabula-data-sqlx` for an sqlx-backed one) |
//!
//! `save` decides between INSERT and UPDATE from [`Persistable::is_new`]
//! alone; no existence query is issued.

pub mod config;
pub mod crud;
pub mod entity;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod mapping;
pub mod page;
pub mod repository;
pub mod sql;
pub mod table;
pub mod value;

pub use config::{ConfigError, DataConfig, DataSourceConfig, SqlConfig};
pub use crud::TableRepository;
pub use entity::Persistable;
pub use error::DataError;
pub use executor::SqlExecutor;
pub use hooks::{stamp_generated_key, NoHooks, RepositoryHooks, StampGeneratedKey};
pub use mapping::{MissingRowUnmapper, RowMapper, RowUnmapper};
pub use page::{Direction, Order, Page, Pageable, Sort};
pub use repository::Repository;
pub use sql::{AnsiSqlGenerator, Dialect, IdentifierPolicy, QueryError, SqlGenerator};
pub use table::TableDescription;
pub use value::{columns, ColumnMap, FromSqlValue, Row, SqlValue};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        columns, stamp_generated_key, AnsiSqlGenerator, ColumnMap, DataError, FromSqlValue,
        Page, Pageable, Persistable, Repository, Row, RowMapper, RowUnmapper, Sort, SqlExecutor,
        SqlValue, TableDescription, TableRepository,
    };
}
