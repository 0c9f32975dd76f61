//! # tabula-data-sqlx: SQLx backend for the Tabula data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! executor for Tabula's data access layer. It depends on [`tabula-data`] for
//! the repository, generator and mapping contracts, and adds the
//! [`SqlExecutor`](tabula_data::SqlExecutor) implementation and error bridging
//! needed to talk to a real database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxExecutor`] | `SqlExecutor` over an `sqlx::AnyPool` |
//! | [`SqlxRepository<T>`] | `TableRepository<T, SqlxExecutor>` |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! # Quick start
//!
//! ```ignore
//! use tabula_data::prelude::*;
//! use tabula_data_sqlx::{SqlxExecutor, SqlxRepository};
//!
//! let config = DataConfig::load("tabula.yaml")?;
//! let executor = SqlxExecutor::connect(&config.datasource).await?;
//! let users: SqlxRepository<User> =
//!     TableRepository::new(executor, map_user, unmap_user, TableDescription::new("users", "id")?)
//!         .with_generator(AnsiSqlGenerator::from_config(&config.sql));
//! ```
//!
//! # Generated keys
//!
//! PostgreSQL inserts get `RETURNING <id column>` appended; every other
//! backend reports the key through the driver's last-insert id.

pub mod error;
pub mod executor;
mod row;

pub use error::{SqlxErrorExt, SqlxResult};
pub use executor::SqlxExecutor;

/// A table repository running on [`SqlxExecutor`].
pub type SqlxRepository<T> = tabula_data::TableRepository<T, SqlxExecutor>;

/// Re-exports of the most commonly used types from both `tabula-data` and this crate.
pub mod prelude {
    pub use crate::{SqlxErrorExt, SqlxExecutor, SqlxRepository};
    pub use tabula_data::prelude::*;
}
