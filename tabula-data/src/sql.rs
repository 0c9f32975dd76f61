//! SQL text generation for table-mapped repositories.
//!
//! [`SqlGenerator`] is the pluggable seam: a repository never builds SQL
//! strings itself, so a dialect that needs different paging or quoting can
//! be swapped in per repository. [`AnsiSqlGenerator`] is the default.
//!
//! Every generated statement uses positional placeholders, numbered in the
//! same order as the values the repository binds.

use serde::{Deserialize, Serialize};

use crate::page::{Direction, Pageable, Sort};
use crate::table::TableDescription;
use crate::value::ColumnMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    #[default]
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders with backtick quoting.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Generic | Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Dialect::Generic),
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            other => Err(format!("unknown SQL dialect: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierPolicy {
    /// Do not validate or quote identifiers.
    Raw,
    /// Validate identifiers against a conservative pattern.
    #[default]
    Validate,
    /// Validate and quote identifiers using the dialect quoting style.
    Quote,
}

impl std::str::FromStr for IdentifierPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(IdentifierPolicy::Raw),
            "validate" => Ok(IdentifierPolicy::Validate),
            "quote" => Ok(IdentifierPolicy::Quote),
            other => Err(format!("unknown identifier policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
    /// INSERT/UPDATE requested with nothing to write.
    EmptyColumns { table: String },
    /// `page * size` does not fit a row offset.
    PageOutOfRange { page: u64, size: u64 },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
            QueryError::EmptyColumns { table } => {
                write!(f, "No columns to write for table {table}")
            }
            QueryError::PageOutOfRange { page, size } => {
                write!(f, "Page {page} of size {size} is out of range")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Produces the SQL text for every repository operation.
///
/// Implementations must be pure: same inputs, same text, no I/O.
pub trait SqlGenerator: Send + Sync {
    fn count(&self, table: &TableDescription) -> Result<String, QueryError>;

    /// Count of rows matching one identity value (one placeholder).
    fn count_by_id(&self, table: &TableDescription) -> Result<String, QueryError>;

    fn select_all(&self, table: &TableDescription) -> Result<String, QueryError>;

    fn select_all_sorted(&self, table: &TableDescription, sort: &Sort) -> Result<String, QueryError>;

    fn select_all_paged(
        &self,
        table: &TableDescription,
        pageable: &Pageable,
    ) -> Result<String, QueryError>;

    fn select_by_id(&self, table: &TableDescription) -> Result<String, QueryError>;

    /// INSERT over exactly the keys of `columns`, in their iteration order.
    fn create(&self, table: &TableDescription, columns: &ColumnMap) -> Result<String, QueryError>;

    /// UPDATE setting the keys of `columns` (identity excluded by the caller),
    /// with the identity placeholder last.
    fn update(&self, table: &TableDescription, columns: &ColumnMap) -> Result<String, QueryError>;

    fn delete_by_id(&self, table: &TableDescription) -> Result<String, QueryError>;

    fn delete_all(&self, table: &TableDescription) -> Result<String, QueryError>;

    /// Identity column as written in generated statements, for executors that
    /// append it themselves (e.g. `RETURNING`).
    fn key_column(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(table.id_column().to_string())
    }
}

/// Standard SQL generator with configurable placeholder and quoting style.
///
/// # Example
///
/// ```ignore
/// let sql = AnsiSqlGenerator::default().update(&users, &columns)?;
/// assert_eq!(sql, "UPDATE users SET name = ? WHERE id = ?");
///
/// let pg = AnsiSqlGenerator::new(Dialect::Postgres);
/// assert_eq!(pg.select_by_id(&users)?, "SELECT * FROM users WHERE id = $1");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiSqlGenerator {
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

impl AnsiSqlGenerator {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            identifier_policy: IdentifierPolicy::default(),
        }
    }

    /// Configure identifier validation/quoting behavior.
    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn table_name(&self, table: &TableDescription) -> Result<String, QueryError> {
        self.format_identifier(table.name(), false, "table")
    }

    fn id_column(&self, table: &TableDescription) -> Result<String, QueryError> {
        self.format_identifier(table.id_column(), false, "column")
    }

    fn projection(&self, table: &TableDescription) -> Result<String, QueryError> {
        if table.select_columns().is_empty() {
            return Ok("*".to_string());
        }
        let mut out = Vec::with_capacity(table.select_columns().len());
        for col in table.select_columns() {
            out.push(self.format_identifier(col, true, "column")?);
        }
        Ok(out.join(", "))
    }

    fn append_order(&self, sql: &mut String, sort: &Sort) -> Result<(), QueryError> {
        if sort.is_unsorted() {
            return Ok(());
        }
        sql.push_str(" ORDER BY ");
        let mut clauses = Vec::with_capacity(sort.orders().len());
        for order in sort.orders() {
            let col = self.format_identifier(&order.property, false, "sort")?;
            match order.direction {
                Direction::Asc => clauses.push(format!("{col} ASC")),
                Direction::Desc => clauses.push(format!("{col} DESC")),
            }
        }
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn format_identifier(
        &self,
        ident: &str,
        allow_star: bool,
        kind: &'static str,
    ) -> Result<String, QueryError> {
        if self.identifier_policy == IdentifierPolicy::Raw {
            return Ok(ident.to_string());
        }
        if !is_valid_identifier(ident, allow_star) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Quote => Ok(quote_identifier(ident, self.dialect, allow_star)),
            IdentifierPolicy::Raw | IdentifierPolicy::Validate => Ok(ident.to_string()),
        }
    }
}

impl SqlGenerator for AnsiSqlGenerator {
    fn count(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(format!("SELECT COUNT(*) FROM {}", self.table_name(table)?))
    }

    fn count_by_id(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(format!(
            "SELECT COUNT(*) FROM {} WHERE {} = {}",
            self.table_name(table)?,
            self.id_column(table)?,
            self.dialect.placeholder(1)
        ))
    }

    fn select_all(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(format!(
            "SELECT {} FROM {}",
            self.projection(table)?,
            self.table_name(table)?
        ))
    }

    fn select_all_sorted(&self, table: &TableDescription, sort: &Sort) -> Result<String, QueryError> {
        let mut sql = self.select_all(table)?;
        self.append_order(&mut sql, sort)?;
        Ok(sql)
    }

    fn select_all_paged(
        &self,
        table: &TableDescription,
        pageable: &Pageable,
    ) -> Result<String, QueryError> {
        let offset = pageable.offset().ok_or(QueryError::PageOutOfRange {
            page: pageable.page,
            size: pageable.size,
        })?;
        let mut sql = self.select_all_sorted(table, &pageable.sort)?;
        sql.push_str(&format!(" LIMIT {} OFFSET {offset}", pageable.size));
        Ok(sql)
    }

    fn select_by_id(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(format!(
            "{} WHERE {} = {}",
            self.select_all(table)?,
            self.id_column(table)?,
            self.dialect.placeholder(1)
        ))
    }

    fn create(&self, table: &TableDescription, columns: &ColumnMap) -> Result<String, QueryError> {
        let table_name = self.table_name(table)?;
        if columns.is_empty() {
            return Err(QueryError::EmptyColumns { table: table_name });
        }
        let mut names = Vec::with_capacity(columns.len());
        let mut placeholders = Vec::with_capacity(columns.len());
        for (idx, col) in columns.keys().enumerate() {
            names.push(self.format_identifier(col, false, "column")?);
            placeholders.push(self.dialect.placeholder(idx + 1));
        }
        Ok(format!(
            "INSERT INTO {table_name} ({}) VALUES ({})",
            names.join(", "),
            placeholders.join(", ")
        ))
    }

    fn update(&self, table: &TableDescription, columns: &ColumnMap) -> Result<String, QueryError> {
        let table_name = self.table_name(table)?;
        if columns.is_empty() {
            return Err(QueryError::EmptyColumns { table: table_name });
        }
        let mut assignments = Vec::with_capacity(columns.len());
        for (idx, col) in columns.keys().enumerate() {
            let col = self.format_identifier(col, false, "column")?;
            assignments.push(format!("{col} = {}", self.dialect.placeholder(idx + 1)));
        }
        Ok(format!(
            "UPDATE {table_name} SET {} WHERE {} = {}",
            assignments.join(", "),
            self.id_column(table)?,
            self.dialect.placeholder(columns.len() + 1)
        ))
    }

    fn delete_by_id(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(format!(
            "DELETE FROM {} WHERE {} = {}",
            self.table_name(table)?,
            self.id_column(table)?,
            self.dialect.placeholder(1)
        ))
    }

    fn delete_all(&self, table: &TableDescription) -> Result<String, QueryError> {
        Ok(format!("DELETE FROM {}", self.table_name(table)?))
    }

    fn key_column(&self, table: &TableDescription) -> Result<String, QueryError> {
        self.id_column(table)
    }
}

fn is_valid_identifier(ident: &str, allow_star: bool) -> bool {
    if ident.is_empty() {
        return false;
    }
    let parts: Vec<&str> = ident.split('.').collect();
    for (idx, part) in parts.iter().enumerate() {
        if allow_star && *part == "*" {
            return idx + 1 == parts.len();
        }
        if !is_valid_segment(part) {
            return false;
        }
    }
    true
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(ident: &str, dialect: Dialect, allow_star: bool) -> String {
    let quote = dialect.quote_char();
    let parts: Vec<&str> = ident.split('.').collect();
    let last_idx = parts.len().saturating_sub(1);
    parts
        .into_iter()
        .enumerate()
        .map(|(idx, part)| {
            if allow_star && part == "*" && idx == last_idx {
                part.to_string()
            } else {
                format!("{quote}{part}{quote}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
