use crate::error::DataError;

/// Name and identity column of the table a repository maps to.
///
/// Immutable once built; share it freely between repositories and threads.
///
/// # Example
///
/// ```ignore
/// let users = TableDescription::new("users", "id")?;
/// let audit = TableDescription::with_default_id("audit_log")?
///     .with_select_columns(["id", "event", "created_at"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    name: String,
    id_column: String,
    select_columns: Vec<String>,
}

impl TableDescription {
    pub const DEFAULT_ID_COLUMN: &'static str = "id";

    /// # Errors
    ///
    /// Returns `DataError::InvalidTable` if either name is blank.
    pub fn new(name: impl Into<String>, id_column: impl Into<String>) -> Result<Self, DataError> {
        let name = name.into();
        let id_column = id_column.into();
        if name.trim().is_empty() {
            return Err(DataError::InvalidTable("table name must not be empty".into()));
        }
        if id_column.trim().is_empty() {
            return Err(DataError::InvalidTable(format!(
                "identity column of '{name}' must not be empty"
            )));
        }
        Ok(Self {
            name,
            id_column,
            select_columns: Vec::new(),
        })
    }

    /// Describe a table whose identity column is `id`.
    pub fn with_default_id(name: impl Into<String>) -> Result<Self, DataError> {
        Self::new(name, Self::DEFAULT_ID_COLUMN)
    }

    /// Restrict select statements to the given columns instead of `*`.
    pub fn with_select_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Projected columns; empty means every column (`*`).
    pub fn select_columns(&self) -> &[String] {
        &self.select_columns
    }
}
