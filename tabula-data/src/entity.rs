use crate::value::SqlValue;

/// Trait representing an entity persisted as one table row.
///
/// The identity is optional: `None` means the row does not exist yet and the
/// database is expected to generate the key on insert.
///
/// # Example
///
/// ```ignore
/// impl Persistable for User {
///     type Id = i64;
///     fn id(&self) -> Option<i64> { self.id }
/// }
/// ```
pub trait Persistable: Send + Sync + 'static {
    type Id: Clone + Into<SqlValue> + Send + Sync + 'static;

    fn id(&self) -> Option<Self::Id>;

    /// Whether `save` should insert rather than update.
    ///
    /// Override for entities with caller-assigned keys that carry an explicit
    /// "new" flag.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}
