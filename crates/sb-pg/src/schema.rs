/// Table metadata and idempotent DDL.
///
/// Implementors describe one table; [`bootstrap`](crate::bootstrap) runs
/// the statements at startup. Every statement must be safe to re-run
/// against an existing database (`IF NOT EXISTS` throughout).
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns the `CREATE TABLE IF NOT EXISTS` statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}
