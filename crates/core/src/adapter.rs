use crate::{Result, Version};

const COMMIT_SQL: &str = "COMMIT";

/// External-boundary contract a dialect implements to introspect and drive a
/// live database. Core never depends on a concrete driver; it only calls
/// through this trait, so the diff/plan/render pipeline stays testable
/// without a database.
pub trait DatabaseAdapter {
    /// Render the connected database's current schema as SQL DDL text, in the
    /// same dialect [`crate::Dialect::parse`] accepts.
    fn export_schema(&self) -> Result<String>;

    /// Execute one SQL statement against the live connection.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Start a transaction, returning a guard that must be committed
    /// explicitly; dropping it without committing leaves the transaction
    /// open on the connection, matching the underlying driver's behavior.
    fn begin(&mut self) -> Result<Transaction<'_>>;

    /// Schema search order in effect on the connection (e.g. PostgreSQL's
    /// `search_path`), used to resolve unqualified names during diffing.
    fn schema_search_path(&self) -> Vec<String>;

    fn server_version(&self) -> Result<Version>;
}

/// A started transaction borrowing its adapter. Dialects call
/// `Transaction::new` after sending their own `BEGIN` statement; `commit`
/// sends `COMMIT` through the same adapter.
pub struct Transaction<'a> {
    adapter: &'a mut dyn DatabaseAdapter,
}

impl<'a> Transaction<'a> {
    #[must_use]
    pub fn new(adapter: &'a mut dyn DatabaseAdapter) -> Self {
        Self { adapter }
    }

    pub fn execute(&mut self, sql: &str) -> Result<()> {
        self.adapter.execute(sql)
    }

    pub fn commit(self) -> Result<()> {
        self.adapter.execute(COMMIT_SQL)
    }
}
