use crate::QualifiedName;

/// A single unit of generated DDL, tagged with whether it may run inside the
/// surrounding transaction and (for dialects whose rendering is lossy, like
/// SQLite's rebuild strategy) which step of a larger operation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Sql {
        sql: String,
        transactional: bool,
        context: Option<StatementContext>,
    },
    /// Marks a dialect-specific batch boundary (e.g. MSSQL `GO`) that carries
    /// no SQL of its own and must not be wrapped in a transaction.
    BatchBoundary,
}

/// Extra provenance attached to a [`Statement`], surfaced in error reporting
/// when a statement fails partway through a multi-step rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementContext {
    SqliteTableRebuild {
        table: QualifiedName,
        step: SqliteRebuildStep,
    },
}

/// SQLite lacks most `ALTER TABLE` forms, so unsupported column/constraint
/// changes are emitted as a full create-copy-swap rebuild. Each step is
/// tracked so a mid-rebuild failure can be reported precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteRebuildStep {
    CreateShadowTable,
    CopyData,
    DropOldTable,
    RenameShadowTable,
    RecreateIndexes,
    RecreateTriggers,
}
