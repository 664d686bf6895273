pub(crate) const TABLE_WITHOUT_ROWID: &str = "sqlite.without_rowid";
pub(crate) const TABLE_STRICT: &str = "sqlite.strict";
pub(crate) const TABLE_SOURCE_SQL: &str = "sqlite.source_sql";
