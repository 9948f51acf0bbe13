use crate::{error::DbError, sql::dialect, sql::mysql::adapter::MySqlAdapter};
use async_trait::async_trait;
use model::pagination::page::PageResult;

/// Anything that can serve keyset pages of a table in ascending
/// identifier order. The scanner drives this one page at a time.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Rows with identifier strictly greater than `after`, at most `limit`
    /// of them. An empty page means the table is exhausted.
    async fn fetch_page(&self, after: u64, limit: usize) -> Result<PageResult, DbError>;
}

/// A single table behind a pooled MySQL adapter.
pub struct MySqlTableSource {
    adapter: MySqlAdapter,
    table: String,
    id_column: String,
}

impl MySqlTableSource {
    /// Validates the identifiers once, up front, so a hostile table name
    /// is rejected before the first query.
    pub fn new(adapter: MySqlAdapter, table: &str, id_column: &str) -> Result<Self, DbError> {
        dialect::checked_identifier(table)?;
        dialect::checked_identifier(id_column)?;
        Ok(MySqlTableSource {
            adapter,
            table: table.to_string(),
            id_column: id_column.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl TableSource for MySqlTableSource {
    async fn fetch_page(&self, after: u64, limit: usize) -> Result<PageResult, DbError> {
        self.adapter
            .fetch_page(&self.table, &self.id_column, after, limit)
            .await
    }
}
