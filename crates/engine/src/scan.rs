use crate::{error::ScanError, handler::RowHandler};
use connectors::source::TableSource;
use model::pagination::cursor::PageCursor;
use serde::Serialize;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Outcome of a completed scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    /// Non-empty pages processed.
    pub pages: usize,
    pub rows: usize,
    pub last_cursor: u64,
    pub took_ms: u128,
}

/// Walks a table in ascending-identifier order, one bounded page at a
/// time, feeding every row to a handler and advancing the cursor after
/// each page.
///
/// Termination relies on the identifier column being strictly increasing:
/// each page query excludes already-seen rows (`> cursor`, never `>=`), so
/// the scan makes forward progress until a page comes back empty.
/// Identifier uniqueness is assumed, not re-verified; duplicate values on
/// a page boundary could stall a pathological dataset.
pub struct TableScan {
    batch_size: usize,
    id_column: String,
    start_after: u64,
    cancel: CancellationToken,
}

impl Default for TableScan {
    fn default() -> Self {
        TableScan::new(DEFAULT_BATCH_SIZE)
    }
}

impl TableScan {
    pub fn new(batch_size: usize) -> Self {
        TableScan {
            batch_size,
            id_column: DEFAULT_ID_COLUMN.to_string(),
            start_after: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = column.into();
        self
    }

    /// Resume point: rows with identifier at or below this value are
    /// skipped.
    pub fn start_after(mut self, id: u64) -> Self {
        self.start_after = id;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs the scan to completion. Exactly one in-flight page at a time;
    /// the handler sees rows strictly in ascending order.
    pub async fn run(
        &self,
        source: &dyn TableSource,
        handler: &mut dyn RowHandler,
    ) -> Result<ScanSummary, ScanError> {
        let started = Instant::now();
        let mut cursor = PageCursor::after(self.start_after);
        let mut pages = 0usize;
        let mut rows_processed = 0usize;

        loop {
            // Cancellation is observed between pages only; a page in
            // flight always completes.
            if self.cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            let page = source.fetch_page(cursor.value(), self.batch_size).await?;
            if page.is_empty() {
                break;
            }

            for row in &page.rows {
                handler.handle(row).await.map_err(ScanError::Handler)?;
            }

            // The page is sorted ascending, so the last row carries the
            // maximum identifier seen.
            let Some(last) = page.rows.last() else {
                break;
            };
            match last.identifier(&self.id_column) {
                Some(id) => cursor.advance_to(id),
                None => {
                    return Err(ScanError::MissingIdentifier {
                        column: self.id_column.clone(),
                    });
                }
            }

            pages += 1;
            rows_processed += page.row_count;
            info!(
                rows = page.row_count,
                cursor = cursor.value(),
                took_ms = page.took_ms as u64,
                "page complete"
            );
        }

        Ok(ScanSummary {
            pages,
            rows: rows_processed,
            last_cursor: cursor.value(),
            took_ms: started.elapsed().as_millis(),
        })
    }
}
