use async_trait::async_trait;
use connectors::{error::DbError, source::TableSource};
use engine::{
    error::ScanError,
    handler::{CollectHandler, HandlerError, RowHandler},
    scan::TableScan,
};
use model::{
    core::value::{FieldValue, Value},
    pagination::page::PageResult,
    records::row::RowData,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

fn row(id: u64) -> RowData {
    RowData::new(
        "t",
        vec![
            FieldValue::new("id", Value::Uint(id)),
            FieldValue::new("name", Value::String(format!("row-{id}"))),
        ],
    )
}

/// In-memory table serving keyset pages the way the MySQL source does.
struct FakeSource {
    ids: Vec<u64>,
    fetches: AtomicUsize,
    cursors: Mutex<Vec<u64>>,
}

impl FakeSource {
    fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        FakeSource {
            ids: ids.into_iter().collect(),
            fetches: AtomicUsize::new(0),
            cursors: Mutex::new(Vec::new()),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn cursors(&self) -> Vec<u64> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableSource for FakeSource {
    async fn fetch_page(&self, after: u64, limit: usize) -> Result<PageResult, DbError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(after);
        let rows = self
            .ids
            .iter()
            .filter(|id| **id > after)
            .take(limit)
            .map(|id| row(*id))
            .collect();
        Ok(PageResult::new(rows, 0))
    }
}

struct FailOnId {
    collected: Vec<u64>,
    fail_at: u64,
}

#[async_trait]
impl RowHandler for FailOnId {
    async fn handle(&mut self, row: &RowData) -> Result<(), HandlerError> {
        let id = row.identifier("id").unwrap();
        if id == self.fail_at {
            return Err(format!("handler rejected row {id}").into());
        }
        self.collected.push(id);
        Ok(())
    }
}

/// Cancels its token while handling the first row it sees.
struct CancelOnFirstRow {
    token: CancellationToken,
    seen: usize,
}

#[async_trait]
impl RowHandler for CancelOnFirstRow {
    async fn handle(&mut self, _row: &RowData) -> Result<(), HandlerError> {
        self.token.cancel();
        self.seen += 1;
        Ok(())
    }
}

#[tokio::test]
async fn empty_table_terminates_after_one_fetch() {
    let source = FakeSource::with_ids([]);
    let mut handler = CollectHandler::default();

    let summary = TableScan::new(100)
        .run(&source, &mut handler)
        .await
        .unwrap();

    assert_eq!(source.fetches(), 1);
    assert_eq!(summary.pages, 0);
    assert_eq!(summary.rows, 0);
    assert_eq!(summary.last_cursor, 0);
    assert!(handler.rows.is_empty());
}

#[tokio::test]
async fn table_of_exactly_one_page_needs_two_fetches() {
    let source = FakeSource::with_ids(1..=100);
    let mut handler = CollectHandler::default();

    let summary = TableScan::new(100)
        .run(&source, &mut handler)
        .await
        .unwrap();

    assert_eq!(source.fetches(), 2);
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.rows, 100);
    assert_eq!(summary.last_cursor, 100);
}

#[tokio::test]
async fn scan_250_rows_in_pages_of_100() {
    let source = FakeSource::with_ids(1..=250);
    let mut handler = CollectHandler::default();

    let summary = TableScan::new(100)
        .run(&source, &mut handler)
        .await
        .unwrap();

    // three data pages (100 + 100 + 50) plus the final empty page
    assert_eq!(source.fetches(), 4);
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.rows, 250);
    assert_eq!(summary.last_cursor, 250);
    assert_eq!(source.cursors(), vec![0, 100, 200, 250]);

    // every row exactly once, ascending, no gaps
    let ids: Vec<u64> = handler
        .rows
        .iter()
        .map(|r| r.identifier("id").unwrap())
        .collect();
    assert_eq!(ids, (1..=250).collect::<Vec<u64>>());
}

#[tokio::test]
async fn rows_are_strictly_above_their_page_cursor() {
    let source = FakeSource::with_ids([3, 7, 11, 19, 23]);
    let mut handler = CollectHandler::default();

    TableScan::new(2).run(&source, &mut handler).await.unwrap();

    let cursors = source.cursors();
    // cursor sequence is strictly increasing with no repeats
    assert!(cursors.windows(2).all(|w| w[0] < w[1]));
    // and every page's rows exceeded the cursor used to fetch it
    let ids: Vec<u64> = handler
        .rows
        .iter()
        .map(|r| r.identifier("id").unwrap())
        .collect();
    for (page_idx, chunk) in ids.chunks(2).enumerate() {
        for id in chunk {
            assert!(*id > cursors[page_idx]);
        }
    }
}

#[tokio::test]
async fn restarting_from_zero_is_idempotent() {
    let source = FakeSource::with_ids([2, 4, 8, 16, 32]);

    let mut first = CollectHandler::default();
    TableScan::new(2).run(&source, &mut first).await.unwrap();

    let mut second = CollectHandler::default();
    TableScan::new(2).run(&source, &mut second).await.unwrap();

    let ids = |h: &CollectHandler| -> Vec<u64> {
        h.rows.iter().map(|r| r.identifier("id").unwrap()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(ids(&first), vec![2, 4, 8, 16, 32]);
}

#[tokio::test]
async fn start_after_skips_already_seen_rows() {
    let source = FakeSource::with_ids(1..=250);
    let mut handler = CollectHandler::default();

    let summary = TableScan::new(100)
        .start_after(200)
        .run(&source, &mut handler)
        .await
        .unwrap();

    assert_eq!(source.fetches(), 2);
    assert_eq!(summary.rows, 50);
    assert_eq!(summary.last_cursor, 250);
    assert_eq!(handler.rows[0].identifier("id"), Some(201));
}

#[tokio::test]
async fn handler_failure_aborts_the_run() {
    let source = FakeSource::with_ids(1..=10);
    let mut handler = FailOnId {
        collected: Vec::new(),
        fail_at: 5,
    };

    let err = TableScan::new(3)
        .run(&source, &mut handler)
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Handler(_)));
    // rows handled before the failure stay handled
    assert_eq!(handler.collected, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn cancellation_is_observed_between_pages() {
    let source = FakeSource::with_ids(1..=10);
    let token = CancellationToken::new();
    let mut handler = CancelOnFirstRow {
        token: token.clone(),
        seen: 0,
    };

    let err = TableScan::new(3)
        .with_cancel(token)
        .run(&source, &mut handler)
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Cancelled));
    // the in-flight page completed before the scan stopped
    assert_eq!(source.fetches(), 1);
    assert_eq!(handler.seen, 3);
}

#[tokio::test]
async fn cancelled_before_start_fetches_nothing() {
    let source = FakeSource::with_ids(1..=10);
    let token = CancellationToken::new();
    token.cancel();

    let err = TableScan::new(3)
        .with_cancel(token)
        .run(&source, &mut CollectHandler::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::Cancelled));
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn missing_identifier_column_is_fatal() {
    struct NoIdSource;

    #[async_trait]
    impl TableSource for NoIdSource {
        async fn fetch_page(&self, _after: u64, _limit: usize) -> Result<PageResult, DbError> {
            let row = RowData::new(
                "t",
                vec![FieldValue::new("name", Value::String("no id here".into()))],
            );
            Ok(PageResult::new(vec![row], 0))
        }
    }

    let err = TableScan::new(10)
        .run(&NoIdSource, &mut CollectHandler::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::MissingIdentifier { .. }));
}

#[tokio::test]
async fn custom_identifier_column_drives_the_cursor() {
    struct SeqSource;

    #[async_trait]
    impl TableSource for SeqSource {
        async fn fetch_page(&self, after: u64, limit: usize) -> Result<PageResult, DbError> {
            let rows = (after + 1..=3)
                .take(limit)
                .map(|id| RowData::new("t", vec![FieldValue::new("seq_no", Value::Uint(id))]))
                .collect();
            Ok(PageResult::new(rows, 0))
        }
    }

    let summary = TableScan::new(2)
        .id_column("seq_no")
        .run(&SeqSource, &mut CollectHandler::default())
        .await
        .unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.last_cursor, 3);
}
