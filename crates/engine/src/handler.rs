use async_trait::async_trait;
use model::records::row::RowData;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Invoked once per row, in ascending identifier order. A handler must
/// complete before the next row is offered.
#[async_trait]
pub trait RowHandler: Send {
    async fn handle(&mut self, row: &RowData) -> Result<(), HandlerError>;
}

/// Default sink: one JSON line per row on stdout.
pub struct JsonLineHandler;

#[async_trait]
impl RowHandler for JsonLineHandler {
    async fn handle(&mut self, row: &RowData) -> Result<(), HandlerError> {
        let line = serde_json::to_string(row)?;
        println!("{line}");
        Ok(())
    }
}

/// Buffers every row it sees. Useful for tests and dry runs.
#[derive(Default)]
pub struct CollectHandler {
    pub rows: Vec<RowData>,
}

#[async_trait]
impl RowHandler for CollectHandler {
    async fn handle(&mut self, row: &RowData) -> Result<(), HandlerError> {
        self.rows.push(row.clone());
        Ok(())
    }
}
