use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// One table record: an ordered mapping from column name to value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowData {
    pub table: String,
    pub fields: Vec<FieldValue>,
}

impl RowData {
    pub fn new(table: &str, fields: Vec<FieldValue>) -> Self {
        RowData {
            table: table.to_string(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    /// The row's numeric identifier, if the column is present and
    /// non-negative. Keyset paging depends on this value.
    pub fn identifier(&self, column: &str) -> Option<u64> {
        self.get(column).and_then(|f| f.value.as_u64())
    }
}
