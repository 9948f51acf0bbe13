use model::core::value::{FieldValue, Value};
use model::records::row::RowData;
use mysql_async::Row as MySqlRow;
use mysql_async::Value as MySqlValue;

/// Decodes one driver row into a `RowData`, preserving column order.
///
/// Decoding is driven by the driver's value variants rather than column
/// metadata: text-ish byte payloads become strings, everything else keeps
/// its natural type. Undecodable cells become NULL.
pub fn decode_row(table: &str, row: &MySqlRow) -> RowData {
    let fields = row
        .columns_ref()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let value = row
                .as_ref(idx)
                .map(decode_value)
                .unwrap_or(Value::Null);
            FieldValue {
                name: column.name_str().into_owned(),
                value,
            }
        })
        .collect();

    RowData::new(table, fields)
}

pub fn decode_value(value: &MySqlValue) -> Value {
    match value {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Int(i) => Value::Int(*i),
        MySqlValue::UInt(u) => Value::Uint(*u),
        MySqlValue::Float(f) => Value::Float(f64::from(*f)),
        MySqlValue::Double(d) => Value::Float(*d),
        MySqlValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::String(text.to_owned()),
            Err(_) => Value::Bytes(bytes.clone()),
        },
        MySqlValue::Date(year, month, day, 0, 0, 0, 0) => {
            chrono::NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .map(Value::Date)
                .unwrap_or(Value::Null)
        }
        MySqlValue::Date(year, month, day, hour, minute, second, micros) => {
            chrono::NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                })
                .map(|naive| Value::Timestamp(naive.and_utc()))
                .unwrap_or(Value::Null)
        }
        MySqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let total_hours = u32::from(*days) * 24 + u32::from(*hours);
            let mut text = format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}");
            if *micros > 0 {
                text.push_str(&format!(".{micros:06}"));
            }
            Value::String(text)
        }
    }
}
