use chrono::{Datelike, Timelike};
use model::core::value::Value;
use mysql_async::Value as MySqlValue;
use mysql_common::params::Params;

/// Renders a model value as a driver value for statement binding.
pub fn to_mysql_value(value: &Value) -> MySqlValue {
    match value {
        Value::Int(i) => MySqlValue::Int(*i),
        Value::Uint(u) => MySqlValue::UInt(*u),
        Value::Float(f) => MySqlValue::Double(*f),
        Value::Boolean(b) => MySqlValue::Int(i64::from(*b)),
        Value::String(s) => MySqlValue::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => MySqlValue::Bytes(b.clone()),
        Value::Date(d) => MySqlValue::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        Value::Timestamp(ts) => {
            let naive = ts.naive_utc();
            MySqlValue::Date(
                naive.year() as u16,
                naive.month() as u8,
                naive.day() as u8,
                naive.hour() as u8,
                naive.minute() as u8,
                naive.second() as u8,
                naive.and_utc().timestamp_subsec_micros(),
            )
        }
        Value::Null => MySqlValue::NULL,
    }
}

/// Positional parameter list for a parameterized statement.
pub fn positional_params(values: &[Value]) -> Params {
    if values.is_empty() {
        Params::Empty
    } else {
        Params::Positional(values.iter().map(to_mysql_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn scalar_bindings() {
        assert_eq!(to_mysql_value(&Value::Int(-3)), MySqlValue::Int(-3));
        assert_eq!(to_mysql_value(&Value::Uint(9)), MySqlValue::UInt(9));
        assert_eq!(to_mysql_value(&Value::Boolean(true)), MySqlValue::Int(1));
        assert_eq!(to_mysql_value(&Value::Null), MySqlValue::NULL);
        assert_eq!(
            to_mysql_value(&Value::String("abc".into())),
            MySqlValue::Bytes(b"abc".to_vec())
        );
    }

    #[test]
    fn date_binding_has_zero_time_part() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            to_mysql_value(&Value::Date(date)),
            MySqlValue::Date(2024, 3, 9, 0, 0, 0, 0)
        );
    }

    #[test]
    fn empty_params_bind_as_empty() {
        assert!(matches!(positional_params(&[]), Params::Empty));
        assert!(matches!(
            positional_params(&[Value::Int(1)]),
            Params::Positional(_)
        ));
    }
}
