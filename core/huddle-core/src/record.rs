//! Record: 스키마 없는 행(row) 표현
//!
//! 저장소 경계에서는 모든 행이 순서가 보존되는 JSON 객체입니다.
//! 타입이 있는 모델(`model`)은 이 경계에서 serde로 변환됩니다.

use crate::error::{HuddleError, HuddleResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One row: field name → JSON value, in insertion order.
pub type Record = Map<String, Value>;

/// Equality used by `eq` predicates.
///
/// Numbers compare numerically so that `1` matches `1.0`; everything else
/// uses plain JSON equality.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            if let (Some(a), Some(b)) = (l.as_i64(), r.as_i64()) {
                return a == b;
            }
            if let (Some(a), Some(b)) = (l.as_u64(), r.as_u64()) {
                return a == b;
            }
            match (l.as_f64(), r.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        _ => left == right,
    }
}

/// Keep only the requested fields that exist on `record` (no null-filling).
pub fn project(record: &Record, columns: &[String]) -> Record {
    let mut selected = Record::new();
    for column in columns {
        if let Some(value) = record.get(column) {
            selected.insert(column.clone(), value.clone());
        }
    }
    selected
}

/// Serialize a typed value into a `Record`.
pub fn to_record<T: Serialize + ?Sized>(value: &T) -> HuddleResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(HuddleError::InvalidArguments(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Deserialize a `Record` into a typed value.
pub fn from_record<T: DeserializeOwned>(record: &Record) -> HuddleResult<T> {
    Ok(serde_json::from_value(Value::Object(record.clone()))?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `insert` 입력 변환 트레이트
///
/// 단일 레코드, 레코드 목록, 또는 JSON 객체/배열을 받습니다.
pub trait IntoRecords {
    fn into_records(self) -> HuddleResult<Vec<Record>>;
}

impl IntoRecords for Record {
    fn into_records(self) -> HuddleResult<Vec<Record>> {
        Ok(vec![self])
    }
}

impl IntoRecords for Vec<Record> {
    fn into_records(self) -> HuddleResult<Vec<Record>> {
        Ok(self)
    }
}

impl IntoRecords for Value {
    fn into_records(self) -> HuddleResult<Vec<Record>> {
        match self {
            Value::Object(map) => Ok(vec![map]),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(HuddleError::InvalidArguments(format!(
                        "insert expects objects, got {}",
                        json_kind(&other)
                    ))),
                })
                .collect(),
            other => Err(HuddleError::InvalidArguments(format!(
                "insert expects an object or an array of objects, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_values_equal_numbers() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!(20), &json!(20)));
        assert!(!values_equal(&json!(1), &json!(2)));
        assert!(!values_equal(&json!(1), &json!("1")));
    }

    #[test]
    fn test_values_equal_other_types() {
        assert!(values_equal(&json!("KC"), &json!("KC")));
        assert!(values_equal(&json!(true), &json!(true)));
        assert!(values_equal(&Value::Null, &Value::Null));
        assert!(!values_equal(&json!(true), &json!(1)));
    }

    #[test]
    fn test_project_omits_missing_fields() {
        let record = to_record(&json!({"a": 1, "b": 2})).unwrap();
        let projected = project(&record, &["b".to_string(), "zzz".to_string()]);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_into_records_value_array() {
        let rows = json!([{"a": 1}, {"a": 2}]).into_records().unwrap();
        assert_eq!(rows.len(), 2);

        let err = json!([{"a": 1}, 3]).into_records();
        assert!(matches!(err, Err(HuddleError::InvalidArguments(_))));

        let err = json!("text").into_records();
        assert!(err.is_err());
    }

    #[test]
    fn test_typed_round_trip() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Row {
            name: String,
            points: i64,
        }

        let row = Row {
            name: "Chiefs".into(),
            points: 10,
        };
        let record = to_record(&row).unwrap();
        assert_eq!(record.get("points"), Some(&json!(10)));
        let back: Row = from_record(&record).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_to_record_rejects_scalars() {
        assert!(to_record(&42).is_err());
    }
}
