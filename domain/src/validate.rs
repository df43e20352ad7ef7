//! Payload parsing for create requests. Only the shape is checked: an
//! employee is any JSON object.

use serde_json::Value;

use crate::{CoreError, NewEmployee};

/// Turn a decoded JSON body into a `NewEmployee`.
///
/// Anything other than a JSON object is rejected. A client-supplied `id` is
/// dropped.
pub fn parse_new_employee(payload: Value) -> Result<NewEmployee, CoreError> {
    match payload {
        Value::Object(fields) => Ok(NewEmployee::new(fields)),
        other => Err(CoreError::MalformedRequest(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_objects() {
        let parsed = parse_new_employee(json!({"name": "Alice"})).unwrap();
        assert_eq!(parsed.fields().len(), 1);

        let empty = parse_new_employee(json!({})).unwrap();
        assert!(empty.fields().is_empty());
    }

    #[test]
    fn rejects_non_objects() {
        for bad in [json!(null), json!(1), json!("Alice"), json!([{"name": "Alice"}]), json!(true)] {
            let err = parse_new_employee(bad).unwrap_err();
            assert!(matches!(err, CoreError::MalformedRequest(_)));
        }
    }

    #[test]
    fn strips_client_id() {
        let parsed = parse_new_employee(json!({"id": 5, "name": "Alice"})).unwrap();
        assert!(!parsed.fields().contains_key("id"));
    }
}
