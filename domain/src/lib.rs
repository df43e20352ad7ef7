//! Domain library for the Employee directory.
//!
//! This crate holds the domain types, the storage port (trait), and error
//! definitions. It depends only on serde for the wire shape of an employee;
//! keep adapters and IO concerns out of this crate.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field on the wire.
pub const ID_FIELD: &str = "id";

/// Store-assigned identifier of an employee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(u64);

impl EmployeeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for EmployeeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-supplied fields for an employee that has not been stored yet.
///
/// Any `id` key is dropped on construction: identifiers are only ever
/// assigned by the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewEmployee {
    fields: Map<String, Value>,
}

impl NewEmployee {
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Attach a store-assigned identifier, producing the stored record.
    pub fn with_id(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            fields: self.fields,
        }
    }
}

/// Stored employee record.
///
/// Serializes as `{"id": <n>, ...fields}` with the client fields echoed
/// back in the order they were supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Storage port for employee records.
pub trait EmployeeRepository: Send + Sync {
    /// Every stored employee, ordered by ascending id. Empty storage yields
    /// an empty vector.
    fn list_all(&self) -> Result<Vec<Employee>, CoreError>;
    /// Assign a fresh id, persist the record and return it.
    fn create(&self, candidate: NewEmployee) -> Result<Employee, CoreError>;
}

impl<T: EmployeeRepository + ?Sized> EmployeeRepository for Arc<T> {
    fn list_all(&self) -> Result<Vec<Employee>, CoreError> {
        (**self).list_all()
    }

    fn create(&self, candidate: NewEmployee) -> Result<Employee, CoreError> {
        (**self).create(candidate)
    }
}

/// Core domain errors (no external error crates to keep deps minimal).
#[derive(Debug)]
pub enum CoreError {
    /// The request payload is not a well-formed employee.
    MalformedRequest(String),
    /// The persistence medium failed or is unavailable.
    Storage(String),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::MalformedRequest(msg) => write!(f, "malformed request: {}", msg),
            CoreError::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl Error for CoreError {}

/// Return a short about/version line for the binary to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - employee directory domain", pkg, ver)
}

pub mod adapters;
pub mod service;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn new_employee_drops_client_id() {
        let candidate = NewEmployee::new(object(json!({"id": 99, "name": "Alice"})));
        assert!(candidate.fields().get("id").is_none());
        assert_eq!(candidate.fields().get("name"), Some(&json!("Alice")));
    }

    #[test]
    fn employee_serializes_id_first_then_fields() {
        let employee = NewEmployee::new(object(json!({"name": "Alice", "age": 30})))
            .with_id(EmployeeId::new(1));
        let text = serde_json::to_string(&employee).unwrap();
        assert_eq!(text, r#"{"id":1,"name":"Alice","age":30}"#);
    }

    #[test]
    fn employee_deserializes_from_wire_form() {
        let employee: Employee =
            serde_json::from_str(r#"{"id":7,"name":"Bob","tags":["x"]}"#).unwrap();
        assert_eq!(employee.id, EmployeeId::new(7));
        assert_eq!(employee.fields.get("tags"), Some(&json!(["x"])));
        assert!(employee.fields.get("id").is_none());
    }

    #[test]
    fn core_error_display() {
        let err = CoreError::Storage("disk gone".into());
        assert_eq!(err.to_string(), "storage error: disk gone");
        let err = CoreError::MalformedRequest("not an object".into());
        assert_eq!(err.to_string(), "malformed request: not an object");
    }
}
