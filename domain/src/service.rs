use serde_json::Value;

use crate::validate::parse_new_employee;
use crate::{CoreError, Employee, EmployeeRepository, NewEmployee};

/// Application service in front of the employee store.
///
/// The store is handed in explicitly; the service adds payload parsing and
/// nothing else, so it stays testable with the in-memory adapter.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List every stored employee.
    pub fn list_all(&self) -> Result<Vec<Employee>, CoreError> {
        self.repo.list_all()
    }

    /// Create an employee from a decoded JSON body.
    pub fn create(&self, payload: Value) -> Result<Employee, CoreError> {
        let candidate = parse_new_employee(payload)?;
        self.create_new(candidate)
    }

    /// Create an employee from already-parsed fields.
    pub fn create_new(&self, candidate: NewEmployee) -> Result<Employee, CoreError> {
        self.repo.create(candidate)
    }
}
