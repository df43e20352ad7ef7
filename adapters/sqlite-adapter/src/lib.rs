//! sqlite-adapter — SQLite implementation of the EmployeeRepository port.
//!
//! Purpose
//! - Provide a lightweight, file-based store so employees survive restarts
//!   without an external database server.
//! - Implements the `EmployeeRepository` trait from the `domain` crate.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - Client fields are stored as a JSON object in a single TEXT column; the
//!   id column is the only structured one.
//! - Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT`, so they are never
//!   reused, even after the highest row is gone.

use std::path::Path;
use std::sync::Mutex;

use domain::{CoreError, Employee, EmployeeId, EmployeeRepository, NewEmployee};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};

/// SQLite-backed employee store.
pub struct SqliteRepo {
    conn: Mutex<Connection>,
}

impl SqliteRepo {
    /// Open (or create) a SQLite database at the given path and ensure schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(map_sqerr)?;
        Self::with_connection(conn)
    }

    /// Private in-memory database, mainly for tests.
    pub fn in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(map_sqerr)?;
        Self::with_connection(conn)
    }

    /// Like `new`, but creates the parent directory first.
    pub fn open_creating_dirs<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        if let Some(dir) = path.as_ref().parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| CoreError::Storage(format!("create {}: {e}", dir.display())))?;
            }
        }
        Self::new(path)
    }

    fn with_connection(conn: Connection) -> Result<Self, CoreError> {
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fields TEXT NOT NULL
        );
        "#,
    )
    .map_err(map_sqerr)
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Storage(format!("sqlite error: {e}"))
}

fn row_to_employee(row: &rusqlite::Row) -> Result<Employee, CoreError> {
    let id: i64 = row.get(0).map_err(map_sqerr)?;
    let raw: String = row.get(1).map_err(map_sqerr)?;
    let fields: Map<String, Value> = serde_json::from_str(&raw)
        .map_err(|e| CoreError::Storage(format!("bad fields for employee {id}: {e}")))?;
    Ok(Employee {
        id: EmployeeId::new(id as u64),
        fields,
    })
}

impl EmployeeRepository for SqliteRepo {
    fn list_all(&self) -> Result<Vec<Employee>, CoreError> {
        let conn = self.conn.lock().map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        let mut stmt = conn
            .prepare("SELECT id, fields FROM employees ORDER BY id ASC")
            .map_err(map_sqerr)?;
        let mut rows = stmt.query([]).map_err(map_sqerr)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(map_sqerr)? {
            out.push(row_to_employee(row)?);
        }
        Ok(out)
    }

    fn create(&self, candidate: NewEmployee) -> Result<Employee, CoreError> {
        let raw = serde_json::to_string(candidate.fields())
            .map_err(|e| CoreError::Storage(format!("encode fields: {e}")))?;
        let conn = self.conn.lock().map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        conn.execute("INSERT INTO employees(fields) VALUES (?1)", params![raw])
            .map_err(map_sqerr)?;
        let id = conn.last_insert_rowid();
        Ok(candidate.with_id(EmployeeId::new(id as u64)))
    }
}
