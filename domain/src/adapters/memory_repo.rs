use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{CoreError, Employee, EmployeeId, EmployeeRepository, NewEmployee};

struct Inner {
    next_id: u64,
    rows: BTreeMap<u64, Employee>,
}

/// Simple in-memory repository. Id assignment and insertion happen under the
/// same mutex, so concurrent creates never share an id.
pub struct InMemoryRepo {
    inner: Mutex<Inner>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeRepository for InMemoryRepo {
    fn list_all(&self) -> Result<Vec<Employee>, CoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        Ok(inner.rows.values().cloned().collect())
    }

    fn create(&self, candidate: NewEmployee) -> Result<Employee, CoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| CoreError::Storage("mutex poisoned".into()))?;
        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| CoreError::Storage("id space exhausted".into()))?;
        let employee = candidate.with_id(EmployeeId::new(id));
        inner.rows.insert(id, employee.clone());
        Ok(employee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use std::sync::Arc;
    use std::thread;

    fn fields(name: &str) -> NewEmployee {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(name.into()));
        NewEmployee::new(map)
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let repo = InMemoryRepo::new();
        let a = repo.create(fields("a")).unwrap();
        let b = repo.create(fields("b")).unwrap();
        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
    }

    #[test]
    fn list_returns_insertion_order() {
        let repo = InMemoryRepo::new();
        for name in ["c", "a", "b"] {
            repo.create(fields(name)).unwrap();
        }
        let names: Vec<_> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|e| e.fields["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("c"), json!("a"), json!("b")]);
    }

    #[test]
    fn concurrent_creates_get_unique_ids() {
        let repo = Arc::new(InMemoryRepo::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    (0..25)
                        .map(|i| repo.create(fields(&format!("{t}-{i}"))).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(repo.list_all().unwrap().len(), 200);
    }
}
