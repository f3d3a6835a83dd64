use super::{StoreError, StudentStore};
use crate::models::{DeleteOutcome, NewStudent, Student, StudentChanges, UpdateOutcome};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory `StudentStore` for tests. Counts every call and can be told to fail.
#[derive(Default)]
pub struct MemoryStudentStore {
    rows: Mutex<BTreeMap<i64, Student>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        self.enter()?;
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, StoreError> {
        self.enter()?;
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, student: NewStudent) -> Result<Student, StoreError> {
        self.enter()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let student = student.with_id(id);
        self.rows.lock().unwrap().insert(id, student.clone());
        Ok(student)
    }

    async fn update(&self, id: i64, changes: StudentChanges) -> Result<UpdateOutcome, StoreError> {
        self.enter()?;
        if changes.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }
        let mut rows = self.rows.lock().unwrap();
        Ok(match rows.get_mut(&id) {
            Some(student) => {
                changes.apply_to(student);
                UpdateOutcome::Updated {
                    affected: 1,
                    student: student.clone(),
                }
            }
            None => UpdateOutcome::NotFound,
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<DeleteOutcome, StoreError> {
        self.enter()?;
        Ok(match self.rows.lock().unwrap().remove(&id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }
}
