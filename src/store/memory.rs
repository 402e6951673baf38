//! In-memory employee store

use std::sync::RwLock;

use tracing::debug;

use super::document::Document;
use super::errors::{StoreError, StoreResult};
use super::{DeleteOutcome, EmployeeStore, InsertOutcome, UpdateOutcome};
use crate::model::{Employee, EmployeeUpdate};

/// Employee store held entirely in process memory.
///
/// Documents are kept in insertion order behind a single lock.
pub struct MemoryStore {
    collection: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> StoreResult<usize> {
        let documents = self.documents.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("employees")
    }
}

impl EmployeeStore for MemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn fetch(&self, id: i64) -> StoreResult<Option<Employee>> {
        let documents = self.documents.read().map_err(|_| StoreError::lock_poisoned())?;
        Ok(documents
            .iter()
            .find(|doc| doc.employee_id() == id)
            .map(Document::project))
    }

    fn insert(&self, employee: Employee) -> StoreResult<InsertOutcome> {
        let mut documents = self.documents.write().map_err(|_| StoreError::lock_poisoned())?;

        if documents.iter().any(|doc| doc.employee_id() == employee.id) {
            return Err(StoreError::DuplicateId(employee.id));
        }

        let doc = Document::new(employee);
        let outcome = InsertOutcome {
            acknowledged: true,
            inserted_id: doc.object_id,
        };
        debug!(collection = %self.collection, id = doc.employee_id(), "inserted document");
        documents.push(doc);

        Ok(outcome)
    }

    fn update(&self, id: i64, changes: &EmployeeUpdate) -> StoreResult<UpdateOutcome> {
        let mut documents = self.documents.write().map_err(|_| StoreError::lock_poisoned())?;

        let Some(doc) = documents.iter_mut().find(|doc| doc.employee_id() == id) else {
            return Ok(UpdateOutcome::no_match());
        };

        let changed = changes.apply_to(&mut doc.employee);
        debug!(collection = %self.collection, id, changed, "updated document");

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    fn delete(&self, id: i64) -> StoreResult<DeleteOutcome> {
        let mut documents = self.documents.write().map_err(|_| StoreError::lock_poisoned())?;

        let deleted: u64 = match documents.iter().position(|doc| doc.employee_id() == id) {
            Some(index) => {
                documents.remove(index);
                1
            }
            None => 0,
        };
        debug!(collection = %self.collection, id, deleted, "deleted document");

        Ok(DeleteOutcome { deleted })
    }
}
