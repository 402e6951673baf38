//! Employee record store
//!
//! The store owns one named collection of employee documents and exposes
//! point operations keyed by the employee `id`:
//!
//! - `fetch`: lookup, projected to `Employee` (storage `_id` stripped)
//! - `insert`: store a full record; duplicate ids are rejected
//! - `update`: shallow merge of the supplied fields
//! - `delete`: remove at most one record
//!
//! Write operations report driver-style outcomes (acknowledgement,
//! matched/modified counts, deleted count) rather than the record itself.
//!
//! Two backends are provided: `MemoryStore` for tests and ephemeral
//! servers, and `FileStore`, an append-only checksummed document log.

mod document;
mod errors;
mod file;
mod memory;

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Employee, EmployeeUpdate};

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Outcome of an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

/// Outcome of a partial update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Records whose `id` matched (0 or 1)
    pub matched: u64,
    /// Records whose stored values actually changed
    pub modified: u64,
}

impl UpdateOutcome {
    pub fn no_match() -> Self {
        Self {
            matched: 0,
            modified: 0,
        }
    }
}

/// Outcome of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

/// Store trait for the employee collection.
///
/// Implementations serialize mutations internally, so a shared
/// `Arc<dyn EmployeeStore>` can be handed to every request handler.
pub trait EmployeeStore: Send + Sync {
    /// Name of the underlying collection
    fn collection(&self) -> &str;

    /// Fetch the record with the given id
    fn fetch(&self, id: i64) -> StoreResult<Option<Employee>>;

    /// Insert a complete record
    fn insert(&self, employee: Employee) -> StoreResult<InsertOutcome>;

    /// Merge the present fields of `changes` into the record with `id`
    fn update(&self, id: i64, changes: &EmployeeUpdate) -> StoreResult<UpdateOutcome>;

    /// Delete the record with the given id
    fn delete(&self, id: i64) -> StoreResult<DeleteOutcome>;
}
