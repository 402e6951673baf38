//! Stored document form of an employee
//!
//! A document pairs the employee fields with a storage-assigned `_id`.
//! The `_id` stays inside the store; callers only ever see `Employee`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Employee;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub object_id: Uuid,
    #[serde(flatten)]
    pub employee: Employee,
}

impl Document {
    /// Wrap an employee under a fresh storage id
    pub fn new(employee: Employee) -> Self {
        Self {
            object_id: Uuid::new_v4(),
            employee,
        }
    }

    pub fn employee_id(&self) -> i64 {
        self.employee.id
    }

    /// Project to the employee field set, dropping `_id`
    pub fn project(&self) -> Employee {
        self.employee.clone()
    }
}
