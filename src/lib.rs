//! employee-api - CRUD HTTP service for employee records
//!
//! Employees live in a single document collection keyed by a caller-supplied
//! integer `id`. The store is an explicit `EmployeeStore` handle shared by
//! the HTTP handlers, so tests swap in `MemoryStore` without touching any
//! global state.

pub mod cli;
pub mod http_server;
pub mod logging;
pub mod model;
pub mod store;

pub use model::{Employee, EmployeeUpdate};
pub use store::{EmployeeStore, FileStore, MemoryStore, StoreError, StoreResult};
