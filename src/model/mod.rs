//! Employee data model
//!
//! `Employee` is the full record accepted on insert and returned on fetch.
//! `EmployeeUpdate` carries the subset of fields written by a partial update.

mod employee;

pub use employee::{Employee, EmployeeUpdate};
