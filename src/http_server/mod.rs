//! # Employee HTTP Server Module
//!
//! Axum server exposing the employee record store.
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /health` - Health check
//! - `GET /employee/:id` - Fetch an employee
//! - `POST /employee` - Create an employee
//! - `PUT /employee` - Partially update an employee
//! - `DELETE /employee/:id` - Delete an employee

pub mod config;
pub mod employee_routes;
pub mod errors;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use employee_routes::{employee_routes, EmployeeState, MessageResponse};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
