//! Employee HTTP Routes
//!
//! Welcome route plus the four point operations on the employee collection.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::errors::{ApiError, ApiResult};
use crate::model::{Employee, EmployeeUpdate};
use crate::store::{EmployeeStore, MemoryStore, StoreResult};

// ==================
// Shared State
// ==================

/// Employee state shared across handlers
pub struct EmployeeState {
    pub store: Arc<dyn EmployeeStore>,
}

impl EmployeeState {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Run a store call on the blocking pool.
    ///
    /// File-backed writes fsync before returning and must not hold up the
    /// async workers.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&dyn EmployeeStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))?;
        Ok(result?)
    }

    /// State over a fresh in-memory collection
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }
}

// ==================
// Response Types
// ==================

/// Body of every non-record response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ==================
// Employee Routes
// ==================

/// Create employee routes
pub fn employee_routes(state: Arc<EmployeeState>) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/employee", post(create_handler).put(update_handler))
        .route("/employee/:id", get(fetch_handler).delete(delete_handler))
        .with_state(state)
}

async fn welcome_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome Home!!"))
}

async fn fetch_handler(
    State(state): State<Arc<EmployeeState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Employee>> {
    let employee = state
        .run(move |store| store.fetch(id))
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(employee))
}

async fn create_handler(
    State(state): State<Arc<EmployeeState>>,
    Json(employee): Json<Employee>,
) -> ApiResult<Json<MessageResponse>> {
    let name = employee.name.clone();
    let outcome = state.run(move |store| store.insert(employee)).await?;

    if !outcome.acknowledged {
        return Err(ApiError::InsertFailed);
    }

    Ok(Json(MessageResponse::new(format!("Employee {} created", name))))
}

async fn update_handler(
    State(state): State<Arc<EmployeeState>>,
    Json(changes): Json<EmployeeUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    let outcome = state
        .run(move |store| store.update(changes.id, &changes))
        .await?;

    if outcome.matched == 0 {
        return Err(ApiError::UpdateFailed);
    }

    Ok(Json(MessageResponse::new("Employee updated.")))
}

async fn delete_handler(
    State(state): State<Arc<EmployeeState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let outcome = state.run(move |store| store.delete(id)).await?;

    if outcome.deleted == 0 {
        return Err(ApiError::DeleteFailed);
    }

    Ok(Json(MessageResponse::new("Employee deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_state_creation() {
        let state = EmployeeState::in_memory();
        assert_eq!(state.store.collection(), "employees");
    }

    #[tokio::test]
    async fn test_run_executes_on_blocking_pool() {
        let state = EmployeeState::in_memory();
        let collection = state
            .run(|store| Ok(store.collection().to_string()))
            .await
            .unwrap();
        assert_eq!(collection, "employees");
    }

    #[tokio::test]
    async fn test_run_maps_store_errors() {
        let state = EmployeeState::in_memory();
        let err = state
            .run(|_| -> StoreResult<()> { Err(crate::store::StoreError::DuplicateId(5)) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateId(5)));
    }

    #[test]
    fn test_message_response_serialization() {
        let json = serde_json::to_value(MessageResponse::new("Employee deleted")).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Employee deleted"}));
    }
}
