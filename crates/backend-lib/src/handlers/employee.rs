//! Employee endpoints. All of them sit behind the access-token guard.
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use employee_common::pagination::{Page, Paginated};
use employee_common::{
    DeleteEmployeeResponse, Employee, EmployeeUpdate, EnrichedUser, NewEmployee,
};

use crate::error::AppError;
use crate::storage::Storage;
use crate::validation::{validate_employee_update, validate_new_employee};
use crate::AppState;

#[tracing::instrument(skip_all, fields(caller = %caller.id()))]
pub async fn add_employee<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<EnrichedUser>,
    Json(body): Json<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    validate_new_employee(&body)?;
    let employee = state.storage.add_employee(body).await?;
    tracing::info!(employee_id = employee.id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn get_employee_by_id<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<i64>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(state.storage.get_employee_by_id(id).await?))
}

/// Employee record of the calling user
pub async fn get_employee_by_user<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<EnrichedUser>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(state.storage.get_employee_by_user_id(caller.id()).await?))
}

pub async fn get_all_employees<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Query(page): Query<Page>,
) -> Result<Json<Paginated<Employee>>, AppError> {
    Ok(Json(state.storage.get_all_employees(&page.with_defaults()).await?))
}

#[tracing::instrument(skip_all, fields(caller = %caller.id(), employee_id = id))]
pub async fn update_employee_by_id<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<EnrichedUser>,
    Path(id): Path<i64>,
    Json(body): Json<EmployeeUpdate>,
) -> Result<Json<Employee>, AppError> {
    validate_employee_update(&body)?;
    Ok(Json(state.storage.update_employee_by_id(id, body).await?))
}

#[tracing::instrument(skip_all, fields(caller = %caller.id(), employee_id = id))]
pub async fn delete_employee_by_id<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Extension(caller): Extension<EnrichedUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteEmployeeResponse>, AppError> {
    state.storage.delete_employee_by_id(id).await?;
    tracing::info!("employee deleted");
    Ok(Json(DeleteEmployeeResponse {
        deleted_employee_id: id,
    }))
}
