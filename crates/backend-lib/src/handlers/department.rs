//! Department endpoints
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use employee_common::{Department, NewDepartment};

use crate::error::AppError;
use crate::storage::Storage;
use crate::validation::validate_new_department;
use crate::AppState;

pub async fn add_department<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<NewDepartment>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    validate_new_department(&body)?;
    let department = state.storage.add_department(body).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

pub async fn get_all_departments<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(state.storage.get_all_departments().await?))
}
