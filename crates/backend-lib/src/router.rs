// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP routes.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, department, employee, health};
use crate::middleware::require_auth;
use crate::storage::Storage;
use crate::AppState;

/// Create the API router
pub fn create_router<S: Storage>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/employees",
            get(employee::get_all_employees::<S>).post(employee::add_employee::<S>),
        )
        .route("/employees/me", get(employee::get_employee_by_user::<S>))
        .route(
            "/employees/{id}",
            get(employee::get_employee_by_id::<S>)
                .put(employee::update_employee_by_id::<S>)
                .delete(employee::delete_employee_by_id::<S>),
        )
        .route(
            "/departments",
            get(department::get_all_departments::<S>).post(department::add_department::<S>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth::<S>));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/login", post(auth::login::<S>))
        .route("/auth/refresh", post(auth::refresh::<S>))
        .route("/auth/logout", post(auth::logout::<S>))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
