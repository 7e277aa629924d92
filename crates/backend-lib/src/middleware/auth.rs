//! Access-token guard for protected routes.
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Cookie, HeaderMapExt};

use crate::config::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::storage::Storage;
use crate::AppState;

/// Access token from `Authorization: Bearer`, or from the access cookie in cookie mode
pub fn access_token(headers: &HeaderMap, jwt: &JwtSettings) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    if bearer.is_some() || !jwt.send_cookie {
        return bearer;
    }

    headers
        .typed_get::<Cookie>()
        .and_then(|cookies| cookies.get(&jwt.cookie_name).map(str::to_string))
        .filter(|t| !t.is_empty())
}

/// Resolve the caller and attach the [`employee_common::EnrichedUser`] to the request
pub async fn require_auth<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token =
        access_token(request.headers(), &state.settings.jwt).ok_or(AuthError::Unauthorized)?;
    let user = state.auth.authorize(&token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
