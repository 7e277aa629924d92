// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, refresh and logout endpoints.
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use employee_common::{AuthResponse, EnrichedUser, LoginRequest, RefreshRequest};

use crate::auth::LoginOutcome;
use crate::config::JwtSettings;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `Set-Cookie` value carrying the access token
fn access_cookie(jwt: &JwtSettings, value: &str, max_age: Duration) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}",
        jwt.cookie_name,
        value,
        max_age.as_secs()
    );
    if let Some(domain) = &jwt.cookie_domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if jwt.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }
    if jwt.secure_cookie {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(format!("invalid cookie: {e}")))
}

fn auth_response<S: Storage>(
    state: &AppState<S>,
    outcome: LoginOutcome,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let mut headers = HeaderMap::new();
    let jwt = &state.settings.jwt;
    if jwt.send_cookie {
        headers.insert(
            SET_COOKIE,
            access_cookie(jwt, &outcome.tokens.access_token, state.auth.access_token_ttl())?,
        );
    }

    let LoginOutcome { tokens, user } = outcome;
    Ok((
        headers,
        Json(AuthResponse {
            token: tokens.access_token,
            refresh: tokens.refresh_token,
            user,
            access_token_expiry: tokens.access_token_expiry,
            refresh_token_expiry: tokens.refresh_token_expiry,
        }),
    ))
}

pub async fn login<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let outcome = state.auth.login(&body.username, &body.password).await?;
    auth_response(&state, outcome)
}

pub async fn refresh<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<RefreshRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    let outcome = state.auth.refresh(&body.refresh_token).await?;
    auth_response(&state, outcome)
}

/// Expire the access cookie. Refresh tokens stay valid until superseded or expired.
pub async fn logout<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    let mut headers = HeaderMap::new();
    let jwt = &state.settings.jwt;
    if jwt.send_cookie {
        headers.insert(SET_COOKIE, access_cookie(jwt, "", Duration::ZERO)?);
    }
    Ok((StatusCode::NO_CONTENT, headers))
}

/// The authenticated caller
pub async fn me(Extension(user): Extension<EnrichedUser>) -> Json<EnrichedUser> {
    Json(user)
}
