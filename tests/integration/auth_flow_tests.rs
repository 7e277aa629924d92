use std::sync::Arc;

use axum::http::{header, Method, Request, StatusCode};
use backend_lib::auth::FixedClock;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::{json, Value};

use crate::test_utils::{
    access_token, json_request, login, send, setup_test_app, setup_with, test_settings, PASSWORD,
};

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

fn partner_ids(body: &Value) -> Vec<i64> {
    body["user"]["role"]["profile"]["partners"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

fn expiry(body: &Value, field: &str) -> DateTime<Utc> {
    serde_json::from_value(body[field].clone()).unwrap()
}

#[tokio::test]
async fn test_admin_login() {
    let app = setup_test_app();
    let before = Utc::now();

    let (status, headers, body) = login(&app.router, "admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::SET_COOKIE).is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["user"]["user_name"], "admin");
    assert!(body["user"]["user"].get("password").is_none());
    assert_eq!(body["user"]["role"]["role"], "administrator");

    let access_window = expiry(&body, "access_token_expiry") - before;
    assert!(access_window > TimeDelta::minutes(14) && access_window <= TimeDelta::minutes(15) + TimeDelta::seconds(1));
    let refresh_window = expiry(&body, "refresh_token_expiry") - before;
    assert!(refresh_window > TimeDelta::hours(23) && refresh_window <= TimeDelta::hours(24) + TimeDelta::seconds(1));

    assert!(app.state.sessions.contains(&app.users.admin));
}

#[tokio::test]
async fn test_configured_token_lifetimes() {
    let mut settings = test_settings();
    settings.jwt.access_token_expiry = Some(5);
    settings.jwt.refresh_token_expiry = Some(60);
    let app = setup_with(settings, Arc::new(backend_lib::auth::SystemClock));
    let before = Utc::now();

    let (status, _, body) = login(&app.router, "admin").await;
    assert_eq!(status, StatusCode::OK);
    let access_window = expiry(&body, "access_token_expiry") - before;
    assert!(access_window > TimeDelta::minutes(4) && access_window <= TimeDelta::minutes(5) + TimeDelta::seconds(1));
    let refresh_window = expiry(&body, "refresh_token_expiry") - before;
    assert!(refresh_window > TimeDelta::minutes(59) && refresh_window <= TimeDelta::minutes(60) + TimeDelta::seconds(1));
}

#[tokio::test]
async fn test_failed_logins_are_indistinguishable() {
    let app = setup_test_app();

    let unknown = json_request(
        Method::POST,
        "/auth/login",
        Some(json!({"username": "ghost", "password": PASSWORD})),
        None,
    );
    let wrong = json_request(
        Method::POST,
        "/auth/login",
        Some(json!({"username": "admin", "password": "Wr0ng!Password"})),
        None,
    );

    let (unknown_status, _, unknown_body) = send(&app.router, unknown).await;
    let (wrong_status, _, wrong_body) = send(&app.router, wrong).await;
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&unknown_body), "AUTH_001");
    assert_eq!(unknown_body, wrong_body);
    assert!(!app.state.sessions.contains(&app.users.admin));
}

#[tokio::test]
async fn test_suspended_admin_is_rejected() {
    let app = setup_test_app();

    let (status, _, body) = login(&app.router, "suspended").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "AUTH_002");
    assert!(!app.state.sessions.contains(&app.users.suspended));
}

#[tokio::test]
async fn test_user_without_role_passes_through() {
    let app = setup_test_app();

    let (status, _, body) = login(&app.router, "plain").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"]["role"], "unknown");
}

#[tokio::test]
async fn test_agent_partners_follow_work_time() {
    let noon = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
    let app = setup_with(test_settings(), Arc::new(FixedClock(noon)));
    let (status, _, body) = login(&app.router, "agent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"]["role"], "agent");
    assert_eq!(partner_ids(&body), vec![1, 3]);

    let evening = Utc.with_ymd_and_hms(2024, 6, 3, 20, 0, 0).unwrap();
    let app = setup_with(test_settings(), Arc::new(FixedClock(evening)));
    let (_, _, body) = login(&app.router, "agent").await;
    assert_eq!(partner_ids(&body), vec![1]);
}

#[tokio::test]
async fn test_work_time_uses_configured_timezone() {
    // 07:30 UTC is 09:30 in Johannesburg
    let early = Utc.with_ymd_and_hms(2024, 6, 3, 7, 30, 0).unwrap();
    let mut settings = test_settings();
    settings.timezone = "Africa/Johannesburg".to_string();
    let app = setup_with(settings, Arc::new(FixedClock(early)));

    let (_, _, body) = login(&app.router, "agent").await;
    assert_eq!(partner_ids(&body), vec![1, 3]);
}

#[tokio::test]
async fn test_refresh_supersedes_previous_token() {
    let app = setup_test_app();
    let (_, _, first) = login(&app.router, "admin").await;
    let first_refresh = first["refresh"].as_str().unwrap().to_string();

    let refresh = |token: &str| {
        json_request(
            Method::POST,
            "/auth/refresh",
            Some(json!({"refresh_token": token})),
            None,
        )
    };

    let (status, _, second) = send(&app.router, refresh(&first_refresh)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["user"]["user"]["user_name"], "admin");
    let second_refresh = second["refresh"].as_str().unwrap().to_string();
    assert_ne!(first_refresh, second_refresh);

    let (status, _, body) = send(&app.router, refresh(&first_refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_009");

    let (status, _, _) = send(&app.router, refresh(&second_refresh)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_again_supersedes_refresh_token() {
    let app = setup_test_app();
    let (_, _, first) = login(&app.router, "admin").await;
    let (_, _, _second) = login(&app.router, "admin").await;

    let request = json_request(
        Method::POST,
        "/auth/refresh",
        Some(json!({"refresh_token": first["refresh"]})),
        None,
    );
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_009");
}

#[tokio::test]
async fn test_refresh_rejects_asymmetric_token() {
    let app = setup_test_app();
    let jwt_header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(
        json!({
            "id": app.users.admin.to_string(),
            "exp": Utc::now().timestamp() + 3600,
            "orig_iat": Utc::now().timestamp(),
        })
        .to_string(),
    );
    let token = format!("{jwt_header}.{claims}.c2lnbmF0dXJl");

    let request = json_request(
        Method::POST,
        "/auth/refresh",
        Some(json!({"refresh_token": token})),
        None,
    );
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_008");
}

#[tokio::test]
async fn test_refresh_rejects_garbage() {
    let app = setup_test_app();
    let request = json_request(
        Method::POST,
        "/auth/refresh",
        Some(json!({"refresh_token": "definitely-not-a-jwt"})),
        None,
    );
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_011");
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = setup_test_app();

    let (status, _, body) = send(&app.router, json_request(Method::GET, "/auth/me", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_010");

    let token = access_token(&app.router, "admin").await;
    let (status, _, body) =
        send(&app.router, json_request(Method::GET, "/auth/me", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], app.users.admin.to_string());
}

#[tokio::test]
async fn test_me_reloads_user_after_cache_eviction() {
    let app = setup_test_app();
    let token = access_token(&app.router, "admin").await;
    app.state.sessions.remove(&app.users.admin);

    let (status, _, body) =
        send(&app.router, json_request(Method::GET, "/auth/me", None, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"]["role"], "administrator");
    assert!(app.state.sessions.contains(&app.users.admin));
}

#[tokio::test]
async fn test_access_token_from_other_secret_is_rejected() {
    let app = setup_test_app();
    let mut settings = test_settings();
    settings.jwt.signing_secret_key = "another-secret".to_string();
    let other = setup_with(settings, Arc::new(backend_lib::auth::SystemClock));
    let foreign = access_token(&other.router, "admin").await;

    let (status, _, body) =
        send(&app.router, json_request(Method::GET, "/auth/me", None, Some(&foreign))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_011");
}

#[tokio::test]
async fn test_cookie_mode() {
    let mut settings = test_settings();
    settings.jwt.send_cookie = true;
    let app = setup_with(settings, Arc::new(backend_lib::auth::SystemClock));

    let (status, headers, body) = login(&app.router, "admin").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert_eq!(cookie, format!("jwt={token}; Path=/; Max-Age=900; HttpOnly"));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/auth/me")
        .header(header::COOKIE, format!("jwt={token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["user_name"], "admin");

    let (status, headers, _) =
        send(&app.router, json_request(Method::POST, "/auth/logout", None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        headers.get(header::SET_COOKIE).unwrap().to_str().unwrap(),
        "jwt=; Path=/; Max-Age=0; HttpOnly"
    );
}

#[tokio::test]
async fn test_logout_without_cookie_mode() {
    let app = setup_test_app();
    let (status, headers, _) =
        send(&app.router, json_request(Method::POST, "/auth/logout", None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let (status, _, body) = send(&app.router, json_request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
