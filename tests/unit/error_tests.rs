use axum::{http::StatusCode, response::IntoResponse};
use backend_lib::{
    error::{AppError, AuthError},
    storage::StorageError,
    validation::ValidationError,
};

#[test]
fn test_auth_error_codes_are_unique() {
    let errors = [
        AuthError::FailedAuthentication,
        AuthError::AccountSuspended,
        AuthError::CorruptAdminAccount,
        AuthError::CorruptAgentAccount,
        AuthError::FetchingAgentPartner,
        AuthError::FetchingPartner,
        AuthError::TokenCreationFailed,
        AuthError::UnexpectedSigningMethod,
        AuthError::InvalidToken,
        AuthError::Unauthorized,
    ];
    let mut codes: Vec<&str> = errors.iter().map(AuthError::error_code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn test_enrichment_errors_are_server_errors() {
    for err in [
        AuthError::CorruptAdminAccount,
        AuthError::CorruptAgentAccount,
        AuthError::FetchingAgentPartner,
        AuthError::FetchingPartner,
        AuthError::TokenCreationFailed,
    ] {
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        AuthError::FailedAuthentication.to_string(),
        "incorrect username or password"
    );
    assert_eq!(AuthError::AccountSuspended.to_string(), "user account is suspended");
    assert_eq!(
        StorageError::UnauthorizedAccess.to_string(),
        "you have no access to perform this task"
    );
}

#[test]
fn test_validation_error_status() {
    let err = AppError::from(ValidationError::InvalidEmail("bad".to_string()));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.error_code(), "VAL_001");
    assert!(err.sanitized_message().contains("bad"));
}

#[tokio::test]
async fn test_error_response_body() {
    let response = AppError::from(StorageError::RecordNotFound).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "STORE_001");
    assert!(body["error"]["message"].as_str().is_some());
}
