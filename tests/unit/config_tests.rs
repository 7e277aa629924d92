use std::io::Write;
use std::sync::Arc;

use backend_lib::{
    auth::{MemorySideChannel, TokenIssuer},
    config::Settings,
    error::AppError,
};
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_explicit_file() {
    let file = config_file(
        r#"
        bind_addr = "0.0.0.0:9090"
        timezone = "Europe/Berlin"
        session_cache_ttl_secs = 600

        [jwt]
        signing_secret_key = "file-secret"
        signing_algorithm = "HS512"
        access_token_expiry = 10
        refresh_token_expiry = "90"
        send_cookie = true
        cookie_name = "access"
        "#,
    );

    let settings = Settings::load_from(file.path()).unwrap();
    assert_eq!(settings.bind_addr.port(), 9090);
    assert_eq!(settings.timezone().unwrap(), chrono_tz::Europe::Berlin);
    assert_eq!(
        settings.session_cache_ttl(),
        Some(std::time::Duration::from_secs(600))
    );
    assert_eq!(settings.jwt.access_token_ttl().as_secs(), 10 * 60);
    assert_eq!(settings.jwt.refresh_token_ttl().as_secs(), 90 * 60);
    assert!(settings.jwt.send_cookie);
    assert_eq!(settings.jwt.cookie_name, "access");
}

#[test]
fn test_load_rejects_missing_secret() {
    let file = config_file(
        r#"
        [jwt]
        signing_algorithm = "HS256"
        "#,
    );
    assert!(matches!(Settings::load_from(file.path()), Err(AppError::Config(_))));
}

#[test]
fn test_load_rejects_unknown_timezone() {
    let file = config_file(
        r#"
        timezone = "Atlantis/Central"

        [jwt]
        signing_secret_key = "file-secret"
        "#,
    );
    assert!(matches!(Settings::load_from(file.path()), Err(AppError::Config(_))));
}

#[test]
fn test_rsa_keys_must_be_readable_pem() {
    let not_a_key = config_file("definitely not a PEM key");
    let mut settings = Settings::default();
    settings.jwt.signing_secret_key = "refresh-secret".to_string();
    settings.jwt.signing_algorithm = "RS256".to_string();
    settings.jwt.private_key_path = Some(not_a_key.path().to_path_buf());
    settings.jwt.public_key_path = Some(not_a_key.path().to_path_buf());
    assert!(settings.validate().is_ok());

    let result = TokenIssuer::from_settings(&settings.jwt, Arc::new(MemorySideChannel::new()));
    assert!(matches!(result, Err(AppError::Config(_))));
}
