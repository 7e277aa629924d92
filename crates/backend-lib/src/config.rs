// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Deserializer};

use crate::auth::password::PasswordRequirements;
use crate::auth::token::uses_public_key_algorithm;
use crate::error::AppError;

/// Prefix of environment variables overriding the config file
pub const ENV_PREFIX: &str = "EMS_";

/// Access token lifetime when none is configured
pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh token lifetime when none is configured
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted token lifetime, in minutes (ten years)
pub const MAX_TOKEN_EXPIRY_MINUTES: u64 = 10 * 365 * 24 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// IANA timezone used for partner work-time windows
    pub timezone: String,
    /// Optional JSON file loaded into the in-memory store at startup
    pub seed_file: Option<PathBuf>,
    /// Session cache entry lifetime; entries live for the whole process when unset
    pub session_cache_ttl_secs: Option<u64>,
    /// Token signing and cookie settings
    pub jwt: JwtSettings,
    /// Password requirements for new accounts
    pub password_requirements: PasswordRequirements,
}

/// Token signing and cookie settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtSettings {
    /// HMAC secret; also signs refresh tokens under RSA algorithms
    pub signing_secret_key: String,
    /// Algorithm name, e.g. `HS256` or `RS256`
    pub signing_algorithm: String,
    /// Access token lifetime in minutes
    #[serde(deserialize_with = "lenient_minutes")]
    pub access_token_expiry: Option<u64>,
    /// Refresh token lifetime in minutes
    #[serde(deserialize_with = "lenient_minutes")]
    pub refresh_token_expiry: Option<u64>,
    /// PEM private key for `RS*` algorithms
    pub private_key_path: Option<PathBuf>,
    /// PEM public key for `RS*` algorithms
    pub public_key_path: Option<PathBuf>,
    /// Also hand the access token out as a cookie
    pub send_cookie: bool,
    pub cookie_name: String,
    pub cookie_domain: Option<String>,
    pub secure_cookie: bool,
    pub cookie_http_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            timezone: "UTC".to_string(),
            seed_file: None,
            session_cache_ttl_secs: None,
            jwt: JwtSettings::default(),
            password_requirements: PasswordRequirements::default(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            signing_secret_key: String::new(),
            signing_algorithm: "HS256".to_string(),
            access_token_expiry: None,
            refresh_token_expiry: None,
            private_key_path: None,
            public_key_path: None,
            send_cookie: false,
            cookie_name: "jwt".to_string(),
            cookie_domain: None,
            secure_cookie: false,
            cookie_http_only: true,
        }
    }
}

/// Accept a number or a numeric string; anything else counts as unset.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }))
}

impl Settings {
    /// Layered configuration: `config.toml`, then `EMS_` environment variables
    pub fn figment() -> Figment {
        Self::figment_from("config.toml")
    }

    pub fn figment_from<P: AsRef<Path>>(path: P) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate settings from the default locations
    pub fn load() -> Result<Self, AppError> {
        Self::from_figment(Self::figment())
    }

    /// Load and validate settings using an explicit config file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        Self::from_figment(Self::figment_from(path))
    }

    fn from_figment(figment: Figment) -> Result<Self, AppError> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), AppError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }

        self.signing_algorithm()?;
        if uses_public_key_algorithm(&self.jwt.signing_algorithm) {
            if self.jwt.private_key_path.is_none() || self.jwt.public_key_path.is_none() {
                return Err(AppError::Config(format!(
                    "{} requires jwt.private_key_path and jwt.public_key_path",
                    self.jwt.signing_algorithm
                )));
            }
        }
        for (name, minutes) in [
            ("jwt.access_token_expiry", self.jwt.access_token_expiry),
            ("jwt.refresh_token_expiry", self.jwt.refresh_token_expiry),
        ] {
            if minutes.is_some_and(|m| m > MAX_TOKEN_EXPIRY_MINUTES) {
                return Err(AppError::Config(format!(
                    "{name} must not exceed {MAX_TOKEN_EXPIRY_MINUTES} minutes"
                )));
            }
        }

        // refresh tokens are HMAC-signed under every algorithm
        if self.jwt.signing_secret_key.is_empty() {
            return Err(AppError::Config(
                "jwt.signing_secret_key must not be empty".to_string(),
            ));
        }

        self.timezone()?;

        if self.jwt.cookie_name.is_empty() {
            return Err(AppError::Config(
                "jwt.cookie_name must not be empty".to_string(),
            ));
        }

        if self.password_requirements.min_length < 8 {
            return Err(AppError::Config(
                "password_requirements.min_length must be at least 8".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse the configured algorithm; only the HMAC and RSA families are supported
    pub fn signing_algorithm(&self) -> Result<Algorithm, AppError> {
        let algorithm = Algorithm::from_str(&self.jwt.signing_algorithm).map_err(|_| {
            AppError::Config(format!(
                "unknown signing algorithm '{}'",
                self.jwt.signing_algorithm
            ))
        })?;
        match algorithm {
            Algorithm::HS256
            | Algorithm::HS384
            | Algorithm::HS512
            | Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512 => Ok(algorithm),
            _ => Err(AppError::Config(format!(
                "unsupported signing algorithm '{}', expected HS* or RS*",
                self.jwt.signing_algorithm
            ))),
        }
    }

    pub fn timezone(&self) -> Result<Tz, AppError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("unknown timezone '{}': {e}", self.timezone)))
    }

    pub fn session_cache_ttl(&self) -> Option<Duration> {
        self.session_cache_ttl_secs.map(Duration::from_secs)
    }
}

impl JwtSettings {
    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_expiry
            .map(|mins| Duration::from_secs(mins.saturating_mul(60)))
            .unwrap_or(DEFAULT_ACCESS_TOKEN_TTL)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_expiry
            .map(|mins| Duration::from_secs(mins.saturating_mul(60)))
            .unwrap_or(DEFAULT_REFRESH_TOKEN_TTL)
    }
}
