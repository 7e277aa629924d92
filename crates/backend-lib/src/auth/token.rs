// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Access/refresh token issuance and validation.
//!
//! Access tokens are signed with the configured algorithm. Refresh tokens
//! are always HMAC-signed and are only accepted while they are the latest
//! value stored in the side channel for their identity.
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use employee_common::UserId;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::side_channel::SideChannel;
use crate::config::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::metrics::{REFRESH_REJECTED, TOKEN_ISSUED};

/// Claims carried by both token kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Stringified user identity
    pub id: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Issue time, seconds since the epoch
    pub orig_iat: i64,
    #[serde(default)]
    pub jti: String,
}

/// Freshly minted access and refresh tokens
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expiry: DateTime<Utc>,
    pub refresh_token_expiry: DateTime<Utc>,
}

/// `RS256`, `RS384` and `RS512` sign with a private key; everything else with the shared secret.
pub fn uses_public_key_algorithm(algorithm: &str) -> bool {
    matches!(algorithm, "RS256" | "RS384" | "RS512")
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

/// Mints token pairs and checks them on the way back in
pub struct TokenIssuer {
    access_algorithm: Algorithm,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_algorithm: Algorithm,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    side_channel: Arc<dyn SideChannel>,
}

impl TokenIssuer {
    /// Build an issuer from configuration, loading RSA keys when required
    pub fn from_settings(
        jwt: &JwtSettings,
        side_channel: Arc<dyn SideChannel>,
    ) -> Result<Self, AppError> {
        let algorithm = Algorithm::from_str(&jwt.signing_algorithm).map_err(|_| {
            AppError::Config(format!("unknown signing algorithm '{}'", jwt.signing_algorithm))
        })?;
        if !is_hmac(algorithm) && !uses_public_key_algorithm(&jwt.signing_algorithm) {
            return Err(AppError::Config(format!(
                "unsupported signing algorithm '{}', expected HS* or RS*",
                jwt.signing_algorithm
            )));
        }
        let secret = jwt.signing_secret_key.as_bytes();

        let (access_encoding, access_decoding) = if uses_public_key_algorithm(&jwt.signing_algorithm) {
            let private_path = jwt.private_key_path.as_ref().ok_or_else(|| {
                AppError::Config("jwt.private_key_path is required for RSA signing".to_string())
            })?;
            let public_path = jwt.public_key_path.as_ref().ok_or_else(|| {
                AppError::Config("jwt.public_key_path is required for RSA signing".to_string())
            })?;
            let private_pem = std::fs::read(private_path)?;
            let public_pem = std::fs::read(public_path)?;
            (
                EncodingKey::from_rsa_pem(&private_pem)
                    .map_err(|e| AppError::Config(format!("invalid RSA private key: {e}")))?,
                DecodingKey::from_rsa_pem(&public_pem)
                    .map_err(|e| AppError::Config(format!("invalid RSA public key: {e}")))?,
            )
        } else {
            (EncodingKey::from_secret(secret), DecodingKey::from_secret(secret))
        };

        let refresh_algorithm = if is_hmac(algorithm) {
            algorithm
        } else {
            Algorithm::HS256
        };

        Ok(Self {
            access_algorithm: algorithm,
            access_encoding,
            access_decoding,
            refresh_algorithm,
            refresh_encoding: EncodingKey::from_secret(secret),
            refresh_decoding: DecodingKey::from_secret(secret),
            access_ttl: jwt.access_token_ttl(),
            refresh_ttl: jwt.refresh_token_ttl(),
            side_channel,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign a new token pair for `user_id` and remember the refresh token
    #[tracing::instrument(skip(self))]
    pub async fn issue(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let now = Utc::now();
        let access_token_expiry = expiry_after(now, self.access_ttl)?;
        let refresh_token_expiry = expiry_after(now, self.refresh_ttl)?;

        let access_token = self.sign(
            self.access_algorithm,
            &self.access_encoding,
            user_id,
            now,
            access_token_expiry,
        )?;
        let refresh_token = self.sign(
            self.refresh_algorithm,
            &self.refresh_encoding,
            user_id,
            now,
            refresh_token_expiry,
        )?;

        self.side_channel
            .set(&user_id.to_string(), &refresh_token, self.refresh_ttl)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to persist refresh token");
                AuthError::TokenCreationFailed
            })?;

        counter!(TOKEN_ISSUED).increment(1);
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_token_expiry,
            refresh_token_expiry,
        })
    }

    /// Check signature and expiry of an access token
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.access_algorithm);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.access_decoding, &validation)?;
        Ok(data.claims)
    }

    /// Resolve a refresh token to its identity.
    ///
    /// The token must be HMAC-signed, unexpired, and identical to the value
    /// last stored in the side channel for its identity.
    #[tracing::instrument(skip_all)]
    pub async fn validate_refresh(&self, token: &str) -> Result<UserId, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::error!(error = %e, "RefreshToken error");
            AuthError::Jwt(e)
        })?;
        if !is_hmac(header.alg) {
            tracing::error!(alg = ?header.alg, "RefreshToken unexpected signing method");
            counter!(REFRESH_REJECTED).increment(1);
            return Err(AuthError::UnexpectedSigningMethod);
        }

        let mut validation = Validation::new(header.alg);
        validation.leeway = 0;
        let claims = decode::<Claims>(token, &self.refresh_decoding, &validation)
            .map_err(|e| {
                tracing::error!(error = %e, "RefreshToken error");
                counter!(REFRESH_REJECTED).increment(1);
                AuthError::Jwt(e)
            })?
            .claims;

        match self.side_channel.get(&claims.id).await {
            Ok(Some(latest)) if latest == token => {},
            Ok(_) => {
                tracing::warn!(user = %claims.id, "RefreshToken superseded or expired");
                counter!(REFRESH_REJECTED).increment(1);
                return Err(AuthError::InvalidToken);
            },
            Err(e) => {
                tracing::error!(error = %e, "RefreshToken side channel error");
                counter!(REFRESH_REJECTED).increment(1);
                return Err(AuthError::InvalidToken);
            },
        }

        Uuid::parse_str(&claims.id).map_err(|e| {
            tracing::error!(error = %e, "RefreshToken: invalid user");
            AuthError::InvalidIdentity(e)
        })
    }

    fn sign(
        &self,
        algorithm: Algorithm,
        key: &EncodingKey,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            id: user_id.to_string(),
            exp: expires_at.timestamp(),
            orig_iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(algorithm), &claims, key).map_err(|e| {
            tracing::error!(error = %e, ?algorithm, "token signing failed");
            AuthError::TokenCreationFailed
        })
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AuthError> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| {
            tracing::error!(?ttl, "token lifetime out of range");
            AuthError::TokenCreationFailed
        })
}
