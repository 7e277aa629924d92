use std::time::Duration;

use async_trait::async_trait;
use employee_common::{EnrichedUser, Kind, User, UserId};

use super::TokenPair;
use crate::error::{AppError, AuthError};

/// Result of a successful login or refresh
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub user: EnrichedUser,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials, enrich the user and issue a token pair
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError>;

    /// Identity bound to a refresh token, if it is still the latest one issued
    async fn validate_refresh(&self, refresh_token: &str) -> Result<UserId, AuthError>;

    /// Exchange a refresh token for a new pair, superseding the old one
    async fn refresh(&self, refresh_token: &str) -> Result<LoginOutcome, AuthError>;

    /// Resolve the user behind an access token
    async fn authorize(&self, access_token: &str) -> Result<EnrichedUser, AuthError>;

    /// Create an account after checking the password policy
    async fn register(&self, username: &str, password: &str, kind: Kind)
        -> Result<User, AppError>;

    fn access_token_ttl(&self) -> Duration;
}
