use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use employee_common::{EnrichedUser, Kind, User, UserId};
use metrics::counter;
use uuid::Uuid;

use super::{
    validate_password_strength, AuthService, LoginOutcome, PasswordRequirements, RoleEnricher,
    SessionCache, TokenIssuer,
};
use crate::error::{AppError, AuthError};
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, REFRESH_SUCCESS};
use crate::storage::CredentialStore;
use crate::validation::{validate_username, ValidationError};

pub struct DefaultAuth {
    credentials: Arc<dyn CredentialStore>,
    enricher: RoleEnricher,
    tokens: TokenIssuer,
    sessions: SessionCache,
    password_requirements: PasswordRequirements,
}

impl DefaultAuth {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        enricher: RoleEnricher,
        tokens: TokenIssuer,
        sessions: SessionCache,
        password_requirements: PasswordRequirements,
    ) -> Self {
        Self {
            credentials,
            enricher,
            tokens,
            sessions,
            password_requirements,
        }
    }

    async fn enrich_and_cache(&self, user: User) -> Result<EnrichedUser, AuthError> {
        let enriched = self.enricher.enrich(user).await?;
        self.sessions.insert(enriched.clone());
        Ok(enriched)
    }

    async fn load_user(&self, id: UserId) -> Result<User, AuthError> {
        self.credentials.get_user_by_id(id).await.map_err(|e| {
            tracing::warn!(error = %e, user = %id, "token identity has no account");
            AuthError::Unauthorized
        })
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = match self.credentials.authenticate(username, password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(error = %e, "login rejected");
                counter!(LOGIN_FAILURE).increment(1);
                return Err(AuthError::FailedAuthentication);
            },
        };

        let user = self.enrich_and_cache(user).await.inspect_err(|e| {
            tracing::warn!(error = %e, "login enrichment failed");
            counter!(LOGIN_FAILURE).increment(1);
        })?;
        let tokens = self.tokens.issue(user.id()).await?;

        counter!(LOGIN_SUCCESS).increment(1);
        tracing::info!(user = %user.id(), "login succeeded");
        Ok(LoginOutcome { tokens, user })
    }

    async fn validate_refresh(&self, refresh_token: &str) -> Result<UserId, AuthError> {
        self.tokens.validate_refresh(refresh_token).await
    }

    #[tracing::instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<LoginOutcome, AuthError> {
        let id = self.tokens.validate_refresh(refresh_token).await?;
        let user = self.load_user(id).await?;
        let user = self.enrich_and_cache(user).await?;
        let tokens = self.tokens.issue(id).await?;

        counter!(REFRESH_SUCCESS).increment(1);
        Ok(LoginOutcome { tokens, user })
    }

    #[tracing::instrument(skip_all)]
    async fn authorize(&self, access_token: &str) -> Result<EnrichedUser, AuthError> {
        let claims = self.tokens.verify_access(access_token)?;
        let id = Uuid::parse_str(&claims.id)?;

        if let Some(user) = self.sessions.get(&id) {
            return Ok(user);
        }
        let user = self.load_user(id).await?;
        self.enrich_and_cache(user).await
    }

    #[tracing::instrument(skip(self, password))]
    async fn register(
        &self,
        username: &str,
        password: &str,
        kind: Kind,
    ) -> Result<User, AppError> {
        validate_username(username)?;
        if !validate_password_strength(password, &self.password_requirements) {
            return Err(ValidationError::InvalidPassword(format!(
                "password must be at least {} characters and meet the complexity rules",
                self.password_requirements.min_length
            ))
            .into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            user_name: username.to_string(),
            password: String::new(),
            kind,
            created_at: now,
            updated_at: now,
        };
        Ok(self.credentials.register(user, password).await?)
    }

    fn access_token_ttl(&self) -> Duration {
        self.tokens.access_ttl()
    }
}
