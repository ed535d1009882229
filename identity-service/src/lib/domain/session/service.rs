use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;

use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;
use crate::domain::deadline;
use crate::session::errors::AuthError;
use crate::session::models::Clock;
use crate::session::models::Session;
use crate::session::models::SessionToken;
use crate::session::models::TokenClaims;
use crate::session::ports::SessionServicePort;

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Domain service implementation for login and token validation.
pub struct SessionService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
    clock: Arc<dyn Clock>,
    token_ttl: chrono::Duration,
    store_timeout: Duration,
}

impl<AR> SessionService<AR>
where
    AR: AccountRepository,
{
    /// Create a new session service.
    ///
    /// # Arguments
    /// * `repository` - Credential lookup
    /// * `authenticator` - Password verification and token signing
    /// * `clock` - Time source for issuance and expiry
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            authenticator,
            clock,
            token_ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            store_timeout: deadline::DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: chrono::Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Spend a decoy verification so unknown identities cost the same as wrong passwords.
    async fn reject(&self, password: String) -> AuthError {
        let authenticator = Arc::clone(&self.authenticator);
        let _ = tokio::task::spawn_blocking(move || authenticator.reject(&password)).await;
        AuthError::InvalidCredentials
    }
}

#[async_trait]
impl<AR> SessionServicePort for SessionService<AR>
where
    AR: AccountRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<SessionToken, AuthError> {
        let password = password.to_string();

        let Ok(email) = EmailAddress::new(email.to_string()) else {
            return Err(self.reject(password).await);
        };

        let credentials = deadline::within(
            self.store_timeout,
            self.repository.find_credentials_by_email(&email),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Credential lookup failed");
            AuthError::from(e)
        })?;

        let Some(credentials) = credentials else {
            tracing::info!("Login rejected: unknown identity");
            return Err(self.reject(password).await);
        };

        // Claims carry whole seconds; keep the reported expiry on the same grid
        let issued_at = self.clock.now().trunc_subsecs(0);
        let expires_at = issued_at + self.token_ttl;
        let claims = TokenClaims::for_account(&credentials, issued_at, expires_at);

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = credentials.password_hash.clone();
        let access_token = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &claims)
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::info!(account_id = %credentials.account_id, "Login rejected: wrong password");
                AuthError::InvalidCredentials
            }
            AuthenticationError::JwtError(err) => {
                tracing::error!(error = %err, "Token signing failed");
                AuthError::Internal(err.to_string())
            }
        })?;

        tracing::info!(
            account_id = %credentials.account_id,
            role = %credentials.role,
            "Login succeeded"
        );

        Ok(SessionToken::bearer(access_token, expires_at))
    }

    fn validate_token(&self, token: &str) -> Result<Session, AuthError> {
        let claims: TokenClaims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AuthError::InvalidToken
        })?;

        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;

        if self.clock.now() > expires_at {
            return Err(AuthError::ExpiredToken);
        }

        let account_id = AccountId::from_string(&claims.account_id).map_err(|_| AuthError::InvalidToken)?;

        Ok(Session {
            account_id,
            email: claims.sub,
            role: claims.role,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(seconds, 0).ok_or(AuthError::InvalidToken)
}
