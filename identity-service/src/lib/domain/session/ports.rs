use async_trait::async_trait;

use crate::session::errors::AuthError;
use crate::session::models::Session;
use crate::session::models::SessionToken;

/// Port for credential login and token validation.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Exchange an email and password for a signed session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Unavailable` - The identity store failed or timed out
    /// * `Internal` - Token signing failed
    async fn login(&self, email: &str, password: &str) -> Result<SessionToken, AuthError>;

    /// Check a token's signature and expiry and return the identity it asserts.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, tampered, or signed with another secret
    /// * `ExpiredToken` - Past its expiry
    fn validate_token(&self, token: &str) -> Result<Session, AuthError>;
}
