use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Role;
use crate::inbound::http::middleware::AuthenticatedAccount;

/// Echo the identity asserted by the caller's bearer token.
pub async fn get_session(
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    let session = authenticated.session;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionData {
            account_id: session.account_id.to_string(),
            role: session.role,
            email: session.email,
            issued_at: session.issued_at,
            expires_at: session.expires_at,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub account_id: String,
    pub role: Role,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
