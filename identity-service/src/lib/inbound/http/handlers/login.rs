use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Password;
use crate::inbound::http::router::AppState;
use crate::session::models::SessionToken;
use crate::session::ports::SessionServicePort;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SessionToken>, ApiError> {
    let Json(body) = body?;

    state
        .session_service
        .login(&body.email, body.password.expose())
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, token))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: Password,
}
