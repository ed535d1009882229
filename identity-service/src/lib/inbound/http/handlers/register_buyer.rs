use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::BuyerRegistration;
use crate::account::models::RegisteredAccount;
use crate::account::models::Role;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register_buyer(
    State(state): State<AppState>,
    body: Result<Json<BuyerRegistration>, JsonRejection>,
) -> Result<ApiSuccess<RegisteredAccountData>, ApiError> {
    let Json(body) = body?;

    state
        .account_service
        .register_buyer(body)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredAccountData {
    pub id: String,
    pub role: Role,
}

impl From<&RegisteredAccount> for RegisteredAccountData {
    fn from(account: &RegisteredAccount) -> Self {
        Self {
            id: account.id.to_string(),
            role: account.role,
        }
    }
}
