use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::register_buyer::RegisteredAccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::models::VendorRegistration;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register_vendor(
    State(state): State<AppState>,
    body: Result<Json<VendorRegistration>, JsonRejection>,
) -> Result<ApiSuccess<RegisteredAccountData>, ApiError> {
    let Json(body) = body?;

    state
        .account_service
        .register_vendor(body)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}
