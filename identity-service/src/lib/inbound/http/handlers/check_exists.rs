use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::ExistenceField;
use crate::account::models::Role;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Advisory probe used by sign-up forms before submitting.
pub async fn check_exists(
    State(state): State<AppState>,
    Query(params): Query<CheckExistsParams>,
) -> Result<ApiSuccess<CheckExistsData>, ApiError> {
    let field: ExistenceField = params
        .field
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid field: {}", e)))?;

    let scope = params
        .role
        .as_deref()
        .filter(|role| !role.trim().is_empty())
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let exists = state
        .account_service
        .check_exists(field, &params.value, scope)
        .await;

    Ok(ApiSuccess::new(StatusCode::OK, CheckExistsData { exists }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckExistsParams {
    field: String,
    value: String,
    role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckExistsData {
    pub exists: bool,
}
