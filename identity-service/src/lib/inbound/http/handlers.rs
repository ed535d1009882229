use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::account::errors::AccountLookupError;
use crate::account::errors::ConflictError;
use crate::account::errors::RegistrationError;
use crate::account::errors::ValidationError;
use crate::session::errors::AuthError;

pub mod check_exists;
pub mod get_profile;
pub mod get_session;
pub mod login;
pub mod register_buyer;
pub mod register_vendor;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(ValidationError),
    BadRequest(String),
    NotFound(String),
    Conflict(ConflictError),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
            ApiError::UnprocessableEntity(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                error.to_string(),
                serde_json::to_value(&error).ok(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(conflict) => (
                StatusCode::CONFLICT,
                conflict.to_string(),
                serde_json::to_value(conflict).ok(),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message, details)),
        )
            .into_response()
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(error) => ApiError::UnprocessableEntity(error),
            RegistrationError::Conflict(conflict) => ApiError::Conflict(conflict),
            RegistrationError::Persistence(_) => {
                ApiError::InternalServerError("Registration failed".to_string())
            }
        }
    }
}

/// Bodies that are not valid JSON are a bad request; JSON of the wrong shape
/// is invalid input like any other failed field check.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(error) => {
                let mut validation = ValidationError::default();
                validation.push("body", error.body_text());
                ApiError::UnprocessableEntity(validation)
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::ExpiredToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Unavailable(_) => {
                ApiError::ServiceUnavailable("Authentication unavailable".to_string())
            }
            AuthError::Internal(_) => {
                ApiError::InternalServerError("Authentication failed".to_string())
            }
        }
    }
}

impl From<AccountLookupError> for ApiError {
    fn from(err: AccountLookupError) -> Self {
        match err {
            AccountLookupError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AccountLookupError::Persistence(_) => {
                ApiError::InternalServerError("Account lookup failed".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, details: Option<Value>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, details },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_conflict_response_carries_flags() {
        let response = ApiError::from(RegistrationError::Conflict(ConflictError::email())).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 409);
        assert_eq!(body["data"]["details"]["email_exists"], true);
        assert_eq!(body["data"]["details"]["ntn_exists"], false);
    }

    #[tokio::test]
    async fn test_validation_response_names_fields() {
        let mut error = ValidationError::default();
        error.push("email", "is required");

        let response = ApiError::from(RegistrationError::Validation(error)).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["data"]["details"]["fields"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_persistence_detail_is_not_echoed() {
        let response = ApiError::from(RegistrationError::Persistence(
            "relation \"accounts\" does not exist".to_string(),
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["data"]["message"], "Registration failed");
        assert!(body["data"].get("details").is_none());
    }

    #[test]
    fn test_auth_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized("Invalid credentials".to_string())
        );
        assert_eq!(
            ApiError::from(AuthError::ExpiredToken),
            ApiError::Unauthorized("Token expired".to_string())
        );
        assert!(matches!(
            ApiError::from(AuthError::Unavailable("timeout".to_string())),
            ApiError::ServiceUnavailable(_)
        ));
    }
}
