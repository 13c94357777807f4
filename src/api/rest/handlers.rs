//! # REST Handlers
//!
//! Request handlers, request/response bodies and error mapping.
//!
//! # Error mapping
//!
//! | failure | status |
//! |---|---|
//! | wrong method | 405 |
//! | content type without `application/json` | 415 |
//! | malformed JSON, bad `transaction_date`, validation, domain rule | 400 |
//! | duplicate transaction, identifier collision | 409 |
//! | anything else | 500, message redacted |

use crate::application::error::ApplicationError;
use crate::application::use_cases::{CreateChargebackRequest, CreateChargebackUseCase};
use crate::domain::value_objects::Timestamp;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "chargeback-api";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chargeback creation workflow.
    pub create_chargeback: CreateChargebackUseCase,
    /// Version reported by the health endpoint.
    pub version: String,
}

impl AppState {
    /// Creates the state.
    #[must_use]
    pub fn new(create_chargeback: CreateChargebackUseCase, version: impl Into<String>) -> Self {
        Self {
            create_chargeback,
            version: version.into(),
        }
    }
}

/// Body of `POST /chargebacks`.
///
/// Missing fields take empty values and are reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateChargebackBody {
    /// Disputed transaction.
    pub transaction_id: String,
    /// Merchant.
    pub merchant_id: String,
    /// Disputed amount, as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Raw card number.
    pub card_number: String,
    /// Reason wire name.
    pub reason: String,
    /// Optional description.
    pub description: Option<String>,
    /// RFC 3339 transaction time.
    pub transaction_date: String,
}

impl CreateChargebackBody {
    fn into_request(self) -> Result<CreateChargebackRequest, ApiError> {
        let transaction_date = Timestamp::parse_rfc3339(&self.transaction_date).map_err(|_| {
            ApiError::bad_request("Invalid transaction_date format. Use RFC3339 format")
        })?;

        Ok(CreateChargebackRequest {
            transaction_id: self.transaction_id,
            merchant_id: self.merchant_id,
            amount: self.amount,
            currency: self.currency,
            card_number: self.card_number,
            reason: self.reason,
            description: self.description,
            transaction_date,
        })
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` when the process answers.
    pub status: String,
    /// Response time.
    pub timestamp: Timestamp,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// An HTTP error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Message sent to the client.
    pub message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 error.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    /// Creates a 405 error.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    /// Creates a 415 error.
    #[must_use]
    pub fn unsupported_media_type() -> Self {
        Self::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json",
        )
    }

    /// Creates a 500 error. The cause is never sent to the client.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_validation() {
            Self::bad_request(err.to_string())
        } else if err.is_conflict() {
            Self::new(StatusCode::CONFLICT, err.to_string())
        } else {
            tracing::error!(error = %err, "chargeback request failed");
            Self::internal()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(JSON_MEDIA_TYPE))
}

/// `POST /chargebacks`
///
/// The body is read as raw bytes so that content type and JSON errors map
/// to this API's own status codes and messages.
pub async fn create_chargeback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if !is_json(&headers) {
        return Err(ApiError::unsupported_media_type());
    }

    let body: CreateChargebackBody =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("Invalid JSON format"))?;
    let request = body.into_request()?;

    let view = state.create_chargeback.execute(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Timestamp::now(),
        service: SERVICE_NAME.to_string(),
        version: state.version.clone(),
    })
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
