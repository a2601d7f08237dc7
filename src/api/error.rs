use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::MessageResponse;
use crate::pricing::CostError;

/// Every failure a handler can answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No account exists for the meter (400).
    UnknownMeter(String),
    /// Nothing meaningful to report for this meter or window (404, empty body).
    NotFound,
    /// The request itself is invalid (400).
    BadRequest(String),
}

impl From<CostError> for ApiError {
    fn from(err: CostError) -> Self {
        if err.is_no_cost() {
            Self::NotFound
        } else {
            Self::BadRequest(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::UnknownMeter(meter_id) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(format!(
                    "smart meter \"{meter_id}\" does not exist, please check the id or provision an account for it"
                ))),
            )
                .into_response(),
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(message)),
            )
                .into_response(),
        }
    }
}
