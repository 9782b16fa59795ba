use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockwise_core::AnalyticsError;
use stockwise_engine::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Analytics(AnalyticsError::InvalidParameter(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_parameter", msg)
        }
        ServiceError::Analytics(e @ AnalyticsError::InsufficientData { .. }) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_data", e.to_string())
        }
        ServiceError::Analytics(e @ AnalyticsError::DegenerateBacktest) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "degenerate_backtest", e.to_string())
        }
        ServiceError::ProductNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "product not found")
        }
        ServiceError::Provider(e) => {
            tracing::error!(error = %e, "replenishment data provider failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "provider_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
