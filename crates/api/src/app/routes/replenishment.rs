use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/forecast", post(compute_forecast))
        .route("/scenarios", post(simulate_scenarios))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> axum::response::Response {
    match services.list_products(tenant.tenant_id()) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn compute_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<dto::ForecastRequestBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return dto::reject_body(rejection),
    };
    let request = match body.into_request() {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    match services.compute_forecast(tenant.tenant_id(), &request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn simulate_scenarios(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    body: Result<Json<dto::ScenarioRequestBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return dto::reject_body(rejection),
    };
    let product_id = match dto::parse_product_id(&body.product_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.simulate_scenarios(
        tenant.tenant_id(),
        product_id,
        body.demand_change_percent,
        body.lead_time_change_days,
    ) {
        Ok(scenarios) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "productId": product_id.to_string(),
                "scenarios": scenarios,
            })),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
