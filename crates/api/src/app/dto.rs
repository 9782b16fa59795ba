use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;

use stockwise_core::ProductId;
use stockwise_engine::ForecastRequest;
use stockwise_forecast::{ManualParams, ManualSelection, MethodKind};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForecastRequestBody {
    /// Omit to only list the products.
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub manual_method: Option<MethodKind>,
    #[serde(default)]
    pub manual_params: Option<ManualParams>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScenarioRequestBody {
    pub product_id: String,
    #[serde(default)]
    pub demand_change_percent: f64,
    #[serde(default)]
    pub lead_time_change_days: i32,
}

// -------------------------
// Mapping helpers
// -------------------------

/// Map a body the JSON extractor refused to a 400.
pub fn reject_body(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.trim()
        .parse()
        .map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        })
}

impl ForecastRequestBody {
    pub fn into_request(self) -> Result<ForecastRequest, axum::response::Response> {
        let product_id = self.product_id.as_deref().map(parse_product_id).transpose()?;
        let manual = match (self.manual_method, self.manual_params) {
            (Some(method), params) => {
                Some(ManualSelection::new(method).with_params(params.unwrap_or_default()))
            }
            (None, None) => None,
            (None, Some(_)) => {
                return Err(errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_parameter",
                    "manualParams requires manualMethod",
                ));
            }
        };
        Ok(ForecastRequest { product_id, manual })
    }
}
