use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use stockwise_core::{
    MonthlyDemandSeries, ProductDemandProfile, ProductId, TenantId, XyzGrade, YearMonth,
};
use stockwise_engine::{InMemoryCatalog, ReplenishmentConfig, ReplenishmentService};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(catalog: InMemoryCatalog) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let services = ReplenishmentService::new(Arc::new(catalog), ReplenishmentConfig::default());
        let app = stockwise_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn profile(sku: &str, xyz: Option<XyzGrade>) -> ProductDemandProfile {
    ProductDemandProfile {
        id: ProductId::new(),
        sku: sku.to_string(),
        name: format!("Product {sku}"),
        abc_grade: None,
        xyz_grade: xyz,
        turnover_rate: None,
        yoy_growth_rate: None,
        is_overstock: false,
        lead_time_days: 10,
        lead_time_std_dev_days: None,
        current_safety_stock: 50,
        current_reorder_point: 150,
        current_stock: 120,
    }
}

struct Seeded {
    tenant: TenantId,
    steady: ProductId,
    fresh: ProductId,
}

/// One tenant with a steady product (six months at 300/month) and a product
/// with a single month of history.
fn seeded_catalog() -> (InMemoryCatalog, Seeded) {
    let catalog = InMemoryCatalog::new();
    let tenant = TenantId::new();
    let start = YearMonth::new(2024, 1).unwrap();

    let steady = profile("SKU-B", Some(XyzGrade::X));
    let fresh = profile("SKU-A", None);
    let ids = Seeded {
        tenant,
        steady: steady.id,
        fresh: fresh.id,
    };

    let steady_history = MonthlyDemandSeries::from_quantities(start, &[300; 6]);
    catalog.upsert_history(tenant, steady.id, steady_history);
    let fresh_history = MonthlyDemandSeries::from_quantities(start, &[40]);
    catalog.upsert_history(tenant, fresh.id, fresh_history);
    catalog.upsert_profile(tenant, steady);
    catalog.upsert_profile(tenant, fresh);
    (catalog, ids)
}

#[tokio::test]
async fn health_needs_no_tenant() {
    let srv = TestServer::spawn(InMemoryCatalog::new()).await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn tenant_header_required_for_replenishment_endpoints() {
    let srv = TestServer::spawn(InMemoryCatalog::new()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/replenishment/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/replenishment/products", srv.base_url))
        .header("x-tenant-id", "acme")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_tenant");
}

#[tokio::test]
async fn products_are_listed_by_sku_and_scoped_to_tenant() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/replenishment/products", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let skus: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sku"].as_str().unwrap())
        .collect();
    assert_eq!(skus, vec!["SKU-A", "SKU-B"]);

    let res = client
        .get(format!("{}/replenishment/products", srv.base_url))
        .header("x-tenant-id", TenantId::new().to_string())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn forecast_for_steady_product() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/replenishment/forecast", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .json(&json!({ "productId": ids.steady.to_string() }))
        .send()
        .await
        .unwrap();
    if res.status() != StatusCode::OK {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 200 OK from forecast, got {status} body={body}");
    }

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 2);
    let forecast = &body["forecast"];
    assert_eq!(forecast["method"]["kind"], "SMA");
    assert_eq!(forecast["isManual"], false);
    assert_eq!(forecast["confidence"], "high");
    assert_eq!(forecast["mape"], 0.0);

    let predicted = forecast["predicted"].as_array().unwrap();
    assert_eq!(predicted.len(), 3);
    assert_eq!(predicted[0]["month"], "2024-07");
    assert!(predicted.iter().all(|p| p["quantity"] == 300));
}

#[tokio::test]
async fn manual_method_override_is_honoured() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/replenishment/forecast", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .json(&json!({
            "productId": ids.steady.to_string(),
            "manualMethod": "Holts",
            "manualParams": { "alpha": 0.5 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let forecast = &body["forecast"];
    assert_eq!(forecast["isManual"], true);
    assert_eq!(forecast["selectionReason"], "manually selected");
    assert_eq!(forecast["method"], json!({ "kind": "Holts", "alpha": 0.5, "beta": 0.1 }));
}

#[tokio::test]
async fn manual_window_size_reaches_the_method() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/replenishment/forecast", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .json(&json!({
            "productId": ids.steady.to_string(),
            "manualMethod": "SMA",
            "manualParams": { "windowSize": 6 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["forecast"]["method"], json!({ "kind": "SMA", "windowSize": 6 }));
}

#[tokio::test]
async fn unknown_body_keys_are_rejected() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let bodies = [
        json!({
            "productId": ids.steady.to_string(),
            "manualMethod": "SMA",
            "manualParams": { "window_size": 6 },
        }),
        json!({ "product_id": ids.steady.to_string() }),
    ];
    for body in bodies {
        let res = client
            .post(format!("{}/replenishment/forecast", srv.base_url))
            .header("x-tenant-id", ids.tenant.to_string())
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body} should be rejected");
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "invalid_body");
    }
}

#[tokio::test]
async fn forecast_without_product_or_history_has_no_result() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    for body in [json!({}), json!({ "productId": ids.fresh.to_string() })] {
        let res = client
            .post(format!("{}/replenishment/forecast", srv.base_url))
            .header("x-tenant-id", ids.tenant.to_string())
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert!(body["forecast"].is_null());
        assert_eq!(body["products"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/replenishment/forecast", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .json(&json!({ "productId": ProductId::new().to_string() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Another tenant cannot see the product either.
    let res = client
        .post(format!("{}/replenishment/scenarios", srv.base_url))
        .header("x-tenant-id", TenantId::new().to_string())
        .json(&json!({ "productId": ids.steady.to_string() }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scenarios_come_back_in_display_order() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/replenishment/scenarios", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .json(&json!({
            "productId": ids.steady.to_string(),
            "demandChangePercent": 10.0,
            "leadTimeChangeDays": 2,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["productId"], ids.steady.to_string());
    let rows = body["scenarios"].as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["scenarioName"], "Baseline");
    assert_eq!(rows[0]["newSafetyStock"], 50);
    assert_eq!(rows[0]["newReorderPoint"], 150);
    assert_eq!(rows[0]["stockStatus"], "need_order");
    assert_eq!(rows[1]["scenarioName"], "Custom scenario");
    assert_eq!(rows[1]["adjustedLeadTime"], 12);
    assert_eq!(rows[7]["scenarioName"], "Best case");
}

#[tokio::test]
async fn out_of_range_scenario_is_rejected() {
    let (catalog, ids) = seeded_catalog();
    let srv = TestServer::spawn(catalog).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/replenishment/scenarios", srv.base_url))
        .header("x-tenant-id", ids.tenant.to_string())
        .json(&json!({
            "productId": ids.steady.to_string(),
            "demandChangePercent": 75.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_parameter");
}
