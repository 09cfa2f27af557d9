use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use configuration::Settings;
use dashboard::DashboardContext;
use serde_json::Value;
use tower::ServiceExt;
use web_server::{create_router, AppState};

fn app() -> Router {
    let mut settings = Settings::default();
    settings.data.seed = Some(2024);
    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let context = DashboardContext::bootstrap(&settings, today).unwrap();
    create_router(AppState::new(context))
}

async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_index_serves_page() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<select id=\"marketplace\">"));
}

#[tokio::test]
async fn test_marketplaces_listed_in_set_order() {
    let (status, body) = get_json("/api/marketplaces").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["marketplaces"],
        serde_json::json!(["Magazine Luiza", "Casas Bahia", "Americanas"])
    );
    assert_eq!(body["default"], "Magazine Luiza");
}

#[tokio::test]
async fn test_dashboard_for_marketplace_with_space_in_name() {
    let (status, body) = get_json("/api/marketplaces/Casas%20Bahia/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["marketplace"], "Casas Bahia");
    assert_eq!(body["generated_on"], "2024-08-01");
    assert_eq!(body["visits_per_day"]["series"][0]["x"][0], "2024-08-01");
    assert_eq!(body["visits_per_day"]["series"][0]["mode"], "lines_markers");
    assert_eq!(body["sales_forecast"]["series"].as_array().unwrap().len(), 2);
    assert_eq!(body["overall_sales"]["series"].as_array().unwrap().len(), 3);
    assert_eq!(body["total_visits"]["series"][0]["mode"], "bar");
    assert_eq!(body["sales_ranking"]["lines"].as_array().unwrap().len(), 3);
    assert!(
        body["kpis"]["conversion_rate"]
            .as_str()
            .unwrap()
            .starts_with("Conversion Rate: ")
    );
}

#[tokio::test]
async fn test_unknown_marketplace_is_not_found() {
    let (status, body) = get_json("/api/marketplaces/Shopee/dashboard").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unknown marketplace: 'Shopee'");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, body) = get_json("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No route for /api/nothing-here");
}

#[tokio::test]
async fn test_summary_reports_training_and_kpis() {
    let (status, body) = get_json("/api/summary").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["training"]["train_samples"], 72);
    assert_eq!(body["training"]["test_samples"], 18);
    assert!(body["training"]["holdout_mse"].as_f64().unwrap() >= 0.0);

    let marketplaces = body["marketplaces"].as_array().unwrap();
    assert_eq!(marketplaces.len(), 3);
    for entry in marketplaces {
        let rate = entry["kpis"]["bounce_rate_pct"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&rate));
        assert_eq!(entry["kpis"]["conversion_basis"], "record_count");
    }
}
