use anyhow::{Result, anyhow};
use axum::{
    body::to_bytes,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use emocopy_lp::{
    api::ApiError,
    clients::health::determine_overall_status,
    handlers::landing_page::{fallback_document, page_view_from_headers},
    models::health::{HealthStatus, ServiceHealth},
};
use serde_json::{Value, json};
use std::collections::HashMap;

async fn error_body(error: ApiError) -> Result<(StatusCode, Value)> {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;

    Ok((status, serde_json::from_slice(&bytes)?))
}

/// Test: Errors are rendered as a failed ApiResponse envelope
#[tokio::test]
async fn test_api_error_envelope() -> Result<()> {
    let (status, body) = error_body(ApiError::not_found("Landing page not found")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Landing page not found",
            "message": "Not Found"
        })
    );

    let (status, body) = error_body(ApiError::bad_request("productName is required")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "productName is required");

    Ok(())
}

/// Test: Unexpected failures become a 500 without leaking the cause
#[tokio::test]
async fn test_anyhow_errors_are_internal() -> Result<()> {
    let error: ApiError = anyhow!("Database write failed: connection reset").into();

    let (status, body) = error_body(error).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(!body.to_string().contains("connection reset"));

    Ok(())
}

#[test]
fn test_page_view_reads_client_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
    headers.insert("user-agent", HeaderValue::from_static("Mozilla/5.0"));
    headers.insert("referer", HeaderValue::from_static("https://example.com/"));

    let view = page_view_from_headers("page-1", &headers);

    assert_eq!(view.landing_page_id, "page-1");
    assert_eq!(view.ip_address, "203.0.113.7");
    assert_eq!(view.user_agent, "Mozilla/5.0");
    assert_eq!(view.referrer.as_deref(), Some("https://example.com/"));
    assert!(!view.id.is_empty());
}

/// Test: Missing headers are recorded as unknown and the referrer is optional
#[test]
fn test_page_view_defaults() {
    let view = page_view_from_headers("page-1", &HeaderMap::new());

    assert_eq!(view.ip_address, "unknown");
    assert_eq!(view.user_agent, "unknown");
    assert_eq!(view.referrer, None);
}

#[test]
fn test_fallback_document_escapes_content() {
    let copies = vec!["一杯の余白".to_string(), "<img src=x onerror=alert(1)>".to_string()];

    let html = fallback_document("朝のコーヒー - エモコピーLP", &copies);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>朝のコーヒー - エモコピーLP</h1>"));
    assert!(html.contains("<p>一杯の余白</p>"));
    assert!(html.contains("<p>&lt;img src=x onerror=alert(1)&gt;</p>"));
    assert!(!html.contains("<img"));
}

/// Test: The database decides unhealthy; a provider without a key only degrades
#[test]
fn test_overall_health_status() {
    let mut checks = HashMap::new();
    checks.insert("database".to_string(), ServiceHealth::healthy(3));
    checks.insert(
        "google".to_string(),
        ServiceHealth::healthy(0).with_model("gemini".to_string()),
    );
    assert_eq!(determine_overall_status(&checks), HealthStatus::Healthy);

    checks.insert(
        "openai".to_string(),
        ServiceHealth::degraded("API key not configured".to_string()),
    );
    assert_eq!(determine_overall_status(&checks), HealthStatus::Degraded);

    checks.insert(
        "database".to_string(),
        ServiceHealth::unhealthy("connection refused".to_string()),
    );
    assert_eq!(determine_overall_status(&checks), HealthStatus::Unhealthy);
}
