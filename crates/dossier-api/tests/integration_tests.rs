//! Integration tests for the Dossier API.
//!
//! Each test builds its own router over a mock embedding and the
//! content-sniffing extractor, and drives it with hand-built multipart bodies.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use dossier_api::create_router;
use dossier_api::handlers::HealthResponse;
use dossier_api::state::AppState;
use dossier_core::config::DossierConfig;
use dossier_extract::AutoExtractor;
use dossier_insight::InsightEngine;
use dossier_vector::MockEmbedding;

// =============================================================================
// Helpers
// =============================================================================

const BOUNDARY: &str = "dossier-test-boundary";

const NICE_GUIDE: &str = "Complete Guide to Nice and the Riviera\nan overview for small groups.\n\n\
    The promenade in Nice is perfect for a group walk on the first day of the trip. \
    Rent bikes together and follow the coast road towards Villefranche in the afternoon. \
    Book a table for everyone at one of the seafood places near the old port.";

const LYON_GUIDE: &str = "Culinary Guide to Lyon for Visitors\nan introduction to the city.\n\n\
    Lyon is known for its traditional bouchons serving hearty regional dishes. \
    The covered market near Part-Dieu station sells cheese, sausages and pastries. \
    Evening river cruises leave from the quay beside the old town every hour.";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(Option<&'a str>, &'a [u8]),
}

fn make_state(config: DossierConfig) -> AppState {
    let engine = InsightEngine::new(
        Arc::new(MockEmbedding::new()),
        Arc::new(AutoExtractor::new()),
        &config,
    );
    AppState::new(config, engine, "mock")
}

fn make_app() -> axum::Router {
    create_router(make_state(DossierConfig::default()))
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(file_name, bytes) => {
                let disposition = match file_name {
                    Some(f) => format!("form-data; name=\"pdfs\"; filename=\"{}\"", f),
                    None => "form-data; name=\"pdfs\"".to_string(),
                };
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
                        disposition
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn insights_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::post("/generate-insights")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

// =============================================================================
// GET /health
// =============================================================================

#[tokio::test]
async fn test_health_happy_path() {
    let resp = make_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "0.1.0");
    assert_eq!(health.embedding_backend, "mock");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let resp = make_app()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// POST /generate-insights
// =============================================================================

#[tokio::test]
async fn test_generate_insights_happy_path() {
    let req = insights_request(&[
        Part::File(Some("nice.txt"), NICE_GUIDE.as_bytes()),
        Part::File(Some("lyon.txt"), LYON_GUIDE.as_bytes()),
        Part::Text("persona", "Travel Planner"),
        Part::Text("job", "Plan a trip of 4 days for a group of 10 college friends"),
    ]);
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );

    let bytes = body_bytes(resp).await;
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("{\n    \"metadata\": {\n        \"input_documents\""));

    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["metadata"]["input_documents"][0], "nice.txt");
    assert_eq!(json["metadata"]["input_documents"][1], "lyon.txt");
    assert_eq!(json["metadata"]["persona"], "Travel Planner");
    assert!(json["metadata"]["processing_timestamp"].is_string());

    let sections = json["extracted_sections"].as_array().unwrap();
    let analysis = json["subsection_analysis"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(analysis.len(), 2);
    assert_eq!(sections[0]["importance_rank"], 1);
    assert_eq!(sections[1]["importance_rank"], 2);
    for (s, a) in sections.iter().zip(analysis) {
        assert_eq!(s["document"], a["document"]);
        assert!(a["refined_text"].as_str().unwrap().chars().count() >= 100);
    }
}

#[tokio::test]
async fn test_missing_persona_and_job_default_to_empty() {
    let req = insights_request(&[Part::File(Some("nice.txt"), NICE_GUIDE.as_bytes())]);
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["metadata"]["persona"], "");
    assert_eq!(json["metadata"]["job_to_be_done"], "");
}

#[tokio::test]
async fn test_unnamed_file_gets_placeholder_name() {
    let req = insights_request(&[
        Part::File(None, NICE_GUIDE.as_bytes()),
        Part::Text("persona", "Travel Planner"),
        Part::Text("job", "plan a trip"),
    ]);
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["metadata"]["input_documents"][0], "document-1");
}

#[tokio::test]
async fn test_corrupt_document_is_listed_but_skipped() {
    let req = insights_request(&[
        Part::File(Some("broken.pdf"), b"%PDF-1.4 truncated garbage"),
        Part::File(Some("nice.txt"), NICE_GUIDE.as_bytes()),
        Part::Text("persona", "Travel Planner"),
        Part::Text("job", "plan a trip"),
    ]);
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["metadata"]["input_documents"][0], "broken.pdf");
    let sections = json["extracted_sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["document"], "nice.txt");
}

#[tokio::test]
async fn test_no_documents_gives_empty_report() {
    let req = insights_request(&[
        Part::Text("persona", "Travel Planner"),
        Part::Text("job", "plan a trip"),
    ]);
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert!(json["metadata"]["input_documents"].as_array().unwrap().is_empty());
    assert!(json["extracted_sections"].as_array().unwrap().is_empty());
    assert!(json["subsection_analysis"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let req = Request::post("/generate-insights")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let resp = make_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mut config = DossierConfig::default();
    config.server.max_upload_bytes = 1024;
    let app = create_router(make_state(config));

    let big = vec![b'a'; 8 * 1024];
    let req = insights_request(&[Part::File(Some("big.txt"), &big)]);
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let mut config = DossierConfig::default();
    config.server.requests_per_sec = 1;
    let app = create_router(make_state(config));

    // Three requests inside at most two one-second windows: one must be refused.
    let mut refused = None;
    for _ in 0..3 {
        let req = Request::post("/generate-insights")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            refused = Some(resp);
            break;
        }
    }

    let resp = refused.expect("one request should be refused");
    assert_eq!(resp.headers().get("retry-after").unwrap(), "1");
    let json = body_json(resp).await;
    assert_eq!(json["error"], "too_many_requests");
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let mut config = DossierConfig::default();
    config.server.requests_per_sec = 1;
    let app = create_router(make_state(config));

    for _ in 0..5 {
        let resp = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
