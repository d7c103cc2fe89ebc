use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use call_analyst::application::ports::{CredentialStore, SystemClock};
use call_analyst::application::services::{
    AnalysisTemplate, CallAnalyzer, CallPipeline, CdrQueryService, CredentialManager,
};
use call_analyst::domain::CredentialRecord;
use call_analyst::infrastructure::audio::SymphoniaAudioNormalizer;
use call_analyst::infrastructure::llm::MockLlmClient;
use call_analyst::infrastructure::persistence::{InMemoryCredentialStore, JsonFileCredentialStore};
use call_analyst::infrastructure::telephony::YeastarClient;
use call_analyst::presentation::handlers::BANNER;
use call_analyst::presentation::{AppState, CdrDefaults, create_router};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::support::{
    FakePbx, WavCheckingEngine, build_wav, multipart_body, multipart_content_type, sine_wave,
};

const TRANSCRIPT: &str = "สวัสดีครับ สนใจทำประกันรถยนต์ชั้นหนึ่งไหมครับ";

fn credential_record(pbx_url: &str, expire_time: chrono::DateTime<Utc>) -> CredentialRecord {
    CredentialRecord {
        access_token: "access-0".to_string(),
        access_token_expire_time: expire_time,
        refresh_token: "refresh-0".to_string(),
        token_url: format!("{}/openapi/v1.0/refresh_token", pbx_url),
        cdr_url: format!("{}/openapi/v1.0/cdr/search", pbx_url),
    }
}

fn app_with_record(record: CredentialRecord) -> Router {
    app_with_store(Arc::new(InMemoryCredentialStore::new(record)))
}

fn app_with_store(store: Arc<dyn CredentialStore>) -> Router {
    let analyzer = Arc::new(CallAnalyzer::new(
        Arc::new(MockLlmClient),
        AnalysisTemplate::default(),
    ));
    let call_pipeline = Arc::new(CallPipeline::new(
        Arc::new(SymphoniaAudioNormalizer),
        Arc::new(WavCheckingEngine {
            transcript: TRANSCRIPT.to_string(),
        }),
        analyzer,
        "th".to_string(),
    ));

    let yeastar = Arc::new(YeastarClient::new(Duration::from_secs(5)).unwrap());
    let credentials = Arc::new(CredentialManager::new(
        store,
        yeastar.clone(),
        Arc::new(SystemClock),
    ));
    let cdr_query_service = Arc::new(CdrQueryService::new(credentials, yeastar));

    create_router(AppState {
        call_pipeline,
        cdr_query_service,
        cdr_defaults: CdrDefaults::new(24, 100),
        max_upload_bytes: 10 * 1024 * 1024,
    })
}

fn app() -> Router {
    app_with_record(credential_record(
        "http://127.0.0.1:1",
        Utc::now() + chrono::Duration::hours(1),
    ))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn upload(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze-call")
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(multipart_body(field, filename, data)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn given_running_service_when_requesting_root_then_returns_banner() {
    let response = app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], BANNER.as_bytes());
}

#[tokio::test]
async fn given_running_service_when_checking_health_then_returns_healthy() {
    let response = app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "healthy"}));
}

#[tokio::test]
async fn given_request_id_header_when_calling_api_then_response_echoes_it() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn given_multipart_without_file_field_when_analyzing_then_returns_400() {
    let response = app()
        .oneshot(upload("attachment", "call.wav", b"RIFF"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "No audio file uploaded"})
    );
}

#[tokio::test]
async fn given_non_multipart_body_when_analyzing_then_returns_400() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze-call")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No audio file uploaded");
}

#[tokio::test]
async fn given_8khz_wav_upload_when_analyzing_then_returns_transcript_and_three_section_analysis() {
    let wav = build_wav(8_000, &sine_wave(8_000, 10, 440.0));

    let response = app().oneshot(upload("file", "call.wav", &wav)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["transcript"], TRANSCRIPT);
    let analysis = body["analysis"].as_str().unwrap();
    assert!(analysis.contains("1. จุดแข็งของพนักงานขาย"));
    assert!(analysis.contains("2. จุดอ่อน"));
    assert!(analysis.contains("3. คำแนะนำที่ควรปรับปรุง"));
}

#[tokio::test]
async fn given_empty_upload_when_analyzing_then_fails_at_normalizing_stage() {
    let response = app().oneshot(upload("file", "call.wav", b"")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["stage"], "normalizing");
    assert_eq!(body["completed_stages"], json!([]));
    assert!(body.get("transcript").is_none());
    assert!(body.get("analysis").is_none());
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn given_valid_token_when_listing_yeastar_calls_then_returns_upstream_body_verbatim() {
    let listing = json!({
        "errcode": 0,
        "errmsg": "SUCCESS",
        "total_number": 1,
        "data": [{"id": "10", "call_from": "1001", "call_to": "0812345678", "talk_duration": 95}]
    });
    let pbx = FakePbx::new(200, listing.clone());
    let (pbx_url, shutdown_tx) = pbx.start().await;
    let app = app_with_record(credential_record(
        &pbx_url,
        Utc::now() + chrono::Duration::hours(1),
    ));

    let response = app
        .oneshot(get(
            "/get-yeastar-calls?startTime=2024-05-01T00:00:00&endTime=2024-05-31T23:59:59",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, listing);
    assert_eq!(pbx.refreshes(), 0);
    let requests = pbx.cdr_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("Bearer access-0"));
    assert_eq!(requests[0].1["start_time"], "2024-05-01 00:00:00");
    assert_eq!(requests[0].1["end_time"], "2024-05-31 23:59:59");
    assert_eq!(requests[0].1["limit"], 100);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_expired_token_when_listing_yeastar_calls_then_refreshes_once_and_uses_new_token() {
    let pbx = FakePbx::new(200, json!({"errcode": 0, "data": []}));
    let (pbx_url, shutdown_tx) = pbx.start().await;
    let app = app_with_record(credential_record(
        &pbx_url,
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
    ));

    let response = app
        .oneshot(get(
            "/get-yeastar-calls?startTime=2024-05-01T00:00:00&endTime=2024-05-02T00:00:00&direction=inbound",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(pbx.refreshes(), 1);
    let requests = pbx.cdr_requests.lock().unwrap();
    assert_eq!(requests[0].0.as_deref(), Some("Bearer access-1"));
    assert_eq!(requests[0].1["direction"], "inbound");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_start_after_end_when_listing_yeastar_calls_then_returns_400_without_upstream_call() {
    let pbx = FakePbx::new(200, json!({}));
    let (pbx_url, shutdown_tx) = pbx.start().await;
    let app = app_with_record(credential_record(
        &pbx_url,
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
    ));

    let response = app
        .oneshot(get(
            "/get-yeastar-calls?startTime=2024-05-31T23:59:59&endTime=2024-05-01T00:00:00",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
    assert_eq!(pbx.refreshes(), 0);
    assert!(pbx.cdr_requests.lock().unwrap().is_empty());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_malformed_timestamp_when_listing_yeastar_calls_then_returns_400() {
    let response = app()
        .oneshot(get("/get-yeastar-calls?startTime=yesterday&endTime=2024-05-01T00:00:00"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_upstream_unavailable_when_listing_yeastar_calls_then_returns_500_with_status() {
    let pbx = FakePbx::new(503, json!({"errmsg": "maintenance"}));
    let (pbx_url, shutdown_tx) = pbx.start().await;
    let app = app_with_record(credential_record(
        &pbx_url,
        Utc::now() + chrono::Duration::hours(1),
    ));

    let response = app
        .oneshot(get(
            "/get-yeastar-calls?startTime=2024-05-01T00:00:00&endTime=2024-05-31T23:59:59",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to fetch calls from Yeastar", "status": 503})
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_window_when_listing_yeastar_calls_then_uses_default_window_ending_now() {
    let pbx = FakePbx::new(200, json!({"data": []}));
    let (pbx_url, shutdown_tx) = pbx.start().await;
    let app = app_with_record(credential_record(
        &pbx_url,
        Utc::now() + chrono::Duration::hours(1),
    ));

    let response = app.oneshot(get("/get-yeastar-calls")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let requests = pbx.cdr_requests.lock().unwrap();
    let parse = |field: &str| {
        chrono::NaiveDateTime::parse_from_str(
            requests[0].1[field].as_str().unwrap(),
            "%Y-%m-%d %H:%M:%S",
        )
        .unwrap()
    };
    assert_eq!(parse("end_time") - parse("start_time"), chrono::Duration::hours(24));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_credential_file_when_listing_yeastar_calls_then_hides_file_location() {
    let dir = tempfile::tempdir().unwrap();
    let credential_file = dir.path().join("yeastar_token.json");
    let app = app_with_store(Arc::new(JsonFileCredentialStore::new(credential_file)));

    let response = app.oneshot(get("/get-yeastar-calls")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "Yeastar credentials are unavailable"}));
    let text = body.to_string();
    assert!(!text.contains(dir.path().to_str().unwrap()));
    assert!(!text.contains("yeastar_token.json"));
}
