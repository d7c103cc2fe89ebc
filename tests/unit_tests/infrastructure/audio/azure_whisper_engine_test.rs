use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use call_analyst::application::ports::{TranscriptionEngine, TranscriptionError};
use call_analyst::domain::NormalizedAudio;
use call_analyst::infrastructure::audio::AzureWhisperEngine;

use crate::support::start_mock_server;

#[derive(Default, Clone)]
struct Captured {
    language: Option<String>,
    api_key: Option<String>,
    has_file: bool,
}

async fn start_mock_azure_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, Arc<Mutex<Captured>>, tokio::sync::oneshot::Sender<()>) {
    let captured = Arc::new(Mutex::new(Captured::default()));

    let app = Router::new()
        .route(
            "/openai/deployments/my-deployment/audio/transcriptions",
            post(
                move |State(captured): State<Arc<Mutex<Captured>>>,
                      headers: HeaderMap,
                      mut multipart: Multipart| async move {
                    let mut seen = Captured {
                        api_key: headers
                            .get("api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from),
                        ..Default::default()
                    };
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        match field.name() {
                            Some("language") => seen.language = Some(field.text().await.unwrap()),
                            Some("file") => seen.has_file = !field.bytes().await.unwrap().is_empty(),
                            _ => {}
                        }
                    }
                    *captured.lock().unwrap() = seen;
                    let status = StatusCode::from_u16(response_status).unwrap();
                    (status, response_body).into_response()
                },
            ),
        )
        .with_state(captured.clone());

    let (base_url, shutdown_tx) = start_mock_server(app).await;
    (base_url, captured, shutdown_tx)
}

fn engine(base_url: &str) -> AzureWhisperEngine {
    AzureWhisperEngine::new(
        base_url,
        "my-deployment",
        "test-key",
        "2024-06-01",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn given_valid_audio_when_azure_transcribes_then_returns_text_and_sends_language_hint() {
    let (base_url, captured, shutdown_tx) =
        start_mock_azure_server(200, r#"{"text": " ลูกค้าสนใจประกันชั้นหนึ่ง "}"#).await;
    let audio = NormalizedAudio::from_wav_bytes(vec![0u8; 64]);

    let result = engine(&base_url).transcribe(&audio, "th").await;

    assert_eq!(result.unwrap(), "ลูกค้าสนใจประกันชั้นหนึ่ง");
    let seen = captured.lock().unwrap().clone();
    assert_eq!(seen.language.as_deref(), Some("th"));
    assert_eq!(seen.api_key.as_deref(), Some("test-key"));
    assert!(seen.has_file);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_api_returns_error_status_when_transcribing_then_returns_api_error() {
    let (base_url, _, shutdown_tx) = start_mock_azure_server(
        400,
        r#"{"error": {"code": "InvalidRequest", "message": "bad audio"}}"#,
    )
    .await;
    let audio = NormalizedAudio::from_wav_bytes(vec![0u8; 8]);

    let result = engine(&base_url).transcribe(&audio, "th").await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_api_returns_empty_text_when_transcribing_then_returns_empty_string() {
    let (base_url, _, shutdown_tx) = start_mock_azure_server(200, r#"{"text": ""}"#).await;
    let audio = NormalizedAudio::from_wav_bytes(vec![0u8; 8]);

    let result = engine(&base_url).transcribe(&audio, "th").await;

    assert_eq!(result.unwrap(), "");
    shutdown_tx.send(()).ok();
}
