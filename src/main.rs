use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use call_analyst::application::ports::{CredentialStore, SystemClock};
use call_analyst::application::services::{
    AnalysisTemplate, CallAnalyzer, CallPipeline, CdrQueryService, CredentialManager,
};
use call_analyst::infrastructure::audio::{
    AudioNormalizerFactory, NormalizerKind, TranscriptionEngineFactory,
    TranscriptionEngineOptions, TranscriptionProvider, check_ffmpeg_binary,
};
use call_analyst::infrastructure::llm::OpenAiClient;
use call_analyst::infrastructure::observability::{TracingConfig, init_tracing};
use call_analyst::infrastructure::persistence::JsonFileCredentialStore;
use call_analyst::infrastructure::telephony::YeastarClient;
use call_analyst::presentation::config::{NormalizerSetting, TranscriptionProviderSetting};
use call_analyst::presentation::{AppState, CdrDefaults, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load configuration")?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.json,
        settings.logging.level.as_deref(),
    ))?;

    // Call pipeline
    let normalizer_kind = match settings.audio.normalizer {
        NormalizerSetting::Ffmpeg => NormalizerKind::Ffmpeg,
        NormalizerSetting::Native => NormalizerKind::Native,
    };
    if normalizer_kind == NormalizerKind::Ffmpeg {
        if let Err(e) = check_ffmpeg_binary(&settings.audio.ffmpeg_path).await {
            tracing::warn!(error = %e, "ffmpeg is not usable; audio uploads will fail");
        }
    }
    let normalizer = AudioNormalizerFactory::create(
        normalizer_kind,
        &settings.audio.ffmpeg_path,
        settings.audio.timeout(),
        settings.audio.temp_dir.clone(),
    );

    let transcription = &settings.transcription;
    let provider = match transcription.provider {
        TranscriptionProviderSetting::OpenAi => TranscriptionProvider::OpenAi,
        TranscriptionProviderSetting::Azure => TranscriptionProvider::Azure,
    };
    let transcription_engine = TranscriptionEngineFactory::create(
        provider,
        TranscriptionEngineOptions {
            model: Some(transcription.model.clone()),
            api_key: [transcription.api_key.as_deref(), Some(settings.llm.api_key.as_str())]
                .into_iter()
                .flatten()
                .find(|key| !key.is_empty())
                .map(str::to_string),
            base_url: transcription.base_url.clone(),
            azure_deployment: transcription.azure_deployment.clone(),
            azure_api_version: transcription.azure_api_version.clone(),
        },
        transcription.timeout(),
    )
    .context("Failed to create transcription engine")?;

    let llm_client = Arc::new(
        OpenAiClient::new(
            settings.llm.api_key.clone(),
            settings.llm.base_url.clone(),
            settings.llm.chat_model.clone(),
            settings.llm.timeout(),
        )?
        .with_max_tokens(settings.llm.max_tokens),
    );
    let analyzer = Arc::new(CallAnalyzer::new(
        llm_client,
        AnalysisTemplate::new(
            settings.analysis.prompt_template.clone(),
            settings.analysis.temperature,
        ),
    ));
    let call_pipeline = Arc::new(CallPipeline::new(
        normalizer,
        transcription_engine,
        analyzer,
        transcription.language.clone(),
    ));

    // Yeastar CDR access
    let credential_store = Arc::new(JsonFileCredentialStore::new(
        settings.yeastar.credential_file.clone(),
    ));
    if let Err(e) = credential_store.load().await {
        tracing::warn!(
            path = %credential_store.path().display(),
            error = %e,
            "Yeastar credential record unavailable; CDR listing fails until it is provisioned"
        );
    }
    let yeastar = Arc::new(YeastarClient::new(settings.yeastar.timeout())?);
    let credential_manager = Arc::new(CredentialManager::new(
        credential_store,
        yeastar.clone(),
        Arc::new(SystemClock),
    ));
    let cdr_query_service = Arc::new(CdrQueryService::new(credential_manager, yeastar));

    let state = AppState {
        call_pipeline,
        cdr_query_service,
        cdr_defaults: CdrDefaults::new(
            settings.yeastar.default_window_hours,
            settings.yeastar.default_limit,
        ),
        max_upload_bytes: settings.server.max_upload_size_mb * 1024 * 1024,
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, environment = %environment, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
