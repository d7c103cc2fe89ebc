use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::{DEFAULT_ANALYSIS_PROMPT, DEFAULT_ANALYSIS_TEMPERATURE};
use crate::infrastructure::audio::{DEFAULT_FFMPEG_BINARY, DEFAULT_WHISPER_MODEL};
use crate::infrastructure::llm::DEFAULT_CHAT_MODEL;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub analysis: AnalysisSettings,
    pub audio: AudioSettings,
    pub yeastar: YeastarSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub chat_model: String,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub language: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    pub prompt_template: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerSetting {
    Ffmpeg,
    Native,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    pub normalizer: NormalizerSetting,
    pub ffmpeg_path: String,
    pub timeout_secs: u64,
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YeastarSettings {
    pub credential_file: PathBuf,
    pub timeout_secs: u64,
    /// Length of the search window used when a request omits `startTime`/`endTime`.
    pub default_window_hours: u32,
    pub default_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub json: bool,
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "APP";
    pub const ENV_SEPARATOR: &'static str = "__";

    /// Layers built-in defaults, `config/{environment}.toml` (optional) and
    /// `APP__SECTION__KEY` environment variables. `OPENAI_API_KEY` fills the
    /// language-model key when none is configured.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let openai_key = std::env::var("OPENAI_API_KEY").ok();

        Self::defaults()?
            .add_source(
                File::with_name(&format!("config/{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator(Self::ENV_SEPARATOR)
                    .separator(Self::ENV_SEPARATOR),
            )
            .set_default("llm.api_key", openai_key.unwrap_or_default())?
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.max_upload_size_mb", 100)?
            .set_default("llm.chat_model", DEFAULT_CHAT_MODEL)?
            .set_default("llm.timeout_secs", 120)?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.model", DEFAULT_WHISPER_MODEL)?
            .set_default("transcription.language", "th")?
            .set_default("transcription.timeout_secs", 300)?
            .set_default("analysis.prompt_template", DEFAULT_ANALYSIS_PROMPT)?
            .set_default("analysis.temperature", DEFAULT_ANALYSIS_TEMPERATURE as f64)?
            .set_default("audio.normalizer", "ffmpeg")?
            .set_default("audio.ffmpeg_path", DEFAULT_FFMPEG_BINARY)?
            .set_default("audio.timeout_secs", 120)?
            .set_default("yeastar.credential_file", "yeastar_token.json")?
            .set_default("yeastar.timeout_secs", 30)?
            .set_default("yeastar.default_window_hours", 24)?
            .set_default("yeastar.default_limit", 100)?
            .set_default("logging.json", false)
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TranscriptionSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AudioSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl YeastarSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
