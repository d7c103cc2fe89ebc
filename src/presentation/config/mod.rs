mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AnalysisSettings, AudioSettings, LlmSettings, LoggingSettings, NormalizerSetting,
    ServerSettings, Settings, TranscriptionProviderSetting, TranscriptionSettings,
    YeastarSettings,
};
