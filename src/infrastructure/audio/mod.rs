mod audio_normalizer_factory;
mod azure_whisper_engine;
mod ffmpeg_normalizer;
mod openai_whisper_engine;
mod symphonia_normalizer;
mod transcription_engine_factory;

pub use audio_normalizer_factory::{AudioNormalizerFactory, NormalizerKind};
pub use azure_whisper_engine::AzureWhisperEngine;
pub use ffmpeg_normalizer::{DEFAULT_FFMPEG_BINARY, FfmpegAudioNormalizer, check_ffmpeg_binary};
pub use openai_whisper_engine::{DEFAULT_OPENAI_BASE_URL, DEFAULT_WHISPER_MODEL, OpenAiWhisperEngine};
pub use symphonia_normalizer::SymphoniaAudioNormalizer;
pub use transcription_engine_factory::{
    TranscriptionEngineFactory, TranscriptionEngineOptions, TranscriptionProvider,
};
