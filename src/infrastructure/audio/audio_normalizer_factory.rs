use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::AudioNormalizer;

use super::ffmpeg_normalizer::FfmpegAudioNormalizer;
use super::symphonia_normalizer::SymphoniaAudioNormalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizerKind {
    Ffmpeg,
    Native,
}

pub struct AudioNormalizerFactory;

impl AudioNormalizerFactory {
    pub fn create(
        kind: NormalizerKind,
        ffmpeg_binary: &str,
        timeout: Duration,
        temp_root: Option<PathBuf>,
    ) -> Arc<dyn AudioNormalizer> {
        match kind {
            NormalizerKind::Ffmpeg => {
                let normalizer = FfmpegAudioNormalizer::new(ffmpeg_binary, timeout);
                match temp_root {
                    Some(root) => Arc::new(normalizer.with_temp_root(root)),
                    None => Arc::new(normalizer),
                }
            }
            NormalizerKind::Native => Arc::new(SymphoniaAudioNormalizer),
        }
    }
}
