use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioConversionError, AudioNormalizer};
use crate::domain::{CallRecording, NormalizedAudio};

pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Transcodes through the ffmpeg CLI.
///
/// Input and output live in a per-call temporary directory that is removed
/// when the call returns, including on timeout and cancellation. The child is
/// killed if the future is dropped.
pub struct FfmpegAudioNormalizer {
    binary_path: PathBuf,
    timeout: Duration,
    temp_root: Option<PathBuf>,
}

impl FfmpegAudioNormalizer {
    pub fn new(binary_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary_path: binary_path.into(),
            timeout,
            temp_root: None,
        }
    }

    /// Places per-call working directories under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    fn workspace(&self) -> io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("call-analyst-");
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

#[async_trait]
impl AudioNormalizer for FfmpegAudioNormalizer {
    async fn normalize(
        &self,
        recording: CallRecording,
    ) -> Result<NormalizedAudio, AudioConversionError> {
        if recording.is_empty() {
            return Err(AudioConversionError::EmptyInput);
        }

        let workspace = self.workspace()?;
        let input_path = workspace
            .path()
            .join(format!("input.{}", recording.extension().unwrap_or("bin")));
        let output_path = workspace.path().join(NormalizedAudio::FILE_NAME);

        tokio::fs::write(&input_path, &recording.data).await?;
        drop(recording);

        let mut cmd = Command::new(&self.binary_path);
        cmd.args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y"])
            .arg("-i")
            .arg(&input_path)
            .args(["-vn", "-ac"])
            .arg(NormalizedAudio::CHANNELS.to_string())
            .arg("-ar")
            .arg(NormalizedAudio::SAMPLE_RATE.to_string())
            .args(["-c:a", "pcm_s16le", "-f", "wav"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(command = ?cmd, "Running ffmpeg");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AudioConversionError::TranscoderUnavailable(format!(
                    "{} not found",
                    self.binary_path.display()
                )));
            }
            Ok(Err(e)) => return Err(AudioConversionError::Io(e)),
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "ffmpeg timed out");
                return Err(AudioConversionError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("ffmpeg exited without output")
                .trim()
                .to_string();
            tracing::warn!(status = %output.status, reason = %reason, "ffmpeg rejected input");
            return Err(AudioConversionError::DecodingFailed(reason));
        }

        let data = tokio::fs::read(&output_path).await?;
        if data.is_empty() {
            return Err(AudioConversionError::DecodingFailed(
                "ffmpeg produced no output".to_string(),
            ));
        }

        tracing::debug!(bytes = data.len(), "Audio normalized with ffmpeg");

        Ok(NormalizedAudio::from_wav_bytes(data))
    }
}

/// Checks that the ffmpeg binary can be executed.
pub async fn check_ffmpeg_binary(binary_path: &str) -> Result<(), AudioConversionError> {
    let status = Command::new(binary_path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| AudioConversionError::TranscoderUnavailable(format!("{binary_path}: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(AudioConversionError::TranscoderUnavailable(format!(
            "{binary_path} -version exited with {status}"
        )))
    }
}
