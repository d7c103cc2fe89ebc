use std::path::Path;
use std::time::Duration;

use call_analyst::application::ports::{AudioConversionError, AudioNormalizer};
use call_analyst::domain::CallRecording;
use call_analyst::infrastructure::audio::{
    DEFAULT_FFMPEG_BINARY, FfmpegAudioNormalizer, check_ffmpeg_binary,
};
use tempfile::TempDir;

use crate::support::{build_wav, noise_text, sine_wave, wav_spec};

fn recording(bytes: Vec<u8>, filename: &str) -> CallRecording {
    CallRecording::new(bytes, Some(filename.to_string()), None)
}

fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

async fn ffmpeg_available() -> bool {
    if check_ffmpeg_binary(DEFAULT_FFMPEG_BINARY).await.is_ok() {
        true
    } else {
        eprintln!("ffmpeg not installed, skipping");
        false
    }
}

/// Writes an executable stand-in for ffmpeg that ignores its arguments.
#[cfg(unix)]
fn fake_transcoder(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-ffmpeg.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn given_8khz_wav_when_ffmpeg_normalizes_then_returns_16khz_mono_and_cleans_up() {
    if !ffmpeg_available().await {
        return;
    }
    let temp_root = TempDir::new().unwrap();
    let normalizer = FfmpegAudioNormalizer::new(DEFAULT_FFMPEG_BINARY, Duration::from_secs(30))
        .with_temp_root(temp_root.path());
    let input = build_wav(8_000, 1, &sine_wave(8_000, 1.0, 440.0, 1));

    let audio = normalizer
        .normalize(recording(input, "call.wav"))
        .await
        .unwrap();

    let spec = wav_spec(audio.as_bytes());
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(entries(temp_root.path()), 0);
}

#[tokio::test]
async fn given_undecodable_bytes_when_ffmpeg_normalizes_then_fails_and_cleans_up() {
    if !ffmpeg_available().await {
        return;
    }
    let temp_root = TempDir::new().unwrap();
    let normalizer = FfmpegAudioNormalizer::new(DEFAULT_FFMPEG_BINARY, Duration::from_secs(30))
        .with_temp_root(temp_root.path());

    let result = normalizer
        .normalize(recording(noise_text(2048), "call.mp3"))
        .await;

    assert!(matches!(result, Err(AudioConversionError::DecodingFailed(_))));
    assert_eq!(entries(temp_root.path()), 0);
}

#[tokio::test]
async fn given_missing_binary_when_normalizing_then_returns_transcoder_unavailable() {
    let temp_root = TempDir::new().unwrap();
    let normalizer =
        FfmpegAudioNormalizer::new("/nonexistent/bin/ffmpeg-missing", Duration::from_secs(5))
            .with_temp_root(temp_root.path());

    let result = normalizer.normalize(recording(vec![1, 2, 3], "call.wav")).await;

    assert!(matches!(
        result,
        Err(AudioConversionError::TranscoderUnavailable(_))
    ));
    assert_eq!(entries(temp_root.path()), 0);
}

#[tokio::test]
async fn given_empty_upload_when_normalizing_then_returns_empty_input_without_spawning() {
    let normalizer =
        FfmpegAudioNormalizer::new("/nonexistent/bin/ffmpeg-missing", Duration::from_secs(5));

    let result = normalizer.normalize(recording(Vec::new(), "call.wav")).await;

    assert!(matches!(result, Err(AudioConversionError::EmptyInput)));
}

#[tokio::test]
async fn given_missing_binary_when_checking_then_reports_unavailable() {
    let result = check_ffmpeg_binary("/nonexistent/bin/ffmpeg-missing").await;

    assert!(matches!(
        result,
        Err(AudioConversionError::TranscoderUnavailable(_))
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn given_transcoder_rejects_input_when_normalizing_then_reports_last_stderr_line() {
    let bin_dir = TempDir::new().unwrap();
    let temp_root = TempDir::new().unwrap();
    let binary = fake_transcoder(
        bin_dir.path(),
        "echo 'warming up' >&2\necho 'Invalid data found when processing input' >&2\nexit 1",
    );
    let normalizer =
        FfmpegAudioNormalizer::new(binary, Duration::from_secs(10)).with_temp_root(temp_root.path());

    let result = normalizer.normalize(recording(vec![1, 2, 3], "call.amr")).await;

    match result {
        Err(AudioConversionError::DecodingFailed(reason)) => {
            assert_eq!(reason, "Invalid data found when processing input")
        }
        other => panic!("expected decoding failure, got {:?}", other),
    }
    assert_eq!(entries(temp_root.path()), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn given_transcoder_writes_output_when_normalizing_then_returns_its_bytes() {
    let bin_dir = TempDir::new().unwrap();
    let temp_root = TempDir::new().unwrap();
    let binary = fake_transcoder(
        bin_dir.path(),
        "for last; do :; done\nprintf 'RIFFWAVE' > \"$last\"",
    );
    let normalizer =
        FfmpegAudioNormalizer::new(binary, Duration::from_secs(10)).with_temp_root(temp_root.path());

    let audio = normalizer
        .normalize(recording(vec![1, 2, 3], "call.wav"))
        .await
        .unwrap();

    assert_eq!(audio.as_bytes(), b"RIFFWAVE");
    assert_eq!(entries(temp_root.path()), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn given_transcoder_hangs_when_normalizing_then_times_out_and_cleans_up() {
    let bin_dir = TempDir::new().unwrap();
    let temp_root = TempDir::new().unwrap();
    let binary = fake_transcoder(bin_dir.path(), "exec sleep 30");
    let normalizer = FfmpegAudioNormalizer::new(binary, Duration::from_millis(300))
        .with_temp_root(temp_root.path());

    let started = std::time::Instant::now();
    let result = normalizer.normalize(recording(vec![1, 2, 3], "call.wav")).await;

    assert!(matches!(result, Err(AudioConversionError::Timeout(_))));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(entries(temp_root.path()), 0);
}
